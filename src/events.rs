use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::ocr::OcrError;
use crate::translate::{TranslateError, TranslateResponse};

/// Which text area a background result is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputTarget {
    TextOutput,
    ImageText,
}

/// Thumbnail of an uploaded image, RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Messages posted by background work for the UI thread to apply.
#[derive(Debug)]
pub enum UiEvent {
    DebounceElapsed,
    TranslationFinished {
        target: OutputTarget,
        seq: u64,
        result: Result<TranslateResponse, TranslateError>,
    },
    ImageLoaded {
        seq: u64,
        preview: PreviewImage,
    },
    OcrFinished {
        seq: u64,
        result: Result<String, OcrError>,
    },
}

pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Sending half of the UI event queue. Wakes the UI after each post.
#[derive(Clone)]
pub struct EventSink {
    tx: UnboundedSender<UiEvent>,
    waker: Option<Waker>,
}

impl EventSink {
    pub fn with_waker<F>(mut self, waker: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.waker = Some(Arc::new(waker));
        self
    }

    pub fn post(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            debug!("UI event queue closed; dropping event");
            return;
        }
        if let Some(wake) = &self.waker {
            wake();
        }
    }
}

/// Receiving half, drained by the UI thread once per frame.
pub struct EventQueue {
    rx: UnboundedReceiver<UiEvent>,
}

impl EventQueue {
    pub fn try_next(&mut self) -> Option<UiEvent> {
        self.rx.try_recv().ok()
    }
}

pub fn channel() -> (EventSink, EventQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx, waker: None }, EventQueue { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn post_delivers_in_order_and_wakes() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let (sink, mut queue) = channel();
        let sink = sink.with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sink.post(UiEvent::DebounceElapsed);
        sink.post(UiEvent::OcrFinished {
            seq: 7,
            result: Ok("text".into()),
        });

        assert!(matches!(queue.try_next(), Some(UiEvent::DebounceElapsed)));
        assert!(matches!(queue.try_next(), Some(UiEvent::OcrFinished { seq: 7, .. })));
        assert!(queue.try_next().is_none());
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn post_after_queue_dropped_is_silent() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let (sink, queue) = channel();
        let sink = sink.with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(queue);

        sink.post(UiEvent::DebounceElapsed);
        assert_eq!(wakes.load(Ordering::SeqCst), 0);
    }
}
