use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

pub type FireCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Waiting,
}

enum Signal {
    Activity(Instant),
    Cancel,
}

/// Restart-on-activity timer.
///
/// A single watcher task lives for as long as the `Debouncer`. Every
/// `notify()` pushes the deadline out to `delay` past the latest activity;
/// once the deadline passes without new activity the registered callback runs
/// exactly once and the watcher goes back to idle. Dropping the debouncer
/// discards any pending fire.
pub struct Debouncer {
    delay: Duration,
    signals: UnboundedSender<Signal>,
    waiting: Arc<AtomicBool>,
    callback: Arc<Mutex<Option<FireCallback>>>,
}

impl Debouncer {
    pub fn new(delay: Duration, runtime: &Handle) -> Self {
        let (signals, rx) = mpsc::unbounded_channel();
        let waiting = Arc::new(AtomicBool::new(false));
        let callback: Arc<Mutex<Option<FireCallback>>> = Arc::new(Mutex::new(None));

        runtime.spawn(watch(delay, rx, waiting.clone(), callback.clone()));

        Self {
            delay,
            signals,
            waiting,
            callback,
        }
    }

    /// Register the action to run when a burst of activity settles.
    /// Replaces any previous callback.
    pub fn on_fire<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut slot = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(f));
    }

    pub fn notify(&self) {
        if self.signals.send(Signal::Activity(Instant::now())).is_err() {
            debug!("debounce watcher has stopped; activity ignored");
            return;
        }
        self.waiting.store(true, Ordering::SeqCst);
    }

    /// Abandon a pending wait without firing.
    pub fn cancel(&self) {
        if self.signals.send(Signal::Cancel).is_err() {
            debug!("debounce watcher has stopped; cancel ignored");
        }
    }

    pub fn state(&self) -> DebounceState {
        if self.waiting.load(Ordering::SeqCst) {
            DebounceState::Waiting
        } else {
            DebounceState::Idle
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

async fn watch(
    delay: Duration,
    mut signals: UnboundedReceiver<Signal>,
    waiting: Arc<AtomicBool>,
    callback: Arc<Mutex<Option<FireCallback>>>,
) {
    // IDLE: block until the first activity of a burst.
    while let Some(signal) = signals.recv().await {
        let mut last_activity = match signal {
            Signal::Activity(at) => at,
            Signal::Cancel => continue,
        };
        waiting.store(true, Ordering::SeqCst);

        // WAITING: every activity pushes the deadline out.
        let expired = loop {
            tokio::select! {
                _ = sleep_until(last_activity + delay) => break true,
                next = signals.recv() => match next {
                    Some(Signal::Activity(at)) => {
                        last_activity = last_activity.max(at);
                        trace!("debounce deadline extended");
                    }
                    Some(Signal::Cancel) => break false,
                    None => {
                        waiting.store(false, Ordering::SeqCst);
                        return;
                    }
                },
            }
        };

        if expired {
            let action = callback
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            match action {
                Some(action) => action(),
                None => debug!("debounce elapsed with no callback registered"),
            }
        } else {
            debug!("pending debounce cancelled");
        }
        waiting.store(false, Ordering::SeqCst);
    }
    waiting.store(false, Ordering::SeqCst);
}
