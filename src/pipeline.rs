use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;
use tokio::runtime::Handle;
use tracing::{error, info};

use crate::config_manager::ocr::OcrConfig;
use crate::events::{EventSink, OutputTarget, PreviewImage, UiEvent};
use crate::ocr::preprocess::{load_image, preprocess};
use crate::ocr::{OcrError, OcrInterface, OcrOptions};
use crate::translate::{TranslateInterface, TranslateRequest};

const PREVIEW_MAX_WIDTH: u32 = 320;
const PREVIEW_MAX_HEIGHT: u32 = 200;

/// Orders results written into one text area.
///
/// Every request bound for the area takes the next sequence number. A result
/// is applied only if it is newer than everything applied so far and newer
/// than the last time the area was cleared, so a slow early request can't
/// overwrite a faster later one.
#[derive(Debug, Default)]
pub struct SequenceGate {
    issued: u64,
    floor: u64,
}

impl SequenceGate {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether a result for `seq` would still be applied.
    pub fn is_live(&self, seq: u64) -> bool {
        seq > self.floor
    }

    /// Claim the area for `seq`'s result. Returns false if it is stale.
    pub fn accept(&mut self, seq: u64) -> bool {
        if !self.is_live(seq) {
            return false;
        }
        self.floor = seq;
        true
    }

    /// Drop every result issued so far.
    pub fn invalidate(&mut self) {
        self.floor = self.issued;
    }
}

/// Runs translation and OCR jobs on the tokio runtime and posts their
/// results to the UI event queue.
pub struct Dispatcher {
    translator: Arc<dyn TranslateInterface>,
    ocr: Arc<dyn OcrInterface>,
    runtime: Handle,
    events: EventSink,
    page_segmentation_mode: u8,
    threshold: u8,
}

impl Dispatcher {
    pub fn new(
        translator: Arc<dyn TranslateInterface>,
        ocr: Arc<dyn OcrInterface>,
        runtime: Handle,
        events: EventSink,
        ocr_config: &OcrConfig,
    ) -> Self {
        Self {
            translator,
            ocr,
            runtime,
            events,
            page_segmentation_mode: ocr_config.page_segmentation_mode,
            threshold: ocr_config.threshold,
        }
    }

    pub fn events(&self) -> &EventSink {
        &self.events
    }

    pub fn translate(&self, target: OutputTarget, seq: u64, request: TranslateRequest) {
        let translator = self.translator.clone();
        let events = self.events.clone();

        self.runtime.spawn(async move {
            info!(
                "Translating {:?} #{} from {} to {} via {}...",
                target,
                seq,
                request.source_lang,
                request.target_lang,
                translator.name()
            );
            let result = translator.translate(&request).await;
            match &result {
                Ok(response) => info!(
                    "Translation #{} completed ({} chars, detected source {:?})",
                    seq,
                    response.translated_text.chars().count(),
                    response.detected_source_lang
                ),
                Err(e) => error!("Translation error: {}", e),
            }
            events.post(UiEvent::TranslationFinished {
                target,
                seq,
                result,
            });
        });
    }

    /// Load `path`, preprocess it and run OCR with the given engine language.
    pub fn extract_text(&self, seq: u64, path: PathBuf, language: String) {
        let ocr = self.ocr.clone();
        let events = self.events.clone();
        let threshold = self.threshold;
        let options = OcrOptions {
            page_segmentation_mode: self.page_segmentation_mode,
            language,
        };

        self.runtime.spawn(async move {
            let loaded = tokio::task::spawn_blocking(move || {
                let image = load_image(&path)?;
                Ok::<_, OcrError>((preview_of(&image), preprocess(&image, threshold)))
            })
            .await
            .unwrap_or_else(|e| Err(OcrError::Worker(e.to_string())));

            let result = match loaded {
                Ok((preview, processed)) => {
                    events.post(UiEvent::ImageLoaded { seq, preview });
                    info!(
                        "Running OCR #{} via {} ({})",
                        seq,
                        ocr.name(),
                        options.language
                    );
                    ocr.extract_text(&processed, &options).await
                }
                Err(e) => Err(e),
            };

            match &result {
                Ok(text) => info!("OCR #{} extracted {} chars", seq, text.chars().count()),
                Err(e) => error!("OCR Error: {}", e),
            }
            events.post(UiEvent::OcrFinished { seq, result });
        });
    }
}

fn preview_of(image: &DynamicImage) -> PreviewImage {
    // thumbnail() would upscale small images.
    let thumb = if image.width() > PREVIEW_MAX_WIDTH || image.height() > PREVIEW_MAX_HEIGHT {
        image.thumbnail(PREVIEW_MAX_WIDTH, PREVIEW_MAX_HEIGHT).to_rgba8()
    } else {
        image.to_rgba8()
    };
    PreviewImage {
        width: thumb.width() as usize,
        height: thumb.height() as usize,
        rgba: thumb.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn newer_result_wins_over_stale_one() {
        let mut gate = SequenceGate::default();
        let early = gate.issue();
        let late = gate.issue();

        assert!(gate.accept(late));
        assert!(!gate.accept(early));
    }

    #[test]
    fn results_arriving_in_order_are_all_applied() {
        let mut gate = SequenceGate::default();
        let first = gate.issue();
        let second = gate.issue();

        assert!(gate.accept(first));
        assert!(gate.accept(second));
    }

    #[test]
    fn invalidate_discards_in_flight_results_only() {
        let mut gate = SequenceGate::default();
        let in_flight = gate.issue();
        gate.invalidate();
        assert!(!gate.is_live(in_flight));
        assert!(!gate.accept(in_flight));

        let after_clear = gate.issue();
        assert!(gate.accept(after_clear));
    }

    #[test]
    fn preview_fits_bounds_and_keeps_aspect() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 200, Rgb([1, 2, 3])));
        let preview = preview_of(&image);
        assert_eq!((preview.width, preview.height), (320, 100));
        assert_eq!(preview.rgba.len(), 320 * 100 * 4);
        assert_eq!(&preview.rgba[..4], &[1, 2, 3, 255]);
    }
}
