use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use super::interface::OcrInterface;
use super::tesseract::{tesseract_version, TesseractOcr};
use crate::config_manager::ocr::OcrConfig;

/// Factory for OCR engines
pub struct OcrFactory;

impl OcrFactory {
    pub fn create_ocr(config: &OcrConfig) -> Result<Arc<dyn OcrInterface>> {
        info!("Initializing OCR engine: {}", config.ocr_engine);

        match config.ocr_engine.as_str() {
            "tesseract" => {
                match tesseract_version() {
                    Some(version) => info!("Found tesseract {}", version.trim()),
                    None => warn!("tesseract binary not found; image text extraction will fail"),
                }
                Ok(Arc::new(TesseractOcr::new(config.dpi)))
            }
            other => anyhow::bail!("Unknown ocr_engine {:?}; expected \"tesseract\"", other),
        }
    }
}
