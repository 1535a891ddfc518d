use serde::{Deserialize, Serialize};

/// OCR engine and preprocessing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub ocr_engine: String,
    /// Tesseract `--psm`; 6 treats the image as one uniform block of text.
    pub page_segmentation_mode: u8,
    /// Luminance above which a pixel becomes white.
    pub threshold: u8,
    pub dpi: Option<i32>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            ocr_engine: "tesseract".to_string(),
            page_segmentation_mode: 6,
            threshold: 150,
            dpi: None,
        }
    }
}
