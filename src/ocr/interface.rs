use async_trait::async_trait;
use image::GrayImage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrOptions {
    pub page_segmentation_mode: u8,
    /// Engine language, e.g. `eng` or `chi_sim`.
    pub language: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("cannot read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("{0}")]
    Engine(String),
    #[error("OCR worker stopped: {0}")]
    Worker(String),
}

/// OCR backend. Receives an already preprocessed image.
#[async_trait]
pub trait OcrInterface: Send + Sync {
    fn name(&self) -> &str;

    async fn extract_text(&self, image: &GrayImage, options: &OcrOptions)
        -> Result<String, OcrError>;
}
