use async_trait::async_trait;
use image::{GrayImage, ImageFormat};
use rusty_tesseract::Args;
use tracing::debug;

use super::interface::{OcrError, OcrInterface, OcrOptions};

/// Runs the `tesseract` binary through `rusty-tesseract`.
pub struct TesseractOcr {
    dpi: Option<i32>,
}

impl TesseractOcr {
    pub fn new(dpi: Option<i32>) -> Self {
        Self { dpi }
    }

    fn args_for(&self, options: &OcrOptions) -> Args {
        Args {
            lang: options.language.clone(),
            psm: Some(i32::from(options.page_segmentation_mode)),
            dpi: self.dpi,
            ..Args::default()
        }
    }
}

#[async_trait]
impl OcrInterface for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn extract_text(
        &self,
        image: &GrayImage,
        options: &OcrOptions,
    ) -> Result<String, OcrError> {
        let image = image.clone();
        let args = self.args_for(options);
        tokio::task::spawn_blocking(move || run_tesseract(&image, &args))
            .await
            .map_err(|e| OcrError::Worker(e.to_string()))?
    }
}

fn run_tesseract(image: &GrayImage, args: &Args) -> Result<String, OcrError> {
    // rusty-tesseract hands a file path to the CLI.
    let scratch = tempfile::Builder::new()
        .prefix("lingua-ocr-")
        .suffix(".png")
        .tempfile()?;
    image.save_with_format(scratch.path(), ImageFormat::Png)?;

    let input = rusty_tesseract::Image::from_path(scratch.path().to_path_buf())
        .map_err(|e| OcrError::Engine(e.to_string()))?;
    debug!("Running tesseract: lang={} psm={:?}", args.lang, args.psm);

    rusty_tesseract::image_to_string(&input, args).map_err(|e| OcrError::Engine(e.to_string()))
}

/// Installed tesseract version, if the binary can be found.
pub fn tesseract_version() -> Option<String> {
    rusty_tesseract::get_tesseract_version().ok()
}
