pub mod factory;
pub mod interface;
pub mod preprocess;
pub mod tesseract;

pub use factory::OcrFactory;
pub use interface::{OcrError, OcrInterface, OcrOptions};
