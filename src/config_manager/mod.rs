pub mod debounce;
pub mod main;
pub mod ocr;
pub mod system;
pub mod translate;
pub mod utils;

pub use main::Config;
pub use utils::load_or_default;
