pub mod factory;
pub mod google;
pub mod interface;
pub mod libre;

pub use factory::TranslateFactory;
pub use interface::{TranslateError, TranslateInterface, TranslateRequest, TranslateResponse};
