//! egui front end: one tab for typed text, one for text pulled out of images.

mod app;
mod image_tab;
mod text_tab;
mod widgets;

pub use app::TranslatorGui;
