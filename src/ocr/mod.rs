pub mod engine;
pub mod preprocess;
pub mod setup;
pub mod text;

pub use engine::Tesseract;
pub use text::{Reflow, clean_word, reflow};

use anyhow::Result;
use image::GrayImage;

/// A recognized word and its box in the coordinates of the image it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrToken {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f32,
}

/// Text recognition engine. `lang` is a code or a `+`-joined set of codes.
pub trait OcrBackend {
    /// Recognizes the whole image as plain (possibly multi-line) text.
    fn recognize_text(&self, img: &GrayImage, lang: &str) -> Result<String>;

    /// Recognizes individual words with their bounding boxes.
    fn recognize_tokens(&self, img: &GrayImage, lang: &str) -> Result<Vec<OcrToken>>;
}
