pub mod interface;
pub mod client;

pub use interface::{OcrRequestError, TextDetection, TextRecognizer};
pub use client::GoogleVisionClient;
