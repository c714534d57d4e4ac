pub mod interface;
pub mod client;

pub use interface::{TranslateRequest, TranslationRequestError, Translator};
pub use client::GoogleTranslateClient;
