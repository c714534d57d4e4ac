//! Translate interface - actual translation happens in the Translate v2 API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Translation endpoint failures
#[derive(Debug, Error)]
pub enum TranslationRequestError {
    #[error("Translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed translation response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Translation response contained no translations")]
    Empty,
}

/// Query sent to the translation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub target: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub data: TranslationsData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslationsData {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

impl TranslateResponse {
    pub fn into_text(self) -> Result<String, TranslationRequestError> {
        self.data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or(TranslationRequestError::Empty)
    }
}

/// Translator trait
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `request.q` into `request.target`
    async fn translate(&self, request: &TranslateRequest) -> Result<String, TranslationRequestError>;
}
