//! Text detection interface - actual recognition happens in Cloud Vision

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CapturedImage;

/// OCR endpoint failures
#[derive(Debug, Error)]
pub enum OcrRequestError {
    #[error("OCR request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OCR endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("OCR endpoint reported error {code}: {message}")]
    Api { code: i32, message: String },

    #[error("Malformed OCR response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No text detected in image")]
    NoText,
}

/// First text block found in an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDetection {
    pub text: String,
    pub locale: Option<String>,
}

// Wire format of images:annotate

#[derive(Debug, Serialize, Deserialize)]
pub struct AnnotateImageRequest {
    pub requests: Vec<ImageRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
    pub image_context: ImageContext,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageContent {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub max_results: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContext {
    pub language_hints: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnnotateImageResponse {
    #[serde(default)]
    pub responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    pub error: Option<ApiStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextAnnotation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl AnnotateImageRequest {
    /// Single-image TEXT_DETECTION request
    pub fn text_detection(image: &CapturedImage, language_hints: &[String], max_results: u32) -> Self {
        Self {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: image.to_base64(),
                },
                features: vec![Feature {
                    feature_type: "TEXT_DETECTION".to_string(),
                    max_results,
                }],
                image_context: ImageContext {
                    language_hints: language_hints.to_vec(),
                },
            }],
        }
    }
}

impl AnnotateImageResponse {
    /// Pull the first annotation out of the first response
    pub fn into_detection(self) -> Result<TextDetection, OcrRequestError> {
        let response = self.responses.into_iter().next().ok_or(OcrRequestError::NoText)?;

        if let Some(status) = response.error {
            return Err(OcrRequestError::Api {
                code: status.code,
                message: status.message,
            });
        }

        let annotation = response
            .text_annotations
            .into_iter()
            .next()
            .ok_or(OcrRequestError::NoText)?;

        if annotation.description.is_empty() {
            return Err(OcrRequestError::NoText);
        }

        Ok(TextDetection {
            text: annotation.description,
            locale: annotation.locale.filter(|l| !l.is_empty()),
        })
    }
}

/// Text recognizer trait
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Detect the text in one image
    async fn recognize(&self, image: &CapturedImage) -> Result<TextDetection, OcrRequestError>;
}
