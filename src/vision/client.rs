use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::camera::CapturedImage;
use crate::config_manager::VisionConfig;
use super::interface::{AnnotateImageRequest, AnnotateImageResponse, OcrRequestError, TextDetection, TextRecognizer};

/// Cloud Vision `images:annotate` client
#[derive(Debug, Clone)]
pub struct GoogleVisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    language_hints: Vec<String>,
    max_results: u32,
}

impl GoogleVisionClient {
    pub fn new(config: &VisionConfig, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create Vision HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            language_hints: config.language_hints.clone(),
            max_results: config.max_results,
        })
    }
}

#[async_trait]
impl TextRecognizer for GoogleVisionClient {
    #[instrument(skip(self, image), fields(image_size = image.size()))]
    async fn recognize(&self, image: &CapturedImage) -> Result<TextDetection, OcrRequestError> {
        let request = AnnotateImageRequest::text_detection(image, &self.language_hints, self.max_results);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(OcrRequestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AnnotateImageResponse = serde_json::from_str(&body)?;
        let detection = parsed.into_detection()?;
        debug!("Vision detected {} chars, locale={:?}", detection.text.chars().count(), detection.locale);
        Ok(detection)
    }
}
