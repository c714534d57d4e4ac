use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config_manager::TranslateConfig;
use super::interface::{TranslateRequest, TranslateResponse, TranslationRequestError, Translator};

/// Translate v2 REST client
#[derive(Debug, Clone)]
pub struct GoogleTranslateClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTranslateClient {
    pub fn new(config: &TranslateConfig, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create Translate HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    #[instrument(skip(self, request), fields(source = ?request.source, target = %request.target))]
    async fn translate(&self, request: &TranslateRequest) -> Result<String, TranslationRequestError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .query(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TranslationRequestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranslateResponse = serde_json::from_str(&body)?;
        let text = parsed.into_text()?;
        debug!("Translated {} chars", text.chars().count());
        Ok(text)
    }
}
