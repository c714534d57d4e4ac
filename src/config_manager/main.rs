use serde::{Deserialize, Serialize};
use crate::config_manager::capture::CaptureConfig;
use crate::config_manager::services::{TranslateConfig, VisionConfig};
use crate::config_manager::system::SystemConfig;

/// Environment variable consulted when the configured API key is empty
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Main configuration for the application using JSON-LD format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "@context")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,

    #[serde(rename = "system_config")]
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(rename = "capture_config")]
    #[serde(default)]
    pub capture_config: CaptureConfig,

    #[serde(rename = "vision_config")]
    #[serde(default)]
    pub vision_config: VisionConfig,

    #[serde(rename = "translate_config")]
    #[serde(default)]
    pub translate_config: TranslateConfig,

    /// Shared key for both Google endpoints
    #[serde(rename = "api_key")]
    #[serde(default)]
    pub api_key: String,

    #[serde(rename = "request_timeout_secs")]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from a JSON-LD or YAML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use crate::config_manager::utils::{read_config, validate_config};
        let value = read_config(path)?;
        validate_config(&value)
    }

    /// The configured API key, or `GOOGLE_API_KEY` when the file leaves it blank
    /// or still holds an unresolved `${...}` placeholder.
    pub fn resolved_api_key(&self) -> String {
        let key = self.api_key.trim();
        if key.is_empty() || key.starts_with("${") {
            std::env::var(API_KEY_ENV).unwrap_or_default()
        } else {
            key.to_string()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            context: None,
            system_config: SystemConfig::default(),
            capture_config: CaptureConfig::default(),
            vision_config: VisionConfig::default(),
            translate_config: TranslateConfig::default(),
            api_key: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
