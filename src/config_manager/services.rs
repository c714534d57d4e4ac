use serde::{Deserialize, Serialize};

/// Configuration for the Cloud Vision text detection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_vision_endpoint")]
    pub endpoint: String,

    #[serde(rename = "language_hints")]
    #[serde(default = "default_language_hints")]
    pub language_hints: Vec<String>,

    #[serde(rename = "max_results")]
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_vision_endpoint() -> String {
    "https://vision.googleapis.com/v1/images:annotate".to_string()
}

fn default_language_hints() -> Vec<String> {
    vec![
        "en-t-i0-handwrit".to_string(),
        "zh-CN".to_string(),
        "zh-TW".to_string(),
        "ja".to_string(),
    ]
}

fn default_max_results() -> u32 {
    1
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_vision_endpoint(),
            language_hints: default_language_hints(),
            max_results: default_max_results(),
        }
    }
}

/// Configuration for the Translate v2 endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    #[serde(default = "default_translate_endpoint")]
    pub endpoint: String,
}

fn default_translate_endpoint() -> String {
    "https://www.googleapis.com/language/translate/v2".to_string()
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: default_translate_endpoint(),
        }
    }
}
