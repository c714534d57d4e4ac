use serde::{Deserialize, Serialize};

/// Camera settings applied to every capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// "upload" (frames posted by the client device) or "file"
    #[serde(rename = "camera_model")]
    #[serde(default = "default_camera_model")]
    pub camera_model: String,

    /// Image read by the file camera
    #[serde(rename = "image_path")]
    #[serde(default)]
    pub image_path: Option<String>,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(rename = "aspect_ratio")]
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    #[serde(rename = "fix_orientation")]
    #[serde(default = "default_true")]
    pub fix_orientation: bool,

    #[serde(rename = "crop_to_preview")]
    #[serde(default = "default_true")]
    pub crop_to_preview: bool,
}

fn default_camera_model() -> String {
    "upload".to_string()
}

fn default_width() -> u32 {
    720
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            camera_model: default_camera_model(),
            image_path: None,
            width: default_width(),
            aspect_ratio: default_aspect_ratio(),
            fix_orientation: true,
            crop_to_preview: true,
        }
    }
}
