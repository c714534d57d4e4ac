use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config_manager::CaptureConfig;

/// Camera failures surfaced by a capture attempt
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No frame has been submitted to the camera")]
    NoFrame,

    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("Camera I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Constraints handed to the camera for each picture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureOptions {
    pub width: u32,
    pub aspect_ratio: String,
    pub fix_orientation: bool,
    pub crop_to_preview: bool,
}

impl From<&CaptureConfig> for CaptureOptions {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            width: config.width,
            aspect_ratio: config.aspect_ratio.clone(),
            fix_orientation: config.fix_orientation,
            crop_to_preview: config.crop_to_preview,
        }
    }
}

/// Raw bytes of one photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Vec<u8>,
}

impl CapturedImage {
    pub fn new(bytes: Vec<u8>) -> Result<Self, CaptureError> {
        if bytes.is_empty() {
            return Err(CaptureError::InvalidPayload("image is empty".to_string()));
        }
        Ok(Self { bytes })
    }

    /// Decode a base64 image as sent by mobile clients, which wrap lines with CR/LF
    pub fn from_base64(data: &str) -> Result<Self, CaptureError> {
        let cleaned: String = data.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let bytes = general_purpose::STANDARD
            .decode(cleaned.trim())
            .map_err(|e| CaptureError::InvalidPayload(e.to_string()))?;
        Self::new(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Single-line base64 used as the OCR request content
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.bytes())
    }
}

/// Camera capability the workflow captures from
#[async_trait]
pub trait CameraInterface: Send + Sync {
    /// Take one picture under the given constraints
    async fn take_picture(&self, options: &CaptureOptions) -> Result<CapturedImage, CaptureError>;

    /// Hand a frame shot by the client device to the camera
    async fn submit_frame(&self, _image: CapturedImage) -> Result<(), CaptureError> {
        Err(CaptureError::Unavailable(
            "this camera does not accept uploaded frames".to_string(),
        ))
    }

    /// Short name reported by the health endpoint
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_line_breaks_are_stripped() {
        let image = CapturedImage::from_base64("aGVs\r\nbG8g\nd29y\rbGQ=").unwrap();
        assert_eq!(image.bytes(), b"hello world");
        assert_eq!(image.to_base64(), "aGVsbG8gd29ybGQ=");
    }

    #[test]
    fn empty_image_is_rejected() {
        assert!(matches!(CapturedImage::new(Vec::new()), Err(CaptureError::InvalidPayload(_))));
        assert!(matches!(CapturedImage::from_base64("!!!"), Err(CaptureError::InvalidPayload(_))));
    }
}
