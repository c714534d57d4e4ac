use std::sync::Arc;
use anyhow::Result;
use tracing::info;

use crate::config_manager::CaptureConfig;
use super::file::FileCamera;
use super::interface::CameraInterface;
use super::upload::UploadCamera;

/// Factory for creating camera capabilities
pub struct CameraFactory;

impl CameraFactory {
    /// Create a camera based on `capture_config.camera_model`
    pub fn create_camera(capture_config: &CaptureConfig) -> Result<Arc<dyn CameraInterface>> {
        info!("Initializing camera: {}", capture_config.camera_model);

        match capture_config.camera_model.as_str() {
            "upload" => Ok(Arc::new(UploadCamera::new())),
            "file" => {
                let path = capture_config
                    .image_path
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("File camera requires capture_config.image_path"))?;
                Ok(Arc::new(FileCamera::new(path)))
            }
            other => Err(anyhow::anyhow!("Unsupported camera model: {}", other)),
        }
    }
}
