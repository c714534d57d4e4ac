use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use super::interface::{CameraInterface, CaptureError, CaptureOptions, CapturedImage};

/// Camera that "shoots" a fixed image file, for kiosks and local testing
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CameraInterface for FileCamera {
    async fn take_picture(&self, options: &CaptureOptions) -> Result<CapturedImage, CaptureError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => CaptureError::PermissionDenied,
            ErrorKind::NotFound => {
                CaptureError::Unavailable(format!("{} does not exist", self.path.display()))
            }
            _ => CaptureError::Io(e),
        })?;
        debug!(
            "Read {} bytes from {:?} (requested width={})",
            bytes.len(),
            self.path,
            options.width
        );
        CapturedImage::new(bytes)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
