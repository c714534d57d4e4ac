use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::interface::{CameraInterface, CaptureError, CaptureOptions, CapturedImage};

/// Camera fed by the client device: the phone shoots the photo and uploads it,
/// the next capture consumes it.
#[derive(Default)]
pub struct UploadCamera {
    pending: Mutex<Option<CapturedImage>>,
}

impl UploadCamera {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CameraInterface for UploadCamera {
    async fn take_picture(&self, options: &CaptureOptions) -> Result<CapturedImage, CaptureError> {
        let image = self.pending.lock().await.take().ok_or(CaptureError::NoFrame)?;
        debug!(
            "Took uploaded frame ({} bytes, requested width={} ratio={})",
            image.size(),
            options.width,
            options.aspect_ratio
        );
        Ok(image)
    }

    async fn submit_frame(&self, image: CapturedImage) -> Result<(), CaptureError> {
        let mut pending = self.pending.lock().await;
        if pending.is_some() {
            debug!("Replacing unconsumed frame");
        }
        *pending = Some(image);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "upload"
    }
}
