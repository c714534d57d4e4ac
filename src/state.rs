use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::camera::{CameraFactory, CaptureOptions};
use crate::config_manager::Config;
use crate::translate::GoogleTranslateClient;
use crate::vision::GoogleVisionClient;
use crate::workflow::CaptureTranslateWorkflow;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub workflow: Arc<CaptureTranslateWorkflow>,
    pub client_contexts: Arc<DashMap<String, ClientContext>>,
}

#[derive(Clone, Serialize)]
pub struct ClientContext {
    pub client_uid: String,
    pub connected_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let api_key = config.resolved_api_key();
        if api_key.is_empty() {
            warn!("No API key configured; Vision and Translate calls will be rejected");
        }
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let camera = CameraFactory::create_camera(&config.capture_config)?;
        let recognizer = Arc::new(GoogleVisionClient::new(&config.vision_config, api_key.clone(), timeout)?);
        let translator = Arc::new(GoogleTranslateClient::new(&config.translate_config, api_key, timeout)?);
        info!(
            "Vision endpoint: {}, Translate endpoint: {}",
            config.vision_config.endpoint, config.translate_config.endpoint
        );

        let workflow = CaptureTranslateWorkflow::new(
            camera,
            recognizer,
            translator,
            CaptureOptions::from(&config.capture_config),
        );

        Ok(Self::with_workflow(config, workflow))
    }

    pub fn with_workflow(config: Config, workflow: CaptureTranslateWorkflow) -> Self {
        Self {
            config: Arc::new(config),
            workflow: Arc::new(workflow),
            client_contexts: Arc::new(DashMap::new()),
        }
    }

    pub fn generate_client_uid(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
