use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::CapturedImage;
use crate::translate::TranslateRequest;
use crate::vision::TextDetection;
use super::errors::WorkflowError;
use super::languages::find_language;

pub const CHOOSE_TARGET_PLACEHOLDER: &str = "Choose a target language to start translating.";
pub const TRANSLATING_PLACEHOLDER: &str = "Translating...";
pub const TRANSLATION_FAILED_PLACEHOLDER: &str = "Translation failed.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Capturing,
    AwaitingOcr,
    OcrComplete,
    OcrFailed,
    AwaitingTranslation,
    TranslationComplete,
    TranslationFailed,
}

impl SessionState {
    /// A camera or endpoint call is outstanding
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            SessionState::Capturing | SessionState::AwaitingOcr | SessionState::AwaitingTranslation
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Capture,
    OcrRequest,
    TranslationRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// One photograph-to-translation interaction
#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    pub session_uid: Option<Uuid>,
    pub state: SessionState,
    pub image: Option<CapturedImage>,
    pub detected_text: Option<String>,
    pub detected_locale: Option<String>,
    pub selected_target_language: Option<String>,
    pub translated_text: Option<String>,
    pub failure: Option<WorkflowFailure>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CaptureSession {
    /// Fresh session waiting for the camera
    pub fn begin(session_uid: Uuid) -> Self {
        Self {
            session_uid: Some(session_uid),
            state: SessionState::Capturing,
            created_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Idle again, remembering why the capture did not happen
    pub fn capture_failed(message: String) -> Self {
        Self {
            failure: Some(WorkflowFailure {
                kind: FailureKind::Capture,
                message,
            }),
            ..Self::default()
        }
    }

    pub fn is_current(&self, session_uid: Uuid) -> bool {
        self.session_uid == Some(session_uid)
    }

    pub fn attach_image(&mut self, image: CapturedImage) {
        self.image = Some(image);
        self.state = SessionState::AwaitingOcr;
    }

    pub fn apply_detection(&mut self, detection: TextDetection) {
        self.detected_text = Some(detection.text);
        self.detected_locale = detection.locale;
        self.failure = None;
        self.state = SessionState::OcrComplete;
    }

    pub fn ocr_failed(&mut self, message: String) {
        self.detected_text = None;
        self.detected_locale = None;
        self.failure = Some(WorkflowFailure {
            kind: FailureKind::OcrRequest,
            message,
        });
        self.state = SessionState::OcrFailed;
    }

    /// Select `target` and build the request for it
    pub fn begin_translation(&mut self, target: &str) -> Result<TranslateRequest, WorkflowError> {
        if self.state.is_busy() {
            return Err(WorkflowError::Busy(self.state));
        }
        let text = self.detected_text.clone().ok_or(WorkflowError::NoDetectedText)?;

        self.selected_target_language = Some(target.to_string());
        self.translated_text = None;
        self.failure = None;
        self.state = SessionState::AwaitingTranslation;

        Ok(TranslateRequest {
            q: text,
            source: self.detected_locale.clone(),
            target: target.to_string(),
        })
    }

    pub fn apply_translation(&mut self, text: String) {
        self.translated_text = Some(text);
        self.state = SessionState::TranslationComplete;
    }

    pub fn translation_failed(&mut self, message: String) {
        self.translated_text = None;
        self.failure = Some(WorkflowFailure {
            kind: FailureKind::TranslationRequest,
            message,
        });
        self.state = SessionState::TranslationFailed;
    }

    /// Text for the translated-text panel, once there is something to translate
    pub fn translation_display(&self) -> Option<String> {
        self.detected_text.as_ref()?;
        let text = match self.state {
            SessionState::AwaitingTranslation => TRANSLATING_PLACEHOLDER.to_string(),
            SessionState::TranslationFailed => TRANSLATION_FAILED_PLACEHOLDER.to_string(),
            _ => match &self.translated_text {
                Some(text) => text.clone(),
                None => CHOOSE_TARGET_PLACEHOLDER.to_string(),
            },
        };
        Some(text)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_uid: self.session_uid,
            state: self.state,
            image_size: self.image.as_ref().map(|image| image.size()),
            detected_text: self.detected_text.clone(),
            detected_locale: self.detected_locale.clone(),
            detected_language: self
                .detected_text
                .as_ref()
                .map(|_| find_language(self.detected_locale.as_deref()).to_string()),
            selected_target_language: self.selected_target_language.clone(),
            translated_text: self.translated_text.clone(),
            translation_display: self.translation_display(),
            failure: self.failure.clone(),
            created_at: self.created_at,
        }
    }
}

/// Read-only view of the session handed to the display layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_uid: Option<Uuid>,
    pub state: SessionState,
    pub image_size: Option<usize>,
    pub detected_text: Option<String>,
    pub detected_locale: Option<String>,
    pub detected_language: Option<String>,
    pub selected_target_language: Option<String>,
    pub translated_text: Option<String>,
    pub translation_display: Option<String>,
    pub failure: Option<WorkflowFailure>,
    pub created_at: Option<DateTime<Utc>>,
}
