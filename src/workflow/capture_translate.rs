use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::camera::{CameraInterface, CaptureError, CaptureOptions, CapturedImage};
use crate::translate::Translator;
use crate::vision::TextRecognizer;
use super::errors::WorkflowError;
use super::languages::{self, LanguageSelection};
use super::session::{CaptureSession, SessionSnapshot};

const UPDATE_CHANNEL_CAPACITY: usize = 32;

/// Coordinates one capture, one OCR request and at most one translation
/// request at a time, over a single active session.
pub struct CaptureTranslateWorkflow {
    camera: Arc<dyn CameraInterface>,
    recognizer: Arc<dyn TextRecognizer>,
    translator: Arc<dyn Translator>,
    options: CaptureOptions,
    session: RwLock<CaptureSession>,
    updates: broadcast::Sender<SessionSnapshot>,
}

impl CaptureTranslateWorkflow {
    pub fn new(
        camera: Arc<dyn CameraInterface>,
        recognizer: Arc<dyn TextRecognizer>,
        translator: Arc<dyn Translator>,
        options: CaptureOptions,
    ) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            camera,
            recognizer,
            translator,
            options,
            session: RwLock::new(CaptureSession::default()),
            updates,
        }
    }

    pub fn camera(&self) -> &Arc<dyn CameraInterface> {
        &self.camera
    }

    /// Receive a snapshot after every state transition
    pub fn subscribe(&self) -> broadcast::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.read().await.snapshot()
    }

    fn publish(&self, session: &CaptureSession) -> SessionSnapshot {
        let snapshot = session.snapshot();
        // No subscribers is fine
        let _ = self.updates.send(snapshot.clone());
        snapshot
    }

    /// Start a new session, replacing a finished one
    async fn begin_session(&self) -> Result<Uuid, WorkflowError> {
        let mut session = self.session.write().await;
        if session.state.is_busy() {
            return Err(WorkflowError::Busy(session.state));
        }
        if session.session_uid.is_some() {
            debug!("Discarding previous session {:?}", session.session_uid);
        }
        let session_uid = Uuid::new_v4();
        *session = CaptureSession::begin(session_uid);
        self.publish(&session);
        Ok(session_uid)
    }

    /// Take a photo and run text detection on it.
    ///
    /// Camera and endpoint failures end up in the returned snapshot's
    /// `failure`; only misuse (a request already outstanding) is an `Err`.
    pub async fn capture(&self) -> Result<SessionSnapshot, WorkflowError> {
        let session_uid = self.begin_session().await?;
        info!("Capture started for session {}", session_uid);
        Ok(self.shoot(session_uid).await)
    }

    /// Capture a frame the client device shot. The frame reaches the camera
    /// only after the new session is accepted.
    pub async fn capture_frame(&self, image: CapturedImage) -> Result<SessionSnapshot, WorkflowError> {
        let session_uid = self.begin_session().await?;
        info!("Capture of uploaded frame started for session {}", session_uid);

        if let Err(e) = self.camera.submit_frame(image).await {
            return Ok(self.fail_capture(session_uid, e).await);
        }
        Ok(self.shoot(session_uid).await)
    }

    async fn fail_capture(&self, session_uid: Uuid, e: CaptureError) -> SessionSnapshot {
        warn!("Capture failed: {}", e);
        let mut session = self.session.write().await;
        if session.is_current(session_uid) {
            *session = CaptureSession::capture_failed(e.to_string());
            return self.publish(&session);
        }
        session.snapshot()
    }

    async fn shoot(&self, session_uid: Uuid) -> SessionSnapshot {
        let image = match self.camera.take_picture(&self.options).await {
            Ok(image) => image,
            Err(e) => return self.fail_capture(session_uid, e).await,
        };

        {
            let mut session = self.session.write().await;
            if !session.is_current(session_uid) {
                debug!("Session {} reset while capturing", session_uid);
                return session.snapshot();
            }
            session.attach_image(image.clone());
            self.publish(&session);
        }

        self.run_ocr(session_uid, &image).await
    }

    /// Run text detection on an image the display layer already holds,
    /// starting a new session for it
    pub async fn recognize_text(&self, image: CapturedImage) -> Result<SessionSnapshot, WorkflowError> {
        let session_uid = self.begin_session().await?;
        {
            let mut session = self.session.write().await;
            if !session.is_current(session_uid) {
                return Ok(session.snapshot());
            }
            session.attach_image(image.clone());
            self.publish(&session);
        }
        Ok(self.run_ocr(session_uid, &image).await)
    }

    async fn run_ocr(&self, session_uid: Uuid, image: &CapturedImage) -> SessionSnapshot {
        let result = self.recognizer.recognize(image).await;

        let mut session = self.session.write().await;
        if !session.is_current(session_uid) {
            debug!("Dropping OCR result for discarded session {}", session_uid);
            return session.snapshot();
        }

        match result {
            Ok(detection) => {
                info!("OCR complete: locale={:?}", detection.locale);
                session.apply_detection(detection);
            }
            Err(e) => {
                error!("OCR request failed: {}", e);
                session.ocr_failed(e.to_string());
            }
        }
        self.publish(&session)
    }

    /// Translate the detected text; the unselected sentinel is a no-op
    pub async fn translate(&self, selection: LanguageSelection) -> Result<SessionSnapshot, WorkflowError> {
        let target = match selection {
            LanguageSelection::Unselected => {
                debug!("No target language selected, skipping translation");
                return Ok(self.snapshot().await);
            }
            LanguageSelection::Code(code) => code,
        };

        if !languages::is_supported(&target) {
            return Err(WorkflowError::UnsupportedLanguage(target));
        }

        let (session_uid, request) = {
            let mut session = self.session.write().await;
            let request = session.begin_translation(&target)?;
            self.publish(&session);
            (session.session_uid, request)
        };

        let result = self.translator.translate(&request).await;

        let mut session = self.session.write().await;
        if session.session_uid != session_uid {
            debug!("Dropping translation for discarded session {:?}", session_uid);
            return Ok(session.snapshot());
        }

        match result {
            Ok(text) => {
                info!("Translation to {} complete", target);
                session.apply_translation(text);
            }
            Err(e) => {
                error!("Translation request failed: {}", e);
                session.translation_failed(e.to_string());
            }
        }
        Ok(self.publish(&session))
    }

    /// Dismiss the result and return to idle
    pub async fn reset(&self) -> SessionSnapshot {
        let mut session = self.session.write().await;
        *session = CaptureSession::default();
        info!("Session reset");
        self.publish(&session)
    }
}
