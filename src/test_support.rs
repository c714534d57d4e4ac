//! Shared fakes for unit tests

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::camera::{CameraInterface, CaptureError, CaptureOptions, CapturedImage};
use crate::translate::{TranslateRequest, TranslationRequestError, Translator};
use crate::vision::{OcrRequestError, TextDetection, TextRecognizer};

/// Serve `app` on an ephemeral loopback port and return its base URL
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Request log shared with a mock endpoint
#[derive(Clone, Default)]
pub struct Recorded(Arc<Mutex<Vec<Value>>>);

impl Recorded {
    pub fn push(&self, value: Value) {
        self.0.lock().unwrap().push(value);
    }

    pub fn take(&self) -> Vec<Value> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Camera returning queued results, then `NoFrame`
#[derive(Default)]
pub struct FakeCamera {
    shots: Mutex<VecDeque<Result<CapturedImage, CaptureError>>>,
}

impl FakeCamera {
    pub fn with_images(images: &[&[u8]]) -> Self {
        let camera = Self::default();
        for bytes in images {
            camera.push(Ok(CapturedImage::new(bytes.to_vec()).unwrap()));
        }
        camera
    }

    pub fn push(&self, shot: Result<CapturedImage, CaptureError>) {
        self.shots.lock().unwrap().push_back(shot);
    }
}

#[async_trait]
impl CameraInterface for FakeCamera {
    async fn take_picture(&self, _options: &CaptureOptions) -> Result<CapturedImage, CaptureError> {
        self.shots.lock().unwrap().pop_front().unwrap_or(Err(CaptureError::NoFrame))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Recognizer returning queued detections and counting calls
#[derive(Default)]
pub struct FakeRecognizer {
    replies: Mutex<VecDeque<Result<TextDetection, OcrRequestError>>>,
    pub calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn push_text(&self, text: &str, locale: &str) {
        self.replies.lock().unwrap().push_back(Ok(TextDetection {
            text: text.to_string(),
            locale: Some(locale.to_string()),
        }));
    }

    pub fn push_error(&self, error: OcrRequestError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for FakeRecognizer {
    async fn recognize(&self, _image: &CapturedImage) -> Result<TextDetection, OcrRequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies.lock().unwrap().pop_front().unwrap_or(Err(OcrRequestError::NoText))
    }
}

/// Translator returning queued texts and keeping every request it saw
#[derive(Default)]
pub struct FakeTranslator {
    replies: Mutex<VecDeque<Result<String, TranslationRequestError>>>,
    pub requests: Mutex<Vec<TranslateRequest>>,
}

impl FakeTranslator {
    pub fn push_text(&self, text: &str) {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn push_error(&self, error: TranslationRequestError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, request: &TranslateRequest) -> Result<String, TranslationRequestError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies.lock().unwrap().pop_front().unwrap_or(Err(TranslationRequestError::Empty))
    }
}
