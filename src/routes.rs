use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::camera::{CaptureError, CapturedImage};
use crate::state::AppState;
use crate::workflow::{languages, LanguageSelection, SessionSnapshot, WorkflowError};

type ApiError = (StatusCode, Json<Value>);

/// Full application with middleware, ready to serve
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // WebSocket
        .route("/client-ws", get(websocket_handler))

        // Health check
        .route("/api/health", get(health_check))

        // Workflow
        .route("/api/languages", get(get_languages))
        .route("/api/session", get(get_session))
        .route("/api/capture", post(capture))
        .route("/api/translate", post(translate))
        .route("/api/reset", post(reset))
}

async fn websocket_handler(
    ws: axum::extract::ws::WebSocketUpgrade,
    State(state): State<AppState>,
) -> axum::response::Response {
    crate::websocket::websocket_handler(ws, State(state)).await
}

pub fn workflow_error(e: WorkflowError) -> ApiError {
    let status = match e {
        WorkflowError::Busy(_) | WorkflowError::NoDetectedText => StatusCode::CONFLICT,
        WorkflowError::UnsupportedLanguage(_) => StatusCode::BAD_REQUEST,
    };
    (status, Json(json!({"error": e.to_string()})))
}

fn capture_error(e: CaptureError) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({"error": e.to_string()})))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let session = state.workflow.snapshot().await;
    let clients: Vec<_> = state
        .client_contexts
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(json!({
        "status": "ok",
        "conf_version": state.config.system_config.conf_version,
        "camera": state.workflow.camera().name(),
        "session_state": session.state,
        "clients": clients
    }))
}

async fn get_languages() -> Json<Value> {
    Json(json!(languages::catalog()))
}

async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.workflow.snapshot().await)
}

/// Optional multipart `file` field is the frame to capture
async fn capture(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let mut upload = None;
    match multipart {
        Ok(mut multipart) => {
            while let Some(field) = multipart.next_field().await.map_err(|e| {
                (StatusCode::BAD_REQUEST, Json(json!({"error": e.body_text()})))
            })? {
                if field.name() != Some("file") {
                    continue;
                }
                let data = field.bytes().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, Json(json!({"error": e.body_text()})))
                })?;
                upload = Some(CapturedImage::new(data.to_vec()).map_err(capture_error)?);
            }
        }
        Err(rejection) => {
            debug!("Capture without uploaded frame: {}", rejection.body_text());
        }
    }

    let result = match upload {
        Some(image) => state.workflow.capture_frame(image).await,
        None => state.workflow.capture().await,
    };
    result.map(Json).map_err(workflow_error)
}

#[derive(Debug, Deserialize)]
struct TranslateBody {
    #[serde(default)]
    target: String,
}

async fn translate(
    State(state): State<AppState>,
    Json(body): Json<TranslateBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let selection = LanguageSelection::parse(&body.target);
    state
        .workflow
        .translate(selection)
        .await
        .map(Json)
        .map_err(|e| {
            warn!("Translate rejected: {}", e);
            workflow_error(e)
        })
}

async fn reset(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.workflow.reset().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::upload::UploadCamera;
    use crate::camera::CaptureOptions;
    use crate::config_manager::{CaptureConfig, Config};
    use crate::test_support::{FakeRecognizer, FakeTranslator};
    use crate::vision::{OcrRequestError, TextDetection, TextRecognizer};
    use crate::workflow::session::SessionState;
    use crate::workflow::CaptureTranslateWorkflow;
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Fixture {
        app: Router,
        recognizer: Arc<FakeRecognizer>,
        translator: Arc<FakeTranslator>,
    }

    fn fixture() -> Fixture {
        let recognizer = Arc::new(FakeRecognizer::default());
        let translator = Arc::new(FakeTranslator::default());
        let workflow = CaptureTranslateWorkflow::new(
            Arc::new(UploadCamera::new()),
            recognizer.clone(),
            translator.clone(),
            CaptureOptions::from(&CaptureConfig::default()),
        );
        let state = AppState::with_workflow(Config::default(), workflow);
        Fixture {
            app: build_app(state),
            recognizer,
            translator,
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_capture(image: &[u8]) -> Request<Body> {
        let boundary = "snaplate-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n",
                b = boundary
            )
            .as_bytes(),
        );
        body.extend_from_slice(image);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        Request::post("/api/capture")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
            .body(Body::from(body))
            .unwrap()
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn languages_lists_catalog() {
        let f = fixture();
        let response = f
            .app
            .oneshot(Request::get("/api/languages").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 5);
        assert_eq!(body[0], json!({"key": 1, "code": "zh-CN", "display_name": "Chinese"}));
    }

    #[tokio::test]
    async fn uploaded_capture_runs_ocr() {
        let f = fixture();
        f.recognizer.push_text("你好", "zh-CN");

        let response = f.app.clone().oneshot(multipart_capture(b"\xFF\xD8jpeg")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["state"], "ocr_complete");
        assert_eq!(body["detected_text"], "你好");
        assert_eq!(body["detected_locale"], "zh-CN");
        assert_eq!(body["image_size"], 6);

        f.translator.push_text("Hello");
        let response = f
            .app
            .oneshot(json_post("/api/translate", json!({"target": "en"})))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["translated_text"], "Hello");
        assert_eq!(body["translation_display"], "Hello");
    }

    #[tokio::test]
    async fn capture_without_frame_reports_failure() {
        let f = fixture();
        let response = f
            .app
            .oneshot(Request::post("/api/capture").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["state"], "idle");
        assert_eq!(body["failure"]["kind"], "capture");
        assert_eq!(f.recognizer.calls(), 0);
    }

    #[tokio::test]
    async fn translate_before_capture_conflicts() {
        let f = fixture();
        let response = f
            .app
            .oneshot(json_post("/api/translate", json!({"target": "de"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(f.translator.calls(), 0);
    }

    #[tokio::test]
    async fn unselected_translate_returns_session_untouched() {
        let f = fixture();
        let response = f
            .app
            .oneshot(json_post("/api/translate", json!({"target": "unselected"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["state"], "idle");
        assert_eq!(f.translator.calls(), 0);
    }

    #[tokio::test]
    async fn reset_returns_idle_session() {
        let f = fixture();
        f.recognizer.push_text("hi", "en");
        f.app.clone().oneshot(multipart_capture(b"img")).await.unwrap();

        let response = f
            .app
            .clone()
            .oneshot(Request::post("/api/reset").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["state"], "idle");
        assert!(body["detected_text"].is_null());

        let response = f
            .app
            .oneshot(Request::get("/api/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let snapshot: SessionSnapshot =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(snapshot.state, SessionState::Idle);
        assert!(snapshot.session_uid.is_none());
    }

    #[tokio::test]
    async fn upload_rejected_as_busy_is_not_kept_by_camera() {
        struct GatedRecognizer(tokio::sync::Notify);

        #[async_trait::async_trait]
        impl TextRecognizer for GatedRecognizer {
            async fn recognize(&self, _image: &CapturedImage) -> Result<TextDetection, OcrRequestError> {
                self.0.notified().await;
                Ok(TextDetection { text: "first".to_string(), locale: Some("en".to_string()) })
            }
        }

        let recognizer = Arc::new(GatedRecognizer(tokio::sync::Notify::new()));
        let workflow = CaptureTranslateWorkflow::new(
            Arc::new(UploadCamera::new()),
            recognizer.clone(),
            Arc::new(FakeTranslator::default()),
            CaptureOptions::from(&CaptureConfig::default()),
        );
        let state = AppState::with_workflow(Config::default(), workflow);
        let app = build_app(state.clone());

        let mut updates = state.workflow.subscribe();
        let first = tokio::spawn(app.clone().oneshot(multipart_capture(b"first")));
        while updates.recv().await.unwrap().state != SessionState::AwaitingOcr {}

        let response = app.oneshot(multipart_capture(b"second shot")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let options = CaptureOptions::from(&CaptureConfig::default());
        assert!(matches!(
            state.workflow.camera().take_picture(&options).await,
            Err(CaptureError::NoFrame)
        ));

        recognizer.0.notify_one();
        let response = first.await.unwrap().unwrap();
        assert_eq!(body_json(response).await["detected_text"], "first");
    }

    #[tokio::test]
    async fn health_reports_camera() {
        let f = fixture();
        let response = f
            .app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["camera"], "upload");
        assert_eq!(body["session_state"], "idle");
    }
}
