use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::camera::CapturedImage;
use crate::state::AppState;
use crate::workflow::{languages, LanguageSelection, SessionSnapshot, WorkflowError};

/// WebSocket send function type
pub type WebSocketSend = mpsc::UnboundedSender<String>;

pub async fn handle_message(
    state: &AppState,
    client_uid: &str,
    text: &str,
    sender: &WebSocketSend,
) -> anyhow::Result<()> {
    let msg: Value = serde_json::from_str(text)?;
    let msg_type = msg.get("type").and_then(|v| v.as_str());
    debug!("Client {} sent {:?}", client_uid, msg_type);

    match msg_type {
        Some("capture") => {
            handle_capture(state, &msg, sender)?;
        }
        Some("translate") => {
            handle_translate(state, &msg, sender);
        }
        Some("reset") => {
            // Broadcast delivers the idle snapshot
            state.workflow.reset().await;
        }
        Some("fetch-session") => {
            send_session(sender, &state.workflow.snapshot().await);
        }
        Some("fetch-languages") => {
            send_languages(sender);
        }
        _ => {
            warn!("Unknown message type: {:?}", msg_type);
        }
    }

    Ok(())
}

/// Capture from the camera, or recognize `image_base64` when the client sent its own shot.
/// Runs in the background; progress reaches the client through session updates.
fn handle_capture(state: &AppState, msg: &Value, sender: &WebSocketSend) -> anyhow::Result<()> {
    let image = msg
        .get("image_base64")
        .and_then(|v| v.as_str())
        .map(CapturedImage::from_base64)
        .transpose()?;

    let workflow = state.workflow.clone();
    let sender = sender.clone();
    tokio::spawn(async move {
        let result = match image {
            Some(image) => workflow.recognize_text(image).await,
            None => workflow.capture().await,
        };
        report_rejection(&sender, result);
    });
    Ok(())
}

fn handle_translate(state: &AppState, msg: &Value, sender: &WebSocketSend) {
    let selection = LanguageSelection::parse(msg.get("target").and_then(|v| v.as_str()).unwrap_or(""));

    let workflow = state.workflow.clone();
    let sender = sender.clone();
    tokio::spawn(async move {
        let result = workflow.translate(selection).await;
        report_rejection(&sender, result);
    });
}

fn report_rejection(sender: &WebSocketSend, result: Result<SessionSnapshot, WorkflowError>) {
    if let Err(e) = result {
        warn!("Workflow rejected request: {}", e);
        send_error(sender, &e.to_string());
    }
}

pub fn send_session(sender: &WebSocketSend, snapshot: &SessionSnapshot) {
    let _ = sender.send(
        json!({
            "type": "session-update",
            "session": snapshot
        })
        .to_string(),
    );
}

pub fn send_languages(sender: &WebSocketSend) {
    let _ = sender.send(
        json!({
            "type": "languages",
            "languages": languages::catalog()
        })
        .to_string(),
    );
}

pub fn send_error(sender: &WebSocketSend, message: &str) {
    let _ = sender.send(
        json!({
            "type": "error",
            "message": message
        })
        .to_string(),
    );
}
