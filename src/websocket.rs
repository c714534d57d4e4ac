use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::Response,
};
use axum::extract::ws::WebSocket;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, error, warn};

use crate::handlers::{self, WebSocketSend};
use crate::state::{AppState, ClientContext};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_uid = state.generate_client_uid();
    info!("New WebSocket connection: {}", client_uid);

    state.client_contexts.insert(
        client_uid.clone(),
        ClientContext {
            client_uid: client_uid.clone(),
            connected_at: Utc::now(),
        },
    );

    let (mut sink, mut receiver) = socket.split();
    let (sender, mut outgoing) = mpsc::unbounded_channel::<String>();

    // Single writer for the socket
    let writer = tokio::spawn(async move {
        while let Some(text) = outgoing.recv().await {
            if let Err(e) = sink.send(Message::Text(text)).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
    });

    // Forward every session transition to this client
    let forwarder = tokio::spawn(forward_updates(state.workflow.subscribe(), sender.clone()));

    handlers::send_languages(&sender);
    handlers::send_session(&sender, &state.workflow.snapshot().await);

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = handlers::handle_message(&state, &client_uid, &text, &sender).await {
                    error!("Error handling message: {}", e);
                    handlers::send_error(&sender, &e.to_string());
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", client_uid);
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    // Cleanup
    forwarder.abort();
    drop(sender);
    writer.abort();
    state.client_contexts.remove(&client_uid);

    info!("Cleaned up client {}", client_uid);
}

async fn forward_updates(
    mut updates: broadcast::Receiver<crate::workflow::SessionSnapshot>,
    sender: WebSocketSend,
) {
    loop {
        match updates.recv().await {
            Ok(snapshot) => handlers::send_session(&sender, &snapshot),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("WebSocket client lagged, skipped {} session updates", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
        if sender.is_closed() {
            break;
        }
    }
}
