use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct WsParams {
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let session_id = params.session_id.unwrap_or_else(Uuid::new_v4);
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, session_id: Uuid) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.notifications_tx.subscribe();

    info!(%session_id, "websocket client connected");

    let hello = json!({ "type": "connected", "session_id": session_id });
    if sender
        .send(Message::Text(hello.to_string().into()))
        .await
        .is_err()
    {
        state.ledger.remove(session_id);
        return;
    }

    let send_task = tokio::spawn(async move {
        while let Ok(notification) = rx.recv().await {
            if notification.session_id != session_id {
                continue;
            }

            let json = match serde_json::to_string(&notification) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize notification for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    // Session teardown; any dispatch already holding a copy of the ledger
    // entry keeps working with that copy.
    state.ledger.remove(session_id);
    info!(%session_id, "websocket client disconnected");
}
