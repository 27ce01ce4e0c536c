//! Event stream WebSocket handler.
//!
//! Connected clients receive a JSON message for every post and comment
//! created anywhere on the forum.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::forum::ForumEvent;
use crate::web::handlers::AppState;

use super::messages::ServerMessage;

/// Query parameters for WebSocket connection.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// Session token for authentication.
    pub token: String,
}

/// Event stream WebSocket handler.
///
/// GET /ws/events?token={session_token}
///
/// The token is the same session token the rest of the API uses; it is
/// validated (and touched) before the connection is upgraded.
pub async fn events_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<WsQuery>,
) -> Response {
    // Validate the session before upgrading
    let user_id = {
        let mut sessions = state.sessions.lock().await;
        match sessions.touch_session(&query.token) {
            Ok(session) => session.user_id,
            Err(e) => {
                tracing::debug!("WebSocket connection rejected: {}", e);
                return Response::builder()
                    .status(401)
                    .body("Unauthorized".into())
                    .unwrap();
            }
        }
    };

    tracing::info!("WebSocket event stream opened by user {}", user_id);

    // Subscribe before upgrading so no event falls between the two
    let events = state.events.subscribe();

    ws.on_upgrade(move |socket| handle_socket(socket, events, user_id))
}

/// Forward broadcast events to a connected WebSocket client.
async fn handle_socket(
    socket: WebSocket,
    mut events: broadcast::Receiver<ForumEvent>,
    user_id: i64,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    loop {
        tokio::select! {
            // Forward forum events to the client
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let msg = ServerMessage::from(&event);
                        if let Ok(json) = serde_json::to_string(&msg) {
                            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Slow client; it misses events rather than stalling writers
                        tracing::warn!(
                            user_id,
                            skipped,
                            "WebSocket client lagged behind event stream"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            // The stream is one-way; clients only ever close or ping
            Some(msg_result) = ws_receiver.next() => {
                match msg_result {
                    Ok(Message::Close(_)) => {
                        tracing::debug!("WebSocket closed by user {}", user_id);
                        break;
                    }
                    Ok(Message::Ping(data)) => {
                        let _ = ws_sender.send(Message::Pong(data)).await;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    tracing::debug!("WebSocket event stream ended for user {}", user_id);
}
