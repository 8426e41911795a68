//! WebSocket subscription endpoint.
//!
//! An observer connects to one game, immediately receives a full-state
//! snapshot, then gets one event per mutation until it disconnects.
//! Observers are read-only here; mutations arrive over HTTP.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::error::GameError;
use crate::protocol::ServerEvent;
use crate::state::{AppState, GameSession};

/// WebSocket upgrade handler for GET /api/game/{game_id}/ws
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GameError> {
    let session = state.session(&game_id).await?;
    tracing::info!(game_id = %game_id, "WebSocket connection request");

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, session)))
}

/// Handle one observer connection
async fn handle_socket(socket: WebSocket, session: Arc<GameSession>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the snapshot so no event between the two is lost
    let mut events = session.subscribe();

    match session.state().await {
        Ok(game) => {
            let snapshot = ServerEvent::GameState { data: game };
            if let Ok(json) = serde_json::to_string(&snapshot) {
                if sender.send(Message::Text(json.into())).await.is_err() {
                    tracing::error!(game_id = %session.id(), "Failed to send snapshot");
                    return;
                }
            }
        }
        Err(e) => {
            tracing::warn!(game_id = %session.id(), "No snapshot for new observer: {}", e);
        }
    }

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Ok(json) = serde_json::to_string(&event) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(
                            game_id = %session.id(),
                            missed,
                            "Observer lagged behind the event stream"
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(game_id = %session.id(), "WebSocket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    // Dropping the receiver is the whole disconnect story: the game
    // record is untouched, leaving is not the same as disconnecting.
    tracing::info!(game_id = %session.id(), "Observer disconnected");
}
