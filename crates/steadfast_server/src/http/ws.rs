//! `WebSocket` push of the game board.
//!
//! Clients connect to `GET /gameboard`, receive the current session once,
//! then a JSON [`BoardStatus`] after every committed mutation. A client that
//! falls behind skips to the latest session.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use steadfast_tictactoe::Session;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::view::BoardStatus;
use crate::manager::SessionManager;
use crate::store::Storage;

/// Upgrades to a `WebSocket` and starts pushing board updates.
pub async fn game_board<S: Storage>(
    ws: WebSocketUpgrade,
    State(manager): State<Arc<SessionManager<S>>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, manager))
}

fn encode(session: &Session) -> Option<Message> {
    match serde_json::to_string(&BoardStatus::from(session)) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            warn!("Failed to serialize board: {e}");
            None
        }
    }
}

async fn handle_socket<S: Storage>(mut socket: WebSocket, manager: Arc<SessionManager<S>>) {
    debug!("Game board client connected");

    let mut rx = manager.subscribe();
    if let Some(msg) = encode(&manager.status()) {
        if socket.send(msg).await.is_err() {
            debug!("Game board client disconnected before first push");
            return;
        }
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(session) => {
                        let Some(msg) = encode(&session) else { continue };
                        if socket.send(msg).await.is_err() {
                            debug!("Game board client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "Game board client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Session updates closed, shutting down socket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Game board client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("Game board client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("Game board socket error: {e}");
                        return;
                    }
                    // Clients only listen.
                    _ => {}
                }
            }
        }
    }
}
