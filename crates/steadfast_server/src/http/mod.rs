//! HTTP and `WebSocket` transport over the session manager.

mod handlers;
mod view;
mod ws;

pub use handlers::{ApiError, INVALID_TYPE_TEXT, MoveRequest, ONLINE_TEXT, StartRequest};
pub use view::{BoardStatus, PlayerView};

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::manager::SessionManager;
use crate::store::Storage;

/// Builds the router for every game route.
pub fn build_router<S: Storage>(manager: Arc<SessionManager<S>>) -> Router {
    Router::new()
        .route("/", get(handlers::online))
        .route("/newgame", get(handlers::new_game::<S>))
        .route("/startgame", post(handlers::start_game::<S>))
        .route("/joingame", get(handlers::join_game::<S>))
        .route("/move/{player_id}", post(handlers::make_move::<S>))
        .route("/boardstatus", get(handlers::board_status::<S>))
        .route("/gameboard", get(ws::game_board::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(manager)
}
