//! Route handlers.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Liveness text |
//! | `GET` | `/newgame` | Clear storage, return the empty session |
//! | `POST` | `/startgame` | Seat player 1, form `type=<X or O>` |
//! | `GET` | `/joingame` | Seat player 2 |
//! | `POST` | `/move/{playerId}` | Move, form `x=<row>&y=<col>` |
//! | `GET` | `/boardstatus` | Current session |
//!
//! Manager calls block on storage, so they run on the blocking pool.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error, From};
use serde::Deserialize;
use steadfast_tictactoe::{EngineError, Message};
use tracing::{debug, error, instrument, warn};

use super::view::BoardStatus;
use crate::error::ManagerError;
use crate::manager::SessionManager;
use crate::store::Storage;

/// Body returned by `/` for health checks.
pub const ONLINE_TEXT: &str = "server is online.";

/// Body returned by `/startgame` when the type is not a mark.
pub const INVALID_TYPE_TEXT: &str = "This type is invalid.";

/// Form body of `/startgame`.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    /// Requested mark, a single character.
    #[serde(rename = "type")]
    pub mark: String,
}

/// Form body of `/move/{playerId}`.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    /// Row.
    pub x: i32,
    /// Column.
    pub y: i32,
}

/// Failure of a route handler.
#[derive(Debug, Display, Error, From)]
pub enum ApiError {
    /// The manager refused or could not persist the request.
    #[display("{}", _0)]
    Manager(ManagerError),
    /// The blocking task panicked or was cancelled.
    #[display("Blocking task failed: {}", _0)]
    Task(tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Manager(ManagerError::Rejected(_)) => StatusCode::CONFLICT,
            ApiError::Manager(ManagerError::StorageUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request refused");
        }
        (status, self.to_string()).into_response()
    }
}

async fn blocking<S, T, F>(manager: Arc<SessionManager<S>>, op: F) -> Result<T, ApiError>
where
    S: Storage,
    T: Send + 'static,
    F: FnOnce(&SessionManager<S>) -> Result<T, ManagerError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || op(&manager)).await?;
    Ok(result?)
}

/// Single-character mark symbol, if `text` is exactly one character.
fn single_symbol(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Some(symbol),
        _ => None,
    }
}

/// `GET /`
pub async fn online() -> &'static str {
    ONLINE_TEXT
}

/// `GET /newgame`
#[instrument(skip(manager))]
pub async fn new_game<S: Storage>(
    State(manager): State<Arc<SessionManager<S>>>,
) -> Result<Json<BoardStatus>, ApiError> {
    let session = blocking(manager, |m| m.new_game()).await?;
    Ok(Json(BoardStatus::from(&session)))
}

/// `POST /startgame`
///
/// An unknown type answers `200` with [`INVALID_TYPE_TEXT`], which is what
/// existing clients check for.
#[instrument(skip(manager))]
pub async fn start_game<S: Storage>(
    State(manager): State<Arc<SessionManager<S>>>,
    Form(request): Form<StartRequest>,
) -> Result<Response, ApiError> {
    let Some(symbol) = single_symbol(&request.mark) else {
        debug!(mark = %request.mark, "Type is not one character");
        return Ok(INVALID_TYPE_TEXT.into_response());
    };
    match blocking(manager, move |m| m.start(symbol)).await {
        Ok(session) => Ok(Json(BoardStatus::from(&session)).into_response()),
        Err(ApiError::Manager(ManagerError::Rejected(EngineError::InvalidMark(e)))) => {
            debug!(error = %e, "Type is not a mark");
            Ok(INVALID_TYPE_TEXT.into_response())
        }
        Err(e) => Err(e),
    }
}

/// `GET /joingame`
#[instrument(skip(manager))]
pub async fn join_game<S: Storage>(
    State(manager): State<Arc<SessionManager<S>>>,
) -> Result<Json<BoardStatus>, ApiError> {
    let session = blocking(manager, |m| m.join()).await?;
    Ok(Json(BoardStatus::from(&session)))
}

/// `POST /move/{playerId}`
///
/// Rule violations are answered with `200` and their code in the message.
#[instrument(skip(manager))]
pub async fn make_move<S: Storage>(
    State(manager): State<Arc<SessionManager<S>>>,
    Path(player_id): Path<i32>,
    Form(request): Form<MoveRequest>,
) -> Result<Json<Message>, ApiError> {
    let response = blocking(manager, move |m| {
        m.make_move(request.x, request.y, player_id)
    })
    .await?;
    Ok(Json(response.message))
}

/// `GET /boardstatus`
pub async fn board_status<S: Storage>(
    State(manager): State<Arc<SessionManager<S>>>,
) -> Json<BoardStatus> {
    Json(BoardStatus::from(&manager.status()))
}
