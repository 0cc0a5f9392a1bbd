//! Error types for storage, recovery and the session manager.

use derive_more::{Display, Error, From};
use steadfast_tictactoe::EngineError;
use tracing::instrument;

/// Storage error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Storage error: {} at {}:{}", message, file, line)]
pub struct StorageError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StorageError {
    /// Creates a new storage error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for StorageError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for StorageError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}

/// Rebuilding the session at startup failed. Fatal: the server must not
/// serve requests until storage is readable or reset.
#[derive(Debug, Clone, Display, Error, From)]
pub enum RecoveryError {
    /// The log or snapshot could not be read.
    #[display("Storage unavailable during recovery: {}", _0)]
    StorageUnavailable(StorageError),
    /// The persisted data contradicts itself.
    #[display("Persisted session is corrupt: {}", reason)]
    #[from(skip)]
    Corrupt {
        /// What was inconsistent.
        reason: String,
    },
}

impl RecoveryError {
    /// Creates a corruption error.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }
}

/// Failure of a session manager operation.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ManagerError {
    /// The engine refused the request; nothing changed.
    #[display("{}", _0)]
    Rejected(EngineError),
    /// The commit failed; the in-memory session was left as it was.
    #[display("Storage unavailable: {}", _0)]
    StorageUnavailable(StorageError),
}
