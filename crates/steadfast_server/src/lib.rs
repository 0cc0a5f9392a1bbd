//! Steadfast server library - a tic-tac-toe session that survives crashes
//!
//! Every accepted mutation is committed to SQLite before it becomes
//! visible, and the session is rebuilt from storage on startup.
//!
//! # Architecture
//!
//! - **Store**: append-only move log plus a single snapshot row
//! - **Recovery**: rebuilds the session from the store at startup
//! - **Manager**: serializes mutations and commits them atomically
//! - **HTTP**: axum routes and a `WebSocket` board push
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use steadfast_server::{SessionManager, SqliteStore, build_router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = Arc::new(SqliteStore::open("steadfast.db".to_string())?);
//! let manager = Arc::new(SessionManager::recover(store, 16)?);
//! let app = build_router(manager);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod error;
mod http;
mod manager;
mod recovery;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Errors
pub use error::{ManagerError, RecoveryError, StorageError};

// Crate-level exports - Transport
pub use http::{
    ApiError, BoardStatus, INVALID_TYPE_TEXT, MoveRequest, ONLINE_TEXT, PlayerView, StartRequest,
    build_router,
};

// Crate-level exports - Session management
pub use manager::{DEFAULT_BROADCAST_CAPACITY, MoveResponse, SessionManager};
pub use recovery::rebuild;

// Crate-level exports - Storage
pub use store::{
    CommitUnit, DurableLog, MemoryStore, SnapshotRow, SnapshotStore, SqliteStore, Storage,
};
