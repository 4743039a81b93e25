//! # Sync Error Types
//!
//! ```text
//! ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐
//! │  Configuration  │  │    Storage      │  │    Internal     │
//! │                 │  │                 │  │                 │
//! │  InvalidConfig  │  │  DatabaseError  │  │  ChannelError   │
//! │                 │  │                 │  │  ShuttingDown   │
//! └─────────────────┘  └─────────────────┘  └─────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Invalid sync settings.
    #[error("Invalid sync configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing the invoices record failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Channel send/receive failed.
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// The sync task has stopped.
    #[error("Sync task is shutting down")]
    ShuttingDown,
}

impl From<udyamx_store::DbError> for SyncError {
    fn from(err: udyamx_store::DbError) -> Self {
        SyncError::DatabaseError(err.to_string())
    }
}
