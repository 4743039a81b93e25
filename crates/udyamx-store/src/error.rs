//! # Storage Error Types
//!
//! ```text
//! sqlx::Error ─────────┐
//! MigrateError ────────┼──► DbError ──► ApiError (app) ──► shell message
//! serde_json (write) ──┘
//! ```
//!
//! A record that fails to *parse* on read is not an error: the read falls
//! back to its default (see [`LocalStore::read`](crate::LocalStore::read)).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A product with this SKU is already stocked.
    #[error("SKU '{0}' already exists")]
    DuplicateSku(String),

    /// The store file or its directory could not be opened.
    ///
    /// Usually permissions, a read-only volume or a full disk.
    #[error("Cannot open store at {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("Store migration failed: {0}")]
    Migration(String),

    /// SQLite rejected a statement.
    #[error("Statement failed: {0}")]
    Statement(String),

    /// A record value could not be encoded as JSON.
    #[error("Cannot encode record '{key}': {reason}")]
    Encode { key: String, reason: String },

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("Store is busy")]
    Busy,

    /// The pool was closed by [`Database::close`](crate::Database::close).
    #[error("Store is closed")]
    Closed,

    #[error("Store error: {0}")]
    Other(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DbError::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn encode(key: &str, err: serde_json::Error) -> Self {
        DbError::Encode {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => DbError::Statement(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::PoolClosed => DbError::Closed,
            _ => DbError::Other(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_categorized() {
        assert!(matches!(DbError::from(sqlx::Error::PoolTimedOut), DbError::Busy));
        assert!(matches!(DbError::from(sqlx::Error::PoolClosed), DbError::Closed));
        assert!(matches!(DbError::from(sqlx::Error::RowNotFound), DbError::NotFound { .. }));
    }

    #[test]
    fn test_open_error_names_the_path() {
        let err = DbError::open("/readonly/udyamx.db", "permission denied");
        assert_eq!(err.to_string(), "Cannot open store at /readonly/udyamx.db: permission denied");
    }
}
