//! # API Error Type
//!
//! Unified error type for app commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  shell ──► command fn ──► Result<T, ApiError>                           │
//! │                               │                                         │
//! │        ValidationError ───────┤──► VALIDATION_ERROR  (no mutation)      │
//! │        CoreError ─────────────┤──► NOT_FOUND / VALIDATION_ERROR         │
//! │        DbError ───────────────┤──► STORAGE_ERROR                        │
//! │        camera / mic denied ───┤──► PERMISSION_DENIED (feature off)      │
//! │        no speech backend ─────┤──► UNSUPPORTED                          │
//! │                               ▼                                         │
//! │  shell prints "[CODE] message"; nothing here ends the process           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Upstream AI failures never reach this type: the gateway converts them
//! to fallback answers.

use serde::Serialize;
use udyamx_core::{CoreError, ValidationError};
use udyamx_store::DbError;

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "client name is required"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    StorageError,
    /// A device capability (camera, microphone) was refused.
    PermissionDenied,
    /// The environment lacks the feature entirely.
    Unsupported,
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::PermissionDenied, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unsupported, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::DuplicateSku(sku) => ApiError::validation(format!("SKU '{}' already exists", sku)),
            DbError::Busy => ApiError::new(ErrorCode::StorageError, "Storage is busy, try again"),
            DbError::Closed => ApiError::new(ErrorCode::StorageError, "Storage is closed"),
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Storage operation failed");
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::ItemIndexOutOfRange { index, len } => {
                ApiError::not_found("Invoice item", &format!("#{} (of {})", index + 1, len))
            }
            CoreError::InvoiceTooLarge { max } => {
                ApiError::validation(format!("An invoice cannot have more than {} items", max))
            }
            CoreError::UnsupportedLocale(code) => ApiError::validation(format!("Unsupported language: {}", code)),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;
