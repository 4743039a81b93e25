//! # Error Types
//!
//! Domain-specific error types for udyamx-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  udyamx-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule failures                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  udyamx-store errors (separate crate)                                  │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What the shell shows the user                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → User                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A row index outside the current invoice item list.
    ///
    /// ## When This Occurs
    /// - The shell edits/removes a row that was removed by a voice turn
    /// - A stale index typed by the user
    #[error("Invoice item {index} does not exist ({len} items)")]
    ItemIndexOutOfRange { index: usize, len: usize },

    /// Invoice has too many lines.
    #[error("Invoice cannot have more than {max} items")]
    InvoiceTooLarge { max: usize },

    /// Unknown locale code.
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// An operation that fails validation mutates nothing.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, malformed amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ItemIndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "Invoice item 4 does not exist (2 items)");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("client name").to_string(), "client name is required");

        let err = ValidationError::Duplicate {
            field: "sku".to_string(),
            value: "HSOAP-001".to_string(),
        };
        assert_eq!(err.to_string(), "sku 'HSOAP-001' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("sku").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
