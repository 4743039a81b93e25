//! # AI Error Types
//!
//! Errors raised while talking to the generative-text service.
//!
//! These never leave the crate through [`AiGateway`](crate::AiGateway):
//! the gateway logs them and answers with a safe fallback instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    /// Bad client configuration (missing key, unusable header value).
    #[error("AI client configuration error: {0}")]
    Config(String),

    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("AI service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The body was not the expected response envelope.
    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),

    /// The envelope held no text.
    #[error("AI response contained no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Http(err.to_string())
    }
}

/// Result type for AI client operations.
pub type AiResult<T> = Result<T, AiError>;
