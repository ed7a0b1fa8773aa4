//! Shared primitives for all Rust crates in the PaaS console.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across console crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// The API rejected the session credential (HTTP 401/403).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The API answered with a non-success status other than 401/403.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// Server-provided message, or the canonical status reason.
        message: String,
    },

    /// No response reached the client (connect failure, timeout, reset).
    #[error("network error: {0}")]
    Network(String),

    /// Durable storage held state that could not be parsed.
    #[error("malformed stored state: {0}")]
    MalformedStoredState(String),

    /// Durable storage could not be written.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A success response carried a body that does not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The caller abandoned the request before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether the error means the session is no longer valid.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Returns the HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
