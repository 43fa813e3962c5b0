//! Domain error types for the regulator console.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use crate::forms::FormErrors;
use crate::workflow::WorkflowError;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Backend answered with a non-2xx status. The body is not inspected.
    #[error("Request failed with status code {status}")]
    Http { status: u16 },

    /// Request never produced a response (connection refused, DNS, TLS...)
    #[error("Network error: {0}")]
    Transport(String),

    /// Backend answered 2xx but the envelope reported failure
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Form values failed schema validation; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(FormErrors),

    /// Workflow rule rejected the transition locally
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Optimistic concurrency check failed on the backend
    #[error("Revision conflict: expected {expected}, record is at {actual}")]
    Conflict { expected: u64, actual: u64 },
}

impl AppError {
    /// Message suitable for a toast notification.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Http { status: 401 } => "Your session has expired. Please sign in again.".into(),
            AppError::Http { status: 403 } => {
                "You do not have permission to perform this action.".into()
            }
            AppError::Http { status: 404 } => "The requested record no longer exists.".into(),
            AppError::Http { status } if *status >= 500 => {
                "The server encountered an error. Please try again later.".into()
            }
            AppError::Http { status } => format!("Request failed with status code {}", status),
            AppError::Transport(_) => "Unable to reach the server. Check your connection.".into(),
            AppError::Api { message, .. } if !message.is_empty() => message.clone(),
            AppError::Api { status, .. } => format!("Request failed with status code {}", status),
            AppError::Decode(_) => "The server returned an unexpected response.".into(),
            AppError::Validation(_) => "Please correct the highlighted fields.".into(),
            AppError::Conflict { .. } => {
                "This record was changed by someone else. Reload and try again.".into()
            }
            other => other.to_string(),
        }
    }

    /// HTTP status associated with the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status } | AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(format!("JSON parsing error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            AppError::Http {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}
