//! Relay error taxonomy.

use thiserror::Error;

use crate::relay::attempt::AttemptRecord;

/// Errors that end a relay call without an upstream success.
///
/// Per-host failures never appear here on their own; they are folded into
/// [`RelayError::Exhausted`] once every host has been tried.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Required client field missing or of the wrong type.
    #[error("{0}")]
    InvalidRequest(&'static str),

    /// Every upstream host failed or rejected the call.
    #[error("All base URLs failed")]
    Exhausted { attempts: Vec<AttemptRecord> },

    /// Client body is not JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// The outbound HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

impl RelayError {
    /// Whether the error is caused by the caller rather than the relay or upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::InvalidRequest(_))
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
