//! Domain errors raised by package manager backends.
//!
//! Everything else travels as `anyhow::Error`; these types exist so callers
//! can tell a bad request apart from a failing command with `downcast_ref`.

/// The request set cannot be processed as asked.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    pub message: String,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
