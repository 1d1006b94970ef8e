//! Error types for inlinekv
//!
//! Every public operation either returns its result or exactly one of the
//! four error kinds below. Nothing is retried or swallowed internally.

use thiserror::Error;

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Coarse classification of a [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Protocol,
    Key,
    Value,
}

/// Unified error type for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Socket open/write failure, or the peer closed mid-read.
    #[error("connection error: {0}")]
    Connection(String),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    /// Malformed framing, a server error reply, or a violated request
    /// precondition. The stream position is unreliable afterwards.
    #[error("protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Semantic Errors
    // -------------------------------------------------------------------------
    /// A key or hash that was expected to exist does not.
    #[error("key error: {0}")]
    Key(String),

    /// A value was found to be invalid (non-numeric integer reply,
    /// unrepresentable request argument).
    #[error("value error: {0}")]
    Value(String),
}

impl ClientError {
    /// Which of the four kinds this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Connection(_) => ErrorKind::Connection,
            ClientError::Protocol(_) => ErrorKind::Protocol,
            ClientError::Key(_) => ErrorKind::Key,
            ClientError::Value(_) => ErrorKind::Value,
        }
    }

    /// The human-readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            ClientError::Connection(msg)
            | ClientError::Protocol(msg)
            | ClientError::Key(msg)
            | ClientError::Value(msg) => msg,
        }
    }

    pub(crate) fn connection_closed() -> Self {
        ClientError::Connection("connection was closed".to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Connection(err.to_string())
    }
}
