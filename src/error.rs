//! Error types for mvwire-client.

use thiserror::Error;

/// Main error type for all mvwire operations.
#[derive(Debug, Error)]
pub enum MvWireError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while loading a connection profile.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connect refused, timed out, or the socket died during the
    /// post-connect grace period.
    #[error("connect failed: {0}")]
    Connect(String),

    /// Socket closed or read deadline expired before a frame completed.
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// Malformed length header, unencodable character, or a payload that
    /// does not decode to the declared character count.
    #[error("framing error: {0}")]
    Framing(String),

    /// Reply has fewer fields than the operation expects, or a numeric
    /// field failed to parse. Never silently defaulted.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Server rejected the logon. The session is left faulted; callers
    /// must re-authenticate via a fresh session.
    #[error("logon failed: {0}")]
    LoginFailed(String),

    /// Server signalled an operation failure via a nonzero status field.
    #[error("server error (status {status}): {message}")]
    Server {
        /// Status code from the reply.
        status: i32,
        /// Server-supplied message text, if any.
        message: String,
    },
}

/// Result type alias using MvWireError.
pub type Result<T> = std::result::Result<T, MvWireError>;
