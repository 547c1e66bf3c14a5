//! Error types for the sync engine.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while propagating a mutation to the remote mirror.
///
/// No variant is treated as permanently fatal: the engine has no way to
/// tell "will never succeed" from "might succeed later", so every failed
/// propagation is queued for retry. Classification exists for logging.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The target URL could not be constructed from host and controller path.
    #[error("invalid target url '{url}': {message}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Parser message.
        message: String,
    },

    /// Network-level failure: connection refused, timeout, rejected token.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The remote mirror answered with a 5xx status.
    #[error("remote mirror returned {status}: {body}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// The remote mirror answered with a status other than the action's
    /// designated success status.
    #[error("unexpected status {status} (expected {expected}): {body}")]
    UnexpectedStatus {
        /// HTTP status code received.
        status: u16,
        /// Status code the action expects on success.
        expected: u16,
        /// Response body, if any.
        body: String,
    },

    /// The resource payload could not be serialized to JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SyncError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an invalid-URL error.
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// True when the failure may be an expired or rejected bearer token.
    ///
    /// Transport-level failures cannot be distinguished from credential
    /// problems here, so they carry the expired-token hint in logs.
    pub fn is_auth_suspect(&self) -> bool {
        matches!(self, SyncError::Transport { .. })
    }

    /// True when the remote mirror itself reported a server-side error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, SyncError::ServerError { .. })
    }
}
