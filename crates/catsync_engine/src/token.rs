//! Bearer token loading.

use std::fs;
use tracing::{error, warn};

/// Read-through loader for the synchronization bearer token.
///
/// The token file is read fresh on every outbound call, so the token can be
/// rotated out of band by rewriting the file. Nothing is cached and no
/// expiry is tracked. A read failure is logged and the call proceeds
/// without an `Authorization` header; the remote mirror will then reject
/// the request and the operation is queued through the normal failure path.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: String,
}

impl TokenFile {
    /// Creates a loader for the given path. Warns when the path is unset.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        if path.is_empty() {
            warn!("sync token filepath not set");
        }
        Self { path }
    }

    /// Reads the current bearer token, or `None` when the file is unreadable.
    pub fn bearer(&self) -> Option<String> {
        if self.path.is_empty() {
            return None;
        }
        match fs::read_to_string(&self.path) {
            Ok(token) => Some(token.trim().to_string()),
            Err(e) => {
                error!(
                    path = %self.path,
                    "could not read synchronization token file: {e}"
                );
                None
            }
        }
    }
}
