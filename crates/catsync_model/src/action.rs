//! Sync actions and their wire mapping.

use std::fmt;

/// HTTP method used by a propagation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
    /// HTTP PATCH.
    Patch,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of mutation being propagated to the remote mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Resource was created locally.
    Add,
    /// Resource was updated locally.
    Update,
    /// Resource was deleted locally.
    Delete,
    /// Resource was verified (activated/status change) locally.
    Verify,
}

impl SyncAction {
    /// Returns the HTTP method for this action.
    pub fn method(&self) -> Method {
        match self {
            SyncAction::Add => Method::Post,
            SyncAction::Update => Method::Put,
            SyncAction::Delete => Method::Delete,
            SyncAction::Verify => Method::Patch,
        }
    }

    /// Returns the status code the remote mirror replies with on success.
    pub fn expected_status(&self) -> u16 {
        match self {
            SyncAction::Add => 201,
            SyncAction::Update => 200,
            SyncAction::Delete => 204,
            SyncAction::Verify => 200,
        }
    }

    /// Returns true if the target URL carries the resource id.
    pub fn targets_id(&self) -> bool {
        !matches!(self, SyncAction::Add)
    }

    /// Returns true if the request carries a JSON body.
    pub fn has_body(&self) -> bool {
        !matches!(self, SyncAction::Delete)
    }

    /// Lowercase name used in logs and queue diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Add => "add",
            SyncAction::Update => "update",
            SyncAction::Delete => "delete",
            SyncAction::Verify => "verify",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
