//! Error types for the grant coordinator
//!
//! Two layers:
//! - `GrantError`: the caller-facing taxonomy, exactly one variant per cycle
//! - narrow collaborator errors (`LockError`, `StoreError`, `AssumeError`,
//!   `SignError`) that the coordinator classifies and never leaks verbatim

use crate::types::ConnectionKind;

/// Caller-facing grant failure
///
/// Internal causes (which store call failed, why assumption was denied) are
/// recorded via `tracing` at the classification site and intentionally absent
/// here.
#[derive(Debug, thiserror::Error)]
pub enum GrantError {
    /// Connection kind does not support scoped issuance; raised before any
    /// lock or policy touch
    #[error("cannot generate a scoped URL for connection kind {kind}")]
    UnsupportedConnectionKind {
        /// The offending kind
        kind: ConnectionKind,
    },

    /// The per-resource grant lock is already held
    #[error("please wait {retry_after_secs} seconds before requesting another workspace URL")]
    RateLimited {
        /// Fixed advisory delay before the caller should retry
        retry_after_secs: u64,
    },

    /// The policy document could not be fetched or parsed; nothing was written
    #[error("could not read the workspace access policy")]
    PolicyReadFailed,

    /// The permission store rejected a write
    #[error("could not update the workspace access policy")]
    PolicyWriteFailed,

    /// Identity assumption or URL signing failed after widening; the original
    /// policy has been written back
    #[error("could not generate presigned URL")]
    PresignFailed,

    /// The acting principal may not reach this workspace
    #[error("you do not have access to other user's workspace")]
    AccessDenied,
}

impl GrantError {
    /// Whether the caller should retry after a short delay
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Lock-service failures
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    /// The key is currently held by another request
    #[error("lock already held: {key}")]
    AlreadyHeld {
        /// Contended lock key
        key: String,
    },

    /// Lock backend unreachable or erroring
    #[error("lock service unavailable: {0}")]
    Unavailable(String),
}

/// Permission-store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document exists for the role/policy pair
    #[error("no policy {policy_name} attached to role {role_id}")]
    NotFound {
        /// Role whose policy was requested
        role_id: String,
        /// Requested policy name
        policy_name: String,
    },

    /// The store refused the write (size limit, malformed statement,
    /// permission denied)
    #[error("store rejected write: {0}")]
    Rejected(String),

    /// Store unreachable
    #[error("permission store unavailable: {0}")]
    Unavailable(String),
}

/// Identity-assumption failures
#[derive(Debug, thiserror::Error)]
pub enum AssumeError {
    /// Trust policy or external-id mismatch
    #[error("assumption denied: {0}")]
    Denied(String),

    /// Upstream throttling
    #[error("assumption throttled")]
    Throttled,

    /// Identity service unreachable
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

/// Signing-collaborator failures
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// Signing endpoint rejected the request
    #[error("signing endpoint rejected request: {0}")]
    Rejected(String),

    /// Signing endpoint unreachable
    #[error("signing endpoint unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_kind_names_the_kind() {
        let err = GrantError::UnsupportedConnectionKind {
            kind: ConnectionKind::Other,
        };
        assert!(err.to_string().contains("other"));
    }

    #[test]
    fn rate_limited_carries_advisory_delay() {
        let err = GrantError::RateLimited {
            retry_after_secs: 30,
        };
        assert!(err.to_string().contains("30 seconds"));
        assert!(err.is_retryable());
        assert!(!GrantError::PresignFailed.is_retryable());
    }

    #[test]
    fn presign_failure_is_opaque() {
        // The caller-facing message must not name assumption or signing.
        let msg = GrantError::PresignFailed.to_string();
        assert_eq!(msg, "could not generate presigned URL");
    }

    #[test]
    fn access_denied_names_cross_user_access() {
        let msg = GrantError::AccessDenied.to_string();
        assert!(msg.contains("other user's workspace"));
    }
}
