//! Core types for the grant coordinator
//!
//! - Connection descriptions supplied by the environment catalog
//! - Request context (principal + observed network address)
//! - Signed URL and request identifiers

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use ulid::Ulid;

/// Unique request identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate new request ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a browser reaches a backend workspace resource
///
/// Closed set: every variant that supports scoped issuance has exactly one
/// signing collaborator registered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionKind {
    /// Legacy hosted-notebook auth path, deprecated and never issued for
    NotebookLegacy,
    /// Hosted notebooks with per-request scoped URLs
    NotebookScoped,
    /// Managed workbench instances with presigned console URLs
    Workbench,
    /// Anything else (SSH tunnels, plain HTTP endpoints)
    Other,
}

impl ConnectionKind {
    /// Whether this kind can be issued a time-boxed scoped URL
    #[inline]
    #[must_use]
    pub fn supports_scoped_issuance(self) -> bool {
        matches!(self, Self::NotebookScoped | Self::Workbench)
    }
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NotebookLegacy => "notebook-legacy (deprecated)",
            Self::NotebookScoped => "notebook-scoped",
            Self::Workbench => "workbench",
            Self::Other => "other",
        };
        write!(f, "{label}")
    }
}

/// One access path to a backend resource
///
/// Immutable once constructed for a request; supplied by the environment
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Connection kind
    pub kind: ConnectionKind,
    /// Opaque resource handle (e.g. an instance identifier)
    pub target_resource_id: String,
    /// Identity whose policy will be mutated
    pub role_id: String,
    /// Fully-qualified identity reference usable for assumption
    pub role_handle: String,
    /// Name of the inline policy attached to the role
    pub policy_name: String,
    /// Human label shown in connection lists
    pub display_hint: String,
}

/// Acting principal of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Principal identifier
    pub uid: String,
    /// Whether the principal holds the administrator role
    pub is_admin: bool,
}

impl Principal {
    /// Create a non-admin principal
    #[inline]
    #[must_use]
    pub fn user(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            is_admin: false,
        }
    }

    /// Create an administrator principal
    #[inline]
    #[must_use]
    pub fn admin(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            is_admin: true,
        }
    }
}

/// Per-request context threaded through the grant cycle
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request identifier (lock holder id, tracing correlation)
    pub request_id: RequestId,
    /// Acting principal
    pub principal: Principal,
    /// The caller's observed network address; the widened statement is scoped
    /// to exactly this address
    pub source_address: IpAddr,
}

impl RequestContext {
    /// Create a context for `principal` observed at `source_address`
    #[inline]
    #[must_use]
    pub fn new(principal: Principal, source_address: IpAddr) -> Self {
        Self {
            request_id: RequestId::new(),
            principal,
            source_address,
        }
    }
}

/// A time-boxed browser-accessible URL minted by a signing collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrl(String);

impl SignedUrl {
    /// Wrap a signed URL returned by a collaborator
    #[inline]
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Borrow the URL
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the raw URL
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
