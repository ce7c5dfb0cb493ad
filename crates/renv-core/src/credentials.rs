//! Scoped credentials and the broker that obtains them
//!
//! The broker assumes the connection's role handle under a fixed session
//! label and hands the short-lived credential triple to exactly one signing
//! call. Secrets never appear in Debug output.

use crate::error::AssumeError;
use crate::external::IdentityService;
use std::sync::Arc;

/// Session label stamped on every assumption this subsystem performs
pub const SESSION_LABEL: &str = "create-presigned-url";

/// Short-lived, narrowly-permissioned credentials from identity assumption
#[derive(Clone)]
pub struct ScopedCredentials {
    /// Access key identifier
    pub access_key_id: String,
    /// Secret key
    pub secret_key: String,
    /// Session token bounding the credential lifetime
    pub session_token: String,
}

impl ScopedCredentials {
    /// Assemble a credential triple
    #[inline]
    #[must_use]
    pub fn new(
        access_key_id: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_key: secret_key.into(),
            session_token: session_token.into(),
        }
    }
}

impl std::fmt::Debug for ScopedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .finish()
    }
}

/// Obtains scoped credentials by assuming a secondary identity
#[derive(Clone)]
pub struct CredentialBroker {
    identity: Arc<dyn IdentityService>,
}

impl CredentialBroker {
    /// Create a broker over an identity-assumption service
    #[inline]
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        Self { identity }
    }

    /// Assume `role_handle` and return scoped credentials
    ///
    /// # Errors
    /// `AssumeError` when the identity service rejects the assumption
    /// (expired trust, external-id mismatch, throttling).
    pub async fn assume(&self, role_handle: &str) -> Result<ScopedCredentials, AssumeError> {
        tracing::debug!(role_handle, session_label = SESSION_LABEL, "assuming role");
        self.identity.assume(role_handle, SESSION_LABEL).await
    }
}
