//! Consumed external interfaces
//!
//! Every collaborator the grant cycle suspends on is a trait here: the
//! distributed lock, the permission store, the identity-assumption service,
//! and the per-kind URL signers. Production code binds these to real SDK
//! clients at the composition root; tests bind mocks or the in-memory fakes
//! from `renv-test-utils`.

use crate::credentials::ScopedCredentials;
use crate::error::{AssumeError, LockError, SignError, StoreError};
use crate::types::{ConnectionKind, SignedUrl};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use ulid::Ulid;

/// Proof of an acquired lock, returned to the service on release
///
/// Not cloneable: exactly one release per acquisition.
#[derive(Debug)]
pub struct LockToken {
    key: String,
    holder: Ulid,
    acquired_at: DateTime<Utc>,
}

impl LockToken {
    /// Create a token for `key` (lock-service implementations only)
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            holder: Ulid::new(),
            acquired_at: Utc::now(),
        }
    }

    /// The locked key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Holder id, unique per acquisition
    #[inline]
    #[must_use]
    pub fn holder(&self) -> Ulid {
        self.holder
    }

    /// When the lock was granted
    #[inline]
    #[must_use]
    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }
}

/// Advisory distributed lock, try-acquire semantics
///
/// The coordinator brackets its critical section with one
/// `try_acquire`/`release` pair; contention surfaces immediately as
/// `LockError::AlreadyHeld` rather than queueing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LockService: Send + Sync {
    /// Acquire `key`, failing fast if it is held
    async fn try_acquire(&self, key: &str) -> Result<LockToken, LockError>;

    /// Release a previously acquired token
    async fn release(&self, token: LockToken);
}

/// Raw policy-document storage keyed by `(role_id, policy_name)`
///
/// Documents cross this boundary as wire-form JSON strings; parsing lives in
/// the mutator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Fetch the current raw document
    async fn get_document(&self, role_id: &str, policy_name: &str) -> Result<String, StoreError>;

    /// Persist a raw document
    async fn put_document(
        &self,
        role_id: &str,
        policy_name: &str,
        document: &str,
    ) -> Result<(), StoreError>;
}

/// Short-lived identity assumption
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Assume `role_handle` under `session_label`, yielding scoped credentials
    async fn assume(
        &self,
        role_handle: &str,
        session_label: &str,
    ) -> Result<ScopedCredentials, AssumeError>;
}

/// Resource-specific URL signing, one implementation per issuing kind
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// The permission action the widened statement must grant for this signer
    fn action(&self) -> &'static str;

    /// Mint a time-boxed URL for `target_resource_id` using `credentials`
    async fn sign(
        &self,
        credentials: &ScopedCredentials,
        target_resource_id: &str,
    ) -> Result<SignedUrl, SignError>;
}

/// Signing collaborators for the closed set of issuing kinds
///
/// The single dispatch point: the coordinator looks a signer up by kind and
/// never branches on kind anywhere else.
#[derive(Clone)]
pub struct SignerSet {
    notebook: Arc<dyn UrlSigner>,
    workbench: Arc<dyn UrlSigner>,
}

impl SignerSet {
    /// Register one signer per issuing kind
    #[inline]
    #[must_use]
    pub fn new(notebook: Arc<dyn UrlSigner>, workbench: Arc<dyn UrlSigner>) -> Self {
        Self { notebook, workbench }
    }

    /// Signer for `kind`, `None` for kinds that never issue
    #[must_use]
    pub fn for_kind(&self, kind: ConnectionKind) -> Option<&dyn UrlSigner> {
        match kind {
            ConnectionKind::NotebookScoped => Some(self.notebook.as_ref()),
            ConnectionKind::Workbench => Some(self.workbench.as_ref()),
            ConnectionKind::NotebookLegacy | ConnectionKind::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_tokens_have_unique_holders() {
        let a = LockToken::new("env-1presign");
        let b = LockToken::new("env-1presign");
        assert_eq!(a.key(), b.key());
        assert_ne!(a.holder(), b.holder());
    }

    #[test]
    fn lock_tokens_record_acquisition_time() {
        let before = Utc::now();
        let token = LockToken::new("env-1presign");
        let after = Utc::now();
        assert!(token.acquired_at() >= before);
        assert!(token.acquired_at() <= after);
    }

    #[test]
    fn signer_set_dispatch_is_closed() {
        let notebook = Arc::new(MockUrlSigner::new());
        let workbench = Arc::new(MockUrlSigner::new());
        let signers = SignerSet::new(notebook, workbench);

        assert!(signers.for_kind(ConnectionKind::NotebookScoped).is_some());
        assert!(signers.for_kind(ConnectionKind::Workbench).is_some());
        assert!(signers.for_kind(ConnectionKind::NotebookLegacy).is_none());
        assert!(signers.for_kind(ConnectionKind::Other).is_none());
    }
}
