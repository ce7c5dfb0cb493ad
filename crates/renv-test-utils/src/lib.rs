//! Testing utilities for the renv workspace
//!
//! Shared fixtures and in-memory fakes for the grant cycle's collaborators.
//! The fakes keep call histories so tests can assert on widen/revert ordering
//! and lock bracketing without a mock framework.

#![allow(missing_docs)]

use async_trait::async_trait;
use dashmap::DashMap;
use renv_core::{
    AssumeError, Connection, ConnectionKind, IdentityService, LockError, LockService, LockToken,
    PermissionStore, Principal, RequestContext, ScopedCredentials, SignError, SignedUrl,
    StoreError, UrlSigner,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use ulid::Ulid;

pub const SAMPLE_NOTEBOOK_ARN: &str =
    "arn:aws:sagemaker:us-west-2:111111111111:notebook-instance/basicnotebookinstance-testnotebook";
pub const SAMPLE_PRESIGN_ACTION: &str = "sagemaker:CreatePresignedNotebookInstanceUrl";
pub const SAMPLE_POLICY: &str = r#"{
    "Statement": [{
        "Effect": "Allow",
        "Action": "sagemaker:CreatePresignedNotebookInstanceUrl",
        "Resource": "arn:aws:sagemaker:us-west-2:111111111111:notebook-instance/basicnotebookinstance-testnotebook",
        "Condition": { "StringEquals": { "aws:SourceVpce": "vpce-12345" } }
    }]
}"#;

pub fn sample_connection(kind: ConnectionKind) -> Connection {
    Connection {
        kind,
        target_resource_id: SAMPLE_NOTEBOOK_ARN.to_owned(),
        role_id: "presigned-role".to_owned(),
        role_handle: "arn:aws:iam::111111111111:role/presigned-role".to_owned(),
        policy_name: "presigned-url-access".to_owned(),
        display_hint: "notebook-instance-name".to_owned(),
    }
}

pub fn sample_context(uid: &str, is_admin: bool) -> RequestContext {
    let principal = if is_admin {
        Principal::admin(uid)
    } else {
        Principal::user(uid)
    };
    RequestContext::new(principal, "192.0.2.7".parse().unwrap())
}

/// In-memory advisory lock with acquire/release accounting
#[derive(Debug, Default)]
pub struct MemoryLockService {
    held: DashMap<String, Ulid>,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl MemoryLockService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquired_count(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }
}

#[async_trait]
impl LockService for MemoryLockService {
    async fn try_acquire(&self, key: &str) -> Result<LockToken, LockError> {
        use dashmap::mapref::entry::Entry;
        match self.held.entry(key.to_owned()) {
            Entry::Occupied(_) => Err(LockError::AlreadyHeld {
                key: key.to_owned(),
            }),
            Entry::Vacant(slot) => {
                let token = LockToken::new(key);
                slot.insert(token.holder());
                self.acquired.fetch_add(1, Ordering::SeqCst);
                Ok(token)
            }
        }
    }

    async fn release(&self, token: LockToken) {
        let removed = self
            .held
            .remove_if(token.key(), |_, holder| *holder == token.holder());
        if removed.is_some() {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// In-memory permission store that records every put in order
#[derive(Debug, Default)]
pub struct MemoryPermissionStore {
    documents: DashMap<(String, String), String>,
    puts: Mutex<Vec<String>>,
}

impl MemoryPermissionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, role_id: &str, policy_name: &str, raw: &str) {
        self.documents
            .insert((role_id.to_owned(), policy_name.to_owned()), raw.to_owned());
    }

    pub fn current(&self, role_id: &str, policy_name: &str) -> Option<String> {
        self.documents
            .get(&(role_id.to_owned(), policy_name.to_owned()))
            .map(|entry| entry.clone())
    }

    /// Raw documents written, oldest first
    pub fn put_history(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PermissionStore for MemoryPermissionStore {
    async fn get_document(&self, role_id: &str, policy_name: &str) -> Result<String, StoreError> {
        self.current(role_id, policy_name)
            .ok_or_else(|| StoreError::NotFound {
                role_id: role_id.to_owned(),
                policy_name: policy_name.to_owned(),
            })
    }

    async fn put_document(
        &self,
        role_id: &str,
        policy_name: &str,
        document: &str,
    ) -> Result<(), StoreError> {
        self.puts.lock().unwrap().push(document.to_owned());
        self.documents.insert(
            (role_id.to_owned(), policy_name.to_owned()),
            document.to_owned(),
        );
        Ok(())
    }
}

/// Identity service returning fixed credentials or a fixed denial
#[derive(Debug)]
pub struct StaticIdentity {
    deny: bool,
    assumptions: AtomicUsize,
}

impl StaticIdentity {
    #[must_use]
    pub fn allowing() -> Self {
        Self {
            deny: false,
            assumptions: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn denying() -> Self {
        Self {
            deny: true,
            assumptions: AtomicUsize::new(0),
        }
    }

    pub fn assumption_count(&self) -> usize {
        self.assumptions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityService for StaticIdentity {
    async fn assume(
        &self,
        _role_handle: &str,
        _session_label: &str,
    ) -> Result<ScopedCredentials, AssumeError> {
        self.assumptions.fetch_add(1, Ordering::SeqCst);
        if self.deny {
            return Err(AssumeError::Denied("cannot assume role".to_owned()));
        }
        Ok(ScopedCredentials::new(
            "accessKeyId",
            "secretAccessKey",
            "sessionToken",
        ))
    }
}

/// Signer returning a fixed URL, optionally after a delay or as a failure
#[derive(Debug)]
pub struct StaticSigner {
    url: String,
    delay: Option<Duration>,
    fail: bool,
}

impl StaticSigner {
    #[must_use]
    pub fn returning(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            delay: None,
            fail: false,
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            url: String::new(),
            delay: None,
            fail: true,
        }
    }

    /// Hold the signing call open, keeping the grant lock held meanwhile
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl UrlSigner for StaticSigner {
    fn action(&self) -> &'static str {
        SAMPLE_PRESIGN_ACTION
    }

    async fn sign(
        &self,
        _credentials: &ScopedCredentials,
        _target_resource_id: &str,
    ) -> Result<SignedUrl, SignError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(SignError::Rejected("signing endpoint said no".to_owned()));
        }
        Ok(SignedUrl::new(self.url.clone()))
    }
}
