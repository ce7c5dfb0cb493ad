//! Temporary-access-grant coordination
//!
//! The lock-guarded widen/sign/revert cycle that mints time-boxed scoped
//! URLs:
//! 1. gate on connection kind (no lock, no policy touch for unsupported kinds)
//! 2. acquire the per-resource grant lock, contention surfaces as rate limiting
//! 3. read the role policy, widen it to the caller's observed address, write it
//! 4. assume the connection role and invoke the signing collaborator
//! 5. write the original policy back, unconditionally, exactly once
//! 6. release the lock on every exit path
//!
//! Revert failure never masks the primary outcome: a signed URL is returned
//! even if cleanup failed, and a signing failure stays the surfaced error.

use crate::config::Settings;
use crate::credentials::CredentialBroker;
use crate::error::GrantError;
use crate::external::{IdentityService, LockService, PermissionStore, SignerSet, UrlSigner};
use crate::store::RolePolicyMutator;
use crate::types::{Connection, RequestContext, SignedUrl};
use renv_policy::{widen, PolicyDocument};
use std::sync::Arc;

/// Disambiguates this subsystem's lock key space from other locks keyed on
/// the same resource id
pub const LOCK_SUFFIX: &str = "presign";

/// Phase of one grant cycle, for tracing correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrantPhase {
    Locked,
    Widening,
    Widened,
    Signing,
    Reverting,
    Done,
    Failed,
}

impl std::fmt::Display for GrantPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Locked => "locked",
            Self::Widening => "widening",
            Self::Widened => "widened",
            Self::Signing => "signing",
            Self::Reverting => "reverting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

/// Coordinates the whole temporary-access-grant cycle
pub struct AccessGrantCoordinator {
    locks: Arc<dyn LockService>,
    mutator: RolePolicyMutator,
    broker: CredentialBroker,
    signers: SignerSet,
    settings: Settings,
}

impl AccessGrantCoordinator {
    /// Wire the coordinator to its collaborators
    #[must_use]
    pub fn new(
        locks: Arc<dyn LockService>,
        store: Arc<dyn PermissionStore>,
        identity: Arc<dyn IdentityService>,
        signers: SignerSet,
        settings: Settings,
    ) -> Self {
        Self {
            locks,
            mutator: RolePolicyMutator::new(store),
            broker: CredentialBroker::new(identity),
            signers,
            settings,
        }
    }

    /// Issue a time-boxed URL scoped to the caller's observed address
    ///
    /// Serialized per resource: two concurrent requests for the same
    /// `resource_id` never interleave their policy edits; requests for
    /// different resources proceed independently.
    ///
    /// # Errors
    /// Exactly one of the taxonomy per cycle:
    /// - `UnsupportedConnectionKind` before any side effect
    /// - `RateLimited` when the grant lock is contended
    /// - `PolicyReadFailed` / `PolicyWriteFailed` for store failures
    /// - `PresignFailed` for assumption/signing failures (after revert)
    pub async fn issue_scoped_url(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        connection: &Connection,
    ) -> Result<SignedUrl, GrantError> {
        let Some(signer) = self.signers.for_kind(connection.kind) else {
            tracing::warn!(
                request_id = %ctx.request_id,
                kind = %connection.kind,
                "scoped issuance refused for connection kind"
            );
            return Err(GrantError::UnsupportedConnectionKind {
                kind: connection.kind,
            });
        };

        let key = format!("{resource_id}{LOCK_SUFFIX}");
        let token = match self.locks.try_acquire(&key).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(request_id = %ctx.request_id, %key, error = %err, "grant lock contended");
                return Err(GrantError::RateLimited {
                    retry_after_secs: self.settings.retry_after_secs,
                });
            }
        };
        tracing::debug!(request_id = %ctx.request_id, %key, phase = %GrantPhase::Locked, "grant lock acquired");

        // The cycle never early-returns past this point without the release
        // below running.
        let outcome = self.grant_cycle(ctx, connection, signer).await;

        let held_ms = (chrono::Utc::now() - token.acquired_at()).num_milliseconds();
        self.locks.release(token).await;
        match &outcome {
            Ok(_) => {
                tracing::info!(request_id = %ctx.request_id, %key, held_ms, phase = %GrantPhase::Done, "scoped URL issued");
            }
            Err(err) => {
                tracing::warn!(request_id = %ctx.request_id, %key, held_ms, phase = %GrantPhase::Failed, error = %err, "grant cycle failed");
            }
        }
        outcome
    }

    /// The critical section: read, widen, sign, revert
    async fn grant_cycle(
        &self,
        ctx: &RequestContext,
        connection: &Connection,
        signer: &dyn UrlSigner,
    ) -> Result<SignedUrl, GrantError> {
        tracing::debug!(request_id = %ctx.request_id, phase = %GrantPhase::Widening, "reading role policy");
        let original = self
            .mutator
            .read(&connection.role_id, &connection.policy_name)
            .await?;

        let widened = match widen(
            &original,
            &connection.target_resource_id,
            signer.action(),
            ctx.source_address,
        ) {
            Ok(document) => document,
            Err(err) => {
                // Nothing was written, so there is nothing to revert. The
                // stale-statement detail stays internal.
                tracing::error!(request_id = %ctx.request_id, error = %err, "refusing to widen role policy");
                return Err(GrantError::PresignFailed);
            }
        };

        self.mutator
            .write(&connection.role_id, &connection.policy_name, &widened)
            .await?;
        tracing::debug!(request_id = %ctx.request_id, phase = %GrantPhase::Widened, "role policy widened");

        let outcome = self.sign_scoped(ctx, connection, signer).await;

        tracing::debug!(request_id = %ctx.request_id, phase = %GrantPhase::Reverting, "writing original policy back");
        self.revert(ctx, connection, &original).await;

        outcome
    }

    /// Assume the connection role and invoke the signing collaborator
    async fn sign_scoped(
        &self,
        ctx: &RequestContext,
        connection: &Connection,
        signer: &dyn UrlSigner,
    ) -> Result<SignedUrl, GrantError> {
        tracing::debug!(request_id = %ctx.request_id, phase = %GrantPhase::Signing, "assuming connection role");
        let credentials = match self.broker.assume(&connection.role_handle).await {
            Ok(credentials) => credentials,
            Err(err) => {
                tracing::error!(request_id = %ctx.request_id, error = %err, "identity assumption failed");
                return Err(GrantError::PresignFailed);
            }
        };

        match signer.sign(&credentials, &connection.target_resource_id).await {
            Ok(url) => Ok(url),
            Err(err) => {
                tracing::error!(request_id = %ctx.request_id, error = %err, "signing collaborator failed");
                Err(GrantError::PresignFailed)
            }
        }
    }

    /// Best-effort single revert; failure is observed, never surfaced
    async fn revert(&self, ctx: &RequestContext, connection: &Connection, original: &PolicyDocument) {
        if let Err(err) = self
            .mutator
            .write(&connection.role_id, &connection.policy_name, original)
            .await
        {
            tracing::error!(
                request_id = %ctx.request_id,
                role_id = %connection.role_id,
                policy_name = %connection.policy_name,
                error = %err,
                "failed to revert widened policy; widened access may persist"
            );
        }
    }
}
