//! renv-core - Temporary-access-grant coordination
//!
//! Mints browser-accessible, time-boxed URLs for managed research workspaces
//! by briefly widening a role's access policy to the caller's observed
//! network address, signing the URL under an assumed identity, and writing
//! the original policy back:
//! - `AccessVerifier` gates cross-user workspace access
//! - `AccessGrantCoordinator` runs the lock-guarded widen/sign/revert cycle
//! - `RolePolicyMutator` / `CredentialBroker` wrap the permission store and
//!   identity-assumption collaborators
//! - `external` holds the consumed traits the host application binds to real
//!   SDK clients
//!
//! # Example
//!
//! ```rust,ignore
//! use renv_core::prelude::*;
//!
//! # async fn example(coordinator: AccessGrantCoordinator, verifier: AccessVerifier,
//! #                  ctx: RequestContext, connection: Connection) -> Result<(), GrantError> {
//! verifier.verify(&ctx, "u-owner", "project-2")?;
//! let url = coordinator.issue_scoped_url(&ctx, "envId1", &connection).await?;
//! println!("connect via {url}");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod coordinator;
pub mod credentials;
pub mod error;
pub mod external;
pub mod store;
pub mod types;
pub mod verify;

// Re-exports for convenience
pub use config::{Settings, DEFAULT_RETRY_AFTER_SECS};
pub use coordinator::{AccessGrantCoordinator, LOCK_SUFFIX};
pub use credentials::{CredentialBroker, ScopedCredentials, SESSION_LABEL};
pub use error::{AssumeError, GrantError, LockError, SignError, StoreError};
pub use external::{IdentityService, LockService, LockToken, PermissionStore, SignerSet, UrlSigner};
pub use store::RolePolicyMutator;
pub use types::{Connection, ConnectionKind, Principal, RequestContext, RequestId, SignedUrl};
pub use verify::AccessVerifier;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for issuing scoped workspace URLs
    pub use crate::{
        AccessGrantCoordinator, AccessVerifier, Connection, ConnectionKind, GrantError, Principal,
        RequestContext, Settings, SignedUrl, SignerSet,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
