//! renv-policy - Access-policy documents and statement patching
//!
//! Pure data layer for the temporary-access-grant cycle:
//! - Parse/serialize policy documents, normalizing the single-statement wire
//!   form to a statement sequence
//! - Compute the widen patch that scopes access to a caller's network address
//! - Order-insensitive document equivalence used by revert verification
//!
//! No I/O lives here; the store round trips are in `renv-core`.
//!
//! # Example
//!
//! ```rust
//! use renv_policy::{widen, PolicyDocument, Statement};
//!
//! let original = PolicyDocument::new(vec![Statement::allow(
//!     "sagemaker:CreatePresignedNotebookInstanceUrl",
//!     "arn:aws:sagemaker:us-west-2:111111111111:notebook-instance/example",
//! )]);
//!
//! let widened = widen(
//!     &original,
//!     "arn:aws:sagemaker:us-west-2:111111111111:notebook-instance/example",
//!     "sagemaker:CreatePresignedNotebookInstanceUrl",
//!     "192.0.2.7".parse().unwrap(),
//! )?;
//! assert_eq!(widened.statements.len(), 2);
//! # Ok::<(), renv_policy::PatchError>(())
//! ```

#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod patch;

// Re-exports for convenience
pub use document::{
    ConditionMap, Effect, PolicyDocument, Statement, ADDRESS_CONDITION_OPERATOR,
    SOURCE_ADDRESS_KEY,
};
pub use error::{PatchError, PolicyError};
pub use patch::{is_equivalent, widen};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
