//! Role policy mutation
//!
//! The get-policy / put-policy round trip against the permission store for a
//! `(role_id, policy_name)` pair. Parsing and serialization happen here so
//! the coordinator only ever handles typed documents; raw-store failures are
//! classified into the caller-facing taxonomy with causes kept in tracing.

use crate::error::GrantError;
use crate::external::PermissionStore;
use renv_policy::PolicyDocument;
use std::sync::Arc;

/// Reads and writes the inline policy document attached to a role
#[derive(Clone)]
pub struct RolePolicyMutator {
    store: Arc<dyn PermissionStore>,
}

impl RolePolicyMutator {
    /// Create a mutator over a permission store
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    /// Fetch and parse the current document
    ///
    /// # Errors
    /// `GrantError::PolicyReadFailed` when the document is missing or
    /// unparsable; nothing has been mutated at that point.
    pub async fn read(
        &self,
        role_id: &str,
        policy_name: &str,
    ) -> Result<PolicyDocument, GrantError> {
        let raw = self
            .store
            .get_document(role_id, policy_name)
            .await
            .map_err(|err| {
                tracing::error!(role_id, policy_name, error = %err, "policy read failed");
                GrantError::PolicyReadFailed
            })?;

        PolicyDocument::from_json(&raw).map_err(|err| {
            tracing::error!(role_id, policy_name, error = %err, "policy document unparsable");
            GrantError::PolicyReadFailed
        })
    }

    /// Serialize and persist `document`
    ///
    /// # Errors
    /// `GrantError::PolicyWriteFailed` when the store rejects the write.
    pub async fn write(
        &self,
        role_id: &str,
        policy_name: &str,
        document: &PolicyDocument,
    ) -> Result<(), GrantError> {
        let raw = document.to_json().map_err(|err| {
            tracing::error!(role_id, policy_name, error = %err, "policy serialization failed");
            GrantError::PolicyWriteFailed
        })?;

        self.store
            .put_document(role_id, policy_name, &raw)
            .await
            .map_err(|err| {
                tracing::error!(role_id, policy_name, error = %err, "policy write failed");
                GrantError::PolicyWriteFailed
            })
    }
}
