//! Access verification gate
//!
//! Decides whether the acting principal may open a connection to a workspace
//! owned by another principal. Runs before the coordinator and is orthogonal
//! to the grant cycle itself.

use crate::config::Settings;
use crate::error::GrantError;
use crate::types::RequestContext;

/// Precondition gate for workspace connection requests
///
/// Rule set:
/// - the workspace owner is always allowed
/// - administrators are allowed only while the
///   `restrict_admin_workspace_connection` flag is off (unset restricts)
/// - everyone else is denied
#[derive(Debug, Clone)]
pub struct AccessVerifier {
    settings: Settings,
}

impl AccessVerifier {
    /// Create a verifier over process settings
    #[inline]
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Check that the acting principal may reach a workspace owned by
    /// `resource_owner_id`
    ///
    /// `scope_id` identifies the project scope the workspace lives in; it is
    /// threaded through for scope-level rules but unused by the current set.
    ///
    /// # Errors
    /// `GrantError::AccessDenied` when the rule set refuses the principal.
    pub fn verify(
        &self,
        ctx: &RequestContext,
        resource_owner_id: &str,
        _scope_id: &str,
    ) -> Result<(), GrantError> {
        if ctx.principal.uid == resource_owner_id {
            return Ok(());
        }

        if ctx.principal.is_admin {
            if self.settings.admin_access_restricted() {
                tracing::warn!(
                    uid = %ctx.principal.uid,
                    owner = resource_owner_id,
                    "admin cross-user workspace access refused by settings"
                );
                return Err(GrantError::AccessDenied);
            }
            return Ok(());
        }

        tracing::warn!(
            uid = %ctx.principal.uid,
            owner = resource_owner_id,
            "cross-user workspace access refused"
        );
        Err(GrantError::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Principal;

    fn ctx(principal: Principal) -> RequestContext {
        RequestContext::new(principal, "192.0.2.7".parse().unwrap())
    }

    #[test]
    fn owner_is_always_allowed() {
        let verifier = AccessVerifier::new(Settings::new().with_restrict_admin(true));
        let ctx = ctx(Principal::user("u-owner"));
        assert!(verifier.verify(&ctx, "u-owner", "project-2").is_ok());
    }

    #[test]
    fn restricted_admin_is_denied_cross_user() {
        let verifier = AccessVerifier::new(Settings::new().with_restrict_admin(true));
        let ctx = ctx(Principal::admin("u-admin"));
        let err = verifier.verify(&ctx, "u-researcher", "project-2").unwrap_err();
        assert!(matches!(err, GrantError::AccessDenied));
        assert!(err.to_string().contains("other user's workspace"));
    }

    #[test]
    fn admin_owning_the_workspace_is_allowed_even_when_restricted() {
        let verifier = AccessVerifier::new(Settings::new().with_restrict_admin(true));
        let ctx = ctx(Principal::admin("u-admin"));
        assert!(verifier.verify(&ctx, "u-admin", "project-2").is_ok());
    }

    #[test]
    fn unrestricted_admin_is_allowed_cross_user() {
        let verifier = AccessVerifier::new(Settings::new().with_restrict_admin(false));
        let ctx = ctx(Principal::admin("u-admin"));
        assert!(verifier.verify(&ctx, "u-researcher", "project-2").is_ok());
    }

    #[test]
    fn unset_flag_restricts_admins() {
        let verifier = AccessVerifier::new(Settings::default());
        let ctx = ctx(Principal::admin("u-admin"));
        assert!(verifier.verify(&ctx, "u-researcher", "project-2").is_err());
    }

    #[test]
    fn plain_user_is_denied_cross_user_regardless_of_flag() {
        let verifier = AccessVerifier::new(Settings::new().with_restrict_admin(false));
        let ctx = ctx(Principal::user("u-someone"));
        assert!(verifier.verify(&ctx, "u-researcher", "project-2").is_err());
    }
}
