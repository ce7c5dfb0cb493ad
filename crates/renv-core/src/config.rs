//! Process-wide settings
//!
//! Flat struct read once at startup; nothing here is reloaded mid-request.

use serde::{Deserialize, Serialize};

/// Default advisory delay surfaced on lock contention, in seconds
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

/// Settings consumed by the grant coordinator and the access verifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// When true (or unset), administrators may not open connections to
    /// workspaces owned by other principals
    pub restrict_admin_workspace_connection: Option<bool>,
    /// Advisory retry delay reported with rate-limited failures
    pub retry_after_secs: u64,
}

impl Settings {
    /// Create default settings
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the admin-restriction flag explicitly
    #[inline]
    #[must_use]
    pub fn with_restrict_admin(mut self, restrict: bool) -> Self {
        self.restrict_admin_workspace_connection = Some(restrict);
        self
    }

    /// Override the advisory retry delay
    #[inline]
    #[must_use]
    pub fn with_retry_after_secs(mut self, secs: u64) -> Self {
        self.retry_after_secs = secs;
        self
    }

    /// Effective admin restriction: unset defaults to restrictive
    #[inline]
    #[must_use]
    pub fn admin_access_restricted(&self) -> bool {
        self.restrict_admin_workspace_connection.unwrap_or(true)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            restrict_admin_workspace_connection: None,
            retry_after_secs: DEFAULT_RETRY_AFTER_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flag_defaults_restrictive() {
        assert!(Settings::default().admin_access_restricted());
    }

    #[test]
    fn explicit_flag_wins() {
        assert!(!Settings::new().with_restrict_admin(false).admin_access_restricted());
        assert!(Settings::new().with_restrict_admin(true).admin_access_restricted());
    }

    #[test]
    fn default_retry_delay_is_thirty_seconds() {
        assert_eq!(Settings::default().retry_after_secs, 30);
        assert_eq!(Settings::new().with_retry_after_secs(10).retry_after_secs, 10);
    }
}
