//! Statement patching
//!
//! Computes the widen transform applied by the temporary-access-grant cycle:
//! append one statement scoped to the caller's observed network address,
//! preserving every pre-existing statement verbatim. Pure functions; callers
//! keep the input document around to write back on revert.

use crate::document::{
    Effect, PolicyDocument, Statement, ADDRESS_CONDITION_OPERATOR, SOURCE_ADDRESS_KEY,
};
use crate::error::PatchError;
use std::net::IpAddr;

/// Append one caller-address-scoped statement to `document`
///
/// The appended statement copies the effect of the existing statement matching
/// `resource` (Allow when none matches) and carries a single
/// caller-network-address condition for `caller_address`. Existing statements
/// are kept untouched and never deduplicated; the input is not mutated.
///
/// # Errors
/// `PatchError::StaleAddressStatement` if the document already carries a
/// caller-address-conditioned statement. That means an earlier cycle never
/// reverted, and stacking another grant on top would accumulate stale access.
pub fn widen(
    document: &PolicyDocument,
    resource: &str,
    action: &str,
    caller_address: IpAddr,
) -> Result<PolicyDocument, PatchError> {
    let stale = document.source_address_statement_count();
    if stale > 0 {
        return Err(PatchError::StaleAddressStatement { count: stale });
    }

    let effect = document
        .statement_for_resource(resource)
        .map_or(Effect::Allow, |s| s.effect);

    let scoped = Statement {
        effect,
        action: action.to_owned(),
        resource: resource.to_owned(),
        condition: None,
    }
    .with_condition(
        ADDRESS_CONDITION_OPERATOR,
        SOURCE_ADDRESS_KEY,
        caller_address.to_string(),
    );

    let mut widened = document.clone();
    widened.statements.push(scoped);
    Ok(widened)
}

/// Statement-set equality, ignoring order and wire-form normalization
///
/// Both sides have already been normalized to statement sequences by the
/// codec, so this reduces to multiset equality over statements.
#[must_use]
pub fn is_equivalent(a: &PolicyDocument, b: &PolicyDocument) -> bool {
    if a.statements.len() != b.statements.len() {
        return false;
    }
    let mut used = vec![false; b.statements.len()];
    for statement in &a.statements {
        let matched = b
            .statements
            .iter()
            .enumerate()
            .find(|(i, candidate)| !used[*i] && *candidate == statement);
        match matched {
            Some((i, _)) => used[i] = true,
            None => return false,
        }
    }
    true
}
