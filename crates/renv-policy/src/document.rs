//! Policy document model
//!
//! Serde model of the IAM-style inline policy attached to a workspace role:
//! - `PolicyDocument` with an ordered statement list
//! - `Statement` (effect, action, resource, optional conditions)
//! - normalization of the single-statement-as-object wire form
//!
//! Pure data transform, no I/O.

use crate::error::PolicyError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Condition operator for caller-network-address matching
pub const ADDRESS_CONDITION_OPERATOR: &str = "IpAddress";

/// Condition key carrying the caller's observed source address
pub const SOURCE_ADDRESS_KEY: &str = "aws:SourceIp";

/// Condition block: operator -> key -> value
///
/// `IndexMap` keeps insertion order so documents round-trip byte-stably.
pub type ConditionMap = IndexMap<String, IndexMap<String, String>>;

/// Statement effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Grants the action
    Allow,
    /// Denies the action
    Deny,
}

/// One permission rule inside a policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Allow or Deny
    #[serde(rename = "Effect")]
    pub effect: Effect,
    /// Action identifier (e.g. a presign API action)
    #[serde(rename = "Action")]
    pub action: String,
    /// Resource handle the rule applies to
    #[serde(rename = "Resource")]
    pub resource: String,
    /// Optional condition block
    #[serde(rename = "Condition", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionMap>,
}

impl Statement {
    /// Create an Allow statement without conditions
    #[inline]
    #[must_use]
    pub fn allow(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            effect: Effect::Allow,
            action: action.into(),
            resource: resource.into(),
            condition: None,
        }
    }

    /// Attach a single-operator condition block
    #[inline]
    #[must_use]
    pub fn with_condition(
        mut self,
        operator: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut inner = IndexMap::new();
        inner.insert(key.into(), value.into());
        let mut map = self.condition.unwrap_or_default();
        map.insert(operator.into(), inner);
        self.condition = Some(map);
        self
    }

    /// Whether this statement is conditioned on the caller's source address
    #[must_use]
    pub fn has_source_address_condition(&self) -> bool {
        self.condition
            .as_ref()
            .and_then(|c| c.get(ADDRESS_CONDITION_OPERATOR))
            .is_some_and(|keys| keys.contains_key(SOURCE_ADDRESS_KEY))
    }
}

/// The persisted permission artifact attached to a role
///
/// Source systems emit a lone statement either bare or wrapped in a
/// one-element sequence; both parse to the same `statements` vector. Writing
/// always emits the sequence form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Document format version, carried through verbatim when present
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Ordered statement list
    #[serde(rename = "Statement", deserialize_with = "one_or_many")]
    pub statements: Vec<Statement>,
}

impl PolicyDocument {
    /// Create a document from statements
    #[inline]
    #[must_use]
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            version: None,
            statements,
        }
    }

    /// Parse a raw document
    ///
    /// # Errors
    /// - `PolicyError::Malformed` if the input is not a valid document
    /// - `PolicyError::Empty` if it carries no statements
    pub fn from_json(raw: &str) -> Result<Self, PolicyError> {
        let doc: Self = serde_json::from_str(raw)?;
        if doc.statements.is_empty() {
            return Err(PolicyError::Empty);
        }
        Ok(doc)
    }

    /// Serialize back to the wire form
    ///
    /// # Errors
    /// `PolicyError::Malformed` if serialization fails (should not happen for
    /// documents built through this crate).
    pub fn to_json(&self) -> Result<String, PolicyError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Find the first statement whose resource matches `resource`
    #[must_use]
    pub fn statement_for_resource(&self, resource: &str) -> Option<&Statement> {
        self.statements.iter().find(|s| s.resource == resource)
    }

    /// Count statements conditioned on the caller's source address
    #[must_use]
    pub fn source_address_statement_count(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| s.has_source_address_condition())
            .count()
    }
}

/// Accept `"Statement"` as either a single object or a sequence
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Statement>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Box<Statement>),
        Many(Vec<Statement>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(statement) => vec![*statement],
        OneOrMany::Many(statements) => statements,
    })
}
