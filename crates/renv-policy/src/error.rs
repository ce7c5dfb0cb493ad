//! Error types for policy document handling

/// Errors raised while parsing or serializing a policy document
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Document is not valid JSON or does not match the expected shape
    #[error("malformed policy document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Document contains no statements at all
    #[error("policy document has no statements")]
    Empty,
}

/// Errors raised while computing a statement patch
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The document already carries caller-address-conditioned statements.
    ///
    /// These are leftovers from a grant cycle that never reverted (e.g. a
    /// crashed process). Widening on top of them would accumulate stale
    /// grants, so the patch is refused instead.
    #[error("{count} caller-address statement(s) already present; refusing to widen")]
    StaleAddressStatement {
        /// How many source-address statements were found
        count: usize,
    },
}
