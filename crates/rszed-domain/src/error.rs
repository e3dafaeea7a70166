//! Error types for check evaluation.

use thiserror::Error;

/// Errors surfaced while evaluating a permission check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Tuple query setup or iteration failed.
    #[error("tuple query failed: {reason}")]
    DatastoreQueryFailed { reason: String },

    /// Namespace metadata lookup failed for a reason other than absence.
    #[error("namespace lookup failed: {reason}")]
    NamespaceLookupFailed { reason: String },

    /// The namespace is not declared in the schema catalog.
    #[error("namespace not found: {namespace}")]
    NamespaceNotFound { namespace: String },

    /// The relation is not declared on the namespace.
    #[error("relation '{relation}' not found in namespace '{namespace}'")]
    RelationNotFound {
        namespace: String,
        relation: String,
    },

    /// A recursive dispatch was required but the depth budget was spent.
    #[error("check depth budget exhausted")]
    DepthExhausted,

    /// The userset rewrite cannot be evaluated as written.
    #[error("invalid userset rewrite: {message}")]
    InvalidRewrite { message: String },

    /// The surrounding request was canceled before a decision was reached.
    #[error("check canceled")]
    Canceled,

    /// The per-check timeout fired.
    #[error("check timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// A dispatched subcheck failed.
    #[error("dispatched check failed: {source}")]
    DispatchFailed { source: Box<CheckError> },
}

impl CheckError {
    /// Wraps a failure surfaced by a dispatched evaluation. Depth, timeout
    /// and cancellation signals pass through unwrapped so callers can act on
    /// them, and an already-wrapped error is not wrapped again.
    pub fn into_dispatch_failure(self) -> CheckError {
        match self {
            err @ (CheckError::DepthExhausted
            | CheckError::Canceled
            | CheckError::Timeout { .. }
            | CheckError::DispatchFailed { .. }) => err,
            other => CheckError::DispatchFailed {
                source: Box::new(other),
            },
        }
    }
}
