//! Storage error types.

use thiserror::Error;

/// Errors produced by the tuple store write surface.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The tuple's namespace is not declared in the catalog.
    #[error("namespace not found: {namespace}")]
    NamespaceNotFound { namespace: String },

    /// The tuple already exists at the head revision.
    #[error("duplicate tuple: {tuple}")]
    DuplicateTuple { tuple: String },

    /// The tuple does not exist at the head revision.
    #[error("tuple not found: {tuple}")]
    TupleNotFound { tuple: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
