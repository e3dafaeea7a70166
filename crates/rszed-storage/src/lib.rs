//! rszed-storage: revision-scoped tuple storage backends.
//!
//! Provides implementations of the narrow interfaces the check evaluator
//! consumes (`rszed_domain::graph::{GraphDatastore, NamespaceManager}`).
//! Currently in-memory only.

pub mod error;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryDatastore;
