//! Interfaces the evaluator consumes: recursive dispatch, tuple storage and
//! the namespace catalog.

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;

use crate::error::CheckError;
use crate::model::{Relation, RelationTuple, Revision};

use super::types::{CheckOutcome, CheckRequest};

/// Stream of tuples produced by a datastore query. Dropping the stream
/// releases the underlying iterator, on every exit path.
pub type RelationTupleStream = BoxStream<'static, Result<RelationTuple, CheckError>>;

/// Mediator for recursive checks. Implementations may evaluate in process,
/// consult a cache or route to a remote peer; the evaluator is correct for
/// any implementation of this contract.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Answers one check request, observing `cancel`.
    async fn check(&self, req: CheckRequest, cancel: CancellationToken) -> CheckOutcome;
}

/// Read-only, revision-scoped tuple query surface. Must be safe for
/// concurrent reads at a fixed revision.
#[async_trait]
pub trait GraphDatastore: Send + Sync {
    /// Queries the tuples stored for (namespace, object_id, relation) as of
    /// `at_revision`.
    async fn query_tuples(
        &self,
        namespace: &str,
        object_id: &str,
        relation: &str,
        at_revision: Revision,
    ) -> Result<RelationTupleStream, CheckError>;
}

/// Schema catalog lookups.
#[async_trait]
pub trait NamespaceManager: Send + Sync {
    /// Verifies that `relation` is declared on `namespace`. With
    /// `allow_ellipsis`, the terminal-subject sentinel passes without a
    /// catalog lookup. Absence of the relation is reported as
    /// [`CheckError::RelationNotFound`], distinguishable from lookup
    /// failures.
    async fn check_namespace_and_relation(
        &self,
        namespace: &str,
        relation: &str,
        allow_ellipsis: bool,
    ) -> Result<(), CheckError>;

    /// Reads the declaration of `relation` on `namespace`.
    async fn relation(&self, namespace: &str, relation: &str) -> Result<Relation, CheckError>;
}
