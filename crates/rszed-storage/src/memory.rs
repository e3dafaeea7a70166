//! In-memory datastore with revision-scoped reads.
//!
//! Tuples carry a created/deleted revision interval; every write advances a
//! monotonically increasing head revision, and reads see exactly the tuples
//! live at the revision they are pinned to. Uses `DashMap` for thread-safe
//! concurrent access without a global lock.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use futures::stream;
use tracing::instrument;

use rszed_domain::error::CheckError;
use rszed_domain::graph::{GraphDatastore, NamespaceManager, RelationTupleStream};
use rszed_domain::model::{
    NamespaceDefinition, Relation, RelationTuple, Revision, ELLIPSIS,
};

use crate::error::{StorageError, StorageResult};

/// One stored tuple and the revision interval it is live for.
#[derive(Debug, Clone)]
struct TupleRecord {
    tuple: RelationTuple,
    created_at: Revision,
    deleted_at: Option<Revision>,
}

impl TupleRecord {
    fn live_at(&self, revision: Revision) -> bool {
        self.created_at <= revision
            && self
                .deleted_at
                .map_or(true, |deleted_at| revision < deleted_at)
    }

    fn live_at_head(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// In-memory implementation of the graph datastore and namespace catalog.
///
/// Buckets are keyed by `namespace:object_id#relation`, matching the filter
/// shape of [`GraphDatastore::query_tuples`]; a query is one map lookup plus
/// a liveness scan of the bucket.
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    head: AtomicU64,
    tuples: DashMap<String, Vec<TupleRecord>>,
    namespaces: DashMap<String, NamespaceDefinition>,
}

impl MemoryDatastore {
    /// Creates an empty datastore at revision zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current head revision.
    pub fn head_revision(&self) -> Revision {
        Revision(self.head.load(Ordering::SeqCst))
    }

    fn advance_head(&self) -> Revision {
        Revision(self.head.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn key(namespace: &str, object_id: &str, relation: &str) -> String {
        format!("{namespace}:{object_id}#{relation}")
    }

    fn tuple_key(tuple: &RelationTuple) -> String {
        let onr = &tuple.object_and_relation;
        Self::key(&onr.namespace, &onr.object_id, &onr.relation)
    }

    /// Declares (or replaces) a namespace definition, returning the revision
    /// at which it takes effect.
    pub fn write_namespace(&self, definition: NamespaceDefinition) -> Revision {
        self.namespaces.insert(definition.name.clone(), definition);
        self.advance_head()
    }

    /// Writes tuples, returning the revision at which they become visible.
    /// Every tuple's namespace must be declared and no tuple may already be
    /// live.
    #[instrument(skip_all, fields(tuples = tuples.len()))]
    pub fn write_tuples(&self, tuples: Vec<RelationTuple>) -> StorageResult<Revision> {
        for tuple in &tuples {
            let namespace = &tuple.object_and_relation.namespace;
            if !self.namespaces.contains_key(namespace) {
                return Err(StorageError::NamespaceNotFound {
                    namespace: namespace.clone(),
                });
            }
            let live = self
                .tuples
                .get(&Self::tuple_key(tuple))
                .is_some_and(|bucket| {
                    bucket
                        .iter()
                        .any(|record| record.live_at_head() && record.tuple == *tuple)
                });
            if live {
                return Err(StorageError::DuplicateTuple {
                    tuple: tuple.to_string(),
                });
            }
        }

        let revision = self.advance_head();
        for tuple in tuples {
            let key = Self::tuple_key(&tuple);
            self.tuples.entry(key).or_default().push(TupleRecord {
                tuple,
                created_at: revision,
                deleted_at: None,
            });
        }
        Ok(revision)
    }

    /// Deletes tuples, returning the revision at which the deletion becomes
    /// visible. Every tuple must be live at the head revision.
    #[instrument(skip_all, fields(tuples = tuples.len()))]
    pub fn delete_tuples(&self, tuples: Vec<RelationTuple>) -> StorageResult<Revision> {
        for tuple in &tuples {
            let live = self
                .tuples
                .get(&Self::tuple_key(tuple))
                .is_some_and(|bucket| {
                    bucket
                        .iter()
                        .any(|record| record.live_at_head() && record.tuple == *tuple)
                });
            if !live {
                return Err(StorageError::TupleNotFound {
                    tuple: tuple.to_string(),
                });
            }
        }

        let revision = self.advance_head();
        for tuple in tuples {
            if let Some(mut bucket) = self.tuples.get_mut(&Self::tuple_key(&tuple)) {
                for record in bucket.iter_mut() {
                    if record.live_at_head() && record.tuple == tuple {
                        record.deleted_at = Some(revision);
                    }
                }
            }
        }
        Ok(revision)
    }
}

#[async_trait]
impl GraphDatastore for MemoryDatastore {
    #[instrument(skip(self))]
    async fn query_tuples(
        &self,
        namespace: &str,
        object_id: &str,
        relation: &str,
        at_revision: Revision,
    ) -> Result<RelationTupleStream, CheckError> {
        let key = Self::key(namespace, object_id, relation);
        let tuples: Vec<RelationTuple> = self
            .tuples
            .get(&key)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|record| record.live_at(at_revision))
                    .map(|record| record.tuple.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(Box::pin(stream::iter(tuples.into_iter().map(Ok))))
    }
}

#[async_trait]
impl NamespaceManager for MemoryDatastore {
    async fn check_namespace_and_relation(
        &self,
        namespace: &str,
        relation: &str,
        allow_ellipsis: bool,
    ) -> Result<(), CheckError> {
        if allow_ellipsis && relation == ELLIPSIS {
            return Ok(());
        }
        let definition =
            self.namespaces
                .get(namespace)
                .ok_or_else(|| CheckError::NamespaceNotFound {
                    namespace: namespace.to_string(),
                })?;
        if definition.relation(relation).is_some() {
            Ok(())
        } else {
            Err(CheckError::RelationNotFound {
                namespace: namespace.to_string(),
                relation: relation.to_string(),
            })
        }
    }

    async fn relation(&self, namespace: &str, relation: &str) -> Result<Relation, CheckError> {
        let definition =
            self.namespaces
                .get(namespace)
                .ok_or_else(|| CheckError::NamespaceNotFound {
                    namespace: namespace.to_string(),
                })?;
        definition
            .relation(relation)
            .cloned()
            .ok_or_else(|| CheckError::RelationNotFound {
                namespace: namespace.to_string(),
                relation: relation.to_string(),
            })
    }
}
