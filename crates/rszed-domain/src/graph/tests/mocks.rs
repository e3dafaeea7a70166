//! Mock datastore and namespace catalog for evaluator tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::RwLock;

use crate::error::CheckError;
use crate::graph::{GraphDatastore, NamespaceManager, RelationTupleStream};
use crate::model::{NamespaceDefinition, Relation, RelationTuple, Revision, ELLIPSIS};

/// Mock tuple store keyed by `namespace:object_id#relation`, with optional
/// per-key artificial latency and error injection.
pub struct MockDatastore {
    tuples: RwLock<HashMap<String, Vec<RelationTuple>>>,
    delays: RwLock<HashMap<String, Duration>>,
    failures: RwLock<HashMap<String, String>>,
}

impl MockDatastore {
    pub fn new() -> Self {
        Self {
            tuples: RwLock::new(HashMap::new()),
            delays: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
        }
    }

    fn key(namespace: &str, object_id: &str, relation: &str) -> String {
        format!("{namespace}:{object_id}#{relation}")
    }

    pub async fn add_tuple(&self, tuple: RelationTuple) {
        let onr = &tuple.object_and_relation;
        let key = Self::key(&onr.namespace, &onr.object_id, &onr.relation);
        self.tuples
            .write()
            .await
            .entry(key)
            .or_default()
            .push(tuple);
    }

    /// Delays every query against (namespace, object_id, relation).
    pub async fn delay_queries(
        &self,
        namespace: &str,
        object_id: &str,
        relation: &str,
        delay: Duration,
    ) {
        let key = Self::key(namespace, object_id, relation);
        self.delays.write().await.insert(key, delay);
    }

    /// Fails every query against (namespace, object_id, relation).
    pub async fn fail_queries(
        &self,
        namespace: &str,
        object_id: &str,
        relation: &str,
        reason: &str,
    ) {
        let key = Self::key(namespace, object_id, relation);
        self.failures.write().await.insert(key, reason.to_string());
    }
}

#[async_trait]
impl GraphDatastore for MockDatastore {
    async fn query_tuples(
        &self,
        namespace: &str,
        object_id: &str,
        relation: &str,
        _at_revision: Revision,
    ) -> Result<RelationTupleStream, CheckError> {
        let key = Self::key(namespace, object_id, relation);
        if let Some(delay) = self.delays.read().await.get(&key).copied() {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = self.failures.read().await.get(&key).cloned() {
            return Err(CheckError::DatastoreQueryFailed { reason });
        }
        let tuples = self
            .tuples
            .read()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default();
        Ok(Box::pin(stream::iter(tuples.into_iter().map(Ok))))
    }
}

/// Mock namespace catalog.
pub struct MockNamespaceManager {
    namespaces: RwLock<HashMap<String, NamespaceDefinition>>,
}

impl MockNamespaceManager {
    pub fn new() -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    pub async fn add_namespace(&self, definition: NamespaceDefinition) {
        self.namespaces
            .write()
            .await
            .insert(definition.name.clone(), definition);
    }
}

#[async_trait]
impl NamespaceManager for MockNamespaceManager {
    async fn check_namespace_and_relation(
        &self,
        namespace: &str,
        relation: &str,
        allow_ellipsis: bool,
    ) -> Result<(), CheckError> {
        if allow_ellipsis && relation == ELLIPSIS {
            return Ok(());
        }
        let namespaces = self.namespaces.read().await;
        let definition =
            namespaces
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
        let namespaces = self.namespaces.read().await;
        let definition =
            namespaces
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
