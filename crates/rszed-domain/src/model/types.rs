//! Core tuple data model: userset references, relation tuples and revisions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel relation marking a terminal subject reference.
pub const ELLIPSIS: &str = "...";

/// A userset reference: (namespace, object id, relation).
///
/// With the [`ELLIPSIS`] relation it identifies a concrete subject rather
/// than a set of subjects. Identity is structural equality of all three
/// components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectAndRelation {
    /// The namespace the object lives in (e.g. "document").
    pub namespace: String,
    /// The object within the namespace (e.g. "readme").
    pub object_id: String,
    /// The relation on the object, or [`ELLIPSIS`] for a terminal subject.
    pub relation: String,
}

impl ObjectAndRelation {
    /// Creates a new userset reference.
    pub fn new(
        namespace: impl Into<String>,
        object_id: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            object_id: object_id.into(),
            relation: relation.into(),
        }
    }

    /// Creates a terminal subject reference.
    pub fn subject(namespace: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self::new(namespace, object_id, ELLIPSIS)
    }

    /// Whether this reference names a terminal subject.
    pub fn is_subject(&self) -> bool {
        self.relation == ELLIPSIS
    }

    /// Parses the canonical `namespace:object_id#relation` form. A missing
    /// `#relation` part denotes a terminal subject.
    pub fn parse(value: &str) -> Result<Self, &'static str> {
        let (object, relation) = match value.split_once('#') {
            Some((object, relation)) => (object, relation),
            None => (value, ELLIPSIS),
        };
        if relation.is_empty() {
            return Err("relation cannot be empty");
        }
        let (namespace, object_id) = object
            .split_once(':')
            .ok_or("object must be in 'namespace:object_id' form")?;
        if namespace.is_empty() || object_id.is_empty() {
            return Err("namespace and object id cannot be empty");
        }
        Ok(Self::new(namespace, object_id, relation))
    }
}

impl fmt::Display for ObjectAndRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_subject() {
            write!(f, "{}:{}", self.namespace, self.object_id)
        } else {
            write!(f, "{}:{}#{}", self.namespace, self.object_id, self.relation)
        }
    }
}

/// A stored relationship asserting that `user` is a member of
/// `object_and_relation`'s userset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationTuple {
    /// The userset the tuple contributes to.
    pub object_and_relation: ObjectAndRelation,
    /// The member: another userset, or a terminal subject when its relation
    /// is [`ELLIPSIS`].
    pub user: ObjectAndRelation,
}

impl RelationTuple {
    /// Creates a new relation tuple.
    pub fn new(object_and_relation: ObjectAndRelation, user: ObjectAndRelation) -> Self {
        Self {
            object_and_relation,
            user,
        }
    }

    /// Parses the canonical `namespace:object_id#relation@user` form, where
    /// `user` is itself an [`ObjectAndRelation`] text form.
    pub fn parse(value: &str) -> Result<Self, &'static str> {
        let (object_and_relation, user) = value
            .split_once('@')
            .ok_or("tuple must be in 'namespace:object_id#relation@user' form")?;
        let object_and_relation = ObjectAndRelation::parse(object_and_relation)?;
        if object_and_relation.is_subject() {
            return Err("tuple object must name a relation");
        }
        Ok(Self {
            object_and_relation,
            user: ObjectAndRelation::parse(user)?,
        })
    }
}

impl fmt::Display for RelationTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.object_and_relation, self.user)
    }
}

/// Opaque, totally ordered datastore revision handle. Every read performed
/// during one check evaluation is pinned to a single revision.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Revision(pub u64);

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
