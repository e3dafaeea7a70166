//! Namespace schema model: relations and their userset rewrites.

use serde::{Deserialize, Serialize};

/// A namespace and the relations declared on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceDefinition {
    /// The namespace name (e.g. "document").
    pub name: String,
    /// Relations declared on the namespace.
    pub relations: Vec<Relation>,
}

impl NamespaceDefinition {
    /// Creates a new namespace definition.
    pub fn new(name: impl Into<String>, relations: Vec<Relation>) -> Self {
        Self {
            name: name.into(),
            relations,
        }
    }

    /// Looks up a relation declaration by name.
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|relation| relation.name == name)
    }
}

/// A relation declaration. Without a rewrite, membership is exactly the set
/// of stored tuples; with one, membership is defined by the rewrite
/// expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    /// The relation name.
    pub name: String,
    /// Optional userset rewrite redefining membership.
    pub userset_rewrite: Option<UsersetRewrite>,
}

impl Relation {
    /// Declares a relation whose membership is the stored tuples alone.
    pub fn direct(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            userset_rewrite: None,
        }
    }

    /// Declares a relation whose membership is computed by a rewrite.
    pub fn with_rewrite(name: impl Into<String>, rewrite: UsersetRewrite) -> Self {
        Self {
            name: name.into(),
            userset_rewrite: Some(rewrite),
        }
    }
}

/// A set expression computing a relation's membership.
///
/// Child order is significant only for `Exclusion`: the first child is the
/// base and the remaining children are subtracted from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UsersetRewrite {
    /// Membership in any child.
    Union(Vec<SetOperationChild>),
    /// Membership in every child.
    Intersection(Vec<SetOperationChild>),
    /// Membership in the first child and in none of the rest.
    Exclusion(Vec<SetOperationChild>),
}

/// One operand of a set operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SetOperationChild {
    /// The tuples stored directly on the current (object, relation).
    This,
    /// Membership in another relation.
    ComputedUserset(ComputedUserset),
    /// A nested set expression.
    Rewrite(Box<UsersetRewrite>),
    /// A walk through the tuples of a tupleset relation.
    TupleToUserset(TupleToUserset),
}

/// Membership in `relation` on an object chosen by [`ComputedObject`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedUserset {
    /// Which object the userset is anchored at.
    pub object: ComputedObject,
    /// The relation to evaluate on that object.
    pub relation: String,
}

impl ComputedUserset {
    /// A computed userset anchored at the current object.
    pub fn same_object(relation: impl Into<String>) -> Self {
        Self {
            object: ComputedObject::TupleObject,
            relation: relation.into(),
        }
    }

    /// A computed userset anchored at the tuple's userset subject. Only
    /// meaningful inside a tuple-to-userset.
    pub fn tupleset_userset(relation: impl Into<String>) -> Self {
        Self {
            object: ComputedObject::TupleUsersetObject,
            relation: relation.into(),
        }
    }
}

/// Which object a computed userset is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputedObject {
    /// The object of the originating tuple, or the request's object when no
    /// tuple is in play.
    TupleObject,
    /// The userset subject of the originating tuple.
    TupleUsersetObject,
}

/// For every tuple on the tupleset relation, evaluate the computed userset
/// against the tuple's user; membership is the union over all tuples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TupleToUserset {
    /// Relation whose tuples name the objects to walk through.
    pub tupleset_relation: String,
    /// The userset evaluated per tuple.
    pub computed_userset: ComputedUserset,
}
