//! Data model: relation tuples and namespace schemas.

mod schema;
mod types;
#[cfg(test)]
mod types_proptest;

pub use schema::{
    ComputedObject, ComputedUserset, NamespaceDefinition, Relation, SetOperationChild,
    TupleToUserset, UsersetRewrite,
};
pub use types::{ObjectAndRelation, RelationTuple, Revision, ELLIPSIS};
