//! Concurrent permission-check evaluation.
//!
//! Answers "is subject S a member of the userset (object, relation)?" by
//! walking relation tuples and userset rewrites, fanning subchecks out in
//! parallel under the reducers in [`reduce`] and short-circuiting as soon
//! as an answer is determined. Work whose result can no longer matter is
//! canceled by dropping it.

mod check;
mod dispatch;
mod reduce;
#[cfg(test)]
mod tests;
mod traits;
mod types;

pub use check::ConcurrentChecker;
pub use dispatch::{DispatchConfig, LocalDispatcher};
pub use reduce::{all, always_member, any, check_error, difference, not_member};
pub use traits::{Dispatcher, GraphDatastore, NamespaceManager, RelationTupleStream};
pub use types::{CheckFuture, CheckOutcome, CheckRequest, CheckResult, DEFAULT_DEPTH_BUDGET};
