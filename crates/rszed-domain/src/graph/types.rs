//! Request and result model for check evaluation.

use futures::future::BoxFuture;

use crate::error::CheckError;
use crate::model::{ObjectAndRelation, Revision};

/// Default depth budget for a root check request.
pub const DEFAULT_DEPTH_BUDGET: u32 = 50;

/// One permission-check question: is `goal` a member of the userset
/// identified by `start`?
///
/// Requests are immutable values; recursion derives fresh ones via
/// [`CheckRequest::descend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    /// Current evaluation point.
    pub start: ObjectAndRelation,
    /// Subject sought.
    pub goal: ObjectAndRelation,
    /// Datastore revision the whole evaluation is pinned to.
    pub at_revision: Revision,
    /// Recursive dispatches this evaluation may still spend.
    pub depth_remaining: u32,
}

impl CheckRequest {
    /// Creates a root request with the default depth budget.
    pub fn root(start: ObjectAndRelation, goal: ObjectAndRelation, at_revision: Revision) -> Self {
        Self {
            start,
            goal,
            at_revision,
            depth_remaining: DEFAULT_DEPTH_BUDGET,
        }
    }

    /// Derives the request for a recursive dispatch rooted at `start`,
    /// spending one unit of the depth budget. Fails when the budget is
    /// already spent.
    pub fn descend(&self, start: ObjectAndRelation) -> Result<CheckRequest, CheckError> {
        let depth_remaining = self
            .depth_remaining
            .checked_sub(1)
            .ok_or(CheckError::DepthExhausted)?;
        Ok(CheckRequest {
            start,
            goal: self.goal.clone(),
            at_revision: self.at_revision,
            depth_remaining,
        })
    }
}

/// The decision of one evaluated check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckResult {
    /// Whether the goal is a member of the start userset.
    pub is_member: bool,
}

impl CheckResult {
    /// Membership proven.
    pub const MEMBER: CheckResult = CheckResult { is_member: true };
    /// Membership disproven.
    pub const NOT_MEMBER: CheckResult = CheckResult { is_member: false };
}

/// A check either decides membership or fails with a [`CheckError`].
pub type CheckOutcome = Result<CheckResult, CheckError>;

/// A lazy subcheck: a deferred unit of work producing exactly one outcome
/// when awaited. Dropping it cancels the work.
pub type CheckFuture<'a> = BoxFuture<'a, CheckOutcome>;
