//! Concurrent evaluation of a single permission check.
//!
//! The checker walks stored tuples and userset rewrites, fanning subchecks
//! out across the children of set operations and short-circuiting as soon
//! as the answer is determined. Recursive descent never re-enters the
//! checker directly; it goes through the [`Dispatcher`], which may route
//! the request in process, to a cache or to a remote peer.

use std::sync::Arc;

use futures::TryStreamExt;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::CheckError;
use crate::model::{
    ComputedObject, ComputedUserset, ObjectAndRelation, Relation, RelationTuple,
    SetOperationChild, TupleToUserset, UsersetRewrite, ELLIPSIS,
};

use super::reduce::{self, always_member, check_error};
use super::traits::{Dispatcher, GraphDatastore, NamespaceManager};
use super::types::{CheckFuture, CheckRequest, CheckResult};

/// Which reducer combines the children of a set operation.
#[derive(Debug, Clone, Copy)]
enum Reducer {
    Any,
    All,
    Difference,
}

/// Evaluates one check request against a relation's declaration.
pub struct ConcurrentChecker<D, S, N> {
    dispatcher: D,
    datastore: Arc<S>,
    namespaces: Arc<N>,
}

impl<D, S, N> ConcurrentChecker<D, S, N>
where
    D: Dispatcher,
    S: GraphDatastore + 'static,
    N: NamespaceManager + 'static,
{
    /// Creates a checker over the given collaborators.
    pub fn new(dispatcher: D, datastore: Arc<S>, namespaces: Arc<N>) -> Self {
        Self {
            dispatcher,
            datastore,
            namespaces,
        }
    }

    /// Builds the lazy check for `req` against `relation`'s declaration.
    /// The returned future produces exactly one outcome when awaited.
    pub fn check<'a>(
        &'a self,
        req: CheckRequest,
        relation: &Relation,
        cancel: CancellationToken,
    ) -> CheckFuture<'a> {
        // Reflexive base case: every userset contains itself.
        if req.start == req.goal {
            return always_member();
        }

        match &relation.userset_rewrite {
            None => self.check_direct(req, cancel),
            Some(rewrite) => self.check_rewrite(req, rewrite.clone(), cancel),
        }
    }

    fn dispatch<'a>(&'a self, req: CheckRequest, cancel: CancellationToken) -> CheckFuture<'a> {
        Box::pin(async move {
            trace!(start = %req.start, goal = %req.goal, depth = req.depth_remaining, "dispatch");
            self.dispatcher.check(req, cancel).await
        })
    }

    /// Decides membership by the stored tuples alone: a tuple naming the
    /// goal is a hit, and every non-terminal userset reference is resolved
    /// recursively, union-reduced.
    fn check_direct<'a>(&'a self, req: CheckRequest, cancel: CancellationToken) -> CheckFuture<'a> {
        Box::pin(async move {
            trace!(start = %req.start, goal = %req.goal, "direct");
            let mut tuples = self
                .datastore
                .query_tuples(
                    &req.start.namespace,
                    &req.start.object_id,
                    &req.start.relation,
                    req.at_revision,
                )
                .await?;

            let mut to_dispatch = Vec::new();
            while let Some(tuple) = tuples.try_next().await? {
                let userset = tuple.user;
                if userset == req.goal {
                    // Found the goal directly; the remaining tuples are
                    // irrelevant.
                    return Ok(CheckResult::MEMBER);
                }
                if userset.relation != ELLIPSIS {
                    // A reference to another userset, possibly in another
                    // namespace. A spent depth budget fails only this
                    // subcheck; a later tuple naming the goal still wins.
                    match req.descend(userset) {
                        Ok(child) => to_dispatch.push(self.dispatch(child, cancel.clone())),
                        Err(err) => to_dispatch.push(check_error(err)),
                    }
                }
            }

            reduce::any(&cancel, to_dispatch).await
        })
    }

    fn check_rewrite<'a>(
        &'a self,
        req: CheckRequest,
        rewrite: UsersetRewrite,
        cancel: CancellationToken,
    ) -> CheckFuture<'a> {
        match rewrite {
            UsersetRewrite::Union(children) => {
                self.check_set_operation(req, children, Reducer::Any, cancel)
            }
            UsersetRewrite::Intersection(children) => {
                self.check_set_operation(req, children, Reducer::All, cancel)
            }
            UsersetRewrite::Exclusion(children) => {
                self.check_set_operation(req, children, Reducer::Difference, cancel)
            }
        }
    }

    fn check_set_operation<'a>(
        &'a self,
        req: CheckRequest,
        children: Vec<SetOperationChild>,
        reducer: Reducer,
        cancel: CancellationToken,
    ) -> CheckFuture<'a> {
        let mut checks = Vec::with_capacity(children.len());
        for child in children {
            checks.push(match child {
                SetOperationChild::This => self.check_direct(req.clone(), cancel.clone()),
                SetOperationChild::ComputedUserset(cu) => {
                    self.check_computed_userset(req.clone(), cu, None, cancel.clone())
                }
                SetOperationChild::Rewrite(nested) => {
                    self.check_rewrite(req.clone(), *nested, cancel.clone())
                }
                SetOperationChild::TupleToUserset(ttu) => {
                    self.check_tuple_to_userset(req.clone(), ttu, cancel.clone())
                }
            });
        }

        Box::pin(async move {
            let subchecks = checks.len();
            trace!(start = %req.start, goal = %req.goal, op = ?reducer, subchecks, "set operation");
            match reducer {
                Reducer::Any => reduce::any(&cancel, checks).await,
                Reducer::All => reduce::all(&cancel, checks).await,
                Reducer::Difference => reduce::difference(&cancel, checks).await,
            }
        })
    }

    /// Redirects the check to `cu.relation` on the object selected by
    /// `cu.object`: the tuple's userset subject or the tuple's object when
    /// walking a tuple-to-userset, otherwise the request's own object.
    fn check_computed_userset<'a>(
        &'a self,
        req: CheckRequest,
        cu: ComputedUserset,
        tuple: Option<&RelationTuple>,
        cancel: CancellationToken,
    ) -> CheckFuture<'a> {
        let start = match cu.object {
            ComputedObject::TupleUsersetObject => match tuple {
                Some(tuple) => tuple.user.clone(),
                None => {
                    return check_error(CheckError::InvalidRewrite {
                        message:
                            "computed userset anchored at a tupleset userset outside a tuple-to-userset"
                                .to_string(),
                    });
                }
            },
            ComputedObject::TupleObject => match tuple {
                Some(tuple) => tuple.object_and_relation.clone(),
                None => req.start.clone(),
            },
        };

        let target = ObjectAndRelation::new(start.namespace, start.object_id, cu.relation);

        // Dispatching straight to the goal's userset proves membership
        // without spending any budget.
        if target == req.goal {
            return always_member();
        }

        Box::pin(async move {
            match self
                .namespaces
                .check_namespace_and_relation(&target.namespace, &target.relation, true)
                .await
            {
                Ok(()) => {}
                // An absent relation holds no members at all.
                Err(CheckError::RelationNotFound { .. }) => return Ok(CheckResult::NOT_MEMBER),
                Err(err) => return Err(err),
            }

            self.dispatch(req.descend(target)?, cancel).await
        })
    }

    /// Walks the tuples on the tupleset relation and evaluates the computed
    /// userset against each tuple's user, union-reduced.
    fn check_tuple_to_userset<'a>(
        &'a self,
        req: CheckRequest,
        ttu: TupleToUserset,
        cancel: CancellationToken,
    ) -> CheckFuture<'a> {
        Box::pin(async move {
            trace!(start = %req.start, goal = %req.goal, tupleset = %ttu.tupleset_relation, "tuple-to-userset");
            let mut tuples = self
                .datastore
                .query_tuples(
                    &req.start.namespace,
                    &req.start.object_id,
                    &ttu.tupleset_relation,
                    req.at_revision,
                )
                .await?;

            let mut checks = Vec::new();
            while let Some(tuple) = tuples.try_next().await? {
                checks.push(self.check_computed_userset(
                    req.clone(),
                    ttu.computed_userset.clone(),
                    Some(&tuple),
                    cancel.clone(),
                ));
            }

            reduce::any(&cancel, checks).await
        })
    }
}
