//! Reducers combining concurrent subchecks under set-theoretic operations.
//!
//! All three reducers share a skeleton: poll every subcheck concurrently,
//! consume results in completion order and short-circuit on a decisive
//! outcome. Returning early drops the unfinished subchecks, which cancels
//! them; the outer [`CancellationToken`] short-circuits the reducer itself.

use futures::future::{self, BoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::CheckError;

use super::types::{CheckFuture, CheckOutcome, CheckResult};

/// A subcheck that immediately reports membership.
pub fn always_member<'a>() -> CheckFuture<'a> {
    Box::pin(future::ready(Ok(CheckResult::MEMBER)))
}

/// A subcheck that immediately reports non-membership.
pub fn not_member<'a>() -> CheckFuture<'a> {
    Box::pin(future::ready(Ok(CheckResult::NOT_MEMBER)))
}

/// A subcheck that immediately fails with `err`.
pub fn check_error<'a>(err: CheckError) -> CheckFuture<'a> {
    Box::pin(future::ready(Err(err)))
}

/// Union: membership in any subcheck decides. Per-subcheck failures are
/// tolerated while another subcheck may still prove membership; with no
/// member found, the last observed failure surfaces.
pub async fn any(cancel: &CancellationToken, checks: Vec<CheckFuture<'_>>) -> CheckOutcome {
    if checks.is_empty() {
        return Ok(CheckResult::NOT_MEMBER);
    }

    let mut pending: FuturesUnordered<_> = checks.into_iter().collect();
    let mut last_err = None;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Err(CheckError::Canceled),
            next = pending.next() => match next {
                None => break,
                Some(Ok(result)) if result.is_member => return Ok(result),
                Some(Ok(_)) => {}
                Some(Err(err)) => last_err = Some(err),
            },
        }
    }

    match last_err {
        Some(err) => Err(err),
        None => Ok(CheckResult::NOT_MEMBER),
    }
}

/// Intersection: the first non-member or failure decides; membership
/// requires every subcheck to agree.
pub async fn all(cancel: &CancellationToken, checks: Vec<CheckFuture<'_>>) -> CheckOutcome {
    if checks.is_empty() {
        return Ok(CheckResult::NOT_MEMBER);
    }

    let mut pending: FuturesUnordered<_> = checks.into_iter().collect();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Err(CheckError::Canceled),
            next = pending.next() => match next {
                None => break,
                Some(Ok(result)) if !result.is_member => return Ok(result),
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err),
            },
        }
    }

    Ok(CheckResult::MEMBER)
}

/// Tags subcheck results so exclusion can tell the base apart from the
/// subtractors regardless of completion order.
enum Origin {
    Base,
    Subtractor,
}

/// Exclusion: the first subcheck is the base, the rest subtract from it. A
/// non-member or failed base decides immediately; a subtractor proving
/// membership (or failing to disprove it) excludes the subject regardless
/// of the base.
pub async fn difference(cancel: &CancellationToken, mut checks: Vec<CheckFuture<'_>>) -> CheckOutcome {
    if checks.is_empty() {
        return Err(CheckError::InvalidRewrite {
            message: "exclusion requires a base userset".to_string(),
        });
    }

    let subtractors = checks.split_off(1);
    let base = checks.remove(0);

    let mut pending: FuturesUnordered<BoxFuture<'_, (Origin, CheckOutcome)>> =
        FuturesUnordered::new();
    pending.push(Box::pin(async move { (Origin::Base, base.await) }));
    for subtractor in subtractors {
        pending.push(Box::pin(async move {
            (Origin::Subtractor, subtractor.await)
        }));
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Err(CheckError::Canceled),
            next = pending.next() => match next {
                None => break,
                Some((Origin::Base, Ok(result))) if !result.is_member => return Ok(result),
                Some((Origin::Base, Err(err))) => return Err(err),
                Some((Origin::Base, Ok(_))) => {}
                Some((Origin::Subtractor, Ok(result))) if result.is_member => {
                    return Ok(CheckResult::NOT_MEMBER);
                }
                Some((Origin::Subtractor, Err(err))) => return Err(err),
                Some((Origin::Subtractor, Ok(_))) => {}
            },
        }
    }

    Ok(CheckResult::MEMBER)
}
