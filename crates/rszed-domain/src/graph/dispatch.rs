//! In-process dispatcher for recursive checks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::error::CheckError;

use super::check::ConcurrentChecker;
use super::traits::{Dispatcher, GraphDatastore, NamespaceManager};
use super::types::{CheckOutcome, CheckRequest};

/// Configuration for [`LocalDispatcher`].
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Upper bound on the wall-clock time of one dispatched check.
    pub timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Routes recursive checks back into an in-process [`ConcurrentChecker`].
///
/// This is the simplest implementation of the [`Dispatcher`] contract;
/// caching and remote routing attach at the same seam. Cloning is cheap and
/// clones share the underlying collaborators.
pub struct LocalDispatcher<S, N> {
    datastore: Arc<S>,
    namespaces: Arc<N>,
    config: DispatchConfig,
}

impl<S, N> Clone for LocalDispatcher<S, N> {
    fn clone(&self) -> Self {
        Self {
            datastore: Arc::clone(&self.datastore),
            namespaces: Arc::clone(&self.namespaces),
            config: self.config.clone(),
        }
    }
}

impl<S, N> LocalDispatcher<S, N>
where
    S: GraphDatastore + 'static,
    N: NamespaceManager + 'static,
{
    /// Creates a dispatcher with the default configuration.
    pub fn new(datastore: Arc<S>, namespaces: Arc<N>) -> Self {
        Self::with_config(datastore, namespaces, DispatchConfig::default())
    }

    /// Creates a dispatcher with a custom configuration.
    pub fn with_config(datastore: Arc<S>, namespaces: Arc<N>, config: DispatchConfig) -> Self {
        Self {
            datastore,
            namespaces,
            config,
        }
    }

    async fn check_inner(&self, req: CheckRequest, cancel: CancellationToken) -> CheckOutcome {
        let relation = self
            .namespaces
            .relation(&req.start.namespace, &req.start.relation)
            .await?;

        let checker = ConcurrentChecker::new(
            self.clone(),
            Arc::clone(&self.datastore),
            Arc::clone(&self.namespaces),
        );
        checker.check(req, &relation, cancel).await
    }
}

#[async_trait]
impl<S, N> Dispatcher for LocalDispatcher<S, N>
where
    S: GraphDatastore + 'static,
    N: NamespaceManager + 'static,
{
    #[instrument(
        name = "check",
        skip_all,
        fields(start = %req.start, goal = %req.goal, depth = req.depth_remaining)
    )]
    async fn check(&self, req: CheckRequest, cancel: CancellationToken) -> CheckOutcome {
        let timeout = self.config.timeout;
        match tokio::time::timeout(timeout, self.check_inner(req, cancel)).await {
            Ok(outcome) => outcome.map_err(CheckError::into_dispatch_failure),
            Err(_) => Err(CheckError::Timeout {
                duration_ms: timeout.as_millis() as u64,
            }),
        }
    }
}
