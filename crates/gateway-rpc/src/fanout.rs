//! # Fan-Out Primitive
//!
//! Generic parallel-map over the replica set. All four reconciliation
//! operations share this primitive and differ only in the reduction they
//! apply to its output (see `reconcile`).

use crate::client::RpcClient;
use crate::error::RpcError;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// Issue `call` against every client in parallel and pair each outcome with
/// its node id, preserving replica iteration order.
///
/// Suspends until every dispatched call has completed or failed; each call
/// is bounded only by the client's own transport timeout.
pub async fn fan_out<T, F, Fut>(
    clients: &[Arc<dyn RpcClient>],
    call: F,
) -> Vec<(String, Result<T, RpcError>)>
where
    F: Fn(Arc<dyn RpcClient>) -> Fut,
    Fut: Future<Output = Result<T, RpcError>>,
{
    let dispatched = clients.iter().map(|client| {
        let client = Arc::clone(client);
        let fut = call(Arc::clone(&client));
        async move { (client.node_id().to_string(), fut.await) }
    });

    join_all(dispatched).await
}

/// Split fan-out results into successes, logging and absorbing per-replica
/// failures. Returns the successes (in iteration order) and the last error
/// observed, if any.
pub(crate) fn absorb_failures<T>(
    operation: &'static str,
    results: Vec<(String, Result<T, RpcError>)>,
) -> (Vec<(String, T)>, Option<RpcError>) {
    let mut successes = Vec::with_capacity(results.len());
    let mut last_error = None;

    for (node, result) in results {
        match result {
            Ok(value) => successes.push((node, value)),
            Err(e) => {
                warn!(node = %node, operation, error = %e, "Replica call failed, excluding from result set");
                last_error = Some(e);
            }
        }
    }

    (successes, last_error)
}
