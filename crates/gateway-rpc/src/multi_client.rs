//! # Multi-Node RPC Client
//!
//! Orchestrates the four reconciliation operations: takes a fresh snapshot
//! of connected nodes, fans the call out in parallel, absorbs per-replica
//! failures, and applies the operation's reduction policy.

use crate::client::{NodeSource, RpcClient, RpcClientFactory, SubmitTx};
use crate::error::{FanOutError, RpcError};
use crate::fanout::{absorb_failures, fan_out};
use crate::reconcile::{
    self, RawTxQueryResult, SendReconciliation,
};
use crate::responses::{RpcBlockchainInfo, RpcNetworkInfo};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// The reconciled multi-node operations exposed to the rest of the
/// gateway.
#[async_trait]
pub trait MultiRpc: Send + Sync {
    /// Chain info of the least-advanced reachable replica.
    async fn worst_chain_info(&self) -> Result<RpcBlockchainInfo, FanOutError>;

    /// Network info from the first replica that answers. Node-local
    /// configuration data: no consistency requirement, just availability.
    async fn any_network_info(&self) -> Result<RpcNetworkInfo, FanOutError>;

    /// Broadcast the batch to every reachable replica and merge the
    /// per-transaction verdicts.
    async fn send_raw_transactions(
        &self,
        batch: &[SubmitTx],
    ) -> Result<SendReconciliation, FanOutError>;

    /// Query a transaction across replicas. Never fails: an indeterminate
    /// status is a result value, not an error.
    async fn get_raw_transaction(&self, txid: &str) -> RawTxQueryResult;
}

/// Production [`MultiRpc`] implementation over a node registry snapshot
/// and a per-replica client factory.
pub struct MultiRpcClient {
    nodes: Arc<dyn NodeSource>,
    factory: Arc<dyn RpcClientFactory>,
}

impl MultiRpcClient {
    /// Create a multi-node client reading replicas from `nodes`.
    pub fn new(nodes: Arc<dyn NodeSource>, factory: Arc<dyn RpcClientFactory>) -> Self {
        Self { nodes, factory }
    }

    /// Snapshot the connected nodes and build a client per node. A node
    /// whose client cannot be constructed is excluded like any other
    /// failing replica.
    fn clients(&self) -> Vec<Arc<dyn RpcClient>> {
        self.nodes
            .connected_nodes()
            .iter()
            .filter_map(|node| match self.factory.create(node) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(node = %node, error = %e, "Could not build RPC client, excluding node");
                    None
                }
            })
            .collect()
    }

    fn all_failed(
        operation: &'static str,
        attempted: usize,
        last_error: Option<RpcError>,
    ) -> FanOutError {
        FanOutError::AllNodesFailed {
            operation,
            attempted,
            last_error: last_error.map_or_else(|| "no responses".to_string(), |e| e.to_string()),
        }
    }
}

#[async_trait]
impl MultiRpc for MultiRpcClient {
    async fn worst_chain_info(&self) -> Result<RpcBlockchainInfo, FanOutError> {
        const OPERATION: &str = "getblockchaininfo";

        let clients = self.clients();
        if clients.is_empty() {
            return Err(FanOutError::NoNodesAvailable {
                operation: OPERATION,
            });
        }

        let attempted = clients.len();
        let results = fan_out(&clients, |c| async move { c.get_blockchain_info().await }).await;
        let (successes, last_error) = absorb_failures(OPERATION, results);

        let responses: Vec<RpcBlockchainInfo> =
            successes.into_iter().map(|(_, info)| info).collect();
        match reconcile::worst_chain_info(&responses) {
            Some(worst) => {
                debug!(
                    height = worst.blocks,
                    hash = %worst.best_block_hash,
                    replicas = attempted,
                    "Selected worst chain view"
                );
                Ok(worst)
            }
            None => Err(Self::all_failed(OPERATION, attempted, last_error)),
        }
    }

    async fn any_network_info(&self) -> Result<RpcNetworkInfo, FanOutError> {
        const OPERATION: &str = "getnetworkinfo";

        let clients = self.clients();
        if clients.is_empty() {
            return Err(FanOutError::NoNodesAvailable {
                operation: OPERATION,
            });
        }

        let attempted = clients.len();
        let results = fan_out(&clients, |c| async move { c.get_network_info().await }).await;
        let (successes, last_error) = absorb_failures(OPERATION, results);

        match successes.into_iter().next() {
            Some((node, info)) => {
                debug!(node = %node, "Using network info from first responding replica");
                Ok(info)
            }
            None => Err(Self::all_failed(OPERATION, attempted, last_error)),
        }
    }

    async fn send_raw_transactions(
        &self,
        batch: &[SubmitTx],
    ) -> Result<SendReconciliation, FanOutError> {
        const OPERATION: &str = "sendrawtransactions";

        let clients = self.clients();
        if clients.is_empty() {
            return Err(FanOutError::NoNodesAvailable {
                operation: OPERATION,
            });
        }

        let attempted = clients.len();
        let results = fan_out(&clients, |c| async move {
            c.send_raw_transactions(batch).await
        })
        .await;
        let (successes, last_error) = absorb_failures(OPERATION, results);

        if successes.is_empty() {
            return Err(Self::all_failed(OPERATION, attempted, last_error));
        }

        let responses: Vec<_> = successes.into_iter().map(|(_, r)| r).collect();
        let merged = reconcile::merge_send_results(
            batch.iter().map(|tx| tx.txid.as_str()),
            &responses,
        );

        debug!(
            txs = batch.len(),
            responding = responses.len(),
            invalid = merged.invalid.len(),
            "Merged broadcast verdicts"
        );
        Ok(merged)
    }

    async fn get_raw_transaction(&self, txid: &str) -> RawTxQueryResult {
        const OPERATION: &str = "getrawtransaction";

        let clients = self.clients();
        let results = fan_out(&clients, |c| async move { c.get_raw_transaction(txid).await }).await;
        let (successes, _) = absorb_failures(OPERATION, results);

        let responses: Vec<_> = successes.into_iter().map(|(_, r)| r).collect();
        reconcile::reconcile_raw_transactions(responses)
    }
}
