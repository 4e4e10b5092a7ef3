//! # Per-Replica Client Port
//!
//! The `RpcClient` trait is the outbound port one replica is driven
//! through; `RpcClientFactory` builds a client from a node's connection
//! parameters, and `NodeSource` supplies the current replica list to the
//! fan-out engine.

use crate::error::RpcError;
use crate::responses::{
    RpcActiveZmqNotification, RpcBlockchainInfo, RpcNetworkInfo, RpcRawTransaction,
    RpcSendTransactions,
};
use async_trait::async_trait;
use gateway_types::Node;
use std::sync::Arc;

/// One raw transaction queued for broadcast, with its id precomputed by the
/// caller (this core never parses transaction payloads).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTx {
    /// Transaction id of `raw`.
    pub txid: String,
    /// Raw transaction bytes.
    pub raw: Vec<u8>,
    /// Forwarded to the node: accept fees above the node's maximum.
    pub allow_high_fees: bool,
    /// Forwarded to the node: skip fee checks entirely.
    pub dont_check_fee: bool,
    /// Forwarded to the node: list unconfirmed ancestors in the response.
    pub list_unconfirmed_ancestors: bool,
}

impl SubmitTx {
    /// Create a submission with all forwarding flags disabled.
    pub fn new(txid: impl Into<String>, raw: Vec<u8>) -> Self {
        Self {
            txid: txid.into(),
            raw,
            allow_high_fees: false,
            dont_check_fee: false,
            list_unconfirmed_ancestors: false,
        }
    }
}

/// RPC connection to a single full-node replica.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Node identifier (`host:port`), for logging and result pairing.
    fn node_id(&self) -> &str;

    /// `getblockcount` - cheap connectivity probe.
    async fn get_block_count(&self) -> Result<u64, RpcError>;

    /// `getblockchaininfo`.
    async fn get_blockchain_info(&self) -> Result<RpcBlockchainInfo, RpcError>;

    /// `getnetworkinfo`.
    async fn get_network_info(&self) -> Result<RpcNetworkInfo, RpcError>;

    /// `activezmqnotifications` - lists the node's active notification
    /// feeds.
    async fn active_zmq_notifications(&self) -> Result<Vec<RpcActiveZmqNotification>, RpcError>;

    /// `sendrawtransactions` - submit a batch of raw transactions.
    async fn send_raw_transactions(
        &self,
        batch: &[SubmitTx],
    ) -> Result<RpcSendTransactions, RpcError>;

    /// `getrawtransaction` (verbose).
    async fn get_raw_transaction(&self, txid: &str) -> Result<RpcRawTransaction, RpcError>;
}

/// Builds an [`RpcClient`] from a node's connection parameters.
pub trait RpcClientFactory: Send + Sync {
    /// Create a client for the given node.
    fn create(&self, node: &Node) -> Result<Arc<dyn RpcClient>, RpcError>;
}

/// Supplies the current replica list to the fan-out engine.
///
/// Implemented by the node registry. The fan-out engine takes a fresh
/// snapshot on every call and never mutates the set.
pub trait NodeSource: Send + Sync {
    /// Nodes currently flagged `Connected`, in registry iteration order.
    fn connected_nodes(&self) -> Vec<Node>;
}
