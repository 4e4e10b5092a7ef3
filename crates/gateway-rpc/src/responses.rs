//! # Wire Response Models
//!
//! Typed views of the per-replica JSON-RPC responses, restricted to the
//! fields the gateway actually consumes.

use serde::{Deserialize, Serialize};

/// Response to `getblockchaininfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcBlockchainInfo {
    /// Hash of the node's current best block.
    #[serde(rename = "bestblockhash")]
    pub best_block_hash: String,
    /// The node's current block height.
    pub blocks: u64,
}

/// Response to `getnetworkinfo`, restricted to consolidation policy fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcNetworkInfo {
    /// Whether the node accepts non-standard inputs in consolidation txs.
    #[serde(rename = "acceptnonstdconsolidationinput", default)]
    pub accept_non_std_consolidation_input: bool,
    /// Maximum input script size the node accepts in consolidation txs.
    #[serde(rename = "maxconsolidationinputscriptsize", default)]
    pub max_consolidation_input_script_size: u64,
}

/// One active ZMQ notification feed, as reported by
/// `activezmqnotifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcActiveZmqNotification {
    /// Feed endpoint address (e.g. `tcp://host:28332`).
    pub address: String,
    /// Topic published on that address (e.g. `pubhashblock`).
    pub notification: String,
}

/// One invalid transaction entry in a `sendrawtransactions` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcInvalidTx {
    /// The rejected transaction id.
    pub txid: String,
    /// Node-supplied rejection reason, if any.
    #[serde(rename = "reject_reason", default)]
    pub reject_reason: Option<String>,
    /// Node-supplied rejection code, if any.
    #[serde(rename = "reject_code", default)]
    pub reject_code: Option<i32>,
}

/// One unconfirmed transaction entry in a `sendrawtransactions` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcUnconfirmedTx {
    /// The transaction id with unconfirmed ancestors.
    pub txid: String,
}

/// Response to `sendrawtransactions`.
///
/// An empty response means every submitted transaction was accepted; a
/// transaction id appears in at most one of the lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RpcSendTransactions {
    /// Transactions the node already knew.
    #[serde(default)]
    pub known: Vec<String>,
    /// Transactions evicted from the node's mempool.
    #[serde(default)]
    pub evicted: Vec<String>,
    /// Transactions the node rejected.
    #[serde(default)]
    pub invalid: Vec<RpcInvalidTx>,
    /// Accepted transactions with unconfirmed ancestors.
    #[serde(default)]
    pub unconfirmed: Vec<RpcUnconfirmedTx>,
}

/// Response to `getrawtransaction` (verbose form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcRawTransaction {
    /// The transaction id.
    pub txid: String,
    /// Hash of the block containing the transaction; `None` while the
    /// transaction is unconfirmed.
    #[serde(default)]
    pub blockhash: Option<String>,
    /// Raw transaction hex.
    #[serde(default)]
    pub hex: Option<String>,
}
