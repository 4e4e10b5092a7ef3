//! # Gateway RPC - Multi-Node Fan-Out and Reconciliation
//!
//! Issues the same logical call to every configured full-node replica and
//! collapses the disagreeing answers into one coherent result. No single
//! replica is authoritative: replicas lag, disagree, and fail, so every
//! operation pairs a parallel fan-out with an operation-specific merge
//! policy.
//!
//! ## Merge Policies
//!
//! | Operation | Policy |
//! |-----------|--------|
//! | `worst_chain_info` | lowest reported height wins (conservative view) |
//! | `any_network_info` | first successful response in node order |
//! | `send_raw_transactions` | per-tx verdict merge; disagreement ⇒ "Mixed results" |
//! | `get_raw_transaction` | unanimous block hash or `(None, false)` |
//!
//! ## Module Structure
//!
//! ```text
//! gateway-rpc/
//! ├── client.rs        # Per-replica RpcClient port + factory + NodeSource
//! ├── responses.rs     # Wire response models
//! ├── fanout.rs        # Generic parallel-map primitive
//! ├── reconcile.rs     # Pure reduction policies over fan-out results
//! ├── multi_client.rs  # MultiRpc trait + MultiRpcClient
//! ├── http.rs          # jsonrpsee HTTP adapter
//! └── testing.rs       # Mock client/factory for tests
//! ```
//!
//! Individual replica failures are absorbed and logged here; callers only
//! ever see [`FanOutError`] when every replica failed, which is a retryable
//! infrastructure condition, not a reconciliation disagreement.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod error;
pub mod fanout;
pub mod http;
pub mod multi_client;
pub mod reconcile;
pub mod responses;
pub mod testing;

// Re-export main types
pub use client::{NodeSource, RpcClient, RpcClientFactory, SubmitTx};
pub use error::{FanOutError, RpcError};
pub use fanout::fan_out;
pub use http::{HttpRpcClient, HttpRpcClientFactory, HttpRpcOptions};
pub use multi_client::{MultiRpc, MultiRpcClient};
pub use reconcile::{
    merge_send_results, reconcile_raw_transactions, worst_chain_info, InvalidTx,
    RawTxQueryResult, SendReconciliation, MIXED_RESULTS,
};
pub use responses::{
    RpcActiveZmqNotification, RpcBlockchainInfo, RpcInvalidTx, RpcNetworkInfo, RpcRawTransaction,
    RpcSendTransactions, RpcUnconfirmedTx,
};
