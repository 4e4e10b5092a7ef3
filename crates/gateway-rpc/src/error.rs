//! # RPC Errors
//!
//! Per-replica call failures ([`RpcError`]) are absorbed inside the fan-out
//! layer and logged; only the fan-out-level conditions ([`FanOutError`])
//! reach callers.

use thiserror::Error;

/// Failure of one RPC call against one replica.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The call failed at the transport level or was rejected by the node.
    #[error("rpc call {method} to {node} failed: {message}")]
    Call {
        /// Node identifier (`host:port`).
        node: String,
        /// RPC method name.
        method: &'static str,
        /// Failure description.
        message: String,
    },

    /// The call did not complete within the transport's request timeout.
    #[error("rpc call {method} to {node} timed out")]
    Timeout {
        /// Node identifier (`host:port`).
        node: String,
        /// RPC method name.
        method: &'static str,
    },

    /// The node answered with something that could not be decoded.
    #[error("malformed {method} response from {node}: {message}")]
    Malformed {
        /// Node identifier (`host:port`).
        node: String,
        /// RPC method name.
        method: &'static str,
        /// Decode failure description.
        message: String,
    },
}

/// Failure of a whole fan-out operation.
///
/// Retryable infrastructure conditions, deliberately distinct from
/// reconciliation disagreement (which is a result value, never an error).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FanOutError {
    /// The registry holds no connected nodes to dispatch to.
    #[error("no connected nodes available for {operation}")]
    NoNodesAvailable {
        /// The logical operation that was attempted.
        operation: &'static str,
    },

    /// Every dispatched call failed; no replica produced an answer.
    #[error("all {attempted} nodes failed for {operation}; last error: {last_error}")]
    AllNodesFailed {
        /// The logical operation that was attempted.
        operation: &'static str,
        /// How many replicas were dispatched to.
        attempted: usize,
        /// The last per-replica error observed.
        last_error: String,
    },
}
