//! # Chain State Snapshot
//!
//! The reconciled view of chain state served by the chain-info cache.
//! The snapshot is the "worst" (least-advanced) view across the queried
//! replicas: any fact true of the worst-informed replica is true
//! network-wide, which makes the snapshot safe to act on.

use serde::{Deserialize, Serialize};

/// Consolidation-transaction policy parameters, taken from whichever
/// replica answered the network-info call first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationParams {
    /// Whether non-standard inputs are accepted in consolidation txs.
    pub accept_non_std_input: bool,
    /// Maximum input script size accepted in consolidation txs.
    pub max_input_script_size: u64,
}

/// Immutable snapshot of aggregated chain state.
///
/// Replaced atomically by the cache on refresh; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfoSnapshot {
    /// Best block hash reported by the least-advanced replica.
    pub best_block_hash: String,
    /// Minimum block height seen across queried replicas.
    pub block_height: u64,
    /// Consolidation policy parameters.
    pub consolidation: ConsolidationParams,
}
