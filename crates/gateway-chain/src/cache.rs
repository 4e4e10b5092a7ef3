//! # Chain-Info Cache
//!
//! Single-flight cached view of aggregated chain state. The refresh is the
//! only structurally serialized section in the gateway: one mutex guards
//! the cached snapshot for the duration of a refresh, so concurrent
//! readers coalesce onto a single pair of fan-out calls.

use chrono::{DateTime, Duration, Utc};
use gateway_rpc::{FanOutError, MultiRpc};
use gateway_types::{ChainInfoSnapshot, Clock, ConsolidationParams};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Refresh the snapshot after this many seconds even if no block
/// notification was received.
pub const REFRESH_INTERVAL_SECS: i64 = 60;

/// Errors from cache reads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainInfoError {
    /// The underlying fan-out calls failed; the cache state is unchanged
    /// and the next read retries.
    #[error("chain info refresh failed: {0}")]
    Refresh(#[from] FanOutError),
}

struct CacheState {
    snapshot: Option<ChainInfoSnapshot>,
    refreshed_at: DateTime<Utc>,
}

/// Single-flight chain-info cache.
pub struct ChainInfoCache {
    multi_rpc: Arc<dyn MultiRpc>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl ChainInfoCache {
    /// Create a cache with the default TTL.
    pub fn new(multi_rpc: Arc<dyn MultiRpc>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(multi_rpc, clock, Duration::seconds(REFRESH_INTERVAL_SECS))
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(multi_rpc: Arc<dyn MultiRpc>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        let refreshed_at = clock.now();
        Self {
            multi_rpc,
            clock,
            ttl,
            state: Mutex::new(CacheState {
                snapshot: None,
                refreshed_at,
            }),
        }
    }

    /// Return the cached snapshot, refreshing it first when empty or
    /// stale.
    ///
    /// All concurrent callers block on the same lock while a refresh is in
    /// flight and observe the single resulting snapshot. A failed refresh
    /// leaves the previous state untouched for the next attempt.
    pub async fn get_info(&self) -> Result<ChainInfoSnapshot, ChainInfoError> {
        let mut state = self.state.lock().await;

        if let Some(snapshot) = &state.snapshot {
            if self.clock.now() - state.refreshed_at <= self.ttl {
                return Ok(snapshot.clone());
            }
        }

        // Both calls are required; the read waits for both
        let (chain, network) = tokio::join!(
            self.multi_rpc.worst_chain_info(),
            self.multi_rpc.any_network_info()
        );
        let chain = chain?;
        let network = network?;

        let snapshot = ChainInfoSnapshot {
            best_block_hash: chain.best_block_hash,
            block_height: chain.blocks,
            consolidation: ConsolidationParams {
                accept_non_std_input: network.accept_non_std_consolidation_input,
                max_input_script_size: network.max_consolidation_input_script_size,
            },
        };

        debug!(
            height = snapshot.block_height,
            hash = %snapshot.best_block_hash,
            "Refreshed chain info snapshot"
        );

        state.snapshot = Some(snapshot.clone());
        state.refreshed_at = self.clock.now();

        Ok(snapshot)
    }

    /// Mark the cache maximally stale so the next read refreshes,
    /// regardless of elapsed time. Does not itself trigger a refresh.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.refreshed_at = DateTime::<Utc>::MIN_UTC;
        debug!("Chain info cache invalidated");
    }
}
