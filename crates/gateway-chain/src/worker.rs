//! # Cache Invalidation Worker
//!
//! Subscribes the chain-info cache to block notifications. Every
//! `NewBlockDiscovered` event marks the cache stale; the refresh itself
//! happens on the next read. No missed-event replay is needed because
//! staleness is re-evaluated lazily anyway.

use crate::cache::ChainInfoCache;
use async_trait::async_trait;
use gateway_bus::{
    spawn_worker, DomainEvent, EventFilter, EventTopic, EventWorker, InMemoryEventBus,
    WorkerError, WorkerHandle,
};
use std::sync::Arc;

#[async_trait]
impl EventWorker for ChainInfoCache {
    fn name(&self) -> &'static str {
        "chain-info-cache"
    }

    fn filter(&self) -> EventFilter {
        EventFilter::topics(vec![EventTopic::Blocks])
    }

    async fn handle_event(&self, event: DomainEvent) -> Result<(), WorkerError> {
        if matches!(event, DomainEvent::NewBlockDiscovered { .. }) {
            self.invalidate().await;
        }
        Ok(())
    }
}

/// Subscribe `cache` to block notifications on `bus`.
pub fn start_invalidation_worker(
    cache: Arc<ChainInfoCache>,
    bus: Arc<InMemoryEventBus>,
) -> WorkerHandle {
    spawn_worker(cache, bus)
}
