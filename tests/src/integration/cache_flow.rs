//! # Cache Flow
//!
//! The chain-info cache wired to the real fan-out client and the live
//! event bus: block notifications mark the cache stale, reads coalesce,
//! and the TTL drives periodic refresh.

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};
    use gateway_bus::{DomainEvent, EventPublisher, InMemoryEventBus};
    use gateway_chain::{start_invalidation_worker, ChainInfoCache};
    use gateway_rpc::testing::{MockRpcClientFactory, StaticNodeSource};
    use gateway_rpc::MultiRpcClient;
    use gateway_types::ManualClock;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    struct Fixture {
        factory: MockRpcClientFactory,
        clock: Arc<ManualClock>,
        cache: Arc<ChainInfoCache>,
        bus: Arc<InMemoryEventBus>,
    }

    fn fixture(replicas: usize) -> Fixture {
        let factory = MockRpcClientFactory::new();
        for i in 0..replicas {
            factory.set_response(
                &format!("replica{i}"),
                "getblockchaininfo",
                json!({"bestblockhash": "h100", "blocks": 100}),
            );
            factory.set_response(
                &format!("replica{i}"),
                "getnetworkinfo",
                json!({
                    "acceptnonstdconsolidationinput": false,
                    "maxconsolidationinputscriptsize": 500
                }),
            );
        }

        let multi_rpc = Arc::new(MultiRpcClient::new(
            Arc::new(StaticNodeSource::replicas(replicas)),
            Arc::new(factory.clone()),
        ));
        let clock = Arc::new(ManualClock::default());
        let cache = Arc::new(ChainInfoCache::new(multi_rpc, clock.clone()));
        let bus = Arc::new(InMemoryEventBus::new());

        Fixture {
            factory,
            clock,
            cache,
            bus,
        }
    }

    fn advance_chain(factory: &MockRpcClientFactory, replicas: usize, height: u64) {
        for i in 0..replicas {
            factory.set_response(
                &format!("replica{i}"),
                "getblockchaininfo",
                json!({"bestblockhash": format!("h{height}"), "blocks": height}),
            );
        }
    }

    #[tokio::test]
    async fn test_snapshot_combines_both_fan_out_calls() {
        let f = fixture(2);

        let snapshot = f.cache.get_info().await.unwrap();
        assert_eq!(snapshot.block_height, 100);
        assert_eq!(snapshot.consolidation.max_input_script_size, 500);
        assert!(!snapshot.consolidation.accept_non_std_input);
    }

    #[tokio::test]
    async fn test_ttl_expiry_refreshes_through_real_client() {
        let f = fixture(2);

        f.cache.get_info().await.unwrap();
        advance_chain(&f.factory, 2, 101);

        // Within TTL the old snapshot is served
        assert_eq!(f.cache.get_info().await.unwrap().block_height, 100);

        f.clock.advance(ChronoDuration::seconds(61));
        assert_eq!(f.cache.get_info().await.unwrap().block_height, 101);
    }

    #[tokio::test]
    async fn test_block_notification_invalidates_through_bus() {
        let f = fixture(2);

        let mut handle = start_invalidation_worker(f.cache.clone(), f.bus.clone());
        sleep(Duration::from_millis(20)).await;

        assert_eq!(f.cache.get_info().await.unwrap().block_height, 100);
        advance_chain(&f.factory, 2, 101);

        f.bus
            .publish(DomainEvent::NewBlockDiscovered {
                created_at: Utc::now(),
            })
            .await;

        timeout(Duration::from_secs(1), async {
            loop {
                if f.cache.get_info().await.unwrap().block_height == 101 {
                    break;
                }
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("block notification did not invalidate the cache");

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_repeated_notifications_invalidate_each_time() {
        // Every announcement marks the cache stale, even for the same block
        let f = fixture(1);

        let mut handle = start_invalidation_worker(f.cache.clone(), f.bus.clone());
        sleep(Duration::from_millis(20)).await;

        f.cache.get_info().await.unwrap();
        let calls_after_first = f.factory.call_count("replica0", "getblockchaininfo");

        for _ in 0..3 {
            f.bus
                .publish(DomainEvent::NewBlockDiscovered {
                    created_at: Utc::now(),
                })
                .await;
            sleep(Duration::from_millis(20)).await;
            f.cache.get_info().await.unwrap();
        }

        let calls_after_storm = f.factory.call_count("replica0", "getblockchaininfo");
        assert_eq!(calls_after_storm, calls_after_first + 3);

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_concurrent_cold_reads_share_one_refresh() {
        let f = fixture(2);
        let cache = f.cache.clone();

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_info().await.unwrap() })
            })
            .collect();

        let mut snapshots = Vec::new();
        for reader in readers {
            snapshots.push(reader.await.unwrap());
        }

        assert!(snapshots.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(f.factory.call_count("replica0", "getblockchaininfo"), 1);
        assert_eq!(f.factory.call_count("replica1", "getblockchaininfo"), 1);
    }
}
