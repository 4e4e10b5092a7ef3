//! # Reconciliation End-to-End
//!
//! Drives the fan-out client through a real `NodeRegistry` acting as the
//! node source: nodes are created through the validation gate, then the
//! reconciliation operations read the registry's snapshot per call.

#[cfg(test)]
mod tests {
    use gateway_bus::InMemoryEventBus;
    use gateway_nodes::{InMemoryNodeRepository, MockEndpointChecker, NodeRegistry};
    use gateway_rpc::testing::MockRpcClientFactory;
    use gateway_rpc::{MultiRpc, MultiRpcClient, SubmitTx, MIXED_RESULTS};
    use gateway_types::{Node, SystemClock};
    use serde_json::json;
    use std::sync::Arc;

    struct Gateway {
        registry: Arc<NodeRegistry>,
        multi_rpc: MultiRpcClient,
        factory: MockRpcClientFactory,
    }

    fn gateway() -> Gateway {
        let factory = MockRpcClientFactory::new();
        let registry = Arc::new(NodeRegistry::new(
            Arc::new(InMemoryNodeRepository::new()),
            Arc::new(factory.clone()),
            Arc::new(InMemoryEventBus::new()),
            Arc::new(MockEndpointChecker::new()),
            Arc::new(SystemClock),
        ));
        let multi_rpc = MultiRpcClient::new(registry.clone(), Arc::new(factory.clone()));
        Gateway {
            registry,
            multi_rpc,
            factory,
        }
    }

    async fn register_replicas(gw: &Gateway, count: u16) {
        for i in 0..count {
            gw.registry
                .create(Node::new(format!("replica{i}"), 8332 + i, "user", "pass", None))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_worst_view_across_two_replicas() {
        let gw = gateway();
        register_replicas(&gw, 2).await;

        // replica0 lags at height 100; replica1 is at 101
        gw.factory.set_response(
            "replica0",
            "getblockchaininfo",
            json!({"bestblockhash": "older", "blocks": 100}),
        );
        gw.factory.set_response(
            "replica1",
            "getblockchaininfo",
            json!({"bestblockhash": "newer", "blocks": 101}),
        );

        let info = gw.multi_rpc.worst_chain_info().await.unwrap();
        assert_eq!(info.blocks, 100);
        assert_eq!(info.best_block_hash, "older");
    }

    #[tokio::test]
    async fn test_deleted_node_leaves_fan_out() {
        let gw = gateway();
        register_replicas(&gw, 2).await;

        gw.factory.set_response(
            "replica0",
            "getblockchaininfo",
            json!({"bestblockhash": "older", "blocks": 100}),
        );
        gw.factory.set_response(
            "replica1",
            "getblockchaininfo",
            json!({"bestblockhash": "newer", "blocks": 101}),
        );

        // Once the lagging replica is removed, the "worst" view advances
        gw.registry.delete("replica0:8332").await;
        let info = gw.multi_rpc.worst_chain_info().await.unwrap();
        assert_eq!(info.best_block_hash, "newer");
        assert_eq!(gw.factory.call_count("replica0", "getblockchaininfo"), 0);
    }

    #[tokio::test]
    async fn test_broadcast_mixed_verdict_through_registry() {
        let gw = gateway();
        register_replicas(&gw, 2).await;

        gw.factory.set_response(
            "replica0",
            "sendrawtransactions",
            json!({"known": ["tx1"]}),
        );
        gw.factory.set_response(
            "replica1",
            "sendrawtransactions",
            json!({"evicted": ["tx1"]}),
        );

        let merged = gw
            .multi_rpc
            .send_raw_transactions(&[SubmitTx::new("tx1", vec![0x01])])
            .await
            .unwrap();

        assert_eq!(merged.invalid.len(), 1);
        assert_eq!(merged.invalid[0].reject_reason.as_deref(), Some(MIXED_RESULTS));
        assert_eq!(merged.invalid[0].reject_code, None);
    }

    #[tokio::test]
    async fn test_broadcast_all_accepted_is_idempotent_shape() {
        let gw = gateway();
        register_replicas(&gw, 2).await;

        // Empty responses mean acceptance everywhere
        gw.factory
            .set_response("replica0", "sendrawtransactions", json!({}));
        gw.factory
            .set_response("replica1", "sendrawtransactions", json!({}));

        let batch: Vec<SubmitTx> = (0..5)
            .map(|i| SubmitTx::new(format!("tx{i}"), vec![i as u8]))
            .collect();
        let merged = gw.multi_rpc.send_raw_transactions(&batch).await.unwrap();
        assert!(merged.all_accepted());
    }

    #[tokio::test]
    async fn test_raw_transaction_query_through_registry() {
        let gw = gateway();
        register_replicas(&gw, 2).await;

        gw.factory.set_response(
            "replica0",
            "getrawtransaction",
            json!({"txid": "tx1", "blockhash": "b1"}),
        );
        gw.factory.set_response(
            "replica1",
            "getrawtransaction",
            json!({"txid": "tx1", "blockhash": "b2"}),
        );

        // Replicas disagree on the containing block: indeterminate
        let result = gw.multi_rpc.get_raw_transaction("tx1").await;
        assert!(!result.all_replicas_agree);
        assert!(result.transaction.is_none());
    }
}
