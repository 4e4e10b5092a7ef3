//! # Registry Flow
//!
//! Node lifecycle events observed through a live bus, the way the
//! out-of-scope ZMQ re-subscription logic consumes them.

#[cfg(test)]
mod tests {
    use gateway_bus::{DomainEvent, EventFilter, EventTopic, InMemoryEventBus};
    use gateway_nodes::{InMemoryNodeRepository, MockEndpointChecker, NodeRegistry};
    use gateway_rpc::testing::MockRpcClientFactory;
    use gateway_types::{Node, SystemClock};
    use std::sync::Arc;

    struct Fixture {
        registry: NodeRegistry,
        factory: MockRpcClientFactory,
        bus: Arc<InMemoryEventBus>,
    }

    fn fixture() -> Fixture {
        let factory = MockRpcClientFactory::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let registry = NodeRegistry::new(
            Arc::new(InMemoryNodeRepository::new()),
            Arc::new(factory.clone()),
            bus.clone(),
            Arc::new(MockEndpointChecker::new()),
            Arc::new(SystemClock),
        );
        Fixture {
            registry,
            factory,
            bus,
        }
    }

    #[tokio::test]
    async fn test_lifecycle_events_arrive_in_order() {
        let f = fixture();
        let mut sub = f.bus.subscribe(EventFilter::topics(vec![EventTopic::Nodes]));

        f.registry
            .create(Node::new("replica0", 8332, "user", "pass", None))
            .await
            .unwrap();
        f.registry
            .create(Node::new("replica1", 8333, "user", "pass", None))
            .await
            .unwrap();
        f.registry.delete("replica0:8332").await;

        let first = sub.recv().await.unwrap();
        let second = sub.recv().await.unwrap();
        let third = sub.recv().await.unwrap();

        assert!(matches!(first, DomainEvent::NodeAdded { node, .. } if node.host == "replica0"));
        assert!(matches!(second, DomainEvent::NodeAdded { node, .. } if node.host == "replica1"));
        assert!(matches!(third, DomainEvent::NodeDeleted { node, .. } if node.host == "replica0"));
    }

    #[tokio::test]
    async fn test_rejected_create_publishes_nothing() {
        let f = fixture();
        let mut sub = f.bus.subscribe(EventFilter::all());

        f.factory
            .set_error("replica0", "getblockcount", "connection refused");
        let result = f
            .registry
            .create(Node::new("replica0", 8332, "user", "pass", None))
            .await;

        assert!(result.is_err());
        assert!(matches!(sub.try_recv(), Ok(None)));
        assert!(f.registry.list().is_empty());
    }

    #[tokio::test]
    async fn test_event_timestamps_are_populated() {
        let f = fixture();
        let mut sub = f.bus.subscribe(EventFilter::all());

        let before = chrono::Utc::now();
        f.registry
            .create(Node::new("replica0", 8332, "user", "pass", None))
            .await
            .unwrap();

        let event = sub.recv().await.unwrap();
        assert!(event.created_at() >= before);
    }
}
