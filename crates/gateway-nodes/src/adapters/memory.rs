//! # In-Memory Node Repository
//!
//! Default repository adapter: a lock-guarded ordered map keyed by
//! `"host:port"`. Iteration order is the key order, which keeps the
//! replica list stable across fan-out calls.

use crate::ports::NodeRepository;
use gateway_types::Node;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Thread-safe in-memory node store.
#[derive(Default)]
pub struct InMemoryNodeRepository {
    nodes: RwLock<BTreeMap<String, Node>>,
}

impl InMemoryNodeRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeRepository for InMemoryNodeRepository {
    fn create(&self, node: Node) -> Option<Node> {
        let mut nodes = self.nodes.write();
        if nodes.contains_key(&node.id()) {
            return None;
        }
        nodes.insert(node.id(), node.clone());
        Some(node)
    }

    fn update(&self, node: Node) -> bool {
        let mut nodes = self.nodes.write();
        match nodes.get_mut(&node.id()) {
            Some(existing) => {
                *existing = node;
                true
            }
            None => false,
        }
    }

    fn get(&self, id: &str) -> Option<Node> {
        self.nodes.read().get(id).cloned()
    }

    fn list(&self) -> Vec<Node> {
        self.nodes.read().values().cloned().collect()
    }

    fn delete(&self, id: &str) -> usize {
        usize::from(self.nodes.write().remove(id).is_some())
    }

    fn zmq_endpoint_exists(&self, excluding_id: &str, endpoint: &str) -> bool {
        self.nodes.read().values().any(|node| {
            node.id() != excluding_id
                && node.zmq_notifications_endpoint.as_deref() == Some(endpoint)
        })
    }
}
