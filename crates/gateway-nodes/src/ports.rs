//! # Outbound Ports
//!
//! Traits for the registry's external dependencies: the node persistence
//! store and the transport-level endpoint reachability checker.

use gateway_types::Node;
use std::collections::HashSet;
use std::sync::RwLock;

/// Node persistence store.
///
/// The registry is the only writer; the uniqueness check reads the store
/// at validation time and is not atomic with the subsequent write.
pub trait NodeRepository: Send + Sync {
    /// Store a new node. Returns `None` when a node with the same id
    /// already exists.
    fn create(&self, node: Node) -> Option<Node>;

    /// Replace an existing node. Returns `false` when the id is unknown.
    fn update(&self, node: Node) -> bool;

    /// Fetch a node by `"host:port"` id.
    fn get(&self, id: &str) -> Option<Node>;

    /// All nodes, in stable iteration order.
    fn list(&self) -> Vec<Node>;

    /// Remove a node by id. Returns the number of removed rows (0 or 1).
    fn delete(&self, id: &str) -> usize;

    /// True when any node other than `excluding_id` declares `endpoint`.
    fn zmq_endpoint_exists(&self, excluding_id: &str, endpoint: &str) -> bool;
}

/// Transport-level reachability check for notification endpoints.
pub trait ZmqEndpointChecker: Send + Sync {
    /// True when the endpoint accepts a connection.
    fn is_reachable(&self, endpoint: &str) -> bool;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock endpoint checker: everything is reachable unless marked otherwise.
#[derive(Default)]
pub struct MockEndpointChecker {
    unreachable: RwLock<HashSet<String>>,
}

impl MockEndpointChecker {
    /// Create a checker that reports every endpoint reachable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `endpoint` report unreachable.
    pub fn mark_unreachable(&self, endpoint: &str) {
        if let Ok(mut unreachable) = self.unreachable.write() {
            unreachable.insert(endpoint.to_string());
        }
    }
}

impl ZmqEndpointChecker for MockEndpointChecker {
    fn is_reachable(&self, endpoint: &str) -> bool {
        self.unreachable
            .read()
            .map(|u| !u.contains(endpoint))
            .unwrap_or(true)
    }
}
