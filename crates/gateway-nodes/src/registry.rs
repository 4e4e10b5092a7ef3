//! # Node Registry
//!
//! CRUD over node configuration with the mandatory validation gate in
//! front of every write. Validation failures never mutate stored state and
//! carry the complete picture of what is wrong, so operators can fix a
//! node's configuration in one pass.

use crate::error::RegistryError;
use crate::ports::{NodeRepository, ZmqEndpointChecker};
use crate::REQUIRED_ZMQ_TOPICS;
use gateway_bus::{DomainEvent, EventPublisher};
use gateway_rpc::{NodeSource, RpcActiveZmqNotification, RpcClientFactory};
use gateway_types::{Clock, Node, NodeStatus};
use std::sync::Arc;
use tracing::{info, warn};

/// The node registry service.
pub struct NodeRegistry {
    repository: Arc<dyn NodeRepository>,
    factory: Arc<dyn RpcClientFactory>,
    bus: Arc<dyn EventPublisher>,
    endpoint_checker: Arc<dyn ZmqEndpointChecker>,
    clock: Arc<dyn Clock>,
}

impl NodeRegistry {
    /// Create a registry over the given collaborators.
    pub fn new(
        repository: Arc<dyn NodeRepository>,
        factory: Arc<dyn RpcClientFactory>,
        bus: Arc<dyn EventPublisher>,
        endpoint_checker: Arc<dyn ZmqEndpointChecker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            factory,
            bus,
            endpoint_checker,
            clock,
        }
    }

    /// Validate and store a new node, publishing `NodeAdded` on success.
    pub async fn create(&self, node: Node) -> Result<Node, RegistryError> {
        info!(node = %node, "Adding node");

        self.validate(&node, "added").await?;

        let created = self
            .repository
            .create(node.clone())
            .ok_or_else(|| RegistryError::AlreadyExists(node.id()))?;

        self.bus
            .publish(DomainEvent::NodeAdded {
                created_at: self.clock.now(),
                node: created.clone(),
            })
            .await;

        Ok(created)
    }

    /// Re-validate and replace an existing node. Returns `false` when the
    /// node is unknown.
    pub async fn update(&self, node: Node) -> Result<bool, RegistryError> {
        info!(node = %node, "Updating node");

        self.validate(&node, "updated").await?;

        Ok(self.repository.update(node))
    }

    /// Fetch a node by `"host:port"` id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Node> {
        self.repository.get(id)
    }

    /// All registered nodes.
    #[must_use]
    pub fn list(&self) -> Vec<Node> {
        self.repository.list()
    }

    /// Remove a node, publishing `NodeDeleted` if it existed. Returns the
    /// number of removed rows; an absent node is a no-op, not an error.
    pub async fn delete(&self, id: &str) -> usize {
        info!(id, "Removing node");

        if let Some(node) = self.repository.get(id) {
            self.bus
                .publish(DomainEvent::NodeDeleted {
                    created_at: self.clock.now(),
                    node,
                })
                .await;
        }

        self.repository.delete(id)
    }

    async fn validate(&self, node: &Node, action: &str) -> Result<(), RegistryError> {
        let cannot_connect = || {
            RegistryError::Rejected(format!(
                "The node was not {action}. Unable to connect to node {}:{}.",
                node.host, node.port
            ))
        };

        // Cheap read-only call to test the connectivity parameters
        let client = self.factory.create(node).map_err(|e| {
            warn!(node = %node, error = %e, "Could not build client for validation");
            cannot_connect()
        })?;

        if let Err(e) = client.get_block_count().await {
            warn!(node = %node, error = %e, "Connectivity probe failed");
            return Err(cannot_connect());
        }

        let notifications = client.active_zmq_notifications().await.map_err(|e| {
            warn!(node = %node, error = %e, "Capability probe failed");
            RegistryError::Rejected(format!(
                "Node at address '{}:{}' did not return a valid response to call 'activezmqnotifications'",
                node.host, node.port
            ))
        })?;

        let missing: Vec<&str> = REQUIRED_ZMQ_TOPICS
            .iter()
            .filter(|required| {
                !notifications
                    .iter()
                    .any(|n| n.notification == **required)
            })
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::Rejected(format!(
                "Node '{}:{}', does not have all required zmq notifications enabled. Missing notifications ({})",
                node.host,
                node.port,
                missing.join(",")
            )));
        }

        self.validate_zmq_endpoints(node, &notifications)
    }

    /// Check the declared endpoint for cross-node uniqueness and every
    /// endpoint surfaced by the capability probe for reachability. All
    /// violations are collected into one multi-line error rather than
    /// failing fast on the first.
    fn validate_zmq_endpoints(
        &self,
        node: &Node,
        notifications: &[RpcActiveZmqNotification],
    ) -> Result<(), RegistryError> {
        let mut errors: Vec<String> = Vec::new();

        if let Some(endpoint) = node
            .zmq_notifications_endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
        {
            if self.repository.zmq_endpoint_exists(&node.id(), endpoint) {
                errors.push(format!(
                    "The value {endpoint} of zmqNotificationsEndpoint field already exists on another node."
                ));
            } else if !self.endpoint_checker.is_reachable(endpoint) {
                errors.push(format!(
                    "ZmqNotificationsEndpoint: '{endpoint}' is unreachable."
                ));
            }
        }

        for (address, topics) in group_by_address(notifications) {
            if !self.endpoint_checker.is_reachable(&address) {
                errors.push(format!(
                    "Node's ZMQ notification for {}: '{}' is unreachable.",
                    topics.join(", "),
                    address
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Rejected(errors.join("\n")))
        }
    }
}

/// Group probed feeds by address, preserving first-seen order.
fn group_by_address(notifications: &[RpcActiveZmqNotification]) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for n in notifications {
        match grouped.iter_mut().find(|(address, _)| *address == n.address) {
            Some((_, topics)) => topics.push(n.notification.clone()),
            None => grouped.push((n.address.clone(), vec![n.notification.clone()])),
        }
    }
    grouped
}

impl NodeSource for NodeRegistry {
    fn connected_nodes(&self) -> Vec<Node> {
        self.repository
            .list()
            .into_iter()
            .filter(|n| n.status == NodeStatus::Connected)
            .collect()
    }
}
