//! # Test Doubles
//!
//! Mock RPC client/factory and a static node source, published for use by
//! dependent crates' tests as well as this crate's own.
//!
//! Responses are keyed by `"host:method"`; a node can be "disconnected" so
//! that every call against it fails, and per-method call counts are
//! recorded for coalescing assertions.

use crate::client::{NodeSource, RpcClient, RpcClientFactory, SubmitTx};
use crate::error::RpcError;
use crate::responses::{
    RpcActiveZmqNotification, RpcBlockchainInfo, RpcNetworkInfo, RpcRawTransaction,
    RpcSendTransactions,
};
use async_trait::async_trait;
use gateway_types::{Node, NodeStatus};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct MockState {
    /// Predefined responses keyed by `"host:method"`.
    responses: RwLock<HashMap<String, Result<serde_json::Value, String>>>,
    /// Hosts whose every call fails.
    disconnected: RwLock<HashSet<String>>,
    /// Calls observed, keyed by `"host:method"`.
    calls: RwLock<HashMap<String, usize>>,
}

/// Factory producing [`MockRpcClient`]s that share one response table.
#[derive(Clone, Default)]
pub struct MockRpcClientFactory {
    state: Arc<MockState>,
}

impl MockRpcClientFactory {
    /// Create a factory with an empty response table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Predefine a successful response for `host`/`method`.
    pub fn set_response(&self, host: &str, method: &str, value: serde_json::Value) {
        if let Ok(mut responses) = self.state.responses.write() {
            responses.insert(format!("{host}:{method}"), Ok(value));
        }
    }

    /// Predefine a failing response for `host`/`method`.
    pub fn set_error(&self, host: &str, method: &str, message: &str) {
        if let Ok(mut responses) = self.state.responses.write() {
            responses.insert(format!("{host}:{method}"), Err(message.to_string()));
        }
    }

    /// Make every call against `host` fail.
    pub fn disconnect_node(&self, host: &str) {
        if let Ok(mut disconnected) = self.state.disconnected.write() {
            disconnected.insert(host.to_string());
        }
    }

    /// Number of calls observed for `host`/`method`.
    #[must_use]
    pub fn call_count(&self, host: &str, method: &str) -> usize {
        self.state
            .calls
            .read()
            .ok()
            .and_then(|calls| calls.get(&format!("{host}:{method}")).copied())
            .unwrap_or(0)
    }
}

impl RpcClientFactory for MockRpcClientFactory {
    fn create(&self, node: &Node) -> Result<Arc<dyn RpcClient>, RpcError> {
        Ok(Arc::new(MockRpcClient {
            node_id: node.id(),
            host: node.host.clone(),
            state: Arc::clone(&self.state),
        }))
    }
}

/// Mock client answering from the factory's response table.
pub struct MockRpcClient {
    node_id: String,
    host: String,
    state: Arc<MockState>,
}

impl MockRpcClient {
    /// Look up the predefined response for `method`. `Ok(None)` means no
    /// response was configured; each method applies its own default.
    fn lookup<T: DeserializeOwned>(&self, method: &'static str) -> Result<Option<T>, RpcError> {
        if let Ok(mut calls) = self.state.calls.write() {
            *calls.entry(format!("{}:{method}", self.host)).or_insert(0) += 1;
        }

        let disconnected = self
            .state
            .disconnected
            .read()
            .map(|d| d.contains(&self.host))
            .unwrap_or(false);
        if disconnected {
            return Err(RpcError::Call {
                node: self.node_id.clone(),
                method,
                message: "node is disconnected".to_string(),
            });
        }

        let predefined = self
            .state
            .responses
            .read()
            .ok()
            .and_then(|responses| responses.get(&format!("{}:{method}", self.host)).cloned());

        match predefined {
            Some(Ok(value)) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| RpcError::Malformed {
                    node: self.node_id.clone(),
                    method,
                    message: e.to_string(),
                }),
            Some(Err(message)) => Err(RpcError::Call {
                node: self.node_id.clone(),
                method,
                message,
            }),
            None => Ok(None),
        }
    }

    fn missing(&self, method: &'static str) -> RpcError {
        RpcError::Call {
            node: self.node_id.clone(),
            method,
            message: "no mock response configured".to_string(),
        }
    }
}

#[async_trait]
impl RpcClient for MockRpcClient {
    fn node_id(&self) -> &str {
        &self.node_id
    }

    async fn get_block_count(&self) -> Result<u64, RpcError> {
        // Default: probe succeeds
        Ok(self.lookup("getblockcount")?.unwrap_or(0))
    }

    async fn get_blockchain_info(&self) -> Result<RpcBlockchainInfo, RpcError> {
        self.lookup("getblockchaininfo")?
            .ok_or_else(|| self.missing("getblockchaininfo"))
    }

    async fn get_network_info(&self) -> Result<RpcNetworkInfo, RpcError> {
        self.lookup("getnetworkinfo")?
            .ok_or_else(|| self.missing("getnetworkinfo"))
    }

    async fn active_zmq_notifications(&self) -> Result<Vec<RpcActiveZmqNotification>, RpcError> {
        // Default: all required topics on one endpoint
        Ok(self
            .lookup("activezmqnotifications")?
            .unwrap_or_else(|| {
                ["pubhashblock", "pubinvalidtx", "pubdiscardedfrommempool"]
                    .into_iter()
                    .map(|topic| RpcActiveZmqNotification {
                        address: format!("tcp://{}:28332", self.host),
                        notification: topic.to_string(),
                    })
                    .collect()
            }))
    }

    async fn send_raw_transactions(
        &self,
        _batch: &[SubmitTx],
    ) -> Result<RpcSendTransactions, RpcError> {
        // Default: empty response, everything accepted
        Ok(self
            .lookup("sendrawtransactions")?
            .unwrap_or_default())
    }

    async fn get_raw_transaction(&self, _txid: &str) -> Result<RpcRawTransaction, RpcError> {
        self.lookup("getrawtransaction")?
            .ok_or_else(|| self.missing("getrawtransaction"))
    }
}

/// Fixed node list for tests; only `Connected` nodes are handed out.
pub struct StaticNodeSource {
    nodes: Vec<Node>,
}

impl StaticNodeSource {
    /// Use the given nodes as the registry snapshot.
    #[must_use]
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// `count` connected replicas named `replica{i}` on port `1000 + i`.
    #[must_use]
    pub fn replicas(count: usize) -> Self {
        let nodes = (0..count)
            .map(|i| Node::new(format!("replica{i}"), 1000 + i as u16, "user", "pass", None))
            .collect();
        Self { nodes }
    }
}

impl NodeSource for StaticNodeSource {
    fn connected_nodes(&self) -> Vec<Node> {
        self.nodes
            .iter()
            .filter(|n| n.status == NodeStatus::Connected)
            .cloned()
            .collect()
    }
}
