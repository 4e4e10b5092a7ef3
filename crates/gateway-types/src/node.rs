//! # Node Model
//!
//! A full-node replica the gateway forwards calls to. Replicas are
//! independently operated and never assumed to be synchronized with each
//! other; the registry owns the authoritative set and the fan-out client
//! only ever reads a snapshot of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connectivity status of a registered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Node passed validation and participates in fan-out calls.
    Connected,
    /// Node is flagged unreachable and is skipped by fan-out calls.
    Disconnected,
}

/// A full-node replica registered with the gateway.
///
/// Identity is the `(host, port)` pair, stringified as `"host:port"` by
/// [`Node::id`]. At most one node may hold a given non-empty
/// `zmq_notifications_endpoint`; the registry enforces this at validation
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// RPC host name or address.
    pub host: String,
    /// RPC port.
    pub port: u16,
    /// RPC username.
    pub username: String,
    /// RPC password.
    pub password: String,
    /// Operator-facing free-form note.
    pub remarks: Option<String>,
    /// Declared ZMQ notification endpoint, if any (e.g. `tcp://host:28332`).
    pub zmq_notifications_endpoint: Option<String>,
    /// Current connectivity status.
    pub status: NodeStatus,
    /// Last error observed while talking to this node.
    pub last_error: Option<String>,
    /// When `last_error` was recorded.
    pub last_error_at: Option<DateTime<Utc>>,
}

impl Node {
    /// Create a node with `Connected` status and no error history.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        zmq_notifications_endpoint: Option<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            remarks: None,
            zmq_notifications_endpoint,
            status: NodeStatus::Connected,
            last_error: None,
            last_error_at: None,
        }
    }

    /// Composite identifier, `"host:port"`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True when the node declares a non-empty ZMQ notification endpoint.
    #[must_use]
    pub fn has_zmq_endpoint(&self) -> bool {
        self.zmq_notifications_endpoint
            .as_deref()
            .is_some_and(|e| !e.is_empty())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
