//! # Gateway Nodes - Replica Registry
//!
//! Owns the authoritative set of full-node replicas. Every write passes a
//! mandatory validation gate first:
//!
//! 1. connectivity probe (`getblockcount`);
//! 2. capability probe (`activezmqnotifications`);
//! 3. required-topic check ([`REQUIRED_ZMQ_TOPICS`]);
//! 4. ZMQ endpoint validation (uniqueness across nodes plus transport
//!    reachability, all violations collected into one message).
//!
//! Successful writes publish `NodeAdded`/`NodeDeleted` events for the
//! out-of-scope ZMQ re-subscription logic. The registry also implements
//! the fan-out engine's `NodeSource`, handing out a snapshot of the
//! currently connected replicas per call.
//!
//! ## Module Structure
//!
//! ```text
//! gateway-nodes/
//! ├── ports.rs      # NodeRepository + ZmqEndpointChecker ports (+ mock)
//! ├── registry.rs   # NodeRegistry service
//! ├── error.rs      # RegistryError
//! └── adapters/     # In-memory repository, TCP endpoint checker
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod error;
pub mod ports;
pub mod registry;

// Re-export main types
pub use adapters::{InMemoryNodeRepository, TcpEndpointChecker};
pub use error::RegistryError;
pub use ports::{MockEndpointChecker, NodeRepository, ZmqEndpointChecker};
pub use registry::NodeRegistry;

/// Notification topics every replica must have enabled to be accepted:
/// block-hash, invalid-transaction, and discarded-from-mempool feeds.
pub const REQUIRED_ZMQ_TOPICS: [&str; 3] =
    ["pubhashblock", "pubinvalidtx", "pubdiscardedfrommempool"];
