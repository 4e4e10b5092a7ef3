//! # Registry Errors

use thiserror::Error;

/// Errors from node registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The node failed validation; nothing was stored. The message is
    /// user-visible and may span multiple lines, one per distinct failing
    /// endpoint.
    #[error("{0}")]
    Rejected(String),

    /// A node with the same `host:port` identity is already registered.
    #[error("node {0} already exists")]
    AlreadyExists(String),
}
