//! # Integration Scenarios
//!
//! Cross-crate flows wiring the registry, fan-out client, cache, and event
//! bus together the way a running gateway does, with mock RPC clients
//! standing in for the replicas.

pub mod cache_flow;
pub mod reconciliation;
pub mod registry_flow;
