//! # Gateway Chain - Chain-Info Cache
//!
//! Serves a recent [`gateway_types::ChainInfoSnapshot`] cheaply: the cache
//! refreshes only when empty, older than the TTL, or invalidated by a
//! `NewBlockDiscovered` event, and never runs two refreshes concurrently.
//! Invalidation is lazy - the notification only marks the cache maximally
//! stale, and the next read pays the refresh cost - which avoids refresh
//! storms when many replicas announce the same block in quick succession.
//!
//! The cache is an explicit object owning its own lock and clock, built
//! once per process and handed to consumers by reference.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod cache;
pub mod worker;

// Re-export main types
pub use cache::{ChainInfoCache, ChainInfoError, REFRESH_INTERVAL_SECS};
pub use worker::start_invalidation_worker;
