//! # Merchant Gateway Test Suite
//!
//! Unified test crate for cross-crate integration scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── reconciliation.rs  # Registry + fan-out client end-to-end
//!     ├── cache_flow.rs      # Bus-driven cache invalidation and coalescing
//!     └── registry_flow.rs   # Node lifecycle events through a live bus
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p gateway-tests
//!
//! # By scenario
//! cargo test -p gateway-tests integration::cache_flow
//! ```

pub mod integration;

/// Opt-in log capture for debugging test runs (`RUST_LOG=debug`).
pub fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
