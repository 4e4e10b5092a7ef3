//! # Gateway Bus - Event Bus for Background Consumers
//!
//! In-process publish/subscribe used to decouple the node registry, the
//! chain-info cache, and the external block-notification feed.
//!
//! ```text
//! ┌───────────────┐                      ┌─────────────────┐
//! │ Node Registry │                      │ Chain-Info Cache│
//! │               │     publish()        │                 │
//! │               │ ───────┐             │                 │
//! └───────────────┘        │             └─────────────────┘
//!                          ▼                      ↑
//!                    ┌───────────┐               │
//!                    │ Event Bus │ ──────────────┘
//!                    │           │   subscribe()
//!                    └───────────┘
//! ```
//!
//! A subscription is a handle that can be created, read from in delivery
//! order, and torn down. Long-lived consumers implement [`EventWorker`] and
//! are driven by [`spawn_worker`], which owns the
//! replay-then-subscribe-then-loop lifecycle and cooperative shutdown.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;
pub mod worker;

// Re-export main types
pub use events::{DomainEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};
pub use worker::{spawn_worker, EventWorker, WorkerError, WorkerHandle};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
