//! # Domain Events
//!
//! Events that flow through the gateway's event bus. The registry produces
//! node lifecycle events; the external block-notification feed produces
//! `NewBlockDiscovered`. Ownership of an event ends once all current
//! subscribers have observed it; there is no replay across restarts.

use chrono::{DateTime, Utc};
use gateway_types::Node;
use serde::{Deserialize, Serialize};

/// All events that can be published to the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A replica announced a new best block. Carries no payload beyond the
    /// timestamp; consumers re-read chain state lazily.
    NewBlockDiscovered {
        /// When the notification was observed.
        created_at: DateTime<Utc>,
    },

    /// A node passed validation and was added to the registry.
    NodeAdded {
        /// When the node was created.
        created_at: DateTime<Utc>,
        /// The created node.
        node: Node,
    },

    /// A node was removed from the registry.
    NodeDeleted {
        /// When the node was deleted.
        created_at: DateTime<Utc>,
        /// The removed node.
        node: Node,
    },
}

impl DomainEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::NewBlockDiscovered { .. } => EventTopic::Blocks,
            Self::NodeAdded { .. } | Self::NodeDeleted { .. } => EventTopic::Nodes,
        }
    }

    /// When the event was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::NewBlockDiscovered { created_at }
            | Self::NodeAdded { created_at, .. }
            | Self::NodeDeleted { created_at, .. } => *created_at,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Block-notification events.
    Blocks,
    /// Node lifecycle events.
    Nodes,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &DomainEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
