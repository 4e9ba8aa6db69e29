//! Topic-based event bus implementation.

use tokio::sync::broadcast;

use super::types::ObituaryEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Death announcements and deferrals
    Death,
    /// Catalog reload results
    Catalog,
}

impl ObituaryEvent {
    pub fn topic(&self) -> Topic {
        match self {
            ObituaryEvent::DeathAnnounced(_) | ObituaryEvent::DeathDeferred { .. } => Topic::Death,
            ObituaryEvent::CatalogReloaded(_) | ObituaryEvent::CatalogReloadFailed { .. } => {
                Topic::Catalog
            }
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; with no subscribers the
/// event is dropped.
#[derive(Clone)]
pub struct EventBus {
    death: broadcast::Sender<ObituaryEvent>,
    catalog: broadcast::Sender<ObituaryEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            death: broadcast::channel(capacity).0,
            catalog: broadcast::channel(capacity).0,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: ObituaryEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<ObituaryEvent> {
        self.sender(topic).subscribe()
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<ObituaryEvent> {
        match topic {
            Topic::Death => &self.death,
            Topic::Catalog => &self.catalog,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
