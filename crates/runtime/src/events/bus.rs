//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use arena_core::BattleSnapshot;

use super::types::LifecycleEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// One snapshot per committed tick
    Snapshot,
    /// Started, finished and retired notices
    Lifecycle,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Snapshot(Box<BattleSnapshot>),
    Lifecycle(LifecycleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Snapshot(_) => Topic::Snapshot,
            Event::Lifecycle(_) => Topic::Lifecycle,
        }
    }
}

struct Channels {
    snapshot: broadcast::Sender<Event>,
    lifecycle: broadcast::Sender<Event>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Snapshot => &self.snapshot,
            Topic::Lifecycle => &self.lifecycle,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks: slow subscribers lag
/// and skip events instead of stalling the battle.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                snapshot: broadcast::channel(capacity).0,
                lifecycle: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.get(topic).subscribe()
    }

    pub fn receiver_count(&self, topic: Topic) -> usize {
        self.channels.get(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::BattleId;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);
        let mut snapshots = bus.subscribe(Topic::Snapshot);

        bus.publish(Event::Lifecycle(LifecycleEvent::BattleRetired {
            battle: BattleId(3),
        }));

        match lifecycle.recv().await {
            Ok(Event::Lifecycle(event)) => assert_eq!(event.battle(), BattleId(3)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            snapshots.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(Event::Lifecycle(LifecycleEvent::BattleRetired {
            battle: BattleId(1),
        }));
        assert_eq!(bus.receiver_count(Topic::Lifecycle), 0);

        let receiver = bus.subscribe(Topic::Snapshot);
        assert_eq!(bus.receiver_count(Topic::Snapshot), 1);
        drop(receiver);
        assert_eq!(bus.receiver_count(Topic::Snapshot), 0);
    }
}
