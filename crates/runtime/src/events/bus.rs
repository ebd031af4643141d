//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{CombatEvent, LootEvent, SpellEvent};
use melody_core::ControlEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Notes, matches and fired spells
    Spell,
    /// Effect applications, melee, guard, target timers
    Combat,
    /// Melodies looted into the inventory
    Loot,
    /// Controller transitions
    Control,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Spell, Topic::Combat, Topic::Loot, Topic::Control];

    const fn index(self) -> usize {
        match self {
            Topic::Spell => 0,
            Topic::Combat => 1,
            Topic::Loot => 2,
            Topic::Control => 3,
        }
    }
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Spell(SpellEvent),
    Combat(CombatEvent),
    Loot(LootEvent),
    Control(ControlEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Spell(_) => Topic::Spell,
            Event::Combat(_) => Topic::Combat,
            Event::Loot(_) => Topic::Loot,
            Event::Control(_) => Topic::Control,
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about. Publishing never
/// blocks; slow receivers observe `Lagged` and skip ahead.
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; 4]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Topic::ALL.map(|_| broadcast::channel(capacity).0)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
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
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut loot = bus.subscribe(Topic::Loot);
        let mut control = bus.subscribe(Topic::Control);

        bus.publish(Event::Control(ControlEvent::GuardRaised));

        assert_eq!(
            control.try_recv().expect("control event"),
            Event::Control(ControlEvent::GuardRaised)
        );
        assert!(matches!(loot.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(Event::Control(ControlEvent::CastStarted));
        let mut late = bus.clone().subscribe(Topic::Control);
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }
}
