//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use game_core::{BattleEvent, BattleObserver};

use super::types::{ForgeEvent, QuestEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Per-turn battle events
    Battle,
    /// Task acceptance, progress and completion
    Quest,
    /// Equipment upgrade and repair
    Forge,
}

impl Topic {
    const ALL: [Topic; 3] = [Topic::Battle, Topic::Quest, Topic::Forge];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Battle(BattleEvent),
    Quest(QuestEvent),
    Forge(ForgeEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Battle(_) => Topic::Battle,
            Event::Quest(_) => Topic::Quest,
            Event::Forge(_) => Topic::Forge,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<Event>>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .iter()
            .map(|&topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        // Events are best-effort; skip rather than block under contention.
        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic)
                    && tx.send(event).is_err()
                {
                    tracing::trace!("No subscribers for topic {:?}", topic);
                }
            }
            Err(_) => {
                tracing::debug!("Failed to acquire event bus lock for topic {:?}", topic);
            }
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns `None` only if the channel map is being written to, which
    /// never happens after construction.
    pub fn subscribe(&self, topic: Topic) -> Option<broadcast::Receiver<Event>> {
        let channels = self.channels.try_read().ok()?;
        channels.get(&topic).map(broadcast::Sender::subscribe)
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .filter_map(|&topic| self.subscribe(topic).map(|rx| (topic, rx)))
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

/// Forwards every battle event of a [`game_core::CombatEngine`] to the bus.
pub struct BusObserver<'a> {
    bus: &'a EventBus,
}

impl<'a> BusObserver<'a> {
    pub fn new(bus: &'a EventBus) -> Self {
        Self { bus }
    }
}

impl BattleObserver for BusObserver<'_> {
    fn on_event(&mut self, event: &BattleEvent) {
        tracing::trace!(?event, "battle event");
        self.bus.publish(Event::Battle(event.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::new();
        let mut battle = bus.subscribe(Topic::Battle).unwrap();
        let mut quest = bus.subscribe(Topic::Quest).unwrap();

        bus.publish(Event::Battle(BattleEvent::TurnStarted { turn: 1 }));

        assert_eq!(
            battle.recv().await.unwrap(),
            Event::Battle(BattleEvent::TurnStarted { turn: 1 })
        );
        assert!(quest.try_recv().is_err());
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::with_capacity(1);
        bus.publish(Event::Quest(QuestEvent::Accepted {
            task: "初来乍到".into(),
        }));

        let clone = bus.clone();
        let receivers = clone.subscribe_multiple(&[Topic::Quest, Topic::Forge]);
        assert_eq!(receivers.len(), 2);
    }

    #[tokio::test]
    async fn observer_publishes_battle_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Battle).unwrap();
        let mut observer = BusObserver::new(&bus);

        observer.on_event(&BattleEvent::CombatantDefeated {
            name: "野狼".into(),
        });

        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::Battle(BattleEvent::CombatantDefeated { .. })
        ));
    }
}
