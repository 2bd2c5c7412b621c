//! Topic-based event bus for runtime events.
//!
//! Battle, quest and forge events are published to separate topics so a
//! presentation layer can subscribe only to what it renders.

mod bus;
mod types;

pub use bus::{BusObserver, Event, EventBus, Topic};
pub use types::{ForgeEvent, QuestEvent};
