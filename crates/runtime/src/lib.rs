//! Session layer over the rules engine.
//!
//! This crate loads content, owns the player and the session's random
//! source, and drives the `game-core` engines on behalf of a game loop.
//! Consumers embed [`GameSession`] to route gameplay events, fight battles
//! through a [`CommandProvider`], and subscribe to the resulting events.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session orchestrator
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`config`] reads session settings from the environment
pub mod api;
pub mod config;
pub mod events;
pub mod session;

pub use api::{
    AutoAttack, BattleView, CommandProvider, EnemyView, Result, RuntimeError, ScriptedCommands,
};
pub use config::SessionConfig;
pub use events::{BusObserver, Event, EventBus, ForgeEvent, QuestEvent, Topic};
pub use session::{GameSession, SessionContent};
