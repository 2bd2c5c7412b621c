//! Deterministic rules engine for the text adventure.
//!
//! `game-core` holds the four stateful subsystems and the entity types they
//! share. It performs no I/O: randomness is injected through
//! [`env::RandomSource`], and every outcome is returned as a value for the
//! runtime to render.
//!
//! - [`combat`]: damage model and status effect engine
//! - [`engine`]: the turn-based [`CombatEngine`]
//! - [`quest`]: event-driven task progression
//! - [`forge`]: equipment upgrade and repair
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod forge;
pub mod quest;
pub mod state;

pub use combat::{AttackOutcome, StatusEffectEngine, resolve_attack};
pub use config::GameConfig;
pub use engine::{
    ActionRejected, BattleEvent, BattleObserver, BattleState, BattleSummary, CombatEngine,
    PlayerAction, TurnReport,
};
pub use env::{PcgRng, RandomSource, SequenceRng};
pub use error::{ConfigError, ErrorSeverity, GameError};
pub use forge::{Forge, RepairOutcome, RepairResult, UpgradeOutcome, UpgradeResult};
pub use quest::{
    AcceptOutcome, EventKind, ProgressReport, TaskProgressionEngine, TaskRegistry,
};
pub use state::{
    Combatant, Element, Equipment, EquipmentGrade, Inventory, Item, Npc, NpcTemplate, Player,
    StatusEffect, StatusKind, TaskStatus, TaskTemplate,
};
