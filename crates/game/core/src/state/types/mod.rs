//! Entity and value types mutated by the rules engine.
mod combatant;
mod difficulty;
mod element;
mod equipment;
mod inventory;
mod item;
mod npc;
mod player;
mod status;
mod task;

pub use combatant::{CombatStats, Combatant};
pub use difficulty::{Difficulty, DifficultyFactors};
pub use element::Element;
pub use equipment::{
    Equipment, EquipmentGrade, EquipmentKind, EquipmentTemplate, GradeProfile,
};
pub use inventory::{Inventory, InventoryError};
pub use item::{Item, ItemKind};
pub use npc::{Npc, NpcTemplate};
pub use player::{Player, PlayerBuilder};
pub use status::{StatusEffect, StatusEffects, StatusKind};
pub use task::{
    Loot, ObjectiveSpec, Reward, TargetType, TaskBook, TaskInstance, TaskObjective, TaskStatus,
    TaskTemplate,
};
