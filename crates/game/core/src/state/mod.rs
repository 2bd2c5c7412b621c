//! Entities the rules engine reads and mutates.
//!
//! The persistence layer reconstructs a [`Player`] (with inventory, tasks and
//! relationships) and a set of [`Npc`]s; subsystems then mutate them in place
//! through the operations defined on these types. Nothing here performs I/O.
pub mod types;

pub use types::{
    CombatStats, Combatant, Difficulty, DifficultyFactors, Element, Equipment, EquipmentGrade,
    EquipmentKind, EquipmentTemplate, GradeProfile, Inventory, InventoryError, Item, ItemKind,
    Loot, Npc, NpcTemplate, ObjectiveSpec, Player, PlayerBuilder, Reward, StatusEffect,
    StatusEffects, StatusKind, TargetType, TaskBook, TaskInstance, TaskObjective, TaskStatus,
    TaskTemplate,
};
