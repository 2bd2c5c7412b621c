//! Data-driven game content and its loaders.
//!
//! This crate houses the shipped data files under `data/` and the loaders
//! that turn them into `game-core` values:
//! - Balance configuration (TOML)
//! - Task templates with their trigger and follow-up tables (RON)
//! - NPC templates (RON)
//! - Equipment templates (RON)
//! - Item catalog (RON)
//!
//! Content is read once at session start and never mutated afterwards.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EquipmentCatalog, EquipmentLoader, ItemCatalog, ItemLoader,
    LoadResult, NpcCatalog, NpcLoader, TaskCatalog, TaskLoader,
};
