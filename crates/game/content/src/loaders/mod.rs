//! Content loaders for reading game data from files.
//!
//! Each loader parses one file into `game-core` types through their serde
//! derives and checks whatever the format alone cannot express.

pub mod config;
pub mod equipment;
pub mod factory;
pub mod item;
pub mod npcs;
pub mod tasks;

pub use config::ConfigLoader;
pub use equipment::{EquipmentCatalog, EquipmentLoader};
pub use factory::ContentFactory;
pub use item::{ItemCatalog, ItemLoader};
pub use npcs::{NpcCatalog, NpcLoader};
pub use tasks::{TaskCatalog, TaskLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
