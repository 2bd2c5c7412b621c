//! Content factory for loading a complete data directory.

use std::path::{Path, PathBuf};

use game_core::{GameConfig, TaskRegistry};

use crate::loaders::{
    ConfigLoader, EquipmentCatalog, EquipmentLoader, ItemCatalog, ItemLoader, LoadResult,
    NpcCatalog, NpcLoader, TaskLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── tasks.ron
/// ├── npcs.ron
/// ├── equipment.ron
/// └── items.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data set shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the task registry from `tasks.ron`.
    pub fn load_tasks(&self) -> LoadResult<TaskRegistry> {
        TaskLoader::load(&self.data_dir.join("tasks.ron"))
    }

    /// Load NPC templates from `npcs.ron`.
    pub fn load_npcs(&self) -> LoadResult<NpcCatalog> {
        NpcLoader::load(&self.data_dir.join("npcs.ron"))
    }

    /// Load equipment templates from `equipment.ron`.
    pub fn load_equipment(&self) -> LoadResult<EquipmentCatalog> {
        EquipmentLoader::load(&self.data_dir.join("equipment.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }
}
