//! NPC template loader.

use std::path::Path;

use game_core::NpcTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// NPC catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcCatalog {
    pub npcs: Vec<NpcTemplate>,
}

impl NpcCatalog {
    pub fn get(&self, name: &str) -> Option<&NpcTemplate> {
        self.npcs.iter().find(|npc| npc.name == name)
    }

    pub fn hostile(&self) -> impl Iterator<Item = &NpcTemplate> {
        self.npcs.iter().filter(|npc| npc.hostile)
    }
}

/// Loader for NPC templates from RON files.
pub struct NpcLoader;

impl NpcLoader {
    pub fn load(path: &Path) -> LoadResult<NpcCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<NpcCatalog> {
        let catalog: NpcCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse NPC catalog RON: {}", e))?;

        for (i, npc) in catalog.npcs.iter().enumerate() {
            if catalog.npcs[..i].iter().any(|other| other.name == npc.name) {
                anyhow::bail!("Duplicate NPC template: {}", npc.name);
            }
            if npc.hp == 0 {
                anyhow::bail!("NPC template {} has zero hp", npc.name);
            }
        }

        Ok(catalog)
    }
}
