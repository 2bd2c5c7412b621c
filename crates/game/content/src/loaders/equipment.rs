//! Equipment template loader.

use std::path::Path;

use game_core::state::{EquipmentKind, EquipmentTemplate};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Equipment catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentCatalog {
    pub equipment: Vec<EquipmentTemplate>,
}

impl EquipmentCatalog {
    pub fn get(&self, name: &str) -> Option<&EquipmentTemplate> {
        self.equipment.iter().find(|template| template.name == name)
    }

    pub fn of_kind(&self, kind: EquipmentKind) -> impl Iterator<Item = &EquipmentTemplate> {
        self.equipment
            .iter()
            .filter(move |template| template.kind == kind)
    }
}

/// Loader for equipment templates from RON files.
pub struct EquipmentLoader;

impl EquipmentLoader {
    pub fn load(path: &Path) -> LoadResult<EquipmentCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EquipmentCatalog> {
        let catalog: EquipmentCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse equipment catalog RON: {}", e))?;

        if let Some(bad) = catalog.equipment.iter().find(|t| t.max_level == 0) {
            anyhow::bail!("Equipment template {} has max_level 0", bad.name);
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_filters_by_kind() {
        let catalog = EquipmentLoader::parse(
            r#"(equipment: [
                (name: "铁剑", description: "基础铁剑", kind: weapon, base_effect: 5),
                (name: "布衣", kind: armor, base_effect: 3, max_level: 5),
            ])"#,
        )
        .unwrap();

        assert_eq!(catalog.get("铁剑").unwrap().max_level, 10);
        assert_eq!(catalog.get("布衣").unwrap().max_level, 5);
        assert_eq!(catalog.of_kind(EquipmentKind::Weapon).count(), 1);
    }

    #[test]
    fn rejects_zero_max_level() {
        let err = EquipmentLoader::parse(
            r#"(equipment: [(name: "断剑", kind: weapon, base_effect: 1, max_level: 0)])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("断剑"));
    }
}
