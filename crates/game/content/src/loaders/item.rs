//! Item catalog loader.

use std::path::Path;

use game_core::Item;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<Item>,
    /// Names of items every new player starts with.
    #[serde(default)]
    pub starting: Vec<String>,
}

impl ItemCatalog {
    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Copies of the starting items, in catalog order of `starting`.
    pub fn starting_items(&self) -> Vec<Item> {
        self.starting
            .iter()
            .filter_map(|name| self.get(name).cloned())
            .collect()
    }
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        if let Some(missing) = catalog.starting.iter().find(|name| catalog.get(name).is_none()) {
            anyhow::bail!("Starting item {} is not in the catalog", missing);
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::state::ItemKind;

    #[test]
    fn resolves_starting_items() {
        let catalog = ItemLoader::parse(
            r#"(
                items: [
                    (name: "草药", kind: medicine, effect: 15),
                    (name: "解毒剂", kind: antidote),
                ],
                starting: ["草药", "草药"],
            )"#,
        )
        .unwrap();

        let starting = catalog.starting_items();
        assert_eq!(starting.len(), 2);
        assert_eq!(starting[0].kind, ItemKind::Medicine);
        assert_eq!(catalog.get("解毒剂").unwrap().effect, 0);
    }

    #[test]
    fn rejects_unknown_starting_item() {
        let err = ItemLoader::parse(r#"(items: [], starting: ["金苹果"])"#).unwrap_err();
        assert!(err.to_string().contains("金苹果"));
    }
}
