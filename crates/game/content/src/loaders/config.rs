//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing sections and fields fall back to the reference balance. The
    /// parsed configuration is validated before it is returned.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid game config: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_reference_balance() {
        assert_eq!(ConfigLoader::parse("").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_sections_override_only_named_fields() {
        let config = ConfigLoader::parse(
            r#"
            [combat.escape]
            base = 0.6

            [equipment]
            cost_growth = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.combat.escape.base, 0.6);
        assert_eq!(config.combat.escape.max, 0.9);
        assert_eq!(config.equipment.cost_growth, 2.0);
        assert_eq!(config.progression, GameConfig::default().progression);
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let err = ConfigLoader::parse("[combat]\non_hit_status_chance = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("Invalid game config"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[progression]\nexperience_per_level = 50").unwrap();
        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.progression.experience_per_level, 50);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/config.toml"));
    }
}
