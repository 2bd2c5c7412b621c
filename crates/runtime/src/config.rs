//! Session configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use game_core::state::Difficulty;

use crate::api::{Result, RuntimeError};

/// Settings for one [`crate::GameSession`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Seed for the session's random source. `None` draws one at startup.
    pub seed: Option<u64>,
    /// Content directory. `None` uses the data bundled with `game-content`.
    pub data_dir: Option<PathBuf>,
    pub difficulty: Difficulty,
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            data_dir: None,
            difficulty: Difficulty::default(),
            event_buffer_size: 100,
        }
    }
}

impl SessionConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Reads `GAME_SEED`, `GAME_DATA_DIR`, `GAME_DIFFICULTY` and
    /// `GAME_EVENT_BUFFER`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(seed) = parse_var::<u64>(&lookup, "GAME_SEED")? {
            config.seed = Some(seed);
        }
        if let Some(dir) = lookup("GAME_DATA_DIR").filter(|dir| !dir.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(difficulty) = parse_var::<Difficulty>(&lookup, "GAME_DIFFICULTY")? {
            config.difficulty = difficulty;
        }
        if let Some(capacity) = parse_var::<usize>(&lookup, "GAME_EVENT_BUFFER")? {
            config.event_buffer_size = capacity.max(1);
        }

        Ok(config)
    }

    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>>
where
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RuntimeError::InvalidEnv { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn unset_variables_keep_defaults() {
        let config = SessionConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = SessionConfig::from_lookup(lookup(&[
            ("GAME_SEED", "42"),
            ("GAME_DATA_DIR", "/srv/game"),
            ("GAME_DIFFICULTY", "Nightmare"),
            ("GAME_EVENT_BUFFER", "0"),
        ]))
        .unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.resolve_seed(), 42);
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/game")));
        assert_eq!(config.difficulty, Difficulty::Nightmare);
        assert_eq!(config.event_buffer_size, 1);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = SessionConfig::from_lookup(lookup(&[("GAME_SEED", "soon")])).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidEnv { key: "GAME_SEED", .. }));

        let err = SessionConfig::from_lookup(lookup(&[("GAME_DIFFICULTY", "brutal")])).unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidEnv { key: "GAME_DIFFICULTY", .. }));
    }
}
