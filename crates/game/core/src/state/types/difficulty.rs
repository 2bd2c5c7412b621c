//! Difficulty presets scaling players, NPCs and rewards.

/// Game difficulty.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
}

/// Multipliers applied by a [`Difficulty`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyFactors {
    pub player_hp: f64,
    pub player_atk: f64,
    pub player_def: f64,
    pub npc_atk: f64,
    pub npc_hp: f64,
    pub npc_def: f64,
    /// Scales NPC dodge and crit rates.
    pub npc_rates: f64,
    /// Scales currency rewards.
    pub reward: f64,
}

impl Difficulty {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "简单",
            Self::Normal => "普通",
            Self::Hard => "困难",
            Self::Nightmare => "噩梦",
        }
    }

    pub const fn factors(self) -> DifficultyFactors {
        match self {
            Self::Easy => DifficultyFactors::table([1.0, 1.0, 1.0, 0.8, 0.8, 0.8, 0.8, 1.5]),
            Self::Normal => DifficultyFactors::table([0.9, 0.9, 0.9, 1.0, 1.0, 1.0, 1.0, 1.0]),
            Self::Hard => DifficultyFactors::table([0.7, 0.7, 0.8, 1.3, 1.3, 1.2, 1.2, 0.8]),
            Self::Nightmare => DifficultyFactors::table([0.5, 0.5, 0.6, 1.8, 1.8, 1.5, 1.5, 0.6]),
        }
    }
}

impl DifficultyFactors {
    /// Column order: player hp/atk/def, npc atk/hp/def, npc rates, reward.
    const fn table(row: [f64; 8]) -> Self {
        Self {
            player_hp: row[0],
            player_atk: row[1],
            player_def: row[2],
            npc_atk: row[3],
            npc_hp: row[4],
            npc_def: row[5],
            npc_rates: row[6],
            reward: row[7],
        }
    }
}

/// Scales a non-negative stat, keeping at least 1.
pub(crate) fn scale_u32(value: u32, factor: f64) -> u32 {
    ((f64::from(value) * factor) as u32).max(1)
}

pub(crate) fn scale_i32(value: i32, factor: f64) -> i32 {
    (f64::from(value) * factor) as i32
}
