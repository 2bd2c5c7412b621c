//! Elemental affinities and the advantage table.

/// Elemental affinity of a combatant.
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
pub enum Element {
    Fire,
    Water,
    Wind,
    Thunder,
    Earth,
    Light,
    Dark,
    #[default]
    None,
}

impl Element {
    /// In-game display name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fire => "火",
            Self::Water => "水",
            Self::Wind => "风",
            Self::Thunder => "雷",
            Self::Earth => "土",
            Self::Light => "光",
            Self::Dark => "暗",
            Self::None => "无",
        }
    }

    /// Damage multiplier when an attacker of `self` hits a defender of `defender`.
    ///
    /// ```text
    /// fire    → wind ×1.5   fire    → water   ×0.7
    /// water   → fire ×1.5   water   → thunder ×0.7
    /// wind    → thunder ×1.5  wind  → fire    ×0.7
    /// thunder → water ×1.5  thunder → wind ×0.7, earth ×0.5
    /// earth   → thunder ×1.5
    /// light  ↔ dark ×2.0
    /// ```
    ///
    /// Every other pairing, including anything involving `None`, is ×1.0.
    pub const fn modifier_against(self, defender: Element) -> f64 {
        use Element::*;
        match (self, defender) {
            (Fire, Wind) => 1.5,
            (Fire, Water) => 0.7,
            (Water, Fire) => 1.5,
            (Water, Thunder) => 0.7,
            (Wind, Thunder) => 1.5,
            (Wind, Fire) => 0.7,
            (Thunder, Water) => 1.5,
            (Thunder, Wind) => 0.7,
            (Thunder, Earth) => 0.5,
            (Earth, Thunder) => 1.5,
            (Light, Dark) | (Dark, Light) => 2.0,
            _ => 1.0,
        }
    }
}
