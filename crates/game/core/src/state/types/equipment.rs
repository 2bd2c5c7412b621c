//! Upgradeable equipment and its grade table.
//!
//! An [`Equipment`] instance stores its level and durability; everything else
//! (effect, upgrade cost, success rate) is derived from the grade profile and
//! recomputed whenever the level changes.

use crate::config::EquipmentConfig;
use crate::env::RandomSource;

/// Equipment quality tiers.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EquipmentGrade {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

/// Constants shared by every item of one grade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradeProfile {
    pub multiplier: f64,
    pub base_durability: u32,
    pub base_success_rate: f64,
    pub base_upgrade_cost: u32,
    pub repair_cost_per_point: u32,
}

impl EquipmentGrade {
    /// Drop weights used by [`EquipmentGrade::roll`], in declaration order.
    pub const DROP_WEIGHTS: [u32; 6] = [50, 25, 15, 7, 2, 1];

    const ALL: [EquipmentGrade; 6] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
        Self::Mythic,
    ];

    pub const fn profile(self) -> GradeProfile {
        match self {
            Self::Common => GradeProfile {
                multiplier: 1.0,
                base_durability: 100,
                base_success_rate: 0.9,
                base_upgrade_cost: 50,
                repair_cost_per_point: 2,
            },
            Self::Uncommon => GradeProfile {
                multiplier: 1.2,
                base_durability: 150,
                base_success_rate: 0.85,
                base_upgrade_cost: 100,
                repair_cost_per_point: 3,
            },
            Self::Rare => GradeProfile {
                multiplier: 1.5,
                base_durability: 200,
                base_success_rate: 0.8,
                base_upgrade_cost: 200,
                repair_cost_per_point: 5,
            },
            Self::Epic => GradeProfile {
                multiplier: 2.0,
                base_durability: 300,
                base_success_rate: 0.75,
                base_upgrade_cost: 500,
                repair_cost_per_point: 8,
            },
            Self::Legendary => GradeProfile {
                multiplier: 2.5,
                base_durability: 500,
                base_success_rate: 0.7,
                base_upgrade_cost: 1000,
                repair_cost_per_point: 10,
            },
            Self::Mythic => GradeProfile {
                multiplier: 3.0,
                base_durability: 800,
                base_success_rate: 0.65,
                base_upgrade_cost: 2000,
                repair_cost_per_point: 15,
            },
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "普通",
            Self::Uncommon => "优秀",
            Self::Rare => "稀有",
            Self::Epic => "史诗",
            Self::Legendary => "传说",
            Self::Mythic => "神话",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Common => "⚪",
            Self::Uncommon => "🟢",
            Self::Rare => "🔵",
            Self::Epic => "🟣",
            Self::Legendary => "🟠",
            Self::Mythic => "🔴",
        }
    }

    /// Draws a grade from the drop table (50/25/15/7/2/1 %).
    pub fn roll(rng: &mut (impl RandomSource + ?Sized)) -> Self {
        Self::ALL[rng.weighted_choice(&Self::DROP_WEIGHTS)]
    }
}

/// Which derived stat an item feeds when equipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EquipmentKind {
    /// Adds to attack.
    Weapon,
    /// Adds to defense.
    Armor,
    /// Accessories: no stat bonus.
    Other,
}

/// Static description of an equipment piece, independent of grade.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentTemplate {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub kind: EquipmentKind,
    pub base_effect: u32,
    #[cfg_attr(feature = "serde", serde(default = "EquipmentTemplate::default_max_level"))]
    pub max_level: u32,
}

impl EquipmentTemplate {
    pub const DEFAULT_MAX_LEVEL: u32 = 10;

    pub fn new(name: impl Into<String>, kind: EquipmentKind, base_effect: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            base_effect,
            max_level: Self::DEFAULT_MAX_LEVEL,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level.max(1);
        self
    }

    #[cfg(feature = "serde")]
    fn default_max_level() -> u32 {
        Self::DEFAULT_MAX_LEVEL
    }

    /// Creates a level-1, full-durability item of the given grade.
    pub fn instantiate(&self, grade: EquipmentGrade, config: &EquipmentConfig) -> Equipment {
        let durability = grade.profile().base_durability;
        let mut equipment = Equipment {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind,
            grade,
            level: 1,
            max_level: self.max_level.max(1),
            base_effect: self.base_effect,
            effect: 0.0,
            upgrade_cost: 0,
            success_rate: 0.0,
            durability,
            max_durability: durability,
            equipped: false,
        };
        equipment.recompute(config);
        equipment
    }
}

/// An owned, upgradeable equipment item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    name: String,
    description: String,
    kind: EquipmentKind,
    grade: EquipmentGrade,
    level: u32,
    max_level: u32,
    base_effect: u32,
    effect: f64,
    upgrade_cost: u32,
    success_rate: f64,
    durability: u32,
    max_durability: u32,
    pub(crate) equipped: bool,
}

impl Equipment {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> EquipmentKind {
        self.kind
    }

    pub fn grade(&self) -> EquipmentGrade {
        self.grade
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.max_level
    }

    pub fn base_effect(&self) -> u32 {
        self.base_effect
    }

    /// `base_effect × grade multiplier × (1 + (level − 1) × effect_step)`.
    pub fn effect(&self) -> f64 {
        self.effect
    }

    /// `base_upgrade_cost × cost_growth^(level − 1)`, truncated.
    pub fn upgrade_cost(&self) -> u32 {
        self.upgrade_cost
    }

    /// `max(floor, base_success_rate − (level − 1) × step)`.
    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    pub fn durability(&self) -> u32 {
        self.durability
    }

    pub fn max_durability(&self) -> u32 {
        self.max_durability
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped
    }

    /// Cost to restore full durability.
    pub fn repair_cost(&self) -> u32 {
        (self.max_durability - self.durability) * self.grade.profile().repair_cost_per_point
    }

    /// Sell price: `base_effect × price_per_effect × grade multiplier`.
    pub fn price(&self, config: &EquipmentConfig) -> u32 {
        (f64::from(self.base_effect)
            * f64::from(config.price_per_effect)
            * self.grade.profile().multiplier) as u32
    }

    /// Rounded stat bonus contributed while equipped.
    pub fn bonus(&self) -> i32 {
        if self.equipped {
            self.effect.round() as i32
        } else {
            0
        }
    }

    /// Sets durability, clamped to `[0, max_durability]`.
    pub fn set_durability(&mut self, durability: u32) {
        self.durability = durability.min(self.max_durability);
    }

    pub(crate) fn wear(&mut self, amount: u32) {
        self.durability = self.durability.saturating_sub(amount);
    }

    pub(crate) fn restore_durability(&mut self) {
        self.durability = self.max_durability;
    }

    /// Raises the level by one (capped at `max_level`) and recomputes.
    pub(crate) fn level_up(&mut self, config: &EquipmentConfig) {
        self.level = (self.level + 1).min(self.max_level);
        self.recompute(config);
    }

    fn recompute(&mut self, config: &EquipmentConfig) {
        let profile = self.grade.profile();
        let steps = f64::from(self.level - 1);
        self.effect =
            f64::from(self.base_effect) * profile.multiplier * (1.0 + steps * config.effect_step);
        self.upgrade_cost =
            (f64::from(profile.base_upgrade_cost) * config.cost_growth.powf(steps)) as u32;
        self.success_rate = (profile.base_success_rate - steps * config.success_rate_step)
            .max(config.success_rate_floor);
    }
}
