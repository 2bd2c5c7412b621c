//! Game balance configuration.
//!
//! Every tunable coefficient used by the rules engine lives here so content
//! files can rebalance the game without touching the formulas. Defaults
//! reproduce the reference balance.
use crate::error::ConfigError;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub combat: CombatConfig,
    pub progression: ProgressionConfig,
    pub equipment: EquipmentConfig,
}

impl GameConfig {
    // ===== compile-time limits =====
    /// Relationship values are clamped to `[-MAX_RELATIONSHIP, MAX_RELATIONSHIP]`.
    pub const MAX_RELATIONSHIP: i32 = 100;

    pub fn new() -> Self {
        Self {
            combat: CombatConfig::default(),
            progression: ProgressionConfig::default(),
            equipment: EquipmentConfig::default(),
        }
    }

    /// Checks every probability and bound in the configuration.
    ///
    /// Loaders call this right after parsing so malformed balance data is
    /// rejected before any battle runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.combat.validate()?;
        self.progression.validate()?;
        self.equipment.validate()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Combat
// ============================================================================

/// Coefficients for the battle loop.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Chance that a player hit also inflicts poison, bleed or burn.
    pub on_hit_status_chance: f64,
    pub on_hit_status_intensity: u32,

    /// Defense boost granted by the Defend action.
    pub defend_intensity: u32,
    pub defend_duration: u32,

    pub policy: EnemyPolicyWeights,

    pub strong_attack_multiplier: f64,
    /// Scales the defender's dodge rate against strong attacks.
    pub strong_attack_dodge_factor: f64,
    pub strong_attack_min_damage: u32,

    /// Temporary defense removed by the shred special.
    pub defense_shred: i32,
    /// Lowest temporary defense the shred special can push a target to.
    pub defense_shred_floor: i32,
    /// Share of the target's current hp removed by the drain special.
    pub drain_fraction: f64,

    pub escape: EscapeConfig,
    pub rewards: RewardConfig,

    /// Share of currency the player keeps after a defeat.
    pub defeat_currency_kept: f64,
    /// Share of max hp restored after a defeat (at least 1 hp).
    pub defeat_hp_fraction: f64,
}

impl CombatConfig {
    pub const DEFAULT_ON_HIT_STATUS_CHANCE: f64 = 0.05;
    pub const DEFAULT_DEFEND_INTENSITY: u32 = 2;
    pub const DEFAULT_DEFEND_DURATION: u32 = 1;
    pub const DEFAULT_STRONG_MULTIPLIER: f64 = 1.5;
    pub const DEFAULT_STRONG_DODGE_FACTOR: f64 = 0.7;
    pub const DEFAULT_STRONG_MIN_DAMAGE: u32 = 2;
    pub const DEFAULT_DEFENSE_SHRED: i32 = 3;
    pub const DEFAULT_DEFENSE_SHRED_FLOOR: i32 = -10;
    pub const DEFAULT_DRAIN_FRACTION: f64 = 0.2;
    pub const DEFAULT_DEFEAT_CURRENCY_KEPT: f64 = 0.5;
    pub const DEFAULT_DEFEAT_HP_FRACTION: f64 = 0.1;

    fn validate(&self) -> Result<(), ConfigError> {
        probability("combat.on_hit_status_chance", self.on_hit_status_chance)?;
        probability(
            "combat.strong_attack_dodge_factor",
            self.strong_attack_dodge_factor,
        )?;
        probability("combat.drain_fraction", self.drain_fraction)?;
        probability("combat.defeat_currency_kept", self.defeat_currency_kept)?;
        probability("combat.defeat_hp_fraction", self.defeat_hp_fraction)?;
        positive(
            "combat.strong_attack_multiplier",
            self.strong_attack_multiplier,
        )?;
        positive("combat.defend_duration", f64::from(self.defend_duration))?;
        if self.policy.total() == 0 {
            return Err(ConfigError::EmptyPolicy);
        }
        self.escape.validate()
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            on_hit_status_chance: Self::DEFAULT_ON_HIT_STATUS_CHANCE,
            on_hit_status_intensity: 1,
            defend_intensity: Self::DEFAULT_DEFEND_INTENSITY,
            defend_duration: Self::DEFAULT_DEFEND_DURATION,
            policy: EnemyPolicyWeights::default(),
            strong_attack_multiplier: Self::DEFAULT_STRONG_MULTIPLIER,
            strong_attack_dodge_factor: Self::DEFAULT_STRONG_DODGE_FACTOR,
            strong_attack_min_damage: Self::DEFAULT_STRONG_MIN_DAMAGE,
            defense_shred: Self::DEFAULT_DEFENSE_SHRED,
            defense_shred_floor: Self::DEFAULT_DEFENSE_SHRED_FLOOR,
            drain_fraction: Self::DEFAULT_DRAIN_FRACTION,
            escape: EscapeConfig::default(),
            rewards: RewardConfig::default(),
            defeat_currency_kept: Self::DEFAULT_DEFEAT_CURRENCY_KEPT,
            defeat_hp_fraction: Self::DEFAULT_DEFEAT_HP_FRACTION,
        }
    }
}

/// Relative weights of the enemy action policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyPolicyWeights {
    pub normal: u32,
    pub strong: u32,
    pub special: u32,
}

impl EnemyPolicyWeights {
    pub const fn total(&self) -> u32 {
        self.normal + self.strong + self.special
    }

    /// Weights in the order consumed by the enemy policy roll.
    pub const fn as_array(&self) -> [u32; 3] {
        [self.normal, self.strong, self.special]
    }
}

impl Default for EnemyPolicyWeights {
    fn default() -> Self {
        Self {
            normal: 60,
            strong: 25,
            special: 15,
        }
    }
}

/// Escape chance: `clamp(base + level × per_player_level − avg_enemy_level × per_enemy_level)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EscapeConfig {
    pub base: f64,
    pub per_player_level: f64,
    pub per_enemy_level: f64,
    pub min: f64,
    pub max: f64,
}

impl EscapeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        probability("combat.escape.min", self.min)?;
        probability("combat.escape.max", self.max)?;
        if self.min > self.max {
            return Err(ConfigError::InvertedBounds {
                field: "combat.escape",
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Escape probability for a player of `player_level` facing enemies of
    /// `avg_enemy_level` on average.
    pub fn chance(&self, player_level: u32, avg_enemy_level: f64) -> f64 {
        let raw = self.base + f64::from(player_level) * self.per_player_level
            - avg_enemy_level * self.per_enemy_level;
        raw.clamp(self.min, self.max)
    }
}

impl Default for EscapeConfig {
    fn default() -> Self {
        Self {
            base: 0.5,
            per_player_level: 0.02,
            per_enemy_level: 0.03,
            min: 0.1,
            max: 0.9,
        }
    }
}

/// Per-enemy victory rewards: `level × per_level + atk × per_atk`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardConfig {
    pub experience_per_level: u32,
    pub experience_per_atk: u32,
    pub gold_per_level: u32,
    pub gold_per_atk: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            experience_per_level: 15,
            experience_per_atk: 2,
            gold_per_level: 10,
            gold_per_atk: 1,
        }
    }
}

// ============================================================================
// Progression
// ============================================================================

/// Level-up thresholds and per-level stat gains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionConfig {
    /// Experience needed to leave level `L` is `L × experience_per_level`.
    pub experience_per_level: u32,
    pub hp_per_level: u32,
    pub atk_per_level: i32,
    pub def_per_level: i32,
}

impl ProgressionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive(
            "progression.experience_per_level",
            f64::from(self.experience_per_level),
        )
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            experience_per_level: 100,
            hp_per_level: 10,
            atk_per_level: 2,
            def_per_level: 1,
        }
    }
}

// ============================================================================
// Equipment
// ============================================================================

/// Upgrade curve shared by every equipment grade.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EquipmentConfig {
    /// Success rate lost per level above 1.
    pub success_rate_step: f64,
    pub success_rate_floor: f64,
    /// Effect gained per level above 1, as a fraction of the graded base.
    pub effect_step: f64,
    /// Upgrade cost multiplier per level above 1.
    pub cost_growth: f64,
    pub success_durability_loss: u32,
    pub failure_durability_loss: u32,
    /// Sell price is `base_effect × price_per_effect × grade multiplier`.
    pub price_per_effect: u32,
}

impl EquipmentConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        probability("equipment.success_rate_step", self.success_rate_step)?;
        probability("equipment.success_rate_floor", self.success_rate_floor)?;
        positive("equipment.cost_growth", self.cost_growth)
    }
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            success_rate_step: 0.05,
            success_rate_floor: 0.1,
            effect_step: 0.1,
            cost_growth: 1.5,
            success_durability_loss: 1,
            failure_durability_loss: 2,
            price_per_effect: 50,
        }
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}
