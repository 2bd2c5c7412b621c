//! Non-player characters and their templates.

use super::combatant::{CombatStats, Combatant};
use super::difficulty::{Difficulty, scale_i32, scale_u32};
use super::Element;

/// Static NPC definition loaded from content.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcTemplate {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default = "NpcTemplate::default_level"))]
    pub level: u32,
    pub hp: u32,
    pub atk: i32,
    pub def: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dodge_rate: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crit_rate: f64,
    #[cfg_attr(feature = "serde", serde(default = "NpcTemplate::default_crit_damage"))]
    pub crit_damage: f64,
    /// Flat resistance to status effects, reserved for content balancing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistance: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hostile: bool,
}

impl NpcTemplate {
    pub fn new(name: impl Into<String>, level: u32, hp: u32, atk: i32, def: i32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            level,
            hp,
            atk,
            def,
            element: Element::None,
            dodge_rate: 0.0,
            crit_rate: 0.0,
            crit_damage: CombatStats::MIN_CRIT_DAMAGE,
            resistance: 0,
            hostile: true,
        }
    }

    #[cfg(feature = "serde")]
    fn default_level() -> u32 {
        1
    }

    #[cfg(feature = "serde")]
    fn default_crit_damage() -> f64 {
        1.5
    }

    /// Spawns a fresh NPC scaled by `difficulty`.
    pub fn spawn(&self, difficulty: Difficulty) -> Npc {
        let factors = difficulty.factors();
        let stats = CombatStats::new(scale_u32(self.hp, factors.npc_hp))
            .with_dodge_rate(self.dodge_rate * factors.npc_rates)
            .with_crit(self.crit_rate * factors.npc_rates, self.crit_damage)
            .with_element(self.element);
        Npc {
            name: self.name.clone(),
            description: self.description.clone(),
            level: self.level.max(1),
            atk: scale_i32(self.atk, factors.npc_atk),
            def: scale_i32(self.def, factors.npc_def),
            stats,
            resistance: self.resistance,
            hostile: self.hostile,
            reward_factor: factors.reward,
        }
    }

    /// Spawns with template stats untouched.
    pub fn spawn_unscaled(&self) -> Npc {
        Npc {
            name: self.name.clone(),
            description: self.description.clone(),
            level: self.level.max(1),
            atk: self.atk,
            def: self.def,
            stats: CombatStats::new(self.hp)
                .with_dodge_rate(self.dodge_rate)
                .with_crit(self.crit_rate, self.crit_damage)
                .with_element(self.element),
            resistance: self.resistance,
            hostile: self.hostile,
            reward_factor: 1.0,
        }
    }
}

/// A live NPC instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npc {
    name: String,
    description: String,
    level: u32,
    atk: i32,
    def: i32,
    pub stats: CombatStats,
    pub resistance: u32,
    pub hostile: bool,
    /// Multiplier on currency dropped when defeated.
    reward_factor: f64,
}

impl Npc {
    /// Unscaled NPC with default rates, handy for fixtures.
    pub fn new(name: impl Into<String>, level: u32, hp: u32, atk: i32, def: i32) -> Self {
        NpcTemplate::new(name, level, hp, atk, def).spawn_unscaled()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reward_factor(&self) -> f64 {
        self.reward_factor
    }
}

impl Combatant for Npc {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn atk(&self) -> i32 {
        self.atk
    }

    fn def(&self) -> i32 {
        self.def
    }

    fn stats(&self) -> &CombatStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut CombatStats {
        &mut self.stats
    }
}
