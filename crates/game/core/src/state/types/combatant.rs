//! Shared combat capability of players and NPCs.
//!
//! Combat and status code only ever sees a [`Combatant`]. The concrete
//! entity decides where base attack/defense come from (equipment for the
//! player, template scaling for NPCs), while [`CombatStats`] owns every value
//! whose bounds must hold after each mutation.

use super::{Element, StatusEffects, StatusKind};

/// Health, temporary modifiers, combat rates and active effects.
///
/// Invariants enforced by every mutator:
/// - `0 <= hp <= max_hp`
/// - `alive == (hp > 0)`
/// - `dodge_rate ∈ [0, 0.9]`, `crit_rate ∈ [0, 1]`, `crit_damage ∈ [1, 3]`
///
/// Deserialized values pass through the same clamps.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "StoredStats"))]
pub struct CombatStats {
    hp: u32,
    max_hp: u32,
    alive: bool,
    /// Attack added by effects during the current battle.
    pub temp_atk: i32,
    /// Defense added by effects during the current battle.
    pub temp_def: i32,
    dodge_rate: f64,
    crit_rate: f64,
    crit_damage: f64,
    pub element: Element,
    pub effects: StatusEffects,
}

impl CombatStats {
    pub const MAX_DODGE_RATE: f64 = 0.9;
    pub const MIN_CRIT_DAMAGE: f64 = 1.0;
    pub const MAX_CRIT_DAMAGE: f64 = 3.0;

    /// Full-health stats with no dodge, no crit and a ×1.0 crit multiplier.
    pub fn new(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            alive: max_hp > 0,
            temp_atk: 0,
            temp_def: 0,
            dodge_rate: 0.0,
            crit_rate: 0.0,
            crit_damage: Self::MIN_CRIT_DAMAGE,
            element: Element::None,
            effects: StatusEffects::empty(),
        }
    }

    pub fn with_dodge_rate(mut self, rate: f64) -> Self {
        self.set_dodge_rate(rate);
        self
    }

    pub fn with_crit(mut self, rate: f64, damage: f64) -> Self {
        self.set_crit_rate(rate);
        self.set_crit_damage(damage);
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn dodge_rate(&self) -> f64 {
        self.dodge_rate
    }

    pub fn crit_rate(&self) -> f64 {
        self.crit_rate
    }

    pub fn crit_damage(&self) -> f64 {
        self.crit_damage
    }

    /// Stores `rate` clamped to `[0, 0.9]`; evasion is never guaranteed.
    pub fn set_dodge_rate(&mut self, rate: f64) {
        self.dodge_rate = rate.clamp(0.0, Self::MAX_DODGE_RATE);
    }

    pub fn set_crit_rate(&mut self, rate: f64) {
        self.crit_rate = rate.clamp(0.0, 1.0);
    }

    pub fn set_crit_damage(&mut self, multiplier: f64) {
        self.crit_damage = multiplier.clamp(Self::MIN_CRIT_DAMAGE, Self::MAX_CRIT_DAMAGE);
    }

    /// Removes up to `amount` hp and returns how much was actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.set_hp(self.hp - lost);
        lost
    }

    /// Restores up to `amount` hp and returns how much was actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp - self.hp);
        self.set_hp(self.hp + gained);
        gained
    }

    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
        self.alive = self.hp > 0;
    }

    /// Changes max hp, pulling current hp down if it no longer fits.
    pub fn set_max_hp(&mut self, max_hp: u32) {
        self.max_hp = max_hp;
        self.set_hp(self.hp);
    }

    pub fn restore_full(&mut self) {
        self.set_hp(self.max_hp);
    }

    /// Drops every effect and temporary modifier. Called when a battle ends.
    pub fn reset_temporaries(&mut self) {
        self.temp_atk = 0;
        self.temp_def = 0;
        self.effects = StatusEffects::empty();
    }
}

/// Wire shape of [`CombatStats`]; `alive` is recomputed from `hp`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct StoredStats {
    hp: u32,
    max_hp: u32,
    #[serde(default)]
    temp_atk: i32,
    #[serde(default)]
    temp_def: i32,
    #[serde(default)]
    dodge_rate: f64,
    #[serde(default)]
    crit_rate: f64,
    #[serde(default)]
    crit_damage: f64,
    #[serde(default)]
    element: Element,
    #[serde(default)]
    effects: StatusEffects,
}

#[cfg(feature = "serde")]
impl From<StoredStats> for CombatStats {
    fn from(stored: StoredStats) -> Self {
        let mut stats = CombatStats::new(stored.max_hp)
            .with_dodge_rate(stored.dodge_rate)
            .with_crit(stored.crit_rate, stored.crit_damage)
            .with_element(stored.element);
        stats.set_hp(stored.hp);
        stats.temp_atk = stored.temp_atk;
        stats.temp_def = stored.temp_def;
        stats.effects = stored.effects;
        stats
    }
}

/// Capability shared by every entity that can fight.
pub trait Combatant {
    fn name(&self) -> &str;

    fn level(&self) -> u32;

    /// Attack before temporary modifiers.
    fn atk(&self) -> i32;

    /// Defense before temporary modifiers.
    fn def(&self) -> i32;

    fn stats(&self) -> &CombatStats;

    fn stats_mut(&mut self) -> &mut CombatStats;

    fn hp(&self) -> u32 {
        self.stats().hp()
    }

    fn max_hp(&self) -> u32 {
        self.stats().max_hp()
    }

    fn is_alive(&self) -> bool {
        self.stats().is_alive()
    }

    fn element(&self) -> Element {
        self.stats().element
    }

    fn has_status(&self, kind: StatusKind) -> bool {
        self.stats().effects.has(kind)
    }

    /// Applies damage through the clamped mutator.
    fn take_damage(&mut self, amount: u32) -> u32 {
        self.stats_mut().take_damage(amount)
    }

    fn heal(&mut self, amount: u32) -> u32 {
        self.stats_mut().heal(amount)
    }
}
