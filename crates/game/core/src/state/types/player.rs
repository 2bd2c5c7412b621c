//! The player entity.

use std::collections::BTreeMap;

use super::combatant::{CombatStats, Combatant};
use super::difficulty::{Difficulty, scale_i32, scale_u32};
use super::{Element, EquipmentKind, Inventory, TaskBook};
use crate::config::{GameConfig, ProgressionConfig};

/// The single player character.
///
/// Owns everything the rules engine mutates across subsystems: combat stats,
/// currency, inventory, accepted tasks and NPC relationships.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    name: String,
    level: u32,
    experience: u32,
    base_atk: i32,
    base_def: i32,
    pub gold: u32,
    pub reputation: i32,
    pub stats: CombatStats,
    pub inventory: Inventory,
    pub tasks: TaskBook,
    relationships: BTreeMap<String, i32>,
}

impl Player {
    pub const BASE_HP: u32 = 100;
    pub const BASE_ATK: i32 = 10;
    pub const BASE_DEF: i32 = 5;
    pub const STARTING_GOLD: u32 = 100;
    pub const BASE_DODGE_RATE: f64 = 0.05;
    pub const BASE_CRIT_RATE: f64 = 0.1;
    pub const BASE_CRIT_DAMAGE: f64 = 1.5;

    /// Level-1 player with the reference starting stats.
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    /// Starting player scaled by the difficulty's player factors.
    pub fn with_difficulty(name: impl Into<String>, difficulty: Difficulty) -> Self {
        let factors = difficulty.factors();
        Self::builder(name)
            .max_hp(scale_u32(Self::BASE_HP, factors.player_hp))
            .atk(scale_i32(Self::BASE_ATK, factors.player_atk))
            .def(scale_i32(Self::BASE_DEF, factors.player_def))
            .build()
    }

    pub fn builder(name: impl Into<String>) -> PlayerBuilder {
        PlayerBuilder::new(name)
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn base_atk(&self) -> i32 {
        self.base_atk
    }

    pub fn base_def(&self) -> i32 {
        self.base_def
    }

    /// Experience still required to reach the next level.
    pub fn experience_to_next(&self, config: &ProgressionConfig) -> u32 {
        (self.level * config.experience_per_level).saturating_sub(self.experience)
    }

    /// Adds experience and applies every level-up it pays for.
    ///
    /// Each level consumes `level × experience_per_level` points and grants
    /// the configured hp/atk/def gains plus a full heal. Returns the number
    /// of levels gained.
    pub fn gain_experience(&mut self, amount: u32, config: &ProgressionConfig) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        loop {
            let needed = self.level * config.experience_per_level;
            if needed == 0 || self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.level += 1;
            self.stats
                .set_max_hp(self.stats.max_hp() + config.hp_per_level);
            self.base_atk += config.atk_per_level;
            self.base_def += config.def_per_level;
            self.stats.restore_full();
            gained += 1;
        }
        gained
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Debits `amount` if affordable. Returns false and leaves the balance
    /// untouched otherwise.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        match self.gold.checked_sub(amount) {
            Some(rest) => {
                self.gold = rest;
                true
            }
            None => false,
        }
    }

    pub fn relationship(&self, npc: &str) -> i32 {
        self.relationships.get(npc).copied().unwrap_or(0)
    }

    /// Shifts the relationship with `npc`, clamped to ±[`GameConfig::MAX_RELATIONSHIP`].
    /// Returns the new value.
    pub fn modify_relationship(&mut self, npc: &str, delta: i32) -> i32 {
        let entry = self.relationships.entry(npc.to_owned()).or_insert(0);
        *entry = entry
            .saturating_add(delta)
            .clamp(-GameConfig::MAX_RELATIONSHIP, GameConfig::MAX_RELATIONSHIP);
        *entry
    }

    pub fn relationships(&self) -> impl Iterator<Item = (&str, i32)> {
        self.relationships.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Combatant for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn atk(&self) -> i32 {
        self.base_atk + self.inventory.bonus(EquipmentKind::Weapon)
    }

    fn def(&self) -> i32 {
        self.base_def + self.inventory.bonus(EquipmentKind::Armor)
    }

    fn stats(&self) -> &CombatStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut CombatStats {
        &mut self.stats
    }
}

/// Builder for [`Player`], mainly for fixtures and save restoration.
pub struct PlayerBuilder {
    name: String,
    level: u32,
    max_hp: u32,
    atk: i32,
    def: i32,
    gold: u32,
    dodge_rate: f64,
    crit_rate: f64,
    crit_damage: f64,
    element: Element,
}

impl PlayerBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            max_hp: Player::BASE_HP,
            atk: Player::BASE_ATK,
            def: Player::BASE_DEF,
            gold: Player::STARTING_GOLD,
            dodge_rate: Player::BASE_DODGE_RATE,
            crit_rate: Player::BASE_CRIT_RATE,
            crit_damage: Player::BASE_CRIT_DAMAGE,
            element: Element::None,
        }
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn max_hp(mut self, max_hp: u32) -> Self {
        self.max_hp = max_hp;
        self
    }

    pub fn atk(mut self, atk: i32) -> Self {
        self.atk = atk;
        self
    }

    pub fn def(mut self, def: i32) -> Self {
        self.def = def;
        self
    }

    pub fn gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    pub fn dodge_rate(mut self, rate: f64) -> Self {
        self.dodge_rate = rate;
        self
    }

    pub fn crit(mut self, rate: f64, damage: f64) -> Self {
        self.crit_rate = rate;
        self.crit_damage = damage;
        self
    }

    pub fn element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn build(self) -> Player {
        Player {
            name: self.name,
            level: self.level,
            experience: 0,
            base_atk: self.atk,
            base_def: self.def,
            gold: self.gold,
            reputation: 0,
            stats: CombatStats::new(self.max_hp)
                .with_dodge_rate(self.dodge_rate)
                .with_crit(self.crit_rate, self.crit_damage)
                .with_element(self.element),
            inventory: Inventory::empty(),
            tasks: TaskBook::default(),
            relationships: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EquipmentConfig;
    use crate::state::{EquipmentGrade, EquipmentTemplate};

    #[test]
    fn starting_player_matches_reference_stats() {
        let player = Player::new("勇者");
        assert_eq!(player.level(), 1);
        assert_eq!(player.max_hp(), 100);
        assert_eq!(player.atk(), 10);
        assert_eq!(player.def(), 5);
        assert_eq!(player.gold, 100);
        assert_eq!(player.stats.dodge_rate(), 0.05);
        assert_eq!(player.stats.crit_damage(), 1.5);
    }

    #[test]
    fn difficulty_scales_starting_stats() {
        let player = Player::with_difficulty("勇者", Difficulty::Nightmare);
        assert_eq!(player.max_hp(), 50);
        assert_eq!(player.atk(), 5);

        let player = Player::with_difficulty("勇者", Difficulty::Hard);
        assert_eq!(player.def(), 4);
    }

    #[test]
    fn experience_loops_through_multiple_levels() {
        let config = ProgressionConfig::default();
        let mut player = Player::new("勇者");
        player.stats.take_damage(60);

        // 100 for level 1 -> 2, 200 for level 2 -> 3, 20 left over.
        let gained = player.gain_experience(320, &config);
        assert_eq!(gained, 2);
        assert_eq!(player.level(), 3);
        assert_eq!(player.experience(), 20);
        assert_eq!(player.max_hp(), 120);
        assert_eq!(player.hp(), 120);
        assert_eq!(player.atk(), 14);
        assert_eq!(player.def(), 7);
        assert_eq!(player.experience_to_next(&config), 280);
    }

    #[test]
    fn spending_is_all_or_nothing() {
        let mut player = Player::builder("勇者").gold(30).build();
        assert!(!player.spend_gold(31));
        assert_eq!(player.gold, 30);
        assert!(player.spend_gold(30));
        assert_eq!(player.gold, 0);
    }

    #[test]
    fn relationships_are_clamped() {
        let mut player = Player::new("勇者");
        assert_eq!(player.modify_relationship("铁匠", 15), 15);
        assert_eq!(player.modify_relationship("铁匠", 200), 100);
        assert_eq!(player.modify_relationship("铁匠", -500), -100);
        assert_eq!(player.relationship("客栈老板"), 0);
    }

    #[test]
    fn equipped_gear_feeds_derived_stats() {
        let config = EquipmentConfig::default();
        let mut player = Player::new("勇者");
        let sword = player.inventory.add_equipment(
            EquipmentTemplate::new("钢剑", EquipmentKind::Weapon, 8)
                .instantiate(EquipmentGrade::Rare, &config),
        );
        assert_eq!(player.atk(), 10);
        player.inventory.equip(sword).unwrap();
        assert_eq!(player.atk(), 22);
        assert_eq!(player.base_atk(), 10);
    }
}
