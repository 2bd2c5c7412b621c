//! Attack outcome and full attack resolution.

use crate::config::CombatConfig;
use crate::env::RandomSource;
use crate::state::Combatant;

use super::damage::{base_damage, scale_damage};
use super::hit::{check_crit, check_dodge};

/// Result of one resolved attack. Pure data; nothing has been applied yet.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub hit: bool,
    pub crit: bool,
    /// 0 on a dodge, at least 1 on a hit.
    pub damage: u32,
    pub element_modifier: f64,
}

impl AttackOutcome {
    pub const fn dodged() -> Self {
        Self {
            hit: false,
            crit: false,
            damage: 0,
            element_modifier: 1.0,
        }
    }
}

/// Shape of an attack: how hard it hits and how hard it is to evade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackProfile {
    /// Multiplier applied to base damage before crits and elements.
    pub damage_multiplier: f64,
    /// Scales the defender's dodge rate.
    pub dodge_factor: f64,
    /// Lowest damage a landed hit can deal.
    pub min_damage: u32,
    pub can_crit: bool,
}

impl AttackProfile {
    pub const NORMAL: Self = Self {
        damage_multiplier: 1.0,
        dodge_factor: 1.0,
        min_damage: 1,
        can_crit: true,
    };

    /// Enemy strong attack: heavier, harder to dodge, never crits.
    pub fn strong(config: &CombatConfig) -> Self {
        Self {
            damage_multiplier: config.strong_attack_multiplier,
            dodge_factor: config.strong_attack_dodge_factor,
            min_damage: config.strong_attack_min_damage.max(1),
            can_crit: false,
        }
    }
}

/// Resolves a normal attack.
///
/// 1. Dodge: `u < defender.dodge_rate` misses outright.
/// 2. Crit (hits only): `u2 < attacker.crit_rate` multiplies by `crit_damage`.
/// 3. Damage: `floor(base × crit × element)`, at least 1.
pub fn resolve_attack<A, D>(
    attacker: &A,
    defender: &D,
    rng: &mut (impl RandomSource + ?Sized),
) -> AttackOutcome
where
    A: Combatant + ?Sized,
    D: Combatant + ?Sized,
{
    resolve_with_profile(attacker, defender, AttackProfile::NORMAL, rng)
}

/// Resolves an attack shaped by `profile`.
pub fn resolve_with_profile<A, D>(
    attacker: &A,
    defender: &D,
    profile: AttackProfile,
    rng: &mut (impl RandomSource + ?Sized),
) -> AttackOutcome
where
    A: Combatant + ?Sized,
    D: Combatant + ?Sized,
{
    if check_dodge(defender.stats().dodge_rate(), profile.dodge_factor, rng) {
        return AttackOutcome::dodged();
    }

    let attacker_stats = attacker.stats();
    let crit = profile.can_crit && check_crit(attacker_stats.crit_rate(), rng);
    let crit_multiplier = if crit {
        attacker_stats.crit_damage()
    } else {
        1.0
    };
    let element_modifier = attacker.element().modifier_against(defender.element());
    let damage = scale_damage(
        base_damage(attacker, defender),
        profile.damage_multiplier * crit_multiplier,
        element_modifier,
        profile.min_damage,
    );

    AttackOutcome {
        hit: true,
        crit,
        damage,
        element_modifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, SequenceRng};
    use crate::state::{CombatStats, Element, Npc};

    fn fighter(atk: i32, def: i32) -> Npc {
        Npc::new("fighter", 1, 100, atk, def)
    }

    #[test]
    fn neutral_hit_without_crit_deals_atk_minus_def() {
        let attacker = fighter(10, 0);
        let defender = fighter(0, 5);
        let outcome = resolve_attack(&attacker, &defender, &mut SequenceRng::constant(0.5));

        assert_eq!(
            outcome,
            AttackOutcome {
                hit: true,
                crit: false,
                damage: 5,
                element_modifier: 1.0,
            }
        );
    }

    #[test]
    fn dodge_returns_zero_damage() {
        let attacker = fighter(10, 0);
        let mut defender = fighter(0, 5);
        defender.stats = CombatStats::new(100).with_dodge_rate(0.5);

        let outcome = resolve_attack(&attacker, &defender, &mut SequenceRng::constant(0.1));
        assert_eq!(outcome, AttackOutcome::dodged());
    }

    #[test]
    fn crit_and_element_multiply() {
        let mut attacker = fighter(20, 0);
        attacker.stats = CombatStats::new(100)
            .with_crit(1.0, 2.0)
            .with_element(Element::Water);
        let mut defender = fighter(0, 10);
        defender.stats = CombatStats::new(100).with_element(Element::Fire);

        // dodge roll 0.5 (no dodge), crit roll 0.5 (< 1.0)
        let outcome = resolve_attack(&attacker, &defender, &mut SequenceRng::constant(0.5));
        assert!(outcome.crit);
        assert_eq!(outcome.element_modifier, 1.5);
        assert_eq!(outcome.damage, 30);
    }

    #[test]
    fn resisted_hit_still_deals_one() {
        let mut attacker = fighter(1, 0);
        attacker.stats = CombatStats::new(100).with_element(Element::Thunder);
        let mut defender = fighter(0, 50);
        defender.stats = CombatStats::new(100).with_element(Element::Earth);

        let outcome = resolve_attack(&attacker, &defender, &mut SequenceRng::constant(0.5));
        assert!(outcome.hit);
        assert_eq!(outcome.damage, 1);
    }

    #[test]
    fn strong_attack_scales_and_ignores_crit() {
        let config = CombatConfig::default();
        let mut attacker = fighter(14, 0);
        attacker.stats = CombatStats::new(100).with_crit(1.0, 3.0);
        let defender = fighter(0, 4);

        let mut rng = SequenceRng::constant(0.5);
        let outcome =
            resolve_with_profile(&attacker, &defender, AttackProfile::strong(&config), &mut rng);
        assert!(!outcome.crit);
        assert_eq!(outcome.damage, 15);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn strong_attack_has_minimum_damage() {
        let config = CombatConfig::default();
        let outcome = resolve_with_profile(
            &fighter(1, 0),
            &fighter(0, 30),
            AttackProfile::strong(&config),
            &mut SequenceRng::constant(0.5),
        );
        assert_eq!(outcome.damage, 2);
    }

    #[test]
    fn damage_is_never_negative_and_hits_deal_at_least_one() {
        let mut rng = PcgRng::seeded(2024);
        for atk in [-5, 0, 1, 7, 40] {
            for def in [-3, 0, 9, 80] {
                let mut defender = fighter(0, def);
                defender.stats = CombatStats::new(100).with_dodge_rate(0.3);
                let outcome = resolve_attack(&fighter(atk, 0), &defender, &mut rng);
                if outcome.hit {
                    assert!(outcome.damage >= 1);
                } else {
                    assert_eq!(outcome.damage, 0);
                }
            }
        }
    }
}
