//! Damage arithmetic.

use crate::state::Combatant;

/// `max(1, atk + temp_atk − def − temp_def)`.
///
/// The floor of 1 means defense alone can never fully negate an attack.
pub fn base_damage<A, D>(attacker: &A, defender: &D) -> u32
where
    A: Combatant + ?Sized,
    D: Combatant + ?Sized,
{
    let raw = i64::from(attacker.atk()) + i64::from(attacker.stats().temp_atk)
        - i64::from(defender.def())
        - i64::from(defender.stats().temp_def);
    raw.clamp(1, i64::from(u32::MAX)) as u32
}

/// `floor(base × multiplier × element_modifier)`, raised to at least `floor`.
pub fn scale_damage(base: u32, multiplier: f64, element_modifier: f64, floor: u32) -> u32 {
    let scaled = (f64::from(base) * multiplier * element_modifier).floor();
    (scaled as u32).max(floor)
}
