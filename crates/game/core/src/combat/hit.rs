//! Dodge and critical-hit rolls.

use crate::env::RandomSource;

/// Rolls the defender's dodge. `factor` scales the dodge rate (1.0 for a
/// normal attack, lower for attacks that are harder to evade).
///
/// Consumes one draw.
pub fn check_dodge(dodge_rate: f64, factor: f64, rng: &mut (impl RandomSource + ?Sized)) -> bool {
    let effective = (dodge_rate * factor).clamp(0.0, 1.0);
    rng.next_float() < effective
}

/// Rolls the attacker's critical hit. Consumes one draw.
pub fn check_crit(crit_rate: f64, rng: &mut (impl RandomSource + ?Sized)) -> bool {
    rng.next_float() < crit_rate.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;

    #[test]
    fn dodge_succeeds_only_below_rate() {
        assert!(check_dodge(0.3, 1.0, &mut SequenceRng::constant(0.29)));
        assert!(!check_dodge(0.3, 1.0, &mut SequenceRng::constant(0.3)));
    }

    #[test]
    fn dodge_factor_reduces_effective_rate() {
        // 0.5 × 0.7 = 0.35
        assert!(check_dodge(0.5, 0.7, &mut SequenceRng::constant(0.34)));
        assert!(!check_dodge(0.5, 0.7, &mut SequenceRng::constant(0.4)));
    }

    #[test]
    fn zero_crit_rate_never_crits() {
        assert!(!check_crit(0.0, &mut SequenceRng::constant(0.0)));
        assert!(check_crit(1.0, &mut SequenceRng::constant(0.999)));
    }
}
