//! Weighted enemy action policy.

use crate::config::CombatConfig;
use crate::env::RandomSource;
use crate::state::StatusKind;

/// Action an enemy takes on its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemyMove {
    Normal,
    Strong,
    Special(SpecialMove),
}

/// Enemy special techniques.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialMove {
    /// Lowers the player's temporary defense.
    ShredDefense,
    /// Inflicts a negative status.
    Hex(StatusKind),
    /// Removes a share of the player's current hp.
    Drain,
}

/// Rolls the next enemy move from the configured weights.
///
/// Consumes one draw for the policy bucket, plus one (shred, drain) or two
/// (hex) draws when a special is chosen.
pub fn choose_move(config: &CombatConfig, rng: &mut (impl RandomSource + ?Sized)) -> EnemyMove {
    match rng.weighted_choice(&config.policy.as_array()) {
        0 => EnemyMove::Normal,
        1 => EnemyMove::Strong,
        _ => EnemyMove::Special(match rng.next_int(0..3) {
            0 => SpecialMove::ShredDefense,
            1 => {
                let index = rng.next_int(0..StatusKind::HEX.len() as u32) as usize;
                SpecialMove::Hex(StatusKind::HEX[index])
            }
            _ => SpecialMove::Drain,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, SequenceRng};

    #[test]
    fn buckets_follow_weights() {
        let config = CombatConfig::default();
        assert_eq!(
            choose_move(&config, &mut SequenceRng::constant(0.2)),
            EnemyMove::Normal
        );
        assert_eq!(
            choose_move(&config, &mut SequenceRng::constant(0.7)),
            EnemyMove::Strong
        );
    }

    #[test]
    fn specials_are_selected_by_second_roll() {
        let config = CombatConfig::default();
        assert_eq!(
            choose_move(&config, &mut SequenceRng::new([0.9, 0.1])),
            EnemyMove::Special(SpecialMove::ShredDefense)
        );
        assert_eq!(
            choose_move(&config, &mut SequenceRng::new([0.9, 0.5, 0.7])),
            EnemyMove::Special(SpecialMove::Hex(StatusKind::Weak))
        );
        assert_eq!(
            choose_move(&config, &mut SequenceRng::new([0.9, 0.9])),
            EnemyMove::Special(SpecialMove::Drain)
        );
    }

    #[test]
    fn distribution_roughly_matches_weights() {
        let config = CombatConfig::default();
        let mut rng = PcgRng::seeded(11);
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            let bucket = match choose_move(&config, &mut rng) {
                EnemyMove::Normal => 0,
                EnemyMove::Strong => 1,
                EnemyMove::Special(_) => 2,
            };
            counts[bucket] += 1;
        }
        assert!((5_500..6_500).contains(&counts[0]), "{counts:?}");
        assert!((2_000..3_000).contains(&counts[1]), "{counts:?}");
        assert!((1_000..2_000).contains(&counts[2]), "{counts:?}");
    }
}
