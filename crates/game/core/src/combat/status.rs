//! Status effect engine.
//!
//! Two phases per battle turn:
//! - [`StatusEffectEngine::apply_all`] fires every effect's per-turn action
//!   (damage, heal, stat modifiers) at the start of the turn
//! - [`StatusEffectEngine::tick`] ages every effect at the end of the turn and
//!   drops the expired ones, handing back any attack/defense they granted
//!
//! Stun is only a marker here; the combat engine checks for it when deciding
//! whether a combatant may act.

use crate::state::{CombatStats, Combatant, StatusEffect, StatusKind};

/// What a single effect did when applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectChange {
    Damage(u32),
    Heal(u32),
    /// Change to temporary attack (negative for weak).
    Attack(i32),
    /// Change to temporary defense.
    Defense(i32),
    /// Holder loses its action this turn.
    Stunned,
    /// Cosmetic effect with no numeric action.
    Idle,
}

/// Record of one effect firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTick {
    pub kind: StatusKind,
    pub intensity: u32,
    pub change: EffectChange,
}

/// Stateless operations over combatants' effect lists.
pub struct StatusEffectEngine;

impl StatusEffectEngine {
    /// Appends `effect` to the target's list. Identical kinds stack.
    pub fn inflict<C: Combatant + ?Sized>(target: &mut C, effect: StatusEffect) {
        target.stats_mut().effects.push(effect);
    }

    /// Executes `effect`'s one-shot action against `target`.
    ///
    /// - poison, burn: `intensity × 2` damage
    /// - bleed: `intensity × 3` damage
    /// - regeneration: heals `min(intensity × 3, max_hp − hp)`
    /// - attack/defense boost: `+intensity × 2` temporary attack/defense
    /// - weak: `−intensity` temporary attack, never pushing it below 0
    pub fn apply(effect: &mut StatusEffect, target: &mut CombatStats) -> StatusTick {
        let intensity = effect.intensity();
        let change = match effect.kind() {
            StatusKind::Poison | StatusKind::Burn => {
                EffectChange::Damage(target.take_damage(intensity.saturating_mul(2)))
            }
            StatusKind::Bleed => EffectChange::Damage(target.take_damage(intensity.saturating_mul(3))),
            StatusKind::Regeneration => {
                EffectChange::Heal(target.heal(intensity.saturating_mul(3)))
            }
            StatusKind::AttackBoost => {
                let delta = boost(intensity);
                target.temp_atk += delta;
                effect.record_grant(delta, 0);
                EffectChange::Attack(delta)
            }
            StatusKind::DefenseBoost => {
                let delta = boost(intensity);
                target.temp_def += delta;
                effect.record_grant(0, delta);
                EffectChange::Defense(delta)
            }
            StatusKind::Weak => {
                let before = target.temp_atk;
                if before > 0 {
                    let drained = i32::try_from(intensity).unwrap_or(i32::MAX);
                    target.temp_atk = before.saturating_sub(drained).max(0);
                }
                let delta = target.temp_atk - before;
                effect.record_grant(delta, 0);
                EffectChange::Attack(delta)
            }
            StatusKind::Stun => EffectChange::Stunned,
            _ => EffectChange::Idle,
        };

        StatusTick {
            kind: effect.kind(),
            intensity,
            change,
        }
    }

    /// Fires every effect on `target` in list order.
    pub fn apply_all<C: Combatant + ?Sized>(target: &mut C) -> Vec<StatusTick> {
        let stats = target.stats_mut();
        let mut effects = std::mem::take(&mut stats.effects);
        let ticks = effects
            .iter_mut()
            .map(|effect| Self::apply(effect, stats))
            .collect();
        stats.effects = effects;
        ticks
    }

    /// Ages every effect by one turn and removes those that ran out.
    ///
    /// Returns the kinds removed, in list order.
    pub fn tick<C: Combatant + ?Sized>(target: &mut C) -> Vec<StatusKind> {
        let stats = target.stats_mut();
        let mut expired = Vec::new();
        for effect in stats.effects.iter_mut() {
            if effect.age() {
                expired.push(effect.kind());
            }
        }
        let removed = stats.effects.drain_where(|effect| !effect.is_active());
        revert(stats, &removed);
        expired
    }

    /// Removes every negative effect and returns the kinds removed.
    pub fn cleanse<C: Combatant + ?Sized>(target: &mut C) -> Vec<StatusKind> {
        let stats = target.stats_mut();
        let removed = stats.effects.drain_where(|effect| !effect.kind().is_positive());
        revert(stats, &removed);
        removed.iter().map(StatusEffect::kind).collect()
    }
}

fn boost(intensity: u32) -> i32 {
    i32::try_from(intensity.saturating_mul(2)).unwrap_or(i32::MAX)
}

/// Hands back the temporary attack/defense granted by removed effects.
///
/// Weak only ever drains attack that a boost put there. When that boost
/// leaves first, the drain it no longer covers is written off against the
/// live weak entries, so attack stays at 0 instead of going negative and is
/// not restored later when the weak runs out.
fn revert(stats: &mut CombatStats, removed: &[StatusEffect]) {
    for effect in removed {
        let (atk, def) = effect.granted();
        stats.temp_atk -= atk;
        stats.temp_def -= def;
    }

    let mut excess = -stats.temp_atk;
    for effect in stats.effects.iter_mut() {
        if excess <= 0 {
            break;
        }
        if effect.kind() != StatusKind::Weak {
            continue;
        }
        let absorbed = excess.min(-effect.granted().0);
        if absorbed > 0 {
            effect.record_grant(absorbed, 0);
            stats.temp_atk += absorbed;
            excess -= absorbed;
        }
    }
}
