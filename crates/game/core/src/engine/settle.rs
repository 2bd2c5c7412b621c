//! End-of-battle settlement.

use crate::config::RewardConfig;
use crate::quest::ProgressReport;
use crate::state::{Combatant, Npc};

use super::{BattleEvent, BattleState, CombatEngine};

/// What a finished battle paid out or cost.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSummary {
    pub outcome: BattleState,
    pub turns: u32,
    pub experience: u32,
    pub gold: u32,
    pub levels_gained: u32,
    /// Enemies defeated, in party order.
    pub defeated: Vec<String>,
    /// Currency forfeited on defeat.
    pub gold_lost: u32,
    /// Task progress caused by the kill events of a victory.
    pub quest: ProgressReport,
}

impl CombatEngine<'_> {
    /// Enters `state` and settles the battle. No-op once already terminal.
    pub(super) fn finish(&mut self, state: BattleState) {
        if self.state.is_terminal() {
            return;
        }
        self.state = state;
        self.sweep_defeated();

        let mut summary = BattleSummary {
            outcome: state,
            turns: self.turn,
            defeated: self
                .defeated_enemies()
                .map(|enemy| enemy.name().to_owned())
                .collect(),
            ..BattleSummary::default()
        };

        match state {
            BattleState::Victory => self.settle_victory(&mut summary),
            BattleState::Defeat => self.settle_defeat(&mut summary),
            BattleState::Escaped | BattleState::Active => {}
        }

        self.player.stats.reset_temporaries();
        for enemy in self.enemies.iter_mut() {
            enemy.stats.reset_temporaries();
        }

        self.summary = Some(summary);
        self.emit(BattleEvent::BattleFinished { state });
    }

    /// Walks away from an unfinished battle without settling it.
    ///
    /// Nothing is paid or lost, but battle-only modifiers and effects are
    /// cleared on every participant.
    pub fn abandon(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.player.stats.reset_temporaries();
        for enemy in self.enemies.iter_mut() {
            enemy.stats.reset_temporaries();
        }
    }

    fn settle_victory(&mut self, summary: &mut BattleSummary) {
        let rewards = &self.config.combat.rewards;
        for enemy in self.defeated_enemies() {
            summary.experience = summary.experience.saturating_add(experience_for(rewards, enemy));
            summary.gold = summary.gold.saturating_add(gold_for(rewards, enemy));
        }

        summary.levels_gained = self
            .player
            .gain_experience(summary.experience, &self.config.progression);
        self.player.add_gold(summary.gold);

        if let Some(quests) = self.quests {
            for name in &summary.defeated {
                summary.quest.merge(quests.on_kill(self.player, name));
            }
        }
    }

    /// Enemies that were standing at the start and are down now.
    fn defeated_enemies(&self) -> impl Iterator<Item = &Npc> + '_ {
        self.enemies
            .iter()
            .zip(&self.fought)
            .filter(|(enemy, fought)| **fought && !enemy.is_alive())
            .map(|(enemy, _)| enemy)
    }

    fn settle_defeat(&mut self, summary: &mut BattleSummary) {
        let combat = &self.config.combat;
        let kept = (f64::from(self.player.gold) * combat.defeat_currency_kept).floor() as u32;
        summary.gold_lost = self.player.gold.saturating_sub(kept);
        self.player.gold = kept.min(self.player.gold);

        let floor = (f64::from(self.player.max_hp()) * combat.defeat_hp_fraction).floor() as u32;
        self.player.stats.set_hp(floor.max(1));
    }
}

fn experience_for(rewards: &RewardConfig, enemy: &Npc) -> u32 {
    let atk = enemy.atk().max(0).unsigned_abs();
    enemy
        .level()
        .saturating_mul(rewards.experience_per_level)
        .saturating_add(atk.saturating_mul(rewards.experience_per_atk))
}

fn gold_for(rewards: &RewardConfig, enemy: &Npc) -> u32 {
    let atk = enemy.atk().max(0).unsigned_abs();
    let base = enemy
        .level()
        .saturating_mul(rewards.gold_per_level)
        .saturating_add(atk.saturating_mul(rewards.gold_per_atk));
    (f64::from(base) * enemy.reward_factor()).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::SequenceRng;
    use crate::engine::PlayerAction;
    use crate::state::{Player, StatusEffect, StatusKind};

    #[test]
    fn rewards_follow_level_and_attack() {
        let rewards = RewardConfig::default();
        let wolf = Npc::new("野狼", 2, 30, 8, 2);
        assert_eq!(experience_for(&rewards, &wolf), 46);
        assert_eq!(gold_for(&rewards, &wolf), 28);

        let feeble = Npc::new("病鼠", 1, 5, -3, 0);
        assert_eq!(experience_for(&rewards, &feeble), 15);
    }

    #[test]
    fn victory_pays_out_and_clears_temporaries() {
        let config = GameConfig::default();
        let mut player = Player::builder("勇者").gold(0).build();
        player.stats.effects.push(StatusEffect::new(StatusKind::AttackBoost, 1));
        let mut enemies = vec![Npc::new("史莱姆", 1, 3, 1, 0)];
        let mut rng = SequenceRng::constant(0.5);

        let summary = {
            let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);
            engine.step(PlayerAction::Attack { target: 0 }).unwrap();
            engine.into_summary().unwrap()
        };

        assert_eq!(summary.outcome, BattleState::Victory);
        assert_eq!(summary.experience, 17);
        assert_eq!(summary.gold, 11);
        assert_eq!(summary.defeated, vec!["史莱姆".to_owned()]);
        assert_eq!(player.gold, 11);
        assert_eq!(player.experience(), 17);
        assert_eq!(player.stats.temp_atk, 0);
        assert!(player.stats.effects.is_empty());
    }

    #[test]
    fn enemies_down_before_the_battle_are_not_kills() {
        let config = GameConfig::default();
        let mut player = Player::builder("勇者").gold(0).build();
        let mut fallen = Npc::new("野狼", 2, 30, 8, 2);
        fallen.take_damage(30);
        let mut enemies = vec![fallen, Npc::new("史莱姆", 1, 3, 1, 0)];
        let mut rng = SequenceRng::constant(0.5);

        let summary = {
            let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);
            let report = engine.step(PlayerAction::Attack { target: 1 }).unwrap();
            assert_eq!(
                report
                    .events
                    .iter()
                    .filter(|event| matches!(event, BattleEvent::CombatantDefeated { .. }))
                    .count(),
                1
            );
            engine.into_summary().unwrap()
        };

        assert_eq!(summary.outcome, BattleState::Victory);
        assert_eq!(summary.defeated, vec!["史莱姆".to_owned()]);
        assert_eq!(summary.experience, 17);
        assert_eq!(summary.gold, 11);
        assert_eq!(player.gold, 11);
    }

    #[test]
    fn abandoned_battle_clears_temporaries_without_settling() {
        let config = GameConfig::default();
        let mut player = Player::builder("勇者").gold(40).build();
        player.stats.effects.push(StatusEffect::new(StatusKind::AttackBoost, 2));
        let mut enemies = vec![Npc::new("野狼", 2, 30, 8, 2)];
        enemies[0].stats.effects.push(StatusEffect::new(StatusKind::Poison, 1));
        let mut rng = SequenceRng::constant(0.5);

        let summary = {
            let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);
            engine.step(PlayerAction::Defend).unwrap();
            assert!(engine.player().stats.temp_atk > 0);
            engine.abandon();
            engine.into_summary()
        };

        assert!(summary.is_none());
        assert_eq!(player.gold, 40);
        assert_eq!(player.stats.temp_atk, 0);
        assert_eq!(player.stats.temp_def, 0);
        assert!(player.stats.effects.is_empty());
        assert!(enemies[0].stats.effects.is_empty());
    }

    #[test]
    fn defeat_halves_gold_and_leaves_player_standing() {
        let config = GameConfig::default();
        let mut player = Player::builder("勇者").gold(75).max_hp(40).build();
        player.stats.set_hp(1);
        let mut enemies = vec![Npc::new("巨魔", 5, 200, 30, 10)];
        let mut rng = SequenceRng::constant(0.5);

        let summary = {
            let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);
            let report = engine.step(PlayerAction::Defend).unwrap();
            assert_eq!(report.state, BattleState::Defeat);
            engine.into_summary().unwrap()
        };

        assert_eq!(summary.gold_lost, 38);
        assert_eq!(player.gold, 37);
        assert_eq!(player.hp(), 4);
        assert!(player.is_alive());
        assert_eq!(player.stats.temp_def, 0);
    }
}
