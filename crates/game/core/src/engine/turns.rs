//! Turn phases: status apply, player action, enemy actions, status tick.

use crate::combat::{
    AttackProfile, EnemyMove, SpecialMove, StatusEffectEngine, choose_move, resolve_attack,
    resolve_with_profile,
};
use crate::state::{Combatant, ItemKind, StatusEffect, StatusKind};

use super::{AttackKind, BattleEvent, BattleState, CombatEngine, PlayerAction};

impl CombatEngine<'_> {
    pub(super) fn apply_phase(&mut self) {
        let name = self.player.name().to_owned();
        for tick in StatusEffectEngine::apply_all(&mut *self.player) {
            self.emit(BattleEvent::StatusTicked {
                target: name.clone(),
                tick,
            });
        }

        for index in 0..self.enemies.len() {
            if !self.enemies[index].is_alive() {
                continue;
            }
            let name = self.enemies[index].name().to_owned();
            for tick in StatusEffectEngine::apply_all(&mut self.enemies[index]) {
                self.emit(BattleEvent::StatusTicked {
                    target: name.clone(),
                    tick,
                });
            }
        }
        self.sweep_defeated();
    }

    pub(super) fn player_phase(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::Attack { target } => {
                if let Some(index) = self.retarget(target) {
                    self.player_attack(index);
                }
            }
            PlayerAction::Defend => self.defend(),
            PlayerAction::UseItem { slot, target } => self.use_item(slot, target),
            PlayerAction::Escape => self.attempt_escape(),
        }
        self.sweep_defeated();
    }

    fn player_attack(&mut self, index: usize) {
        let outcome = resolve_attack(&*self.player, &self.enemies[index], &mut *self.rng);
        let enemy = &mut self.enemies[index];
        enemy.take_damage(outcome.damage);
        let defender = enemy.name().to_owned();
        let defender_hp = enemy.hp();
        let alive = enemy.is_alive();

        self.emit(BattleEvent::AttackResolved {
            attacker: self.player.name().to_owned(),
            defender: defender.clone(),
            kind: AttackKind::Normal,
            outcome,
            defender_hp,
        });

        let config = self.config;
        let combat = &config.combat;
        if outcome.hit && alive && self.rng.chance(combat.on_hit_status_chance) {
            let pick = self.rng.next_int(0..StatusKind::ON_HIT.len() as u32) as usize;
            let kind = StatusKind::ON_HIT[pick];
            let intensity = combat.on_hit_status_intensity;
            StatusEffectEngine::inflict(
                &mut self.enemies[index],
                StatusEffect::new(kind, intensity),
            );
            self.emit(BattleEvent::StatusApplied {
                target: defender,
                kind,
                intensity,
            });
        }
    }

    /// The boost fires immediately so it covers this turn's enemy phase.
    fn defend(&mut self) {
        let config = self.config;
        let combat = &config.combat;
        let mut effect = StatusEffect::with_duration(
            StatusKind::DefenseBoost,
            combat.defend_intensity,
            combat.defend_duration,
        );
        let tick = StatusEffectEngine::apply(&mut effect, &mut self.player.stats);
        let intensity = effect.intensity();
        StatusEffectEngine::inflict(&mut *self.player, effect);

        let target = self.player.name().to_owned();
        self.emit(BattleEvent::StatusApplied {
            target: target.clone(),
            kind: StatusKind::DefenseBoost,
            intensity,
        });
        self.emit(BattleEvent::StatusTicked { target, tick });
    }

    fn use_item(&mut self, slot: usize, target: Option<usize>) {
        let usable = self
            .player
            .inventory
            .item(slot)
            .is_some_and(|item| item.kind.usable_in_battle());
        if !usable {
            return;
        }
        let Some(item) = self.player.inventory.take_item(slot) else {
            return;
        };
        let actor = self.player.name().to_owned();

        match item.kind {
            ItemKind::Medicine => {
                let amount = self.player.heal(item.effect);
                self.emit(BattleEvent::ItemUsed {
                    actor: actor.clone(),
                    item: item.name,
                    target: None,
                });
                self.emit(BattleEvent::Healed {
                    target: actor,
                    amount,
                });
            }
            ItemKind::BuffPotion => {
                let intensity = scaled_intensity(item.effect, 5);
                StatusEffectEngine::inflict(
                    &mut *self.player,
                    StatusEffect::new(StatusKind::AttackBoost, intensity),
                );
                self.emit(BattleEvent::ItemUsed {
                    actor: actor.clone(),
                    item: item.name,
                    target: None,
                });
                self.emit(BattleEvent::StatusApplied {
                    target: actor,
                    kind: StatusKind::AttackBoost,
                    intensity,
                });
            }
            ItemKind::Antidote => {
                let removed = StatusEffectEngine::cleanse(&mut *self.player);
                self.emit(BattleEvent::ItemUsed {
                    actor: actor.clone(),
                    item: item.name,
                    target: None,
                });
                for kind in removed {
                    self.emit(BattleEvent::StatusCleansed {
                        target: actor.clone(),
                        kind,
                    });
                }
            }
            ItemKind::Poison => {
                let Some(index) = target.and_then(|t| self.retarget(t)) else {
                    return;
                };
                let intensity = scaled_intensity(item.effect, 3);
                StatusEffectEngine::inflict(
                    &mut self.enemies[index],
                    StatusEffect::new(StatusKind::Poison, intensity),
                );
                let victim = self.enemies[index].name().to_owned();
                self.emit(BattleEvent::ItemUsed {
                    actor,
                    item: item.name,
                    target: Some(victim.clone()),
                });
                self.emit(BattleEvent::StatusApplied {
                    target: victim,
                    kind: StatusKind::Poison,
                    intensity,
                });
            }
            _ => {}
        }
    }

    fn attempt_escape(&mut self) {
        let levels: Vec<u32> = self
            .enemies
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.level())
            .collect();
        let average = if levels.is_empty() {
            0.0
        } else {
            f64::from(levels.iter().sum::<u32>()) / levels.len() as f64
        };

        let chance = self.config.combat.escape.chance(self.player.level(), average);
        let success = self.rng.chance(chance);
        self.emit(BattleEvent::EscapeAttempted { chance, success });
        if success {
            self.finish(BattleState::Escaped);
        }
    }

    pub(super) fn enemy_phase(&mut self) {
        for index in 0..self.enemies.len() {
            if !self.player.is_alive() {
                break;
            }
            if !self.enemies[index].is_alive() {
                continue;
            }
            if self.enemies[index].has_status(StatusKind::Stun) {
                let actor = self.enemies[index].name().to_owned();
                self.emit(BattleEvent::ActionSkipped {
                    actor,
                    cause: StatusKind::Stun,
                });
                continue;
            }

            match choose_move(&self.config.combat, &mut *self.rng) {
                EnemyMove::Normal => self.enemy_attack(index, AttackKind::Normal),
                EnemyMove::Strong => self.enemy_attack(index, AttackKind::Strong),
                EnemyMove::Special(special) => self.enemy_special(index, special),
            }
        }
    }

    fn enemy_attack(&mut self, index: usize, kind: AttackKind) {
        let profile = match kind {
            AttackKind::Normal => AttackProfile::NORMAL,
            AttackKind::Strong => AttackProfile::strong(&self.config.combat),
        };
        let outcome =
            resolve_with_profile(&self.enemies[index], &*self.player, profile, &mut *self.rng);
        self.player.take_damage(outcome.damage);

        self.emit(BattleEvent::AttackResolved {
            attacker: self.enemies[index].name().to_owned(),
            defender: self.player.name().to_owned(),
            kind,
            outcome,
            defender_hp: self.player.hp(),
        });
    }

    fn enemy_special(&mut self, index: usize, special: SpecialMove) {
        let attacker = self.enemies[index].name().to_owned();
        let target = self.player.name().to_owned();
        let config = self.config;
        let combat = &config.combat;

        match special {
            SpecialMove::ShredDefense => {
                let stats = &mut self.player.stats;
                if stats.temp_def > combat.defense_shred_floor {
                    stats.temp_def =
                        (stats.temp_def - combat.defense_shred).max(combat.defense_shred_floor);
                }
                let temp_def = stats.temp_def;
                self.emit(BattleEvent::DefenseShredded { target, temp_def });
            }
            SpecialMove::Hex(kind) => {
                StatusEffectEngine::inflict(&mut *self.player, StatusEffect::new(kind, 1));
                self.emit(BattleEvent::StatusApplied {
                    target,
                    kind,
                    intensity: 1,
                });
            }
            SpecialMove::Drain => {
                let share = (f64::from(self.player.hp()) * combat.drain_fraction).floor() as u32;
                let amount = self.player.take_damage(share.max(1));
                self.emit(BattleEvent::Drained {
                    attacker,
                    target,
                    amount,
                });
            }
        }
    }

    pub(super) fn tick_phase(&mut self) {
        let name = self.player.name().to_owned();
        for kind in StatusEffectEngine::tick(&mut *self.player) {
            self.emit(BattleEvent::StatusExpired {
                target: name.clone(),
                kind,
            });
        }

        for index in 0..self.enemies.len() {
            if !self.enemies[index].is_alive() {
                continue;
            }
            let name = self.enemies[index].name().to_owned();
            for kind in StatusEffectEngine::tick(&mut self.enemies[index]) {
                self.emit(BattleEvent::StatusExpired {
                    target: name.clone(),
                    kind,
                });
            }
        }
    }
}

/// `round(effect / divisor)`, never below 1.
fn scaled_intensity(effect: u32, divisor: u32) -> u32 {
    ((f64::from(effect) / f64::from(divisor)).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::SequenceRng;
    use crate::state::{Npc, Player};

    fn wolf() -> Npc {
        Npc::new("野狼", 2, 30, 8, 2)
    }

    /// Player who cannot act, so every draw goes to the enemy.
    fn stunned_player(turns: u32) -> Player {
        let mut player = Player::new("勇者");
        player
            .stats
            .effects
            .push(StatusEffect::with_duration(StatusKind::Stun, 1, turns));
        player
    }

    #[test]
    fn shred_lowers_defense_down_to_the_floor() {
        let config = GameConfig::default();
        let mut player = stunned_player(2);
        player.stats.temp_def = -8;
        let mut enemies = vec![wolf()];
        // Special bucket, then shred.
        let mut rng = SequenceRng::new([0.9, 0.1]);
        let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);

        let report = engine.step(PlayerAction::Defend).unwrap();
        assert!(report.events.contains(&BattleEvent::DefenseShredded {
            target: "勇者".into(),
            temp_def: -10,
        }));

        let report = engine.step(PlayerAction::Defend).unwrap();
        assert!(report.events.contains(&BattleEvent::DefenseShredded {
            target: "勇者".into(),
            temp_def: -10,
        }));
        assert_eq!(engine.player().stats.temp_def, -10);
        assert_eq!(engine.player().hp(), engine.player().max_hp());
    }

    #[test]
    fn drain_takes_a_fifth_of_current_hp_but_at_least_one() {
        let config = GameConfig::default();

        let mut player = stunned_player(1);
        player.stats.set_hp(57);
        let mut enemies = vec![wolf()];
        let mut rng = SequenceRng::new([0.9, 0.9]);
        let report = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config)
            .step(PlayerAction::Defend)
            .unwrap();
        assert!(report.events.contains(&BattleEvent::Drained {
            attacker: "野狼".into(),
            target: "勇者".into(),
            amount: 11,
        }));
        assert_eq!(player.hp(), 46);

        let mut player = stunned_player(1);
        player.stats.set_hp(3);
        let mut enemies = vec![wolf()];
        let mut rng = SequenceRng::new([0.9, 0.9]);
        let report = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config)
            .step(PlayerAction::Defend)
            .unwrap();
        assert!(report.events.contains(&BattleEvent::Drained {
            attacker: "野狼".into(),
            target: "勇者".into(),
            amount: 1,
        }));
        assert_eq!(player.hp(), 2);
    }

    #[test]
    fn hex_leaves_a_negative_status_on_the_player() {
        let config = GameConfig::default();
        let mut player = stunned_player(1);
        let mut enemies = vec![wolf()];
        // Special bucket, hex, third entry of the hex table.
        let mut rng = SequenceRng::new([0.9, 0.5, 0.7]);
        let report = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config)
            .step(PlayerAction::Defend)
            .unwrap();

        assert!(report.events.contains(&BattleEvent::StatusApplied {
            target: "勇者".into(),
            kind: StatusKind::Weak,
            intensity: 1,
        }));
        assert!(player.has_status(StatusKind::Weak));
        assert!(!StatusKind::Weak.is_positive());
        assert_eq!(player.hp(), player.max_hp());
    }

    #[test]
    fn failed_escape_still_lets_enemies_strike() {
        let config = GameConfig::default();
        let mut player = Player::new("勇者");
        let mut enemies = vec![wolf()];
        // Escape chance is 0.46 here; 0.5 fails, then a normal hit lands.
        let mut rng = SequenceRng::constant(0.5);
        let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);

        let report = engine.step(PlayerAction::Escape).unwrap();
        assert_eq!(report.state, BattleState::Active);
        assert!(report.events.iter().any(|event| matches!(
            event,
            BattleEvent::EscapeAttempted { success: false, chance } if (chance - 0.46).abs() < 1e-9
        )));
        assert!(report.events.iter().any(|event| matches!(
            event,
            BattleEvent::AttackResolved { attacker, kind: AttackKind::Normal, .. } if attacker == "野狼"
        )));
        assert!(engine.player().hp() < engine.player().max_hp());
        assert!(!engine.is_finished());
    }

    #[test]
    fn item_intensity_rounds_and_has_a_floor() {
        assert_eq!(scaled_intensity(10, 5), 2);
        assert_eq!(scaled_intensity(13, 5), 3);
        assert_eq!(scaled_intensity(6, 3), 2);
        assert_eq!(scaled_intensity(1, 5), 1);
    }
}
