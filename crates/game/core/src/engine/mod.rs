//! Battle state machine.
//!
//! The [`CombatEngine`] borrows the player and the enemy party for the length
//! of one battle and advances it one turn per [`CombatEngine::step`]. Every
//! turn runs the same fixed phase order:
//!
//! 1. status apply (player, then each living enemy)
//! 2. defeat check
//! 3. player action, unless stunned
//! 4. victory check
//! 5. enemy actions in party order
//! 6. defeat check
//! 7. status tick for every participant
//!
//! Terminal states skip the remaining phases and settle rewards or penalties.
//! The engine never performs I/O; each notable step is reported as a
//! [`BattleEvent`] in the returned [`TurnReport`] and forwarded to an
//! optional [`BattleObserver`].

mod errors;
mod hook;
mod settle;
mod turns;

pub use errors::ActionRejected;
pub use hook::{AttackKind, BattleEvent, BattleObserver, EventLog};
pub use settle::BattleSummary;

use crate::config::GameConfig;
use crate::env::RandomSource;
use crate::quest::TaskProgressionEngine;
use crate::state::{Combatant, Npc, Player, StatusKind};

/// Battle lifecycle. Everything but `Active` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleState {
    #[default]
    Active,
    Victory,
    Defeat,
    Escaped,
}

impl BattleState {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// One player command for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerAction {
    /// Attack the enemy at this party index.
    Attack { target: usize },
    /// Brace for the enemy phase with a short defense boost.
    Defend,
    /// Use the inventory item in `slot`, aimed at `target` if it needs one.
    UseItem { slot: usize, target: Option<usize> },
    Escape,
}

/// What one call to [`CombatEngine::step`] did.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    pub turn: u32,
    pub events: Vec<BattleEvent>,
    /// Battle state after the turn.
    pub state: BattleState,
}

/// Turn-based battle between the player and a party of NPCs.
pub struct CombatEngine<'a> {
    player: &'a mut Player,
    enemies: &'a mut [Npc],
    rng: &'a mut dyn RandomSource,
    config: &'a GameConfig,
    observer: Option<&'a mut dyn BattleObserver>,
    quests: Option<&'a TaskProgressionEngine<'a>>,
    state: BattleState,
    turn: u32,
    /// Enemies standing when the battle began; only these count as kills.
    fought: Vec<bool>,
    /// Enemies already reported as defeated.
    announced: Vec<bool>,
    events: Vec<BattleEvent>,
    summary: Option<BattleSummary>,
}

impl<'a> CombatEngine<'a> {
    pub fn new(
        player: &'a mut Player,
        enemies: &'a mut [Npc],
        rng: &'a mut dyn RandomSource,
        config: &'a GameConfig,
    ) -> Self {
        let fought: Vec<bool> = enemies.iter().map(|enemy| enemy.is_alive()).collect();
        let announced = fought.iter().map(|alive| !alive).collect();
        Self {
            player,
            enemies,
            rng,
            config,
            observer: None,
            quests: None,
            state: BattleState::Active,
            turn: 0,
            fought,
            announced,
            events: Vec::new(),
            summary: None,
        }
    }

    /// Forwards every event to `observer` as it happens.
    pub fn with_observer(mut self, observer: &'a mut dyn BattleObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Reports each defeated enemy as a kill event on victory.
    pub fn with_quests(mut self, quests: &'a TaskProgressionEngine<'a>) -> Self {
        self.quests = Some(quests);
        self
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Turns started so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn player(&self) -> &Player {
        self.player
    }

    pub fn enemies(&self) -> &[Npc] {
        self.enemies
    }

    /// Party indices of enemies still standing.
    pub fn living_enemies(&self) -> impl Iterator<Item = usize> + '_ {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| enemy.is_alive())
            .map(|(index, _)| index)
    }

    /// Settlement of a finished battle.
    pub fn summary(&self) -> Option<&BattleSummary> {
        self.summary.as_ref()
    }

    /// Consumes the engine, yielding the settlement if the battle ended.
    pub fn into_summary(self) -> Option<BattleSummary> {
        self.summary
    }

    /// Runs one full turn with `action` as the player's command.
    ///
    /// The command is checked against the current state first. A rejected
    /// command changes nothing and does not consume the turn. A stunned
    /// player's command is ignored without being checked.
    pub fn step(&mut self, action: PlayerAction) -> Result<TurnReport, ActionRejected> {
        if self.state.is_terminal() {
            return Err(ActionRejected::BattleFinished(self.state));
        }
        let stunned = self.player.has_status(StatusKind::Stun);
        if !stunned {
            self.validate(&action)?;
        }

        self.turn += 1;
        self.emit(BattleEvent::TurnStarted { turn: self.turn });

        self.apply_phase();
        if !self.player.is_alive() {
            self.finish(BattleState::Defeat);
        } else if self.all_enemies_down() {
            self.finish(BattleState::Victory);
        } else {
            if stunned {
                let actor = self.player.name().to_owned();
                self.emit(BattleEvent::ActionSkipped {
                    actor,
                    cause: StatusKind::Stun,
                });
            } else {
                self.player_phase(action);
            }

            if !self.state.is_terminal() {
                if self.all_enemies_down() {
                    self.finish(BattleState::Victory);
                } else {
                    self.enemy_phase();
                    if !self.player.is_alive() {
                        self.finish(BattleState::Defeat);
                    } else {
                        self.tick_phase();
                    }
                }
            }
        }

        Ok(TurnReport {
            turn: self.turn,
            events: std::mem::take(&mut self.events),
            state: self.state,
        })
    }

    fn validate(&self, action: &PlayerAction) -> Result<(), ActionRejected> {
        match *action {
            PlayerAction::Attack { target } => self.validate_target(target),
            PlayerAction::UseItem { slot, target } => {
                let item = self
                    .player
                    .inventory
                    .item(slot)
                    .ok_or(ActionRejected::NoSuchItem { slot })?;
                if !item.kind.usable_in_battle() {
                    return Err(ActionRejected::ItemNotUsable {
                        name: item.name.clone(),
                        kind: item.kind,
                    });
                }
                if item.kind.targets_enemy() {
                    let target = target.ok_or_else(|| ActionRejected::MissingTarget {
                        name: item.name.clone(),
                    })?;
                    self.validate_target(target)?;
                }
                Ok(())
            }
            PlayerAction::Defend | PlayerAction::Escape => Ok(()),
        }
    }

    fn validate_target(&self, index: usize) -> Result<(), ActionRejected> {
        let enemy = self.enemies.get(index).ok_or(ActionRejected::InvalidTarget {
            index,
            enemies: self.enemies.len(),
        })?;
        if !enemy.is_alive() {
            return Err(ActionRejected::TargetDefeated { index });
        }
        Ok(())
    }

    fn all_enemies_down(&self) -> bool {
        self.enemies.iter().all(|enemy| !enemy.is_alive())
    }

    /// `preferred` if it is still standing, else the first living enemy.
    fn retarget(&self, preferred: usize) -> Option<usize> {
        match self.enemies.get(preferred) {
            Some(enemy) if enemy.is_alive() => Some(preferred),
            _ => self.living_enemies().next(),
        }
    }

    fn emit(&mut self, event: BattleEvent) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_event(&event);
        }
        self.events.push(event);
    }

    /// Reports enemies that dropped since the last sweep.
    fn sweep_defeated(&mut self) {
        for index in 0..self.enemies.len() {
            if !self.announced[index] && !self.enemies[index].is_alive() {
                self.announced[index] = true;
                let name = self.enemies[index].name().to_owned();
                self.emit(BattleEvent::CombatantDefeated { name });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::EffectChange;
    use crate::env::SequenceRng;
    use crate::state::{Item, ItemKind, StatusEffect};

    fn wolf() -> Npc {
        Npc::new("野狼", 2, 30, 8, 2)
    }

    #[test]
    fn rejected_action_does_not_consume_turn() {
        let config = GameConfig::default();
        let mut player = Player::new("勇者");
        let mut enemies = vec![wolf()];
        let mut rng = SequenceRng::constant(0.5);
        let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);

        assert_eq!(
            engine.step(PlayerAction::Attack { target: 3 }),
            Err(ActionRejected::InvalidTarget { index: 3, enemies: 1 })
        );
        assert_eq!(
            engine.step(PlayerAction::UseItem { slot: 0, target: None }),
            Err(ActionRejected::NoSuchItem { slot: 0 })
        );
        assert_eq!(engine.turn(), 0);
        assert_eq!(engine.state(), BattleState::Active);
        assert_eq!(engine.enemies()[0].hp(), 30);
    }

    #[test]
    fn clue_items_cannot_be_used_in_battle() {
        let config = GameConfig::default();
        let mut player = Player::new("勇者");
        player.inventory.add_item(Item::new("旧地图", ItemKind::Clue, 0));
        let mut enemies = vec![wolf()];
        let mut rng = SequenceRng::constant(0.5);
        let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);

        let rejected = engine.step(PlayerAction::UseItem { slot: 0, target: None });
        assert!(matches!(rejected, Err(ActionRejected::ItemNotUsable { .. })));
        assert_eq!(engine.player().inventory.items().len(), 1);
    }

    #[test]
    fn poison_item_needs_a_target() {
        let config = GameConfig::default();
        let mut player = Player::new("勇者");
        player.inventory.add_item(Item::new("毒药", ItemKind::Poison, 6));
        let mut enemies = vec![wolf()];
        let mut rng = SequenceRng::constant(0.5);
        let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);

        assert_eq!(
            engine.step(PlayerAction::UseItem { slot: 0, target: None }),
            Err(ActionRejected::MissingTarget { name: "毒药".into() })
        );

        let report = engine
            .step(PlayerAction::UseItem { slot: 0, target: Some(0) })
            .unwrap();
        assert!(report.events.contains(&BattleEvent::StatusApplied {
            target: "野狼".into(),
            kind: StatusKind::Poison,
            intensity: 2,
        }));
        assert!(engine.player().inventory.items().is_empty());
    }

    #[test]
    fn stunned_player_loses_the_action() {
        let config = GameConfig::default();
        let mut player = Player::new("勇者");
        player.stats.effects.push(StatusEffect::with_duration(StatusKind::Stun, 1, 1));
        let mut enemies = vec![wolf()];
        let mut rng = SequenceRng::constant(0.5);
        let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);

        // Out-of-range target is ignored because the action never runs.
        let report = engine.step(PlayerAction::Attack { target: 9 }).unwrap();
        assert!(report.events.contains(&BattleEvent::ActionSkipped {
            actor: "勇者".into(),
            cause: StatusKind::Stun,
        }));
        assert_eq!(engine.enemies()[0].hp(), 30);
        assert!(!engine.player().has_status(StatusKind::Stun));
    }

    #[test]
    fn defend_protects_during_enemy_phase_then_expires() {
        let config = GameConfig::default();
        let mut player = Player::new("勇者");
        let mut enemies = vec![wolf()];
        // Every roll 0.2: normal enemy attack, no dodge, no crit.
        let mut rng = SequenceRng::constant(0.2);
        let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);

        let report = engine.step(PlayerAction::Defend).unwrap();
        assert!(report.events.iter().any(|event| matches!(
            event,
            BattleEvent::StatusTicked { tick, .. } if tick.change == EffectChange::Defense(4)
        )));
        // 8 atk against 5 def + 4 temp def.
        assert_eq!(engine.player().hp(), 99);
        assert_eq!(engine.player().stats.temp_def, 0);
        assert!(!engine.player().has_status(StatusKind::DefenseBoost));
    }

    #[test]
    fn finished_battle_rejects_further_actions() {
        let config = GameConfig::default();
        let mut player = Player::new("勇者");
        let mut enemies = vec![Npc::new("史莱姆", 1, 3, 1, 0)];
        let mut rng = SequenceRng::constant(0.5);
        let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config);

        let report = engine.step(PlayerAction::Attack { target: 0 }).unwrap();
        assert_eq!(report.state, BattleState::Victory);
        assert_eq!(
            engine.step(PlayerAction::Defend),
            Err(ActionRejected::BattleFinished(BattleState::Victory))
        );
    }

    #[test]
    fn observer_sees_every_event() {
        let config = GameConfig::default();
        let mut player = Player::new("勇者");
        let mut enemies = vec![wolf()];
        let mut rng = SequenceRng::constant(0.5);
        let mut log = EventLog::default();
        let report = {
            let mut engine = CombatEngine::new(&mut player, &mut enemies, &mut rng, &config)
                .with_observer(&mut log);
            engine.step(PlayerAction::Attack { target: 0 }).unwrap()
        };
        assert_eq!(log.events, report.events);
        assert_eq!(log.events[0], BattleEvent::TurnStarted { turn: 1 });
    }
}
