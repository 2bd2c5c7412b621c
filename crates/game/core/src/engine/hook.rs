//! Battle events and the observer interface.
//!
//! The engine never renders anything. Every notable step of a turn is
//! recorded as a [`BattleEvent`] in the [`super::TurnReport`] and, when an
//! observer is attached, forwarded to it as it happens.

use crate::combat::{AttackOutcome, StatusTick};
use crate::state::StatusKind;

use super::BattleState;

/// Which attack an enemy (or the player) used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackKind {
    Normal,
    Strong,
}

/// Something that happened during a battle turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    TurnStarted {
        turn: u32,
    },
    AttackResolved {
        attacker: String,
        defender: String,
        kind: AttackKind,
        outcome: AttackOutcome,
        /// Defender hp after the damage was applied.
        defender_hp: u32,
    },
    StatusApplied {
        target: String,
        kind: StatusKind,
        intensity: u32,
    },
    StatusTicked {
        target: String,
        tick: StatusTick,
    },
    StatusExpired {
        target: String,
        kind: StatusKind,
    },
    StatusCleansed {
        target: String,
        kind: StatusKind,
    },
    /// Combatant lost its action to a status.
    ActionSkipped {
        actor: String,
        cause: StatusKind,
    },
    ItemUsed {
        actor: String,
        item: String,
        target: Option<String>,
    },
    Healed {
        target: String,
        amount: u32,
    },
    DefenseShredded {
        target: String,
        /// Temporary defense after the shred.
        temp_def: i32,
    },
    Drained {
        attacker: String,
        target: String,
        amount: u32,
    },
    EscapeAttempted {
        chance: f64,
        success: bool,
    },
    CombatantDefeated {
        name: String,
    },
    BattleFinished {
        state: BattleState,
    },
}

/// Presentation hook for battle events.
///
/// Override [`on_event`](Self::on_event) to receive everything, or the
/// individual methods to receive only what you render.
pub trait BattleObserver {
    fn on_event(&mut self, event: &BattleEvent) {
        match event {
            BattleEvent::TurnStarted { turn } => self.on_turn_started(*turn),
            BattleEvent::AttackResolved {
                attacker,
                defender,
                outcome,
                ..
            } => self.on_attack_resolved(attacker, defender, outcome),
            BattleEvent::StatusApplied {
                target,
                kind,
                intensity,
            } => self.on_status_applied(target, *kind, *intensity),
            BattleEvent::StatusExpired { target, kind }
            | BattleEvent::StatusCleansed { target, kind } => self.on_status_removed(target, *kind),
            BattleEvent::CombatantDefeated { name } => self.on_combatant_defeated(name),
            BattleEvent::BattleFinished { state } => self.on_battle_finished(*state),
            _ => {}
        }
    }

    fn on_turn_started(&mut self, _turn: u32) {}

    fn on_attack_resolved(&mut self, _attacker: &str, _defender: &str, _outcome: &AttackOutcome) {}

    fn on_status_applied(&mut self, _target: &str, _kind: StatusKind, _intensity: u32) {}

    fn on_status_removed(&mut self, _target: &str, _kind: StatusKind) {}

    fn on_combatant_defeated(&mut self, _name: &str) {}

    fn on_battle_finished(&mut self, _state: BattleState) {}
}

/// Collects every event; useful for tests and replays.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleObserver for EventLog {
    fn on_event(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }
}
