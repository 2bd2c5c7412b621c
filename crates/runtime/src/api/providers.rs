//! Asynchronous abstraction for sourcing player battle commands.
//!
//! Runtime users plug in [`CommandProvider`] implementations so battles can
//! run with human input, scripted fixtures, or a simple automatic policy.
use std::collections::VecDeque;

use async_trait::async_trait;
use game_core::state::ItemKind;
use game_core::{CombatEngine, Combatant, PlayerAction};
use tokio::sync::Mutex;

use super::errors::{Result, RuntimeError};

/// Read-only snapshot of a battle handed to a [`CommandProvider`].
#[derive(Clone, Debug, PartialEq)]
pub struct BattleView {
    pub turn: u32,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub enemies: Vec<EnemyView>,
    /// Inventory items as `(slot, name, kind)`.
    pub items: Vec<(usize, String, ItemKind)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyView {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
}

impl EnemyView {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

impl BattleView {
    pub fn capture(engine: &CombatEngine<'_>) -> Self {
        let player = engine.player();
        Self {
            turn: engine.turn(),
            player_hp: player.hp(),
            player_max_hp: player.max_hp(),
            enemies: engine
                .enemies()
                .iter()
                .map(|enemy| EnemyView {
                    name: enemy.name().to_owned(),
                    hp: enemy.hp(),
                    max_hp: enemy.max_hp(),
                })
                .collect(),
            items: player
                .inventory
                .items()
                .iter()
                .enumerate()
                .map(|(slot, item)| (slot, item.name.clone(), item.kind))
                .collect(),
        }
    }

    /// Party index of the first enemy still standing.
    pub fn first_living_enemy(&self) -> Option<usize> {
        self.enemies.iter().position(EnemyView::is_alive)
    }
}

/// Trait for providing the player's command for the next battle turn.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Scripted/replayed commands
/// - Testing fixtures
#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// Provide the command for the turn described by `view`.
    ///
    /// A command the engine rejects does not consume the turn; the runtime
    /// asks again with the same view.
    async fn next_command(&self, view: &BattleView) -> Result<PlayerAction>;
}

/// Replays a fixed list of commands, then reports exhaustion.
pub struct ScriptedCommands {
    commands: Mutex<VecDeque<PlayerAction>>,
}

impl ScriptedCommands {
    pub fn new(commands: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            commands: Mutex::new(commands.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.commands.lock().await.len()
    }
}

#[async_trait]
impl CommandProvider for ScriptedCommands {
    async fn next_command(&self, _view: &BattleView) -> Result<PlayerAction> {
        self.commands
            .lock()
            .await
            .pop_front()
            .ok_or(RuntimeError::ProviderExhausted)
    }
}

/// Attacks the first living enemy, drinking medicine when hp runs low.
#[derive(Debug, Clone, Copy)]
pub struct AutoAttack {
    /// Heal when hp falls below this fraction of max hp.
    pub heal_below: f64,
}

impl Default for AutoAttack {
    fn default() -> Self {
        Self { heal_below: 0.3 }
    }
}

#[async_trait]
impl CommandProvider for AutoAttack {
    async fn next_command(&self, view: &BattleView) -> Result<PlayerAction> {
        let low = f64::from(view.player_hp) < f64::from(view.player_max_hp) * self.heal_below;
        if low
            && let Some(&(slot, _, _)) = view
                .items
                .iter()
                .find(|(_, _, kind)| *kind == ItemKind::Medicine)
        {
            return Ok(PlayerAction::UseItem { slot, target: None });
        }

        match view.first_living_enemy() {
            Some(target) => Ok(PlayerAction::Attack { target }),
            None => Ok(PlayerAction::Defend),
        }
    }
}
