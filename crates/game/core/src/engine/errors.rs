//! Rejections surfaced by [`super::CombatEngine::step`].
//!
//! A rejected action leaves the battle untouched: no phase runs and the turn
//! counter does not advance, so the caller can simply ask for another command.

use crate::error::{ErrorSeverity, GameError};
use crate::state::ItemKind;

use super::BattleState;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionRejected {
    #[error("battle already ended ({0})")]
    BattleFinished(BattleState),

    #[error("target index {index} is out of range ({enemies} enemies)")]
    InvalidTarget { index: usize, enemies: usize },

    #[error("target {index} has already been defeated")]
    TargetDefeated { index: usize },

    #[error("no item in inventory slot {slot}")]
    NoSuchItem { slot: usize },

    #[error("{name} ({kind}) cannot be used in battle")]
    ItemNotUsable { name: String, kind: ItemKind },

    #[error("{name} needs an enemy target")]
    MissingTarget { name: String },
}

impl GameError for ActionRejected {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BattleFinished(_) | Self::InvalidTarget { .. } => ErrorSeverity::Validation,
            Self::TargetDefeated { .. }
            | Self::NoSuchItem { .. }
            | Self::ItemNotUsable { .. }
            | Self::MissingTarget { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleFinished(_) => "BATTLE_FINISHED",
            Self::InvalidTarget { .. } => "BATTLE_INVALID_TARGET",
            Self::TargetDefeated { .. } => "BATTLE_TARGET_DEFEATED",
            Self::NoSuchItem { .. } => "BATTLE_NO_SUCH_ITEM",
            Self::ItemNotUsable { .. } => "BATTLE_ITEM_NOT_USABLE",
            Self::MissingTarget { .. } => "BATTLE_MISSING_TARGET",
        }
    }
}
