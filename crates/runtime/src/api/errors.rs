//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine rejections, configuration problems, and content loading
//! failures so clients can bubble them up with consistent context.
use thiserror::Error;

use game_core::state::InventoryError;
use game_core::{ActionRejected, ConfigError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    ActionRejected(#[from] ActionRejected),

    #[error("battle aborted after {attempts} rejected commands in a row")]
    TooManyRejections {
        attempts: u32,
        #[source]
        last: ActionRejected,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),

    #[error("unknown task {0}")]
    UnknownTask(String),

    #[error("unknown npc {0}")]
    UnknownNpc(String),

    #[error("no equipment template named {0}")]
    UnknownEquipmentTemplate(String),

    #[error("no equipment in inventory slot {0}")]
    UnknownEquipment(usize),

    #[error("a battle needs at least one enemy")]
    NoEnemies,

    #[error("command provider has no more commands")]
    ProviderExhausted,

    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}
