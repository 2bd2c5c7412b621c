//! Combat resolution primitives.
//!
//! Pure functions and stateless engines used by the battle loop:
//!
//! - [`resolve_attack`]: dodge, crit, elemental damage for one attack
//! - [`StatusEffectEngine`]: per-turn effect actions and aging
//! - [`choose_move`]: weighted enemy policy
//!
//! Nothing here applies damage on its own; callers feed the returned values
//! into the combatant's clamped mutators.

pub mod damage;
pub mod hit;
pub mod policy;
pub mod result;
pub mod status;

pub use damage::{base_damage, scale_damage};
pub use hit::{check_crit, check_dodge};
pub use policy::{EnemyMove, SpecialMove, choose_move};
pub use result::{AttackOutcome, AttackProfile, resolve_attack, resolve_with_profile};
pub use status::{EffectChange, StatusEffectEngine, StatusTick};
