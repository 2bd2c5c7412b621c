//! Task progression: template registry, trigger tables and the event-driven
//! state machine that moves a player's tasks forward.

mod engine;
mod registry;

pub use engine::{
    AcceptOutcome, CompletedTask, ObjectiveProgress, ProgressReport, RelationshipChange,
    TaskProgressionEngine,
};
pub use registry::{EventKind, FollowUp, FollowUpAction, RegistryError, TaskRegistry, TriggerRule};
