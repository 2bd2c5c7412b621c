//! Event types for different topics.

use game_core::quest::{CompletedTask, ObjectiveProgress, RelationshipChange};
use game_core::{ProgressReport, RepairResult, UpgradeResult};
use serde::{Deserialize, Serialize};

/// Task lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestEvent {
    Accepted { task: String },
    Progressed(ObjectiveProgress),
    Completed(CompletedTask),
    RelationshipChanged(RelationshipChange),
}

impl QuestEvent {
    /// Flattens a report into events, in the order the engine produced them
    /// per category.
    pub fn from_report(report: &ProgressReport) -> Vec<QuestEvent> {
        let accepted = report
            .accepted
            .iter()
            .map(|task| QuestEvent::Accepted { task: task.clone() });
        let progressed = report.progressed.iter().cloned().map(QuestEvent::Progressed);
        let completed = report.completed.iter().cloned().map(QuestEvent::Completed);
        let relationships = report
            .relationships
            .iter()
            .cloned()
            .map(QuestEvent::RelationshipChanged);

        accepted
            .chain(progressed)
            .chain(completed)
            .chain(relationships)
            .collect()
    }
}

/// Equipment upgrade and repair results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForgeEvent {
    Upgrade {
        equipment: String,
        result: UpgradeResult,
    },
    Repair {
        equipment: String,
        result: RepairResult,
    },
}
