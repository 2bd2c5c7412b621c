//! Immutable task templates plus the trigger and follow-up tables.

use std::collections::HashMap;

use crate::error::{ErrorSeverity, GameError};
use crate::state::{TargetType, TaskTemplate};

/// Gameplay event forwarded from the command layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventKind {
    /// Player entered a room.
    Enter,
    /// Player talked to an NPC.
    Talk,
    /// Player picked up an item.
    Collect,
    /// Player defeated an NPC.
    Kill,
}

impl EventKind {
    /// Objective type credited by this event.
    pub const fn target_type(self) -> TargetType {
        match self {
            Self::Enter => TargetType::Explore,
            Self::Talk => TargetType::Talk,
            Self::Collect => TargetType::Collect,
            Self::Kill => TargetType::Kill,
        }
    }
}

/// Auto-accepts `task` when `(event, target)` occurs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerRule {
    pub task: String,
    pub event: EventKind,
    pub target: String,
}

impl TriggerRule {
    pub fn new(task: impl Into<String>, event: EventKind, target: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            event,
            target: target.into(),
        }
    }
}

/// What completing a task sets in motion.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FollowUpAction {
    /// Re-evaluate triggers as if `(event, target)` had just happened.
    CheckTriggers { event: EventKind, target: String },
    /// Shift the player's relationship with an NPC.
    Relationship { npc: String, delta: i32 },
}

/// Follow-up fired when `after` completes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FollowUp {
    pub after: String,
    pub action: FollowUpAction,
}

impl FollowUp {
    pub fn triggers(after: impl Into<String>, event: EventKind, target: impl Into<String>) -> Self {
        Self {
            after: after.into(),
            action: FollowUpAction::CheckTriggers {
                event,
                target: target.into(),
            },
        }
    }

    pub fn relationship(after: impl Into<String>, npc: impl Into<String>, delta: i32) -> Self {
        Self {
            after: after.into(),
            action: FollowUpAction::Relationship {
                npc: npc.into(),
                delta,
            },
        }
    }
}

/// Errors raised while assembling a [`TaskRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("task {0} is defined more than once")]
    DuplicateTask(String),

    #[error("{table} table references unknown task {task}")]
    UnknownTask { table: &'static str, task: String },
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateTask(_) => "QUEST_DUPLICATE_TASK",
            Self::UnknownTask { .. } => "QUEST_UNKNOWN_TASK",
        }
    }
}

/// Shared pool of task templates keyed by name, with the static trigger and
/// follow-up tables.
#[derive(Clone, Debug, Default)]
pub struct TaskRegistry {
    templates: Vec<TaskTemplate>,
    index: HashMap<String, usize>,
    triggers: Vec<TriggerRule>,
    follow_ups: Vec<FollowUp>,
}

impl TaskRegistry {
    /// Builds a registry, rejecting duplicate names and table entries that
    /// point at unknown tasks.
    pub fn new(
        templates: Vec<TaskTemplate>,
        triggers: Vec<TriggerRule>,
        follow_ups: Vec<FollowUp>,
    ) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(templates.len());
        for (position, template) in templates.iter().enumerate() {
            if index.insert(template.name.clone(), position).is_some() {
                return Err(RegistryError::DuplicateTask(template.name.clone()));
            }
        }

        if let Some(rule) = triggers.iter().find(|r| !index.contains_key(&r.task)) {
            return Err(RegistryError::UnknownTask {
                table: "trigger",
                task: rule.task.clone(),
            });
        }
        if let Some(follow_up) = follow_ups.iter().find(|f| !index.contains_key(&f.after)) {
            return Err(RegistryError::UnknownTask {
                table: "follow-up",
                task: follow_up.after.clone(),
            });
        }

        Ok(Self {
            templates,
            index,
            triggers,
            follow_ups,
        })
    }

    pub fn get(&self, name: &str) -> Option<&TaskTemplate> {
        self.index.get(name).map(|&i| &self.templates[i])
    }

    pub fn templates(&self) -> &[TaskTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Tasks whose trigger matches `(event, target)`, in table order.
    pub fn triggered_by<'a>(
        &'a self,
        event: EventKind,
        target: &'a str,
    ) -> impl Iterator<Item = &'a TaskTemplate> + 'a {
        self.triggers
            .iter()
            .filter(move |rule| rule.event == event && rule.target == target)
            .filter_map(|rule| self.get(&rule.task))
    }

    pub fn follow_ups_for<'a>(&'a self, task: &'a str) -> impl Iterator<Item = &'a FollowUpAction> + 'a {
        self.follow_ups
            .iter()
            .filter(move |f| f.after == task)
            .map(|f| &f.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ObjectiveSpec, Reward};

    fn template(name: &str) -> TaskTemplate {
        TaskTemplate::new(
            name,
            ObjectiveSpec::new(TargetType::Explore, "村中心", 1),
            Reward::new(50, 5),
        )
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = TaskRegistry::new(vec![template("初来乍到"), template("初来乍到")], vec![], vec![]);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateTask("初来乍到".into())
        );
    }

    #[test]
    fn rejects_dangling_table_entries() {
        let result = TaskRegistry::new(
            vec![template("初来乍到")],
            vec![TriggerRule::new("不存在", EventKind::Enter, "村中心")],
            vec![],
        );
        assert!(matches!(
            result,
            Err(RegistryError::UnknownTask { table: "trigger", .. })
        ));

        let result = TaskRegistry::new(
            vec![template("初来乍到")],
            vec![],
            vec![FollowUp::relationship("不存在", "铁匠", 5)],
        );
        assert!(matches!(
            result,
            Err(RegistryError::UnknownTask { table: "follow-up", .. })
        ));
    }

    #[test]
    fn looks_up_triggers_and_follow_ups() {
        let registry = TaskRegistry::new(
            vec![template("初来乍到"), template("森林的威胁")],
            vec![
                TriggerRule::new("初来乍到", EventKind::Enter, "村中心"),
                TriggerRule::new("森林的威胁", EventKind::Enter, "森林"),
            ],
            vec![FollowUp::triggers("初来乍到", EventKind::Enter, "森林")],
        )
        .unwrap();

        let names: Vec<_> = registry
            .triggered_by(EventKind::Enter, "森林")
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["森林的威胁"]);
        assert_eq!(registry.triggered_by(EventKind::Talk, "森林").count(), 0);
        assert_eq!(registry.follow_ups_for("初来乍到").count(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn events_map_to_objective_types() {
        assert_eq!(EventKind::Enter.target_type(), TargetType::Explore);
        assert_eq!(EventKind::Kill.target_type(), TargetType::Kill);
        assert_eq!("talk".parse::<EventKind>(), Ok(EventKind::Talk));
    }
}
