//! Task catalog loader.

use std::path::Path;

use game_core::quest::{FollowUp, TaskRegistry, TriggerRule};
use game_core::state::TaskTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Task catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCatalog {
    pub tasks: Vec<TaskTemplate>,
    #[serde(default)]
    pub triggers: Vec<TriggerRule>,
    #[serde(default)]
    pub follow_ups: Vec<FollowUp>,
}

/// Loader for the task registry from RON files.
pub struct TaskLoader;

impl TaskLoader {
    /// Load task templates and both lookup tables, then build the registry.
    ///
    /// Fails if a task name is duplicated or a table refers to a task that
    /// does not exist.
    pub fn load(path: &Path) -> LoadResult<TaskRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TaskRegistry> {
        let catalog: TaskCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse task catalog RON: {}", e))?;

        TaskRegistry::new(catalog.tasks, catalog.triggers, catalog.follow_ups)
            .map_err(|e| anyhow::anyhow!("Invalid task catalog: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::quest::EventKind;
    use game_core::state::{Loot, TargetType};

    const CATALOG: &str = r#"
        (
            tasks: [
                (
                    name: "初来乍到",
                    objective: (target_type: explore, target_name: Some("村中心")),
                    reward: (experience: 50, reputation: 5),
                    main: true,
                ),
                (
                    name: "森林的威胁",
                    objective: (target_type: kill, target_name: Some("野狼"), target_count: 1),
                    reward: (
                        experience: 100,
                        reputation: 10,
                        item: Some(equipment(
                            template: (name: "狼牙项链", kind: weapon, base_effect: 3, max_level: 3),
                            grade: uncommon,
                        )),
                    ),
                ),
            ],
            triggers: [
                (task: "初来乍到", event: enter, target: "村中心"),
            ],
            follow_ups: [
                (after: "初来乍到", action: check_triggers(event: enter, target: "森林")),
            ],
        )
    "#;

    #[test]
    fn parses_templates_and_tables() {
        let registry = TaskLoader::parse(CATALOG).unwrap();
        assert_eq!(registry.len(), 2);

        let intro = registry.get("初来乍到").unwrap();
        assert!(intro.main);
        assert_eq!(intro.objective.target_type, TargetType::Explore);
        assert_eq!(intro.objective.target_count, 1);

        let wolves = registry.get("森林的威胁").unwrap();
        match wolves.reward.item.as_ref().unwrap() {
            Loot::Equipment { template, .. } => assert_eq!(template.max_level, 3),
            other => panic!("unexpected loot {other:?}"),
        }

        assert_eq!(registry.triggered_by(EventKind::Enter, "村中心").count(), 1);
        assert_eq!(registry.follow_ups_for("初来乍到").count(), 1);
    }

    #[test]
    fn rejects_dangling_trigger() {
        let err = TaskLoader::parse(
            r#"(tasks: [], triggers: [(task: "幽灵任务", event: talk, target: "村民")])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("幽灵任务"));
    }
}
