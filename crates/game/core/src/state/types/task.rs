//! Quest (task) templates and per-player instances.
//!
//! A [`TaskTemplate`] is immutable shared data. Accepting a task clones its
//! objective and reward into a [`TaskInstance`] owned by the player's
//! [`TaskBook`], so progress never leaks back into the template pool.

use super::{EquipmentGrade, EquipmentTemplate, Item};

/// What an objective counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetType {
    Kill,
    Collect,
    Talk,
    Explore,
}

/// Lifecycle of a task for one player. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskStatus {
    NotAccepted,
    InProgress,
    Completed,
}

/// Objective definition as stored in a template.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveSpec {
    pub target_type: TargetType,
    /// `None` matches any target.
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default = "ObjectiveSpec::default_count"))]
    pub target_count: u32,
}

impl ObjectiveSpec {
    pub fn new(target_type: TargetType, target_name: impl Into<String>, target_count: u32) -> Self {
        Self {
            target_type,
            target_name: Some(target_name.into()),
            target_count,
        }
    }

    /// Objective satisfied by any target of `target_type`.
    pub fn any(target_type: TargetType, target_count: u32) -> Self {
        Self {
            target_type,
            target_name: None,
            target_count,
        }
    }

    #[cfg(feature = "serde")]
    fn default_count() -> u32 {
        1
    }

    fn start(&self) -> TaskObjective {
        TaskObjective {
            target_type: self.target_type,
            target_name: self.target_name.clone(),
            target_count: self.target_count,
            current_count: 0,
        }
    }
}

/// Live objective counter inside an accepted task.
///
/// `current_count` never exceeds `target_count`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskObjective {
    target_type: TargetType,
    target_name: Option<String>,
    target_count: u32,
    current_count: u32,
}

impl TaskObjective {
    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    pub fn target_name(&self) -> Option<&str> {
        self.target_name.as_deref()
    }

    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    pub fn current_count(&self) -> u32 {
        self.current_count
    }

    pub fn is_completed(&self) -> bool {
        self.current_count >= self.target_count
    }

    /// Whether an event of `target_type` on `target` counts toward this objective.
    pub fn matches(&self, target_type: TargetType, target: &str) -> bool {
        self.target_type == target_type
            && self.target_name.as_deref().is_none_or(|name| name == target)
    }

    /// Adds `amount`, clamped to the target. Returns the amount actually counted.
    pub(crate) fn advance(&mut self, amount: u32) -> u32 {
        let before = self.current_count;
        self.current_count = self
            .current_count
            .saturating_add(amount)
            .min(self.target_count);
        self.current_count - before
    }
}

/// Item granted by a reward.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Loot {
    Item(Item),
    Equipment {
        template: EquipmentTemplate,
        #[cfg_attr(feature = "serde", serde(default))]
        grade: EquipmentGrade,
    },
}

impl Loot {
    pub fn name(&self) -> &str {
        match self {
            Self::Item(item) => &item.name,
            Self::Equipment { template, .. } => &template.name,
        }
    }
}

/// What completing a task grants. Applied exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Reward {
    pub experience: u32,
    pub reputation: i32,
    pub item: Option<Loot>,
    pub description: String,
}

impl Reward {
    pub fn new(experience: u32, reputation: i32) -> Self {
        Self {
            experience,
            reputation,
            ..Self::default()
        }
    }

    pub fn with_item(mut self, item: Loot) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Shared, immutable task definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskTemplate {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub objective: ObjectiveSpec,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reward: Reward,
    #[cfg_attr(feature = "serde", serde(default))]
    pub main: bool,
}

impl TaskTemplate {
    pub fn new(name: impl Into<String>, objective: ObjectiveSpec, reward: Reward) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            objective,
            reward,
            main: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn main_quest(mut self) -> Self {
        self.main = true;
        self
    }

    /// Private copy of objective and reward, in progress.
    pub fn accept(&self) -> TaskInstance {
        TaskInstance {
            name: self.name.clone(),
            objective: self.objective.start(),
            reward: self.reward.clone(),
            main: self.main,
            status: TaskStatus::InProgress,
        }
    }
}

/// A task accepted by one player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskInstance {
    name: String,
    objective: TaskObjective,
    reward: Reward,
    main: bool,
    status: TaskStatus,
}

impl TaskInstance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn objective(&self) -> &TaskObjective {
        &self.objective
    }

    pub fn reward(&self) -> &Reward {
        &self.reward
    }

    pub fn is_main(&self) -> bool {
        self.main
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub(crate) fn objective_mut(&mut self) -> &mut TaskObjective {
        &mut self.objective
    }

    /// Moves an in-progress task to `Completed`. Returns false if it was not
    /// in progress, so a reward can never be issued twice.
    pub(crate) fn complete(&mut self) -> bool {
        if self.status != TaskStatus::InProgress {
            return false;
        }
        self.status = TaskStatus::Completed;
        true
    }
}

/// Per-player arena of accepted tasks, in acceptance order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskBook {
    tasks: Vec<TaskInstance>,
}

impl TaskBook {
    pub fn get(&self, name: &str) -> Option<&TaskInstance> {
        self.tasks.iter().find(|task| task.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut TaskInstance> {
        self.tasks.iter_mut().find(|task| task.name == name)
    }

    /// Status of `name` for this player; unknown tasks are `NotAccepted`.
    pub fn status(&self, name: &str) -> TaskStatus {
        self.get(name)
            .map_or(TaskStatus::NotAccepted, TaskInstance::status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskInstance> {
        self.tasks.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TaskInstance> {
        self.tasks.iter_mut()
    }

    pub fn in_progress(&self) -> impl Iterator<Item = &TaskInstance> {
        self.tasks
            .iter()
            .filter(|task| task.status == TaskStatus::InProgress)
    }

    pub fn completed(&self) -> impl Iterator<Item = &TaskInstance> {
        self.tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Inserts a freshly accepted instance. Returns false if one already exists.
    pub(crate) fn insert(&mut self, task: TaskInstance) -> bool {
        if self.get(&task.name).is_some() {
            return false;
        }
        self.tasks.push(task);
        true
    }
}
