//! Quest state machine driven by gameplay events.
//!
//! Every entry point runs to completion on an explicit worklist. Completing a
//! task enqueues its follow-ups instead of calling back into the engine, so a
//! long chain of tasks never re-enters the player state recursively.

use std::collections::VecDeque;

use crate::config::GameConfig;
use crate::state::{Loot, Player, TargetType, TaskStatus, TaskTemplate};

use super::registry::{EventKind, FollowUpAction, TaskRegistry};

/// A completed task and the reward it paid out.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletedTask {
    pub task: String,
    pub experience: u32,
    pub reputation: i32,
    /// Name of the granted item, if any.
    pub item: Option<String>,
    pub levels_gained: u32,
}

/// Objective counter that moved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveProgress {
    pub task: String,
    pub current: u32,
    pub target: u32,
}

/// Relationship change caused by a follow-up.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationshipChange {
    pub npc: String,
    pub delta: i32,
    pub value: i32,
}

/// Everything one call changed, in the order it happened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressReport {
    pub accepted: Vec<String>,
    pub progressed: Vec<ObjectiveProgress>,
    pub completed: Vec<CompletedTask>,
    pub relationships: Vec<RelationshipChange>,
}

impl ProgressReport {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
            && self.progressed.is_empty()
            && self.completed.is_empty()
            && self.relationships.is_empty()
    }

    pub fn merge(&mut self, other: ProgressReport) {
        self.accepted.extend(other.accepted);
        self.progressed.extend(other.progressed);
        self.completed.extend(other.completed);
        self.relationships.extend(other.relationships);
    }
}

/// Result of a manual accept. Re-accepting is a no-op, never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcceptOutcome {
    Accepted(ProgressReport),
    AlreadyInProgress,
    AlreadyCompleted,
    UnknownTask,
}

enum Work {
    Triggers { event: EventKind, target: String },
    Relationship { npc: String, delta: i32 },
}

/// Applies gameplay events to a player's task book.
#[derive(Clone, Copy, Debug)]
pub struct TaskProgressionEngine<'a> {
    registry: &'a TaskRegistry,
    config: &'a GameConfig,
}

impl<'a> TaskProgressionEngine<'a> {
    pub fn new(registry: &'a TaskRegistry, config: &'a GameConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'a TaskRegistry {
        self.registry
    }

    /// Auto-accepts every not-yet-accepted task whose trigger matches
    /// `(event, target)`, then drains any follow-ups that causes.
    pub fn check_triggers(&self, player: &mut Player, event: EventKind, target: &str) -> ProgressReport {
        let mut report = ProgressReport::default();
        let mut queue = VecDeque::from([Work::Triggers {
            event,
            target: target.to_owned(),
        }]);
        self.drain(player, &mut queue, &mut report);
        report
    }

    /// Credits `amount` to every in-progress objective matching
    /// `(target_type, target)`, completing and rewarding tasks as they fill.
    pub fn record_progress(
        &self,
        player: &mut Player,
        target_type: TargetType,
        target: &str,
        amount: u32,
    ) -> ProgressReport {
        let mut report = ProgressReport::default();
        let mut queue = VecDeque::new();

        let mut filled = Vec::new();
        for task in player.tasks.iter_mut() {
            if task.status() != TaskStatus::InProgress
                || !task.objective().matches(target_type, target)
            {
                continue;
            }
            let objective = task.objective_mut();
            if objective.advance(amount) > 0 {
                report.progressed.push(ObjectiveProgress {
                    task: task.name().to_owned(),
                    current: task.objective().current_count(),
                    target: task.objective().target_count(),
                });
            }
            if task.objective().is_completed() {
                filled.push(task.name().to_owned());
            }
        }

        for name in filled {
            self.complete(player, &name, &mut queue, &mut report);
        }
        self.drain(player, &mut queue, &mut report);
        report
    }

    /// Accepts `name` directly, bypassing the trigger table.
    pub fn accept(&self, player: &mut Player, name: &str) -> AcceptOutcome {
        let Some(template) = self.registry.get(name) else {
            return AcceptOutcome::UnknownTask;
        };
        match player.tasks.status(name) {
            TaskStatus::InProgress => return AcceptOutcome::AlreadyInProgress,
            TaskStatus::Completed => return AcceptOutcome::AlreadyCompleted,
            TaskStatus::NotAccepted => {}
        }

        let mut report = ProgressReport::default();
        let mut queue = VecDeque::new();
        self.take(player, template, &mut queue, &mut report);
        self.drain(player, &mut queue, &mut report);
        AcceptOutcome::Accepted(report)
    }

    /// Full handling of one gameplay event: progress first, then triggers.
    ///
    /// A task accepted by this event is not credited by the same event.
    pub fn handle(&self, player: &mut Player, event: EventKind, target: &str) -> ProgressReport {
        let mut report = self.record_progress(player, event.target_type(), target, 1);
        report.merge(self.check_triggers(player, event, target));
        report
    }

    pub fn on_enter(&self, player: &mut Player, room: &str) -> ProgressReport {
        self.handle(player, EventKind::Enter, room)
    }

    pub fn on_talk(&self, player: &mut Player, npc: &str) -> ProgressReport {
        self.handle(player, EventKind::Talk, npc)
    }

    pub fn on_collect(&self, player: &mut Player, item: &str) -> ProgressReport {
        self.handle(player, EventKind::Collect, item)
    }

    pub fn on_kill(&self, player: &mut Player, npc: &str) -> ProgressReport {
        self.handle(player, EventKind::Kill, npc)
    }

    fn drain(&self, player: &mut Player, queue: &mut VecDeque<Work>, report: &mut ProgressReport) {
        while let Some(work) = queue.pop_front() {
            match work {
                Work::Triggers { event, target } => {
                    for template in self.registry.triggered_by(event, &target) {
                        if player.tasks.status(&template.name) == TaskStatus::NotAccepted {
                            self.take(player, template, queue, report);
                        }
                    }
                }
                Work::Relationship { npc, delta } => {
                    let value = player.modify_relationship(&npc, delta);
                    report.relationships.push(RelationshipChange { npc, delta, value });
                }
            }
        }
    }

    /// Attaches a private copy of `template`. An objective that is already
    /// satisfied (target count 0) completes on the spot.
    fn take(
        &self,
        player: &mut Player,
        template: &TaskTemplate,
        queue: &mut VecDeque<Work>,
        report: &mut ProgressReport,
    ) {
        let instance = template.accept();
        let done = instance.objective().is_completed();
        if !player.tasks.insert(instance) {
            return;
        }
        report.accepted.push(template.name.clone());
        if done {
            self.complete(player, &template.name, queue, report);
        }
    }

    fn complete(
        &self,
        player: &mut Player,
        name: &str,
        queue: &mut VecDeque<Work>,
        report: &mut ProgressReport,
    ) {
        let Some(task) = player.tasks.get_mut(name) else {
            return;
        };
        if !task.complete() {
            return;
        }
        let reward = task.reward().clone();

        let levels_gained = player.gain_experience(reward.experience, &self.config.progression);
        player.reputation = player.reputation.saturating_add(reward.reputation);
        let item = reward.item.map(|loot| {
            let name = loot.name().to_owned();
            match loot {
                Loot::Item(item) => player.inventory.add_item(item),
                Loot::Equipment { template, grade } => {
                    player
                        .inventory
                        .add_equipment(template.instantiate(grade, &self.config.equipment));
                }
            }
            name
        });

        report.completed.push(CompletedTask {
            task: name.to_owned(),
            experience: reward.experience,
            reputation: reward.reputation,
            item,
            levels_gained,
        });

        for action in self.registry.follow_ups_for(name) {
            queue.push_back(match action {
                FollowUpAction::CheckTriggers { event, target } => Work::Triggers {
                    event: *event,
                    target: target.clone(),
                },
                FollowUpAction::Relationship { npc, delta } => Work::Relationship {
                    npc: npc.clone(),
                    delta: *delta,
                },
            });
        }
    }
}
