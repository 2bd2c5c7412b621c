//! Gameplay session: the player, the loaded content, and one random source.
//!
//! [`GameSession`] routes room, dialogue and pickup events into the task
//! engine, drives battles through a [`CommandProvider`], and runs the forge.
//! Every outcome is published on the session's [`EventBus`].

use game_content::{ContentFactory, EquipmentCatalog, NpcCatalog};
use game_core::state::{EquipmentGrade, Npc};
use game_core::{
    AcceptOutcome, BattleSummary, CombatEngine, Forge, GameConfig, Player,
    ProgressReport, RepairResult, TaskProgressionEngine, TaskRegistry, UpgradeResult,
};
use game_core::state::Difficulty;
use game_core::env::derive_seed;
use game_core::{PcgRng, RandomSource};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::{BattleView, CommandProvider, Result, RuntimeError};
use crate::config::SessionConfig;
use crate::events::{BusObserver, Event, EventBus, ForgeEvent, QuestEvent, Topic};

/// Consecutive rejected commands tolerated before a battle is abandoned.
const MAX_REJECTIONS: u32 = 8;

const BATTLE_STREAM: u32 = 0;
const ITEM_STREAM: u32 = 1;

/// Content a session plays against.
#[derive(Clone, Debug)]
pub struct SessionContent {
    pub config: GameConfig,
    pub tasks: TaskRegistry,
    pub npcs: NpcCatalog,
    pub equipment: EquipmentCatalog,
}

impl SessionContent {
    pub fn load(factory: &ContentFactory) -> Result<Self> {
        Ok(Self {
            config: factory.load_config()?,
            tasks: factory.load_tasks()?,
            npcs: factory.load_npcs()?,
            equipment: factory.load_equipment()?,
        })
    }

    pub fn quests(&self) -> TaskProgressionEngine<'_> {
        TaskProgressionEngine::new(&self.tasks, &self.config)
    }
}

pub struct GameSession {
    player: Player,
    content: SessionContent,
    difficulty: Difficulty,
    /// Forge and loot rolls. Each battle gets its own derived stream.
    rng: PcgRng,
    seed: u64,
    battles: u64,
    bus: EventBus,
}

impl GameSession {
    pub fn new(player: Player, content: SessionContent, settings: &SessionConfig) -> Result<Self> {
        content.config.validate()?;
        let seed = settings.resolve_seed();
        info!(seed, difficulty = %settings.difficulty, "session created");

        Ok(Self {
            player,
            content,
            difficulty: settings.difficulty,
            rng: PcgRng::seeded(derive_seed(seed, 0, ITEM_STREAM)),
            seed,
            battles: 0,
            bus: EventBus::with_capacity(settings.event_buffer_size),
        })
    }

    /// Loads content from the configured directory and creates a fresh
    /// player with the catalog's starting items.
    pub fn start(player_name: &str, settings: &SessionConfig) -> Result<Self> {
        let factory = match &settings.data_dir {
            Some(dir) => ContentFactory::new(dir),
            None => ContentFactory::bundled(),
        };
        debug!(data_dir = %factory.data_dir().display(), "loading content");

        let content = SessionContent::load(&factory)?;
        let items = factory.load_items()?;

        let mut player = Player::with_difficulty(player_name, settings.difficulty);
        for item in items.starting_items() {
            player.inventory.add_item(item);
        }

        Self::new(player, content, settings)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn content(&self) -> &SessionContent {
        &self.content
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> Option<broadcast::Receiver<Event>> {
        self.bus.subscribe(topic)
    }

    pub fn on_enter(&mut self, room: &str) -> ProgressReport {
        let report = self.content.quests().on_enter(&mut self.player, room);
        self.publish_progress(&report);
        report
    }

    pub fn on_talk(&mut self, npc: &str) -> ProgressReport {
        let report = self.content.quests().on_talk(&mut self.player, npc);
        self.publish_progress(&report);
        report
    }

    pub fn on_collect(&mut self, item: &str) -> ProgressReport {
        let report = self.content.quests().on_collect(&mut self.player, item);
        self.publish_progress(&report);
        report
    }

    pub fn on_kill(&mut self, npc: &str) -> ProgressReport {
        let report = self.content.quests().on_kill(&mut self.player, npc);
        self.publish_progress(&report);
        report
    }

    /// Accepts a task by name. Re-accepting is reported, not an error.
    pub fn accept_task(&mut self, name: &str) -> Result<AcceptOutcome> {
        let outcome = self.content.quests().accept(&mut self.player, name);
        match &outcome {
            AcceptOutcome::Accepted(report) => self.publish_progress(report),
            AcceptOutcome::UnknownTask => return Err(RuntimeError::UnknownTask(name.to_owned())),
            AcceptOutcome::AlreadyInProgress | AcceptOutcome::AlreadyCompleted => {
                debug!(task = name, ?outcome, "task not accepted again");
            }
        }
        Ok(outcome)
    }

    /// Instantiates the named NPC template at the session difficulty.
    pub fn spawn(&self, name: &str) -> Result<Npc> {
        self.content
            .npcs
            .get(name)
            .map(|template| template.spawn(self.difficulty))
            .ok_or_else(|| RuntimeError::UnknownNpc(name.to_owned()))
    }

    /// Fights the named enemies until the battle reaches a terminal state.
    ///
    /// Rejected commands are logged and the provider is asked again for the
    /// same turn. Victory kills are reported to the task engine.
    pub async fn battle(
        &mut self,
        enemy_names: &[&str],
        provider: &dyn CommandProvider,
    ) -> Result<BattleSummary> {
        if enemy_names.is_empty() {
            return Err(RuntimeError::NoEnemies);
        }
        let mut enemies = enemy_names
            .iter()
            .map(|name| self.spawn(name))
            .collect::<Result<Vec<_>>>()?;
        let mut rng = PcgRng::seeded(derive_seed(self.seed, self.battles, BATTLE_STREAM));
        self.battles += 1;
        info!(enemies = ?enemy_names, battle = self.battles, "battle started");

        let quests = self.content.quests();
        let mut observer = BusObserver::new(&self.bus);
        let mut engine = CombatEngine::new(
            &mut self.player,
            &mut enemies,
            &mut rng,
            &self.content.config,
        )
        .with_observer(&mut observer)
        .with_quests(&quests);

        let mut rejections = 0;
        while !engine.is_finished() {
            let view = BattleView::capture(&engine);
            let action = match provider.next_command(&view).await {
                Ok(action) => action,
                Err(err) => {
                    engine.abandon();
                    warn!(%err, turn = engine.turn(), "battle abandoned");
                    return Err(err);
                }
            };
            match engine.step(action) {
                Ok(report) => {
                    rejections = 0;
                    debug!(turn = report.turn, ?action, state = %report.state, "turn resolved");
                }
                Err(rejected) => {
                    rejections += 1;
                    warn!(?action, %rejected, "command rejected");
                    if rejections >= MAX_REJECTIONS {
                        engine.abandon();
                        return Err(RuntimeError::TooManyRejections {
                            attempts: rejections,
                            last: rejected,
                        });
                    }
                }
            }
        }

        let summary = engine.into_summary().unwrap_or_default();
        info!(
            outcome = %summary.outcome,
            turns = summary.turns,
            experience = summary.experience,
            gold = summary.gold,
            gold_lost = summary.gold_lost,
            "battle finished"
        );
        self.publish_progress(&summary.quest);
        Ok(summary)
    }

    /// Adds equipment from the catalog; `None` rolls the grade.
    pub fn acquire_equipment(
        &mut self,
        template: &str,
        grade: Option<EquipmentGrade>,
    ) -> Result<usize> {
        let template = self
            .content
            .equipment
            .get(template)
            .ok_or_else(|| RuntimeError::UnknownEquipmentTemplate(template.to_owned()))?;
        let grade = grade.unwrap_or_else(|| EquipmentGrade::roll(&mut self.rng));
        let equipment = template.instantiate(grade, &self.content.config.equipment);
        debug!(name = equipment.name(), %grade, "equipment acquired");
        Ok(self.player.inventory.add_equipment(equipment))
    }

    /// Equips the item in `slot`, returning the slot it displaced.
    pub fn equip(&mut self, slot: usize) -> Result<Option<usize>> {
        Ok(self.player.inventory.equip(slot)?)
    }

    pub fn unequip(&mut self, slot: usize) -> Result<()> {
        Ok(self.player.inventory.unequip(slot)?)
    }

    pub fn upgrade(&mut self, slot: usize) -> Result<UpgradeResult> {
        let forge = Forge::new(&self.content.config.equipment);
        let equipment = self
            .player
            .inventory
            .equipment_mut(slot)
            .ok_or(RuntimeError::UnknownEquipment(slot))?;
        let result = forge.upgrade(equipment, &mut self.player.gold, &mut self.rng);
        let name = equipment.name().to_owned();

        if result.outcome.attempted() {
            info!(equipment = %name, success = result.success, "upgrade attempted");
        } else {
            debug!(equipment = %name, outcome = ?result.outcome, "upgrade refused");
        }
        self.bus.publish(Event::Forge(ForgeEvent::Upgrade {
            equipment: name,
            result: result.clone(),
        }));
        Ok(result)
    }

    pub fn repair(&mut self, slot: usize) -> Result<RepairResult> {
        let forge = Forge::new(&self.content.config.equipment);
        let equipment = self
            .player
            .inventory
            .equipment_mut(slot)
            .ok_or(RuntimeError::UnknownEquipment(slot))?;
        let result = forge.repair(equipment, &mut self.player.gold);
        let name = equipment.name().to_owned();

        info!(equipment = %name, success = result.success, "repair requested");
        self.bus.publish(Event::Forge(ForgeEvent::Repair {
            equipment: name,
            result: result.clone(),
        }));
        Ok(result)
    }

    /// Draws from the session's random source, for callers that need
    /// randomness outside the engines (loot tables, encounters).
    pub fn rng(&mut self) -> &mut dyn RandomSource {
        &mut self.rng
    }

    fn publish_progress(&self, report: &ProgressReport) {
        for task in &report.completed {
            info!(
                task = %task.task,
                experience = task.experience,
                item = ?task.item,
                "task completed"
            );
        }
        for event in QuestEvent::from_report(report) {
            self.bus.publish(Event::Quest(event));
        }
    }
}
