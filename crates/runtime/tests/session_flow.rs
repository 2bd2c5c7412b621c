use game_core::state::{EquipmentGrade, Item, ItemKind, TaskStatus};
use game_core::{AcceptOutcome, BattleEvent, BattleState, PlayerAction, UpgradeOutcome};
use runtime::{
    AutoAttack, Event, ForgeEvent, GameSession, QuestEvent, RuntimeError, ScriptedCommands,
    SessionConfig, Topic,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn session(seed: u64) -> GameSession {
    init_tracing();
    let settings = SessionConfig {
        event_buffer_size: 4096,
        ..SessionConfig::seeded(seed)
    };
    GameSession::start("勇者", &settings).expect("bundled content should load")
}

/// Main line: arrive in the village, clear the forest, unlock the cave.
#[tokio::test]
async fn main_quest_line_advances_through_battle() {
    let mut session = session(7);
    let mut quests = session.subscribe(Topic::Quest).unwrap();

    // Arriving offers the first task; the arrival itself does not count.
    let report = session.on_enter("村中心");
    assert_eq!(report.accepted, vec!["初来乍到".to_owned()]);
    assert!(report.completed.is_empty());

    // Coming back completes it and the follow-up offers the forest task.
    let report = session.on_enter("村中心");
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.accepted, vec!["森林的威胁".to_owned()]);
    assert_eq!(session.player().experience(), 50);
    assert_eq!(session.player().reputation, 5);

    assert!(matches!(
        quests.recv().await.unwrap(),
        Event::Quest(QuestEvent::Accepted { ref task }) if task == "初来乍到"
    ));

    let summary = session.battle(&["野狼"], &AutoAttack::default()).await.unwrap();
    assert_eq!(summary.outcome, BattleState::Victory);
    assert_eq!(summary.defeated, vec!["野狼".to_owned()]);

    let player = session.player();
    assert_eq!(player.tasks.status("森林的威胁"), TaskStatus::Completed);
    assert_eq!(player.tasks.status("山洞的邪恶"), TaskStatus::InProgress);
    let necklace = player
        .inventory
        .gear()
        .iter()
        .find(|e| e.name() == "狼牙项链")
        .expect("reward equipment");
    assert_eq!(necklace.grade(), EquipmentGrade::Uncommon);
    assert_eq!(necklace.max_level(), 3);
}

#[tokio::test]
async fn battle_events_are_published_in_order() {
    let mut session = session(11);
    let mut battle = session.subscribe(Topic::Battle).unwrap();

    let summary = session.battle(&["野狼"], &AutoAttack::default()).await.unwrap();
    assert!(summary.outcome.is_terminal());

    assert_eq!(
        battle.recv().await.unwrap(),
        Event::Battle(BattleEvent::TurnStarted { turn: 1 })
    );
    let mut last = None;
    while let Ok(event) = battle.try_recv() {
        last = Some(event);
    }
    assert_eq!(
        last,
        Some(Event::Battle(BattleEvent::BattleFinished {
            state: summary.outcome
        }))
    );
}

#[tokio::test]
async fn smith_tasks_and_relationship_bonus() {
    let mut session = session(3);

    let report = session.on_talk("铁匠");
    assert_eq!(report.accepted, vec!["收集木材".to_owned(), "珍贵矿石".to_owned()]);

    for _ in 0..4 {
        assert!(session.on_collect("木材").completed.is_empty());
    }
    let report = session.on_collect("木材");
    assert_eq!(report.completed[0].task, "收集木材");
    assert_eq!(report.completed[0].item.as_deref(), Some("金币"));

    // A sixth log changes nothing.
    assert!(session.on_collect("木材").is_empty());

    let report = session.on_collect("矿石");
    assert_eq!(report.relationships.len(), 1);
    assert_eq!(session.player().relationship("铁匠"), 15);

    assert!(matches!(
        session.accept_task("收集木材").unwrap(),
        AcceptOutcome::AlreadyCompleted
    ));
    assert!(matches!(
        session.accept_task("不存在的任务"),
        Err(RuntimeError::UnknownTask(_))
    ));
}

#[tokio::test]
async fn forge_upgrades_publish_results() {
    let mut session = session(5);
    let mut forge = session.subscribe(Topic::Forge).unwrap();

    let slot = session
        .acquire_equipment("铁剑", Some(EquipmentGrade::Common))
        .unwrap();
    assert_eq!(session.equip(slot).unwrap(), None);
    session.player_mut().gold = 50;

    let result = session.upgrade(slot).unwrap();
    assert!(result.outcome.attempted());
    assert_eq!(session.player().gold, gold);

    let refused = session.upgrade(slot).unwrap();
    assert!(matches!(refused.outcome, UpgradeOutcome::InsufficientFunds { .. }));

    assert!(matches!(
        forge.recv().await.unwrap(),
        Event::Forge(ForgeEvent::Upgrade { ref equipment, .. }) if equipment == "铁剑"
    ));
    assert!(matches!(
        session.upgrade(99),
        Err(RuntimeError::UnknownEquipment(99))
    ));
    assert!(matches!(
        session.acquire_equipment("木剑", None),
        Err(RuntimeError::UnknownEquipmentTemplate(_))
    ));
}

#[tokio::test]
async fn rejected_commands_do_not_consume_turns() {
    let mut session = session(13);
    let hp = session.player().stats.hp();

    let provider = ScriptedCommands::new([PlayerAction::Attack { target: 4 }]);
    let err = session.battle(&["野狼"], &provider).await.unwrap_err();
    assert!(matches!(err, RuntimeError::ProviderExhausted));
    assert_eq!(session.player().stats.hp(), hp);

    let provider = ScriptedCommands::new(vec![PlayerAction::Attack { target: 4 }; 8]);
    let err = session.battle(&["野狼"], &provider).await.unwrap_err();
    assert!(matches!(err, RuntimeError::TooManyRejections { attempts: 8, .. }));
}

#[tokio::test]
async fn abandoned_battle_leaves_no_effects_behind() {
    let mut session = session(5);
    session
        .player_mut()
        .inventory
        .add_item(Item::new("力量药水", ItemKind::BuffPotion, 10));
    let slot = session.player().inventory.items().len() - 1;
    let gold = session.player().gold;

    let provider = ScriptedCommands::new([
        PlayerAction::UseItem { slot, target: None },
        PlayerAction::Defend,
    ]);
    let err = session.battle(&["野狼"], &provider).await.unwrap_err();
    assert!(matches!(err, RuntimeError::ProviderExhausted));

    let stats = &session.player().stats;
    assert_eq!(stats.temp_atk, 0);
    assert_eq!(stats.temp_def, 0);
    assert!(stats.effects.is_empty());
    assert_eq!(session.player().gold, 0);

    let provider = ScriptedCommands::new(vec![PlayerAction::Attack { target: 4 }; 8]);
    session.player_mut().stats.temp_def = 3;
    let err = session.battle(&["野狼"], &provider).await.unwrap_err();
    assert!(matches!(err, RuntimeError::TooManyRejections { .. }));
    assert_eq!(session.player().stats.temp_def, 0);
}

#[tokio::test]
async fn unknown_enemies_and_empty_parties_are_errors() {
    let mut session = session(1);
    let provider = AutoAttack::default();

    assert!(matches!(
        session.battle(&[], &provider).await,
        Err(RuntimeError::NoEnemies)
    ));
    assert!(matches!(
        session.battle(&["巨龙"], &provider).await,
        Err(RuntimeError::UnknownNpc(_))
    ));
}

#[tokio::test]
async fn same_seed_replays_the_same_battle() {
    let mut first = session(21);
    let mut second = session(21);

    let a = first.battle(&["哥布林", "野狼"], &AutoAttack::default()).await.unwrap();
    let b = second.battle(&["哥布林", "野狼"], &AutoAttack::default()).await.unwrap();

    assert_eq!(a, b);
    assert_eq!(first.player(), second.player());
}

#[test]
fn missing_content_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let settings = SessionConfig {
        data_dir: Some(dir.path().join("missing")),
        ..SessionConfig::seeded(1)
    };

    match GameSession::start("勇者", &settings) {
        Err(RuntimeError::Content(err)) => assert!(err.to_string().contains("config.toml")),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("session started without content"),
    }
}
