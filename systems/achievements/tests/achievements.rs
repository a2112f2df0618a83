use coin_shooter_core::{AchievementId, ComboSnapshot, Event, StatField, TargetKind};
use coin_shooter_storage::{save_json, KeyValueStore, MemoryStore, ACHIEVEMENTS_KEY};
use coin_shooter_system_achievements::AchievementEngine;
use coin_shooter_system_stats::StatsStore;

fn unlocked_events(events: &[Event]) -> Vec<AchievementId> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::AchievementUnlocked { achievement } => Some(*achievement),
            _ => None,
        })
        .collect()
}

#[test]
fn second_check_with_unchanged_stats_unlocks_nothing() {
    let mut store = MemoryStore::new();
    let mut stats = StatsStore::load(&store);
    let _ = stats.increment(StatField::TotalKills, 1, &mut store);
    let mut engine = AchievementEngine::load(&store);
    let mut events = Vec::new();

    let first = engine.check_achievements(
        stats.stats(),
        &ComboSnapshot::default(),
        &mut store,
        &mut events,
    );
    assert_eq!(first, vec![AchievementId::FirstBlood]);

    let second = engine.check_achievements(
        stats.stats(),
        &ComboSnapshot::default(),
        &mut store,
        &mut events,
    );
    assert!(second.is_empty());
    assert_eq!(
        unlocked_events(&events),
        vec![AchievementId::FirstBlood],
        "no second notification"
    );
}

#[test]
fn unlocks_survive_a_reload() {
    let mut store = MemoryStore::new();
    let mut stats = StatsStore::load(&store);
    let _ = stats.increment(StatField::TotalKills, 100, &mut store);
    let combo = ComboSnapshot {
        current: 12,
        max_reached: 12,
    };
    let mut engine = AchievementEngine::load(&store);
    let unlocked = engine.check_achievements(stats.stats(), &combo, &mut store, &mut Vec::new());
    assert_eq!(
        unlocked,
        vec![
            AchievementId::FirstBlood,
            AchievementId::ComboMaster,
            AchievementId::Centurion
        ]
    );

    let reloaded = AchievementEngine::load(&store);
    assert!(reloaded.is_unlocked(AchievementId::Centurion));
    let names: Vec<&str> = reloaded
        .unlocked_achievements()
        .iter()
        .map(|entry| entry.name)
        .collect();
    assert_eq!(names, vec!["First Blood", "Combo Master", "Centurion"]);

    let mut reloaded = reloaded;
    let again = reloaded.check_achievements(stats.stats(), &combo, &mut store, &mut Vec::new());
    assert!(again.is_empty());
}

#[test]
fn type_specific_kills_feed_their_badges() {
    let mut store = MemoryStore::new();
    let mut stats = StatsStore::load(&store);
    let mut engine = AchievementEngine::load(&store);
    let mut events = Vec::new();
    let combo = ComboSnapshot::default();

    for _ in 0..4 {
        let unlocked =
            engine.record_target_kill(TargetKind::Tank, &mut stats, &combo, &mut store, &mut events);
        assert!(unlocked.is_empty());
    }
    let unlocked =
        engine.record_target_kill(TargetKind::Tank, &mut stats, &combo, &mut store, &mut events);
    assert_eq!(unlocked, vec![AchievementId::TankBuster]);
    assert_eq!(stats.get(StatField::TankTargetsKilled), 5);

    let unlocked =
        engine.record_target_kill(TargetKind::Special, &mut stats, &combo, &mut store, &mut events);
    assert_eq!(unlocked, vec![AchievementId::LuckyShot]);

    let unlocked =
        engine.record_target_kill(TargetKind::Normal, &mut stats, &combo, &mut store, &mut events);
    assert!(unlocked.is_empty());
    assert_eq!(stats.get(StatField::FastTargetsKilled), 0);
}

#[test]
fn unknown_and_duplicate_ids_are_dropped_on_load() {
    let mut store = MemoryStore::new();
    save_json(
        &mut store,
        ACHIEVEMENTS_KEY,
        &["marathon", "golden_goose", "marathon", "first_blood"],
    )
    .expect("seed");

    let engine = AchievementEngine::load(&store);
    let ids: Vec<AchievementId> = engine
        .unlocked_achievements()
        .iter()
        .map(|entry| entry.id)
        .collect();
    assert_eq!(ids, vec![AchievementId::Marathon, AchievementId::FirstBlood]);

    let listing = engine.all_achievements();
    assert_eq!(listing.len(), 10);
    assert_eq!(listing.iter().filter(|status| status.unlocked).count(), 2);
}

#[test]
fn unreadable_store_starts_empty() {
    let mut store = MemoryStore::new();
    store
        .write(ACHIEVEMENTS_KEY, "{not json")
        .expect("raw write");
    let engine = AchievementEngine::load(&store);
    assert!(engine.unlocked_achievements().is_empty());
}
