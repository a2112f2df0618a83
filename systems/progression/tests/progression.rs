use coin_shooter_core::{Event, StatField};
use coin_shooter_storage::MemoryStore;
use coin_shooter_system_progression::{level_for_kills, Progression, LEVEL_UNLOCKS};
use coin_shooter_system_stats::StatsStore;

fn stats_with_kills(store: &mut MemoryStore, kills: u64) -> StatsStore {
    let mut stats = StatsStore::load(&*store);
    let _ = stats.increment(StatField::TotalKills, kills, store);
    stats
}

#[test]
fn level_up_fires_exactly_when_crossing_a_band() {
    let mut store = MemoryStore::new();
    let mut stats = StatsStore::load(&store);
    let progression = Progression;
    let mut events = Vec::new();

    for kills in 1..=200_u64 {
        let before = level_for_kills(kills - 1);
        let check = progression.check_level_up(kills, &mut stats, &mut store, &mut events);
        assert_eq!(check.old_level, before);
        assert_eq!(check.new_level, level_for_kills(kills));
        assert_eq!(check.leveled_up, level_for_kills(kills) > before, "kills={kills}");
        let _ = stats.increment(StatField::TotalKills, 1, &mut store);
    }

    let level_ups: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::LevelUp {
                old_level,
                new_level,
            } => Some((*old_level, *new_level)),
            _ => None,
        })
        .collect();
    assert_eq!(level_ups, vec![(1, 2), (2, 3), (3, 4), (4, 5)]);
    assert_eq!(stats.get(StatField::Level), 5);
    assert_eq!(StatsStore::load(&store).get(StatField::Level), 5);
}

#[test]
fn stored_level_never_decreases() {
    let mut store = MemoryStore::new();
    let mut stats = stats_with_kills(&mut store, 0);
    let _ = stats.set(StatField::Level, 7, &mut store);
    let mut events = Vec::new();

    let check = Progression.check_level_up(10, &mut stats, &mut store, &mut events);

    assert!(check.leveled_up);
    assert_eq!(stats.get(StatField::Level), 7);
}

#[test]
fn progress_is_the_fraction_of_the_current_band() {
    let mut store = MemoryStore::new();
    let progression = Progression;

    let fresh = stats_with_kills(&mut store, 0);
    assert_eq!(progression.level_progress(&fresh), 0.0);
    assert_eq!(progression.xp_for_next_level(&fresh), 10);

    let mut store = MemoryStore::new();
    let midway = stats_with_kills(&mut store, 25);
    assert_eq!(progression.current_level(&midway), 2);
    assert!((progression.level_progress(&midway) - 0.5).abs() < f64::EPSILON);
}

#[test]
fn unlocks_follow_the_level() {
    let mut store = MemoryStore::new();
    let progression = Progression;

    let rookie = stats_with_kills(&mut store, 0);
    assert!(progression.unlocked_features(&rookie).is_empty());
    let next = progression.next_unlock(&rookie).expect("level 5 pending");
    assert_eq!(next.unlock.level, 5);
    assert_eq!(next.kills_needed, 160);
    assert!(!progression.is_unlocked(5, &rookie));

    let mut store = MemoryStore::new();
    let veteran = stats_with_kills(&mut store, 1_000);
    assert_eq!(progression.current_level(&veteran), 11);
    let unlocked: Vec<u32> = progression
        .unlocked_features(&veteran)
        .iter()
        .map(|unlock| unlock.level)
        .collect();
    assert_eq!(unlocked, vec![5, 10]);
    let next = progression.next_unlock(&veteran).expect("level 15 pending");
    assert_eq!(next.unlock, LEVEL_UNLOCKS[2]);
    assert_eq!(next.kills_needed, 1_960 - 1_000);

    let mut store = MemoryStore::new();
    let master = stats_with_kills(&mut store, 3_610);
    assert!(progression.next_unlock(&master).is_none());
    assert_eq!(progression.unlocked_features(&master).len(), 4);
}
