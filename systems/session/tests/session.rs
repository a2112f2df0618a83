use std::time::Duration;

use coin_shooter_core::{
    AchievementId, ArenaPoint, Command, Event, StatField, TargetKind, Timestamp,
};
use coin_shooter_session::{Session, SessionConfig};
use coin_shooter_storage::MemoryStore;
use coin_shooter_system_claim::{ClaimConfig, ClaimError, FixedNetwork, OfflineLedger};
use coin_shooter_world::query;

const SPOT: ArenaPoint = ArenaPoint::new(400.0, 300.0);
const ARC: FixedNetwork = FixedNetwork(5_042_002);

fn new_session(store: MemoryStore) -> Session<MemoryStore> {
    Session::new(
        store,
        SessionConfig::default(),
        ClaimConfig::default(),
        Timestamp::from_millis(1_000_000),
    )
}

fn place_target(session: &mut Session<MemoryStore>, kind: TargetKind, events: &mut Vec<Event>) {
    session.apply(
        Command::SpawnTarget {
            kind,
            position: SPOT,
            speed: 0.0,
            max_health: 1,
            kill_value: kind.properties().kill_value,
            lifetime: Duration::from_secs(4),
        },
        events,
    );
}

fn advance(session: &mut Session<MemoryStore>, millis: u64, events: &mut Vec<Event>) {
    session.apply(
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        events,
    );
}

fn kill_streak(session: &mut Session<MemoryStore>, kills: usize, events: &mut Vec<Event>) {
    for _ in 0..kills {
        place_target(session, TargetKind::Normal, events);
        session.apply(Command::Shoot { at: SPOT }, events);
        advance(session, 1_000, events);
    }
}

#[test]
fn ten_clean_kills_reach_level_two_and_unlock_claiming() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();

    kill_streak(&mut session, 10, &mut events);

    let stats = session.stats();
    assert_eq!(stats.get(StatField::TotalKills), 10);
    assert_eq!(stats.get(StatField::Level), 2);
    assert_eq!(session.level(), 2);
    assert_eq!(stats.accuracy(), 100.0);
    assert_eq!(session.combo().combo(), 10);
    assert!(session.kill_queue().pending_kills() >= 10);
    assert_eq!(
        session.kill_queue().pending_kills(),
        11,
        "tenth kill earns a combo bonus"
    );
    assert!(session.kill_queue().can_claim());

    assert!(events.contains(&Event::LevelUp {
        old_level: 1,
        new_level: 2
    }));
    assert!(session.achievements().is_unlocked(AchievementId::FirstBlood));
    assert!(session.achievements().is_unlocked(AchievementId::ComboMaster));
    assert!(query::movement_enabled(session.world()));
}

#[test]
fn kill_events_follow_the_pipeline_order() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();
    place_target(&mut session, TargetKind::Normal, &mut events);
    events.clear();

    session.apply(Command::Shoot { at: SPOT }, &mut events);

    let kinds: Vec<&'static str> = events
        .iter()
        .map(|event| match event {
            Event::ShotFired { .. } => "shot",
            Event::TargetHit { .. } => "hit",
            Event::TargetDestroyed { .. } => "destroyed",
            Event::ComboChanged { .. } => "combo",
            Event::AchievementUnlocked { .. } => "achievement",
            Event::PendingKillsChanged { .. } => "pending",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["shot", "hit", "destroyed", "combo", "achievement", "pending"]
    );
}

#[test]
fn misses_reset_the_combo_and_count_as_shots() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();
    kill_streak(&mut session, 3, &mut events);
    events.clear();

    session.apply(
        Command::Shoot {
            at: ArenaPoint::new(5.0, 5.0),
        },
        &mut events,
    );

    assert_eq!(session.combo().combo(), 0);
    assert!(events.contains(&Event::ComboChanged {
        combo: 0,
        multiplier: 1.0
    }));
    assert_eq!(session.stats().get(StatField::TotalShots), 4);
    assert_eq!(session.stats().accuracy(), 75.0);
}

#[test]
fn idle_time_decays_the_combo() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();
    kill_streak(&mut session, 2, &mut events);
    assert_eq!(session.combo().combo(), 2);

    advance(&mut session, 3_999, &mut events);
    assert_eq!(session.combo().combo(), 2);
    advance(&mut session, 1, &mut events);
    assert_eq!(session.combo().combo(), 0);
}

#[test]
fn type_kills_are_counted_for_badges() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();
    place_target(&mut session, TargetKind::Special, &mut events);
    session.apply(Command::Shoot { at: SPOT }, &mut events);

    assert_eq!(session.stats().get(StatField::SpecialTargetsKilled), 1);
    assert!(session.achievements().is_unlocked(AchievementId::LuckyShot));
    assert_eq!(session.kill_queue().pending_kills(), 5);
}

#[test]
fn claims_settle_the_queue_and_reset_the_score() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();
    kill_streak(&mut session, 10, &mut events);
    events.clear();

    let mut ledger = OfflineLedger::new("player");
    let receipt = session
        .claim(&mut ledger, &ARC, &mut events)
        .expect("claim succeeds");

    assert_eq!(receipt.kills, 11);
    assert_eq!(ledger.player_kills("player"), 11);
    assert_eq!(session.kill_queue().pending_kills(), 0);
    assert_eq!(session.stats().get(StatField::TotalClaims), 1);
    assert_eq!(session.score(), 0);
    assert_eq!(
        session.claim(&mut ledger, &ARC, &mut events),
        Err(ClaimError::NothingToClaim)
    );
}

#[test]
fn failed_claims_keep_pending_kills() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();
    kill_streak(&mut session, 10, &mut events);

    let mut ledger = OfflineLedger::new("player").with_daily_cap(5);
    let result = session.claim(&mut ledger, &ARC, &mut events);

    assert_eq!(result, Err(ClaimError::DailyCapReached));
    assert_eq!(session.kill_queue().pending_kills(), 11);
    assert_eq!(session.score(), 10);
    assert!(!session.claims().is_in_flight());
}

#[test]
fn sessions_bank_play_time_and_best_score() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();

    assert_eq!(session.end(&mut events), None, "no session running");

    session.start(&mut events);
    assert!(session.is_active());
    kill_streak(&mut session, 4, &mut events);
    advance(&mut session, 86_000, &mut events);
    events.clear();

    assert_eq!(session.end(&mut events), Some(90));
    assert_eq!(
        events.last(),
        Some(&Event::SessionEnded {
            elapsed_seconds: 90,
            session_kills: 4,
        })
    );
    assert_eq!(session.stats().get(StatField::TotalPlayTime), 90);
    assert_eq!(session.stats().get(StatField::BestSession), 4);
    assert_eq!(query::target_count(session.world()), 0);
}

#[test]
fn active_sessions_spawn_targets_over_time() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();
    session.start(&mut events);

    advance(&mut session, 4_800, &mut events);

    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::TargetSpawned { .. }))
        .count();
    assert_eq!(spawned, 1, "level 1 spawns every 4.8 seconds");
}

#[test]
fn reload_restores_persisted_progress() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();
    kill_streak(&mut session, 12, &mut events);
    let pending = session.kill_queue().pending_kills();

    let reopened = new_session(session.into_store());
    assert_eq!(reopened.stats().get(StatField::TotalKills), 12);
    assert_eq!(reopened.combo().max_combo(), 12);
    assert_eq!(reopened.combo().combo(), 0);
    assert_eq!(reopened.kill_queue().pending_kills(), pending);
    assert!(reopened.achievements().is_unlocked(AchievementId::ComboMaster));
}

#[test]
fn confirmed_claims_stop_new_spawns_from_moving() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();
    kill_streak(&mut session, 10, &mut events);
    assert!(query::movement_enabled(session.world()));
    events.clear();

    let mut ledger = OfflineLedger::new("player");
    let _ = session
        .claim(&mut ledger, &ARC, &mut events)
        .expect("claim succeeds");
    assert!(events.contains(&Event::MovementDisabled));
    assert!(!query::movement_enabled(session.world()));

    events.clear();
    session.apply(
        Command::SpawnTarget {
            kind: TargetKind::Normal,
            position: SPOT,
            speed: 100.0,
            max_health: 5,
            kill_value: 1,
            lifetime: Duration::from_secs(4),
        },
        &mut events,
    );
    let spawned = query::target_view(session.world())
        .iter()
        .last()
        .cloned()
        .expect("spawned target");
    assert!(!spawned.moving, "score restarted at zero");
}

#[test]
fn claim_eligibility_follows_the_configured_minimum() {
    let mut session = Session::new(
        MemoryStore::new(),
        SessionConfig::default(),
        ClaimConfig {
            min_kills: 20,
            ..ClaimConfig::default()
        },
        Timestamp::from_millis(1_000_000),
    );
    let mut events = Vec::new();
    kill_streak(&mut session, 10, &mut events);

    assert_eq!(session.kill_queue().pending_kills(), 11);
    assert!(!session.can_claim());
    assert_eq!(
        session.claim(&mut OfflineLedger::new("player"), &ARC, &mut events),
        Err(ClaimError::BelowMinimum {
            pending: 11,
            required: 20
        })
    );
    assert!(new_session(session.into_store()).can_claim());
}

#[test]
fn starting_twice_keeps_the_running_session() {
    let mut session = new_session(MemoryStore::new());
    let mut events = Vec::new();
    session.start(&mut events);
    kill_streak(&mut session, 3, &mut events);
    events.clear();

    session.start(&mut events);
    assert!(events.is_empty());
    assert_eq!(session.score(), 3);

    assert_eq!(session.end(&mut events), Some(3));
    assert_eq!(session.stats().get(StatField::BestSession), 3);
}
