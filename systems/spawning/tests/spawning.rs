use std::time::Duration;

use coin_shooter_core::{Command, Event, TargetKind, Timestamp, SPAWN_MARGIN};
use coin_shooter_system_spawning::{Config, SpawnArea, Spawning};
use coin_shooter_world::{self as world, query, Arena, World};

const AREA: SpawnArea = SpawnArea::new(800.0, 600.0);

fn elapsed(millis: u64) -> Vec<Event> {
    vec![Event::TimeAdvanced {
        dt: Duration::from_millis(millis),
    }]
}

#[test]
fn emits_one_spawn_per_interval() {
    let mut spawning = Spawning::new(Config::new(0x1234_5678));
    let mut commands = Vec::new();

    spawning.handle(&elapsed(4_999), 0, 0, AREA, &mut commands);
    assert!(commands.is_empty(), "no spawn before full interval");

    spawning.handle(&elapsed(1), 0, 0, AREA, &mut commands);
    assert_eq!(commands.len(), 1);

    commands.clear();
    spawning.handle(&elapsed(10_000), 0, 0, AREA, &mut commands);
    assert_eq!(commands.len(), 2, "expected one spawn per interval");
}

#[test]
fn cadence_follows_the_level() {
    let mut spawning = Spawning::new(Config::new(3));
    let mut commands = Vec::new();
    spawning.handle(&elapsed(2_000), 20, 0, AREA, &mut commands);
    assert_eq!(commands.len(), 1, "level 20 spawns every two seconds");
}

#[test]
fn capacity_limits_spawns() {
    let mut spawning = Spawning::new(Config::new(9));
    let mut commands = Vec::new();

    spawning.handle(&elapsed(5_000), 1, 3, AREA, &mut commands);
    assert!(commands.is_empty(), "level 1 allows three live targets");

    spawning.handle(&elapsed(25_000), 1, 1, AREA, &mut commands);
    assert_eq!(commands.len(), 2, "only two slots were free");
}

#[test]
fn spawn_commands_carry_level_scaled_values() {
    let mut spawning = Spawning::new(Config::new(0xfeed));
    let mut commands = Vec::new();
    spawning.handle(&elapsed(2_800), 11, 0, AREA, &mut commands);

    let Some(Command::SpawnTarget {
        kind,
        position,
        speed,
        max_health,
        kill_value,
        lifetime,
    }) = commands.first()
    else {
        panic!("expected a spawn command, got {commands:?}");
    };
    let base_health = kind.properties().health;
    assert_eq!(*max_health, base_health + 3);
    assert_eq!(*kill_value, kind.properties().kill_value);
    assert_eq!(*speed, 210.0 * kind.properties().speed_multiplier);
    assert_eq!(*lifetime, Duration::from_millis(2_900));
    assert!(matches!(kind, TargetKind::Normal | TargetKind::Fast | TargetKind::Tank));
    assert!((SPAWN_MARGIN..=800.0 - SPAWN_MARGIN).contains(&position.x()));
    assert!((SPAWN_MARGIN..=600.0 - SPAWN_MARGIN).contains(&position.y()));
}

#[test]
fn identical_seeds_replay_identically() {
    let run = |seed| {
        let mut spawning = Spawning::new(Config::new(seed));
        let mut commands = Vec::new();
        for _ in 0..10 {
            spawning.handle(&elapsed(2_000), 16, 0, AREA, &mut commands);
        }
        commands
    };
    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn reset_discards_partial_interval() {
    let mut spawning = Spawning::new(Config::new(1));
    let mut commands = Vec::new();
    spawning.handle(&elapsed(4_000), 0, 0, AREA, &mut commands);
    spawning.reset();
    spawning.handle(&elapsed(4_000), 0, 0, AREA, &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn world_accepts_emitted_spawns() {
    let mut arena = World::new(Arena::new(800.0, 600.0), Timestamp::from_millis(0));
    let mut spawning = Spawning::new(Config::new(0x4d59_5df4_d0f3_3173));
    let mut events = Vec::new();
    let mut commands = Vec::new();

    for _ in 0..8 {
        events.clear();
        world::apply(
            &mut arena,
            Command::Tick {
                dt: Duration::from_millis(2_500),
            },
            &mut events,
        );
        commands.clear();
        spawning.handle(
            &events,
            10,
            query::target_count(&arena),
            AREA,
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut arena, command, &mut events);
        }
        assert!(query::target_count(&arena) <= 5);
    }
    assert!(query::target_count(&arena) > 0);
}
