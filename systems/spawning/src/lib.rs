#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting target spawn commands.
//!
//! The cadence, toughness and archetype of every spawn are read from the
//! player's level at the moment the spawn happens.

use std::time::Duration;

use coin_shooter_core::{ArenaPoint, Command, Event, SPAWN_MARGIN};
use coin_shooter_system_difficulty::{calculate_difficulty, target_health, target_speed};
use coin_shooter_system_target_selection::random_target_type;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    margin: f32,
}

impl Config {
    /// Creates a new configuration using the provided seed and the default margin.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            margin: SPAWN_MARGIN,
        }
    }

    /// Overrides the distance kept between spawns and the arena border.
    #[must_use]
    pub const fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }
}

/// Area targets may be placed in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnArea {
    /// Horizontal extent of the arena.
    pub width: f32,
    /// Vertical extent of the arena.
    pub height: f32,
}

impl SpawnArea {
    /// Creates a spawn area for an arena of the provided size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Pure system that turns elapsed time into spawn commands.
#[derive(Debug)]
pub struct Spawning {
    accumulator: Duration,
    margin: f32,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            accumulator: Duration::ZERO,
            margin: config.margin.max(0.0),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the arena state to emit spawn commands.
    ///
    /// Every elapsed spawn interval is one attempt; an attempt is skipped when
    /// the arena already holds the maximum number of targets for `level`.
    pub fn handle(
        &mut self,
        events: &[Event],
        level: u32,
        live_targets: usize,
        area: SpawnArea,
        out: &mut Vec<Command>,
    ) {
        let accumulated = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if accumulated.is_zero() {
            return;
        }

        let difficulty = calculate_difficulty(level);
        self.accumulator = self.accumulator.saturating_add(accumulated);
        let attempts = self.resolve_spawn_attempts(difficulty.spawn_delay);
        let capacity = usize::try_from(difficulty.max_simultaneous_targets).unwrap_or(usize::MAX);

        let mut live = live_targets;
        for _ in 0..attempts {
            if live >= capacity {
                log::debug!("spawn skipped, {live} of {capacity} targets live");
                continue;
            }
            let kind = random_target_type(level, &mut self.rng);
            let position = self.select_position(area);
            out.push(Command::SpawnTarget {
                kind,
                position,
                speed: target_speed(kind, &difficulty),
                max_health: target_health(kind, &difficulty),
                kill_value: kind.properties().kill_value,
                lifetime: difficulty.lifetime,
            });
            live += 1;
        }
    }

    /// Discards the partially accumulated interval.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    fn resolve_spawn_attempts(&mut self, spawn_delay: Duration) -> usize {
        if spawn_delay.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= spawn_delay {
            self.accumulator -= spawn_delay;
            attempts += 1;
        }
        attempts
    }

    fn select_position(&mut self, area: SpawnArea) -> ArenaPoint {
        let x = self.coordinate(area.width);
        let y = self.coordinate(area.height);
        ArenaPoint::new(x, y)
    }

    fn coordinate(&mut self, extent: f32) -> f32 {
        let low = self.margin;
        let high = extent - self.margin;
        if high <= low {
            return (extent / 2.0).max(0.0);
        }
        self.rng.gen_range(low..=high)
    }
}
