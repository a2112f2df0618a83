#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure difficulty model mapping a level to spawn pacing and target toughness.
//!
//! The model is evaluated fresh on every spawn decision so a mid-session
//! level-up takes effect on the very next spawn.

use std::time::Duration;

use coin_shooter_core::{
    DifficultyParameters, TargetKind, TARGET_BASE_HEALTH, TARGET_LIFETIME, TARGET_SPAWN_DELAY,
};

const MIN_SPAWN_DELAY_MS: u64 = 2_000;
const SPAWN_DELAY_STEP_MS: u64 = 200;
const BASE_VELOCITY: u64 = 100;
const VELOCITY_STEP: u64 = 10;
const MAX_VELOCITY: u64 = 300;
const MIN_LIFETIME_MS: u64 = 2_000;
const LIFETIME_STEP_MS: u64 = 100;
const BASE_MAX_TARGETS: u32 = 3;

/// Derives the pacing parameters for `level`.
#[must_use]
pub fn calculate_difficulty(level: u32) -> DifficultyParameters {
    let level_wide = u64::from(level);

    let spawn_delay_ms = duration_ms(TARGET_SPAWN_DELAY)
        .saturating_sub(level_wide.saturating_mul(SPAWN_DELAY_STEP_MS))
        .max(MIN_SPAWN_DELAY_MS);
    let velocity = BASE_VELOCITY
        .saturating_add(level_wide.saturating_mul(VELOCITY_STEP))
        .min(MAX_VELOCITY);
    let lifetime_ms = duration_ms(TARGET_LIFETIME)
        .saturating_sub(level_wide.saturating_mul(LIFETIME_STEP_MS))
        .max(MIN_LIFETIME_MS);

    DifficultyParameters {
        spawn_delay: Duration::from_millis(spawn_delay_ms),
        velocity: velocity as f32,
        health: TARGET_BASE_HEALTH.saturating_add(level / 3),
        lifetime: Duration::from_millis(lifetime_ms),
        max_simultaneous_targets: BASE_MAX_TARGETS.saturating_add(level / 5),
    }
}

/// Starting health of a `kind` target: its base health plus the level bonus.
#[must_use]
pub fn target_health(kind: TargetKind, difficulty: &DifficultyParameters) -> u32 {
    let level_bonus = difficulty.health.saturating_sub(TARGET_BASE_HEALTH);
    kind.properties().health.saturating_add(level_bonus)
}

/// Travel speed of a `kind` target at the given difficulty.
#[must_use]
pub fn target_speed(kind: TargetKind, difficulty: &DifficultyParameters) -> f32 {
    difficulty.velocity * kind.properties().speed_multiplier
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
