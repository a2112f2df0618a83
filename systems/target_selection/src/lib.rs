#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted target archetype selection gated by level.
//!
//! Spawn weights come in level bands. Each band lists every archetype in
//! declaration order and its weights sum to 100. A draw in `[0, 100)` picks the
//! first archetype whose cumulative weight reaches the draw, so ties resolve to
//! the earlier archetype.

use coin_shooter_core::TargetKind;
use rand::Rng;

/// Total weight of every band.
pub const WEIGHT_TOTAL: u32 = 100;

/// Spawn weights that apply from `min_level` until the next band starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnBand {
    /// Lowest level the band applies to.
    pub min_level: u32,
    /// Weight per archetype in declaration order.
    pub weights: [(TargetKind, u32); 4],
}

impl SpawnBand {
    /// Weight assigned to `kind` in this band.
    #[must_use]
    pub fn weight_of(&self, kind: TargetKind) -> u32 {
        self.weights
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map_or(0, |(_, weight)| *weight)
    }
}

/// Bands in ascending level order.
pub const SPAWN_BANDS: [SpawnBand; 4] = [
    SpawnBand {
        min_level: 1,
        weights: [
            (TargetKind::Normal, 100),
            (TargetKind::Fast, 0),
            (TargetKind::Tank, 0),
            (TargetKind::Special, 0),
        ],
    },
    SpawnBand {
        min_level: 6,
        weights: [
            (TargetKind::Normal, 80),
            (TargetKind::Fast, 20),
            (TargetKind::Tank, 0),
            (TargetKind::Special, 0),
        ],
    },
    SpawnBand {
        min_level: 11,
        weights: [
            (TargetKind::Normal, 60),
            (TargetKind::Fast, 30),
            (TargetKind::Tank, 10),
            (TargetKind::Special, 0),
        ],
    },
    SpawnBand {
        min_level: 16,
        weights: [
            (TargetKind::Normal, 50),
            (TargetKind::Fast, 25),
            (TargetKind::Tank, 20),
            (TargetKind::Special, 5),
        ],
    },
];

/// Highest band whose threshold does not exceed `level`, defaulting to the first.
#[must_use]
pub fn band_for_level(level: u32) -> &'static SpawnBand {
    SPAWN_BANDS
        .iter()
        .rev()
        .find(|band| band.min_level <= level)
        .unwrap_or(&SPAWN_BANDS[0])
}

/// Resolves a draw in `[0, 100)` against the band for `level`.
#[must_use]
pub fn select_type_for_draw(level: u32, draw: f64) -> TargetKind {
    let mut cumulative = 0_u32;
    for (kind, weight) in band_for_level(level).weights {
        cumulative += weight;
        if f64::from(cumulative) >= draw {
            return kind;
        }
    }
    TargetKind::Normal
}

/// Picks an archetype for `level` using the band weights.
pub fn select_type<R>(level: u32, rng: &mut R) -> TargetKind
where
    R: Rng + ?Sized,
{
    let draw = rng.gen::<f64>() * f64::from(WEIGHT_TOTAL);
    select_type_for_draw(level, draw)
}

/// Level at which `kind` may first appear.
#[must_use]
pub const fn unlock_level(kind: TargetKind) -> u32 {
    match kind {
        TargetKind::Normal => 0,
        TargetKind::Fast => 5,
        TargetKind::Tank => 10,
        TargetKind::Special => 20,
    }
}

/// Reports whether `kind` may appear at `level`.
#[must_use]
pub const fn is_unlocked(kind: TargetKind, level: u32) -> bool {
    level >= unlock_level(kind)
}

/// Picks an archetype for `level`, downgrading to [`TargetKind::Normal`] when
/// the weighted pick is not unlocked yet.
pub fn random_target_type<R>(level: u32, rng: &mut R) -> TargetKind
where
    R: Rng + ?Sized,
{
    let kind = select_type(level, rng);
    if is_unlocked(kind, level) {
        kind
    } else {
        log::debug!("{} not unlocked at level {level}", kind.as_str());
        TargetKind::Normal
    }
}
