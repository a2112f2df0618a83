#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level and experience derivation from cumulative kills.
//!
//! A player's level is `floor(sqrt(kills / 10)) + 1` and the experience needed
//! to reach level `L` is `(L - 1)^2 * 10`. Nothing here owns state beyond the
//! statistics record it reads.

use coin_shooter_core::{Event, StatField};
use coin_shooter_storage::KeyValueStore;
use coin_shooter_system_stats::StatsStore;

/// Feature unlocked when the player reaches a given level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUnlock {
    /// Level that unlocks the feature.
    pub level: u32,
    /// Short feature name.
    pub name: &'static str,
    /// Player-facing description.
    pub description: &'static str,
}

/// Level unlocks in ascending level order.
pub const LEVEL_UNLOCKS: [LevelUnlock; 4] = [
    LevelUnlock {
        level: 5,
        name: "Fast Targets",
        description: "Faster targets now appear in the game",
    },
    LevelUnlock {
        level: 10,
        name: "Golden Targets",
        description: "Valuable golden targets start to appear",
    },
    LevelUnlock {
        level: 15,
        name: "Rush Mode",
        description: "Targets spawn more quickly",
    },
    LevelUnlock {
        level: 20,
        name: "Special Targets",
        description: "Rare special targets can appear",
    },
];

/// Outcome of comparing levels around a kill-count update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelCheck {
    /// Whether the update crossed into a higher level.
    pub leveled_up: bool,
    /// Level before the update.
    pub old_level: u32,
    /// Level after the update.
    pub new_level: u32,
}

/// Closest unlock the player has not reached yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NextUnlock {
    /// The pending unlock.
    pub unlock: LevelUnlock,
    /// Kills still needed to reach its level.
    pub kills_needed: u64,
}

/// Level derived from a cumulative kill count.
#[must_use]
pub fn level_for_kills(total_kills: u64) -> u32 {
    let level = integer_sqrt(total_kills / 10).saturating_add(1);
    u32::try_from(level).unwrap_or(u32::MAX)
}

/// Cumulative kills required to reach `level`.
#[must_use]
pub fn xp_for_level(level: u32) -> u64 {
    let steps = u64::from(level.saturating_sub(1));
    steps.saturating_mul(steps).saturating_mul(10)
}

fn integer_sqrt(value: u64) -> u64 {
    let mut root = (value as f64).sqrt() as u64;
    while root.saturating_mul(root) > value {
        root -= 1;
    }
    while (root + 1).saturating_mul(root + 1) <= value {
        root += 1;
    }
    root
}

/// Read-mostly queries over the statistics record.
#[derive(Debug, Default)]
pub struct Progression;

impl Progression {
    /// Experience earned so far, equal to the cumulative kill count.
    #[must_use]
    pub fn current_xp(&self, stats: &StatsStore) -> u64 {
        stats.get(StatField::TotalKills)
    }

    /// Level derived from the cumulative kill count.
    #[must_use]
    pub fn current_level(&self, stats: &StatsStore) -> u32 {
        level_for_kills(self.current_xp(stats))
    }

    /// Experience required for the level after the current one.
    #[must_use]
    pub fn xp_for_next_level(&self, stats: &StatsStore) -> u64 {
        xp_for_level(self.current_level(stats).saturating_add(1))
    }

    /// Fraction of the current level band already earned, in `[0, 1]`.
    #[must_use]
    pub fn level_progress(&self, stats: &StatsStore) -> f64 {
        let xp = self.current_xp(stats);
        let level = self.current_level(stats);
        let band_start = xp_for_level(level);
        let band_width = xp_for_level(level.saturating_add(1)).saturating_sub(band_start);
        if band_width == 0 {
            return 1.0;
        }
        let earned = xp.saturating_sub(band_start);
        (earned as f64 / band_width as f64).min(1.0)
    }

    /// Compares the level before and after the kill count becomes
    /// `new_total_kills`, persisting the new level on a level-up.
    pub fn check_level_up(
        &self,
        new_total_kills: u64,
        stats: &mut StatsStore,
        store: &mut dyn KeyValueStore,
        out: &mut Vec<Event>,
    ) -> LevelCheck {
        let old_level = self.current_level(stats);
        let new_level = level_for_kills(new_total_kills);
        let leveled_up = new_level > old_level;

        if leveled_up {
            if u64::from(new_level) > stats.get(StatField::Level) {
                let _ = stats.set(StatField::Level, u64::from(new_level), store);
            }
            log::info!("level up: {old_level} -> {new_level}");
            out.push(Event::LevelUp {
                old_level,
                new_level,
            });
        }

        LevelCheck {
            leveled_up,
            old_level,
            new_level,
        }
    }

    /// Reports whether the player reached `unlock_level`.
    #[must_use]
    pub fn is_unlocked(&self, unlock_level: u32, stats: &StatsStore) -> bool {
        self.current_level(stats) >= unlock_level
    }

    /// Unlocks already reached, in ascending level order.
    #[must_use]
    pub fn unlocked_features(&self, stats: &StatsStore) -> Vec<LevelUnlock> {
        let level = self.current_level(stats);
        LEVEL_UNLOCKS
            .iter()
            .filter(|unlock| unlock.level <= level)
            .copied()
            .collect()
    }

    /// Lowest unlock not reached yet, or `None` once everything is unlocked.
    #[must_use]
    pub fn next_unlock(&self, stats: &StatsStore) -> Option<NextUnlock> {
        let level = self.current_level(stats);
        let xp = self.current_xp(stats);
        LEVEL_UNLOCKS
            .iter()
            .find(|unlock| unlock.level > level)
            .map(|unlock| NextUnlock {
                unlock: *unlock,
                kills_needed: xp_for_level(unlock.level).saturating_sub(xp),
            })
    }
}
