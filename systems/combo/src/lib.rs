#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decaying hit-streak tracker and its derived rewards.
//!
//! Decay is driven by an explicit deadline checked against the session clock
//! instead of a platform timer. Every hit replaces the deadline, so a stale
//! reset can never fire after a later hit extended the window.

use std::time::Duration;

use coin_shooter_core::{ComboSnapshot, Event, Timestamp, COMBO_DECAY, MAX_MULTIPLIER};
use coin_shooter_storage::{load_json, save_json, KeyValueStore, MAX_COMBO_KEY};
use coin_shooter_system_stats::StatsStore;

/// Reward multiplier for a streak of `combo` hits, capped at [`MAX_MULTIPLIER`].
#[must_use]
pub fn multiplier_for(combo: u32) -> f32 {
    (1.0 + combo as f32 / 10.0).min(MAX_MULTIPLIER)
}

/// Extra kills granted per destroyed target for a streak of `combo` hits.
#[must_use]
pub const fn bonus_kills_for(combo: u32) -> u32 {
    match combo {
        0..=9 => 0,
        10..=19 => 1,
        20..=29 => 2,
        _ => 3,
    }
}

/// Tracks the current streak, its expiry deadline and the best streak ever reached.
#[derive(Clone, Debug, Default)]
pub struct ComboTracker {
    current: u32,
    max_reached: u32,
    last_hit: Option<Timestamp>,
    expires_at: Option<Timestamp>,
}

impl ComboTracker {
    /// Creates a tracker that restores the best streak from `store`.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let max_reached = match load_json::<u32, _>(store, MAX_COMBO_KEY) {
            Ok(value) => value.unwrap_or(0),
            Err(error) => {
                log::error!("could not load best combo: {error}");
                0
            }
        };
        Self {
            max_reached,
            ..Self::default()
        }
    }

    /// Registers a hit at `now` and returns the new streak length.
    ///
    /// A streak whose window already closed is reset before the hit counts.
    pub fn increment(
        &mut self,
        now: Timestamp,
        stats: &mut StatsStore,
        store: &mut dyn KeyValueStore,
        out: &mut Vec<Event>,
    ) -> u32 {
        let _ = self.tick(now, out);

        self.current = self.current.saturating_add(1);
        self.last_hit = Some(now);
        self.expires_at = Some(now.saturating_add(COMBO_DECAY));

        if self.current > self.max_reached {
            self.max_reached = self.current;
            if let Err(error) = save_json(store, MAX_COMBO_KEY, &self.max_reached) {
                log::error!("could not save best combo: {error}");
            }
            let _ = stats.update_best_combo(u64::from(self.current), store);
        }

        out.push(Event::ComboChanged {
            combo: self.current,
            multiplier: self.multiplier(),
        });
        self.current
    }

    /// Drops the streak to zero. Does nothing when no streak is running.
    pub fn reset(&mut self, out: &mut Vec<Event>) {
        if self.current == 0 {
            return;
        }
        log::debug!("combo of {} reset", self.current);
        self.current = 0;
        self.last_hit = None;
        self.expires_at = None;
        out.push(Event::ComboChanged {
            combo: 0,
            multiplier: 1.0,
        });
    }

    /// Applies decay when the deadline has passed. Returns whether a reset happened.
    pub fn tick(&mut self, now: Timestamp, out: &mut Vec<Event>) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                self.expires_at = None;
                let was_running = self.current > 0;
                self.reset(out);
                was_running
            }
            _ => false,
        }
    }

    /// Overwrites the streak, e.g. when reconciling with a restored snapshot.
    ///
    /// Negative values clamp to zero. The decay window restarts at `now`.
    pub fn set_combo(&mut self, combo: i64, now: Timestamp, out: &mut Vec<Event>) {
        self.current = u32::try_from(combo.max(0)).unwrap_or(u32::MAX);
        self.last_hit = Some(now);
        self.expires_at = Some(now.saturating_add(COMBO_DECAY));
        out.push(Event::ComboChanged {
            combo: self.current,
            multiplier: self.multiplier(),
        });
    }

    /// Current streak length.
    #[must_use]
    pub fn combo(&self) -> u32 {
        self.current
    }

    /// Longest streak ever reached.
    #[must_use]
    pub fn max_combo(&self) -> u32 {
        self.max_reached
    }

    /// Reward multiplier of the current streak.
    #[must_use]
    pub fn multiplier(&self) -> f32 {
        multiplier_for(self.current)
    }

    /// Extra kills granted by the current streak.
    #[must_use]
    pub fn bonus_kills(&self) -> u32 {
        bonus_kills_for(self.current)
    }

    /// `base` plus the current streak bonus.
    #[must_use]
    pub fn effective_kills(&self, base: u32) -> u32 {
        base.saturating_add(self.bonus_kills())
    }

    /// Reports whether a streak is running and its window is still open at `now`.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        match self.last_hit {
            Some(last_hit) if self.current > 0 => {
                now.saturating_duration_since(last_hit) < COMBO_DECAY
            }
            _ => false,
        }
    }

    /// Time left before the streak decays, or zero when it is not active.
    #[must_use]
    pub fn time_remaining(&self, now: Timestamp) -> Duration {
        match self.last_hit {
            Some(last_hit) if self.is_active(now) => {
                COMBO_DECAY.saturating_sub(now.saturating_duration_since(last_hit))
            }
            _ => Duration::ZERO,
        }
    }

    /// Read-only view used by rule evaluation.
    #[must_use]
    pub fn snapshot(&self) -> ComboSnapshot {
        ComboSnapshot {
            current: self.current,
            max_reached: self.max_reached,
        }
    }
}
