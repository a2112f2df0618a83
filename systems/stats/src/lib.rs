#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Write-through store for cumulative player statistics.
//!
//! Every mutation persists the full snapshot immediately. Storage failures are
//! logged and never reach gameplay: the in-memory record stays authoritative
//! for the rest of the session.

use coin_shooter_core::{PlayerStats, StatField, Timestamp};
use coin_shooter_storage::{load_json, save_json, KeyValueStore, STATS_KEY};

/// Owner of the persisted [`PlayerStats`] record.
#[derive(Clone, Debug, Default)]
pub struct StatsStore {
    stats: PlayerStats,
}

impl StatsStore {
    /// Restores statistics from `store`, falling back to defaults when the
    /// record is missing or unreadable.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let stats = match load_json::<PlayerStats, _>(store, STATS_KEY) {
            Ok(Some(stats)) => stats,
            Ok(None) => PlayerStats::default(),
            Err(error) => {
                log::error!("could not load statistics, starting fresh: {error}");
                PlayerStats::default()
            }
        };
        Self { stats }
    }

    /// Reads a numeric field.
    #[must_use]
    pub fn get(&self, field: StatField) -> u64 {
        self.stats.get(field)
    }

    /// Reads a numeric field by its persisted name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<u64> {
        StatField::from_name(name).map(|field| self.get(field))
    }

    /// Overwrites a field and persists the snapshot.
    ///
    /// Counters never move backwards outside [`StatsStore::reset`], so a value
    /// below the current one is rejected and `false` is returned.
    pub fn set(&mut self, field: StatField, value: u64, store: &mut dyn KeyValueStore) -> bool {
        let current = self.stats.get(field);
        if value < current {
            log::warn!(
                "refusing to lower statistic \"{}\" from {current} to {value}",
                field.name()
            );
            return false;
        }
        self.stats.put(field, value);
        self.persist(store);
        true
    }

    /// Overwrites a field addressed by name. Unknown names are rejected.
    pub fn set_by_name(&mut self, name: &str, value: u64, store: &mut dyn KeyValueStore) -> bool {
        match StatField::from_name(name) {
            Some(field) => self.set(field, value, store),
            None => {
                log::warn!("statistic \"{name}\" does not exist");
                false
            }
        }
    }

    /// Adds `amount` to a field, persists the snapshot and returns the new value.
    pub fn increment(
        &mut self,
        field: StatField,
        amount: u64,
        store: &mut dyn KeyValueStore,
    ) -> u64 {
        let value = self.stats.get(field).saturating_add(amount);
        self.stats.put(field, value);
        self.persist(store);
        self.stats.get(field)
    }

    /// Adds `amount` to a field addressed by name. Unknown or non-numeric
    /// names are rejected with `None`.
    pub fn increment_by_name(
        &mut self,
        name: &str,
        amount: u64,
        store: &mut dyn KeyValueStore,
    ) -> Option<u64> {
        match StatField::from_name(name) {
            Some(field) => Some(self.increment(field, amount, store)),
            None => {
                log::warn!("statistic \"{name}\" does not exist or is not numeric");
                None
            }
        }
    }

    /// Borrow of the current record.
    #[must_use]
    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Independent copy of the current record.
    #[must_use]
    pub fn snapshot(&self) -> PlayerStats {
        self.stats.clone()
    }

    /// Marks the start of a play session.
    pub fn start_session(&mut self, now: Timestamp, store: &mut dyn KeyValueStore) {
        self.stats.session_start = Some(now);
        self.persist(store);
    }

    /// Closes the running session, adding its whole seconds to the play time.
    ///
    /// Returns the seconds added, or `None` when no session was running.
    pub fn end_session(&mut self, now: Timestamp, store: &mut dyn KeyValueStore) -> Option<u64> {
        let started = self.stats.session_start.take()?;
        let elapsed = now.saturating_duration_since(started).as_secs();
        self.stats.total_play_time_seconds =
            self.stats.total_play_time_seconds.saturating_add(elapsed);
        self.persist(store);
        Some(elapsed)
    }

    /// Raises the best session score when `session_kills` beats it.
    pub fn update_best_session(&mut self, session_kills: u64, store: &mut dyn KeyValueStore) -> bool {
        self.raise(StatField::BestSession, session_kills, store)
    }

    /// Raises the best combo when `combo` beats it.
    pub fn update_best_combo(&mut self, combo: u64, store: &mut dyn KeyValueStore) -> bool {
        self.raise(StatField::BestCombo, combo, store)
    }

    /// Counts a shot, and a hit when `is_hit` is set.
    pub fn record_shot(&mut self, is_hit: bool, store: &mut dyn KeyValueStore) {
        let _ = self.increment(StatField::TotalShots, 1, store);
        if is_hit {
            let _ = self.increment(StatField::TotalHits, 1, store);
        }
    }

    /// Percentage of shots that hit, or zero when no shot was fired.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.stats.accuracy()
    }

    /// Restores every field to its default.
    pub fn reset(&mut self, store: &mut dyn KeyValueStore) {
        self.stats = PlayerStats::default();
        self.persist(store);
        log::info!("statistics reset");
    }

    /// Cumulative play time rendered for display.
    #[must_use]
    pub fn formatted_play_time(&self) -> String {
        format_play_time(self.stats.total_play_time_seconds)
    }

    fn raise(&mut self, field: StatField, candidate: u64, store: &mut dyn KeyValueStore) -> bool {
        if candidate <= self.stats.get(field) {
            return false;
        }
        self.stats.put(field, candidate);
        self.persist(store);
        true
    }

    fn persist(&self, store: &mut dyn KeyValueStore) {
        if let Err(error) = save_json(store, STATS_KEY, &self.stats) {
            log::error!("could not save statistics: {error}");
        }
    }
}

/// Renders a number of seconds as `Hh Mm Ss`, dropping leading zero units.
#[must_use]
pub fn format_play_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coin_shooter_storage::MemoryStore;

    #[test]
    fn play_time_drops_leading_zero_units() {
        assert_eq!(format_play_time(0), "0s");
        assert_eq!(format_play_time(59), "59s");
        assert_eq!(format_play_time(61), "1m 1s");
        assert_eq!(format_play_time(3_600), "1h 0m 0s");
        assert_eq!(format_play_time(3_725), "1h 2m 5s");
    }

    #[test]
    fn raise_only_accepts_larger_values() {
        let mut store = MemoryStore::new();
        let mut stats = StatsStore::default();
        assert!(stats.raise(StatField::BestCombo, 4, &mut store));
        assert!(!stats.raise(StatField::BestCombo, 4, &mut store));
        assert!(!stats.raise(StatField::BestCombo, 2, &mut store));
        assert_eq!(stats.get(StatField::BestCombo), 4);
    }
}
