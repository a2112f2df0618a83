#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persisted counter of kills waiting to be claimed.

use coin_shooter_core::{Timestamp, MIN_KILLS_FOR_CLAIM};
use coin_shooter_storage::{load_json, save_json, KeyValueStore, PENDING_KILLS_KEY};
use serde::{Deserialize, Serialize};

/// Stored form of the queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PendingKills {
    /// Kills waiting to be claimed.
    pub count: u64,
    /// Time of the last change.
    pub last_update: Timestamp,
}

/// Append-only pending kill counter, cleared after a confirmed claim.
#[derive(Clone, Debug, Default)]
pub struct KillQueue {
    pending: PendingKills,
}

impl KillQueue {
    /// Restores the queue from `store`. An unreadable record counts as empty.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let pending = match load_json::<PendingKills, _>(store, PENDING_KILLS_KEY) {
            Ok(pending) => pending.unwrap_or_default(),
            Err(error) => {
                log::error!("could not read pending kills: {error}");
                PendingKills::default()
            }
        };
        Self { pending }
    }

    /// Adds `count` kills and returns the new total.
    pub fn add_kills(&mut self, count: u64, now: Timestamp, store: &mut dyn KeyValueStore) -> u64 {
        if count == 0 {
            return self.pending.count;
        }
        self.pending.count = self.pending.count.saturating_add(count);
        self.pending.last_update = now;
        self.persist(store);
        self.pending.count
    }

    /// Adds a single kill and returns the new total.
    pub fn add_kill(&mut self, now: Timestamp, store: &mut dyn KeyValueStore) -> u64 {
        self.add_kills(1, now, store)
    }

    /// Kills waiting to be claimed.
    #[must_use]
    pub fn pending_kills(&self) -> u64 {
        self.pending.count
    }

    /// Time of the last change, or the epoch when nothing was queued yet.
    #[must_use]
    pub fn last_update(&self) -> Timestamp {
        self.pending.last_update
    }

    /// Empties the queue and removes its record.
    ///
    /// Returns `false` when the record could not be removed; the in-memory
    /// queue is emptied either way.
    pub fn clear_kills(&mut self, store: &mut dyn KeyValueStore) -> bool {
        self.pending = PendingKills::default();
        match store.remove(PENDING_KILLS_KEY) {
            Ok(()) => true,
            Err(error) => {
                log::error!("could not clear pending kills: {error}");
                false
            }
        }
    }

    /// Removes `claimed` kills after a confirmed claim and returns what is left.
    ///
    /// Kills queued while the claim was in flight stay pending.
    pub fn settle(&mut self, claimed: u64, now: Timestamp, store: &mut dyn KeyValueStore) -> u64 {
        let remaining = self.pending.count.saturating_sub(claimed);
        if remaining == 0 {
            let _ = self.clear_kills(store);
            return 0;
        }
        self.pending.count = remaining;
        self.pending.last_update = now;
        self.persist(store);
        remaining
    }

    /// Reports whether the default claim minimum is reached.
    #[must_use]
    pub fn can_claim(&self) -> bool {
        self.meets_minimum(MIN_KILLS_FOR_CLAIM)
    }

    /// Reports whether at least `min_kills` kills, and at least one, are queued.
    #[must_use]
    pub fn meets_minimum(&self, min_kills: u64) -> bool {
        self.pending.count > 0 && self.pending.count >= min_kills
    }

    fn persist(&self, store: &mut dyn KeyValueStore) {
        if let Err(error) = save_json(store, PENDING_KILLS_KEY, &self.pending) {
            log::error!("could not save pending kills: {error}");
        }
    }
}
