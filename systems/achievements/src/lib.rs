#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed achievement catalog and the engine that unlocks badges idempotently.

use coin_shooter_core::{AchievementId, ComboSnapshot, Event, PlayerStats, StatField, TargetKind};
use coin_shooter_storage::{load_json, save_json, KeyValueStore, ACHIEVEMENTS_KEY};
use coin_shooter_system_stats::StatsStore;

/// Rule evaluated against the statistics record and the combo state.
pub type AchievementRule = fn(&PlayerStats, &ComboSnapshot) -> bool;

/// Static description of a single badge.
#[derive(Clone, Copy)]
pub struct Achievement {
    /// Stable identifier.
    pub id: AchievementId,
    /// Display name.
    pub name: &'static str,
    /// Player-facing description.
    pub description: &'static str,
    rule: AchievementRule,
}

impl Achievement {
    /// Evaluates the unlock rule.
    #[must_use]
    pub fn is_satisfied(&self, stats: &PlayerStats, combo: &ComboSnapshot) -> bool {
        (self.rule)(stats, combo)
    }
}

impl std::fmt::Debug for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn best_combo(stats: &PlayerStats, combo: &ComboSnapshot) -> u64 {
    u64::from(combo.max_reached.max(combo.current)).max(stats.best_combo)
}

/// The catalog in declaration order.
pub const CATALOG: [Achievement; 10] = [
    Achievement {
        id: AchievementId::FirstBlood,
        name: "First Blood",
        description: "Destroy your first target",
        rule: |stats, _| stats.total_kills >= 1,
    },
    Achievement {
        id: AchievementId::ComboMaster,
        name: "Combo Master",
        description: "Reach a combo of 10",
        rule: |stats, combo| best_combo(stats, combo) >= 10,
    },
    Achievement {
        id: AchievementId::ComboLegend,
        name: "Combo Legend",
        description: "Reach a combo of 50",
        rule: |stats, combo| best_combo(stats, combo) >= 50,
    },
    Achievement {
        id: AchievementId::SpeedDemon,
        name: "Speed Demon",
        description: "Destroy 10 fast targets",
        rule: |stats, _| stats.fast_targets_killed >= 10,
    },
    Achievement {
        id: AchievementId::TankBuster,
        name: "Tank Buster",
        description: "Destroy 5 tank targets",
        rule: |stats, _| stats.tank_targets_killed >= 5,
    },
    Achievement {
        id: AchievementId::LuckyShot,
        name: "Lucky Shot",
        description: "Find a special target",
        rule: |stats, _| stats.special_targets_killed >= 1,
    },
    Achievement {
        id: AchievementId::Centurion,
        name: "Centurion",
        description: "Reach 100 total kills",
        rule: |stats, _| stats.total_kills >= 100,
    },
    Achievement {
        id: AchievementId::Veteran,
        name: "Veteran",
        description: "Reach 500 total kills",
        rule: |stats, _| stats.total_kills >= 500,
    },
    Achievement {
        id: AchievementId::Precision,
        name: "Precision",
        description: "Keep your accuracy at 80% or above",
        rule: |stats, _| stats.accuracy() >= 80.0,
    },
    Achievement {
        id: AchievementId::Marathon,
        name: "Marathon",
        description: "Play for 30 minutes",
        rule: |stats, _| stats.total_play_time_seconds >= 1_800,
    },
];

/// Catalog entry for `id`.
#[must_use]
pub fn achievement(id: AchievementId) -> &'static Achievement {
    let index = AchievementId::ALL
        .iter()
        .position(|candidate| *candidate == id)
        .unwrap_or(0);
    &CATALOG[index]
}

/// Catalog entry paired with its unlock state.
#[derive(Clone, Copy, Debug)]
pub struct AchievementStatus {
    /// The catalog entry.
    pub achievement: &'static Achievement,
    /// Whether the player unlocked it.
    pub unlocked: bool,
}

/// Owner of the persisted unlock list.
#[derive(Clone, Debug, Default)]
pub struct AchievementEngine {
    unlocked: Vec<AchievementId>,
}

impl AchievementEngine {
    /// Restores the unlock list from `store`.
    ///
    /// Unknown identifiers are dropped and duplicates collapse to their first
    /// occurrence. An unreadable record starts an empty list.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match load_json::<Vec<String>, _>(store, ACHIEVEMENTS_KEY) {
            Ok(ids) => ids.unwrap_or_default(),
            Err(error) => {
                log::error!("could not load achievements: {error}");
                Vec::new()
            }
        };

        let mut unlocked = Vec::with_capacity(raw.len());
        for id in raw {
            match AchievementId::parse(&id) {
                Some(id) if !unlocked.contains(&id) => unlocked.push(id),
                Some(_) => {}
                None => log::warn!("ignoring unknown achievement \"{id}\""),
            }
        }
        Self { unlocked }
    }

    /// Unlocks every catalog entry whose rule now holds, in catalog order.
    ///
    /// Returns only the entries unlocked by this pass.
    pub fn check_achievements(
        &mut self,
        stats: &PlayerStats,
        combo: &ComboSnapshot,
        store: &mut dyn KeyValueStore,
        out: &mut Vec<Event>,
    ) -> Vec<AchievementId> {
        let mut newly_unlocked = Vec::new();
        for entry in &CATALOG {
            if self.is_unlocked(entry.id) || !entry.is_satisfied(stats, combo) {
                continue;
            }
            if self.unlock(entry.id, store, out) {
                newly_unlocked.push(entry.id);
            }
        }
        newly_unlocked
    }

    /// Counts a destroyed target of `kind` and re-evaluates the catalog.
    pub fn record_target_kill(
        &mut self,
        kind: TargetKind,
        stats: &mut StatsStore,
        combo: &ComboSnapshot,
        store: &mut dyn KeyValueStore,
        out: &mut Vec<Event>,
    ) -> Vec<AchievementId> {
        if let Some(field) = StatField::kills_of(kind) {
            let _ = stats.increment(field, 1, store);
        }
        self.check_achievements(stats.stats(), combo, store, out)
    }

    /// Appends `id` to the unlock list. Returns `false` if it was already unlocked.
    pub fn unlock(
        &mut self,
        id: AchievementId,
        store: &mut dyn KeyValueStore,
        out: &mut Vec<Event>,
    ) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.unlocked.push(id);
        self.persist(store);
        log::info!("achievement unlocked: {}", achievement(id).name);
        out.push(Event::AchievementUnlocked { achievement: id });
        true
    }

    /// Reports whether `id` was unlocked.
    #[must_use]
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains(&id)
    }

    /// Unlocked entries in unlock order.
    #[must_use]
    pub fn unlocked_achievements(&self) -> Vec<&'static Achievement> {
        self.unlocked.iter().map(|id| achievement(*id)).collect()
    }

    /// Every catalog entry with its unlock state, in catalog order.
    #[must_use]
    pub fn all_achievements(&self) -> Vec<AchievementStatus> {
        CATALOG
            .iter()
            .map(|entry| AchievementStatus {
                achievement: entry,
                unlocked: self.is_unlocked(entry.id),
            })
            .collect()
    }

    fn persist(&self, store: &mut dyn KeyValueStore) {
        let ids: Vec<&str> = self.unlocked.iter().map(|id| id.as_str()).collect();
        if let Err(error) = save_json(store, ACHIEVEMENTS_KEY, &ids) {
            log::error!("could not save achievements: {error}");
        }
    }
}
