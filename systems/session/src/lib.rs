#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single owner of a play session.
//!
//! [`Session`] holds the store, the arena and every gameplay component. Input
//! arrives as [`Command`] values and everything observable leaves as [`Event`]
//! values pushed into the caller's buffer, so presentation layers drain one
//! buffer per frame instead of registering callbacks.

use std::time::Duration;

use coin_shooter_core::{
    ClaimReceipt, Command, Event, StatField, TargetKind, Timestamp, KILL_COOLDOWN,
    SCORE_FOR_MOVEMENT, SPAWN_MARGIN, TARGET_HIT_RADIUS,
};
use coin_shooter_storage::KeyValueStore;
use coin_shooter_system_achievements::AchievementEngine;
use coin_shooter_system_claim::{
    ClaimConfig, ClaimCoordinator, ClaimError, ClaimSubmitter, ClaimTicket, NetworkValidator,
    WalletPreference,
};
use coin_shooter_system_combo::ComboTracker;
use coin_shooter_system_kill_queue::KillQueue;
use coin_shooter_system_progression::Progression;
use coin_shooter_system_spawning::{Config as SpawnConfig, SpawnArea, Spawning};
use coin_shooter_system_stats::StatsStore;
use coin_shooter_world::{self as world, query, Arena, World, WorldRules};
use serde::{Deserialize, Serialize};

const DEFAULT_SEED: u64 = 0x0c01_5400_7e55_1011;

/// Tunable parameters of a play session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Arena width in arena units.
    pub arena_width: f32,
    /// Arena height in arena units.
    pub arena_height: f32,
    /// Seed for spawn placement, archetypes and movement.
    pub seed: u64,
    /// Minimum milliseconds between two destroyed targets.
    pub kill_cooldown_ms: u64,
    /// Session score targets start moving beyond.
    pub movement_threshold: u64,
    /// Hit radius of a regular sized target.
    pub hit_radius: f32,
    /// Distance kept between spawns and the arena border.
    pub spawn_margin: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let arena = Arena::default();
        Self {
            arena_width: arena.width(),
            arena_height: arena.height(),
            seed: DEFAULT_SEED,
            kill_cooldown_ms: u64::try_from(KILL_COOLDOWN.as_millis()).unwrap_or(u64::MAX),
            movement_threshold: SCORE_FOR_MOVEMENT,
            hit_radius: TARGET_HIT_RADIUS,
            spawn_margin: SPAWN_MARGIN,
        }
    }
}

impl SessionConfig {
    fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    fn world_rules(&self) -> WorldRules {
        WorldRules {
            kill_cooldown: Duration::from_millis(self.kill_cooldown_ms),
            hit_radius: self.hit_radius,
            movement_seed: self.seed.rotate_left(17),
        }
    }

    fn spawning(&self) -> Spawning {
        Spawning::new(SpawnConfig::new(self.seed).with_margin(self.spawn_margin))
    }
}

/// Game-session context owning every component and the backing store.
#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    config: SessionConfig,
    store: S,
    world: World,
    stats: StatsStore,
    combo: ComboTracker,
    progression: Progression,
    achievements: AchievementEngine,
    kill_queue: KillQueue,
    spawning: Spawning,
    claims: ClaimCoordinator,
    wallet: WalletPreference,
    score: u64,
    active: bool,
}

impl<S: KeyValueStore> Session<S> {
    /// Restores every component from `store` with the clock starting at `start`.
    #[must_use]
    pub fn new(
        store: S,
        config: SessionConfig,
        claim_config: ClaimConfig,
        start: Timestamp,
    ) -> Self {
        let world = World::with_rules(config.arena(), start, config.world_rules());
        let spawning = config.spawning();
        let mut session = Self {
            stats: StatsStore::default(),
            combo: ComboTracker::default(),
            progression: Progression,
            achievements: AchievementEngine::default(),
            kill_queue: KillQueue::default(),
            wallet: WalletPreference::default(),
            claims: ClaimCoordinator::new(claim_config),
            score: 0,
            active: false,
            spawning,
            world,
            store,
            config,
        };
        session.reload();
        session
    }

    /// Rebuilds every persisted component from the store.
    ///
    /// The running streak is not persisted and restarts at zero.
    pub fn reload(&mut self) {
        self.stats = StatsStore::load(&self.store);
        self.combo = ComboTracker::load(&self.store);
        self.achievements = AchievementEngine::load(&self.store);
        self.kill_queue = KillQueue::load(&self.store);
        self.wallet = WalletPreference::load(&self.store);
        log::debug!(
            "session state loaded: {} kills, {} pending",
            self.stats.get(StatField::TotalKills),
            self.kill_queue.pending_kills()
        );
    }

    /// Begins a play session at the current clock reading.
    ///
    /// Does nothing while a session is already running.
    pub fn start(&mut self, out: &mut Vec<Event>) {
        if self.active {
            log::debug!("session already running");
            return;
        }
        let now = self.now();
        self.stats.start_session(now, &mut self.store);
        self.score = 0;
        self.active = true;
        self.spawning.reset();
        out.push(Event::SessionStarted { at: now });
        out.push(Event::PendingKillsChanged {
            pending: self.kill_queue.pending_kills(),
        });
    }

    /// Ends the running session, banking play time and the session best.
    ///
    /// Returns the whole seconds added to the play time, or `None` when no
    /// session was running.
    pub fn end(&mut self, out: &mut Vec<Event>) -> Option<u64> {
        if !self.active {
            return None;
        }
        self.active = false;
        let now = self.now();
        let elapsed_seconds = self.stats.end_session(now, &mut self.store).unwrap_or(0);
        let _ = self.stats.update_best_session(self.score, &mut self.store);
        self.combo.reset(out);
        world::apply(&mut self.world, Command::ClearTargets, out);
        let _ = self.achievements.check_achievements(
            self.stats.stats(),
            &self.combo.snapshot(),
            &mut self.store,
            out,
        );
        out.push(Event::SessionEnded {
            elapsed_seconds,
            session_kills: self.score,
        });
        Some(elapsed_seconds)
    }

    /// Applies `command` to the arena and runs every gameplay rule it triggers.
    pub fn apply(&mut self, command: Command, out: &mut Vec<Event>) {
        let mut produced = Vec::new();
        world::apply(&mut self.world, command, &mut produced);

        let mut spawn_commands = Vec::new();
        let time_advanced = produced
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }));
        if self.active && time_advanced {
            let level = self.level();
            let area = SpawnArea::new(self.config.arena_width, self.config.arena_height);
            self.spawning.handle(
                &produced,
                level,
                query::target_count(&self.world),
                area,
                &mut spawn_commands,
            );
        }

        for event in produced {
            out.push(event.clone());
            self.react(&event, out);
        }
        for command in spawn_commands {
            world::apply(&mut self.world, command, out);
        }

        if self.score > self.config.movement_threshold && !query::movement_enabled(&self.world) {
            world::apply(&mut self.world, Command::EnableMovement, out);
        }
    }

    fn react(&mut self, event: &Event, out: &mut Vec<Event>) {
        let now = self.now();
        match event {
            Event::TimeAdvanced { .. } => {
                let _ = self.combo.tick(now, out);
            }
            Event::ShotFired { hit, .. } => {
                self.stats.record_shot(hit.is_some(), &mut self.store);
                if hit.is_none() {
                    self.combo.reset(out);
                }
            }
            Event::TargetDestroyed {
                kind, kill_value, ..
            } => {
                let _ = self.record_kill(*kind, *kill_value, out);
            }
            _ => {}
        }
    }

    /// Runs the kill pipeline for a destroyed target and returns the kills queued.
    ///
    /// Order: combo, statistics, level, achievements, pending queue.
    pub fn record_kill(&mut self, kind: TargetKind, kill_value: u32, out: &mut Vec<Event>) -> u64 {
        let now = self.now();
        let _ = self
            .combo
            .increment(now, &mut self.stats, &mut self.store, out);

        self.score = self.score.saturating_add(1);
        let new_total = self.stats.get(StatField::TotalKills).saturating_add(1);
        let _ = self
            .progression
            .check_level_up(new_total, &mut self.stats, &mut self.store, out);
        let _ = self
            .stats
            .increment(StatField::TotalKills, 1, &mut self.store);

        let combo = self.combo.snapshot();
        let _ = self.achievements.record_target_kill(
            kind,
            &mut self.stats,
            &combo,
            &mut self.store,
            out,
        );

        let earned = u64::from(self.combo.effective_kills(kill_value));
        let pending = self.kill_queue.add_kills(earned, now, &mut self.store);
        out.push(Event::PendingKillsChanged { pending });
        earned
    }

    /// Starts a claim for the pending kills.
    pub fn begin_claim(
        &mut self,
        validator: &dyn NetworkValidator,
    ) -> Result<ClaimTicket, ClaimError> {
        self.claims.begin(&self.kill_queue, self.wallet, validator)
    }

    /// Records the ledger's answer for a claim started with [`Session::begin_claim`].
    ///
    /// A confirmed claim also restarts the session score, so new targets spawn
    /// standing still until the movement threshold is passed again.
    pub fn complete_claim(
        &mut self,
        ticket: ClaimTicket,
        outcome: Result<ClaimReceipt, ClaimError>,
        out: &mut Vec<Event>,
    ) -> Result<ClaimReceipt, ClaimError> {
        let now = self.now();
        let receipt = self.claims.complete(
            ticket,
            outcome,
            &mut self.kill_queue,
            &mut self.stats,
            &mut self.store,
            now,
            out,
        )?;
        self.score = 0;
        world::apply(&mut self.world, Command::DisableMovement, out);
        Ok(receipt)
    }

    /// Reports whether the pending kills meet the contract's claim minimum.
    #[must_use]
    pub fn can_claim(&self) -> bool {
        self.claims.can_claim(&self.kill_queue)
    }

    /// Starts, submits and completes a claim in one call.
    pub fn claim(
        &mut self,
        submitter: &mut dyn ClaimSubmitter,
        validator: &dyn NetworkValidator,
        out: &mut Vec<Event>,
    ) -> Result<ClaimReceipt, ClaimError> {
        let ticket = self.begin_claim(validator)?;
        let outcome = submitter.submit(ticket.kills());
        self.complete_claim(ticket, outcome, out)
    }

    /// Restores statistics to their defaults.
    pub fn reset_stats(&mut self, out: &mut Vec<Event>) {
        self.stats.reset(&mut self.store);
        out.push(Event::StatsReset);
    }

    /// Stores the signer used for future claims.
    pub fn set_wallet_preference(&mut self, preference: WalletPreference) {
        self.wallet = preference;
        preference.save(&mut self.store);
    }

    /// Signer used for claims.
    #[must_use]
    pub fn wallet_preference(&self) -> WalletPreference {
        self.wallet
    }

    /// Current reading of the session clock.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        query::now(&self.world)
    }

    /// Level derived from the cumulative kill count.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.progression.current_level(&self.stats)
    }

    /// Targets destroyed since the session started or the last claim.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Reports whether a session is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Session parameters.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Arena state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Statistics record.
    #[must_use]
    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }

    /// Hit streak.
    #[must_use]
    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    /// Level queries.
    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Unlocked badges.
    #[must_use]
    pub fn achievements(&self) -> &AchievementEngine {
        &self.achievements
    }

    /// Pending kill counter.
    #[must_use]
    pub fn kill_queue(&self) -> &KillQueue {
        &self.kill_queue
    }

    /// Claim state.
    #[must_use]
    pub fn claims(&self) -> &ClaimCoordinator {
        &self.claims
    }

    /// Backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store, e.g. to simulate outside edits.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the session, returning the backing store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_use_canonical_constants() {
        let config = SessionConfig::default();
        assert_eq!(config.kill_cooldown_ms, 1_000);
        assert_eq!(config.movement_threshold, 5);
        assert_eq!(config.hit_radius, 20.0);
        assert_eq!(config.spawn_margin, 50.0);
        assert_eq!(config.world_rules().kill_cooldown, KILL_COOLDOWN);
    }

    #[test]
    fn partial_toml_merges_over_defaults() {
        let config: SessionConfig =
            toml::from_str("seed = 7\narena_width = 1024.0").expect("parse");
        assert_eq!(config.seed, 7);
        assert_eq!(config.arena_width, 1_024.0);
        assert_eq!(config.arena_height, SessionConfig::default().arena_height);
    }
}
