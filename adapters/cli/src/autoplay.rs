use std::{collections::BTreeMap, time::Duration};

use coin_shooter_core::{ArenaPoint, Command, Event};
use coin_shooter_session::Session;
use coin_shooter_storage::KeyValueStore;
use coin_shooter_world::query;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Parameters of a headless autoplay run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AutoplayConfig {
    /// Length of the session.
    pub(crate) duration: Duration,
    /// Virtual time advanced per frame.
    pub(crate) tick: Duration,
    /// Probability in `[0, 1]` that an aimed shot lands.
    pub(crate) accuracy: f64,
    /// Seed of the bot's aim.
    pub(crate) seed: u64,
}

/// Outcome of an autoplay run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AutoplaySummary {
    /// Frames simulated.
    pub(crate) frames: u64,
    /// Targets destroyed.
    pub(crate) kills: u64,
    /// Seconds added to the play time.
    pub(crate) elapsed_seconds: u64,
    /// Number of drained events per kind.
    pub(crate) event_counts: BTreeMap<&'static str, u64>,
}

/// Seeded player that fires one shot per frame at the oldest live target.
#[derive(Debug)]
struct Bot {
    rng: ChaCha8Rng,
    accuracy: f64,
}

impl Bot {
    fn new(seed: u64, accuracy: f64) -> Self {
        let accuracy = if accuracy.is_finite() {
            accuracy.clamp(0.0, 1.0)
        } else {
            log::warn!("accuracy {accuracy} is not a number, the bot will always miss");
            0.0
        };
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            accuracy,
        }
    }

    fn aim<S: KeyValueStore>(&mut self, session: &Session<S>) -> Option<ArenaPoint> {
        let view = query::target_view(session.world());
        let target = view.iter().next()?;
        if self.rng.gen_bool(self.accuracy) {
            return Some(target.position);
        }

        let arena = query::arena(session.world());
        Some(ArenaPoint::new(
            self.rng.gen_range(0.0..=arena.width()),
            self.rng.gen_range(0.0..=arena.height()),
        ))
    }
}

/// Plays one session to completion, draining the events of every frame.
pub(crate) fn run<S: KeyValueStore>(
    session: &mut Session<S>,
    config: AutoplayConfig,
) -> AutoplaySummary {
    let mut bot = Bot::new(config.seed, config.accuracy);
    let mut summary = AutoplaySummary::default();
    let mut events = Vec::new();
    let tick = config.tick.max(Duration::from_millis(1));

    session.start(&mut events);
    drain(&mut events, &mut summary);

    let mut played = Duration::ZERO;
    while played < config.duration {
        session.apply(Command::Tick { dt: tick }, &mut events);
        if let Some(at) = bot.aim(session) {
            session.apply(Command::Shoot { at }, &mut events);
        }
        drain(&mut events, &mut summary);
        played = played.saturating_add(tick);
        summary.frames += 1;
    }

    summary.elapsed_seconds = session.end(&mut events).unwrap_or(0);
    drain(&mut events, &mut summary);
    summary
}

fn drain(events: &mut Vec<Event>, summary: &mut AutoplaySummary) {
    for event in events.drain(..) {
        match &event {
            Event::TargetDestroyed { .. } => summary.kills += 1,
            Event::LevelUp { new_level, .. } => log::info!("reached level {new_level}"),
            Event::ClaimFailed { reason } => log::warn!("claim failed: {reason}"),
            _ => {}
        }
        *summary.event_counts.entry(event_name(&event)).or_insert(0) += 1;
    }
}

/// Stable label of an event kind.
pub(crate) fn event_name(event: &Event) -> &'static str {
    match event {
        Event::TimeAdvanced { .. } => "time_advanced",
        Event::TargetSpawned { .. } => "target_spawned",
        Event::ShotFired { .. } => "shot_fired",
        Event::TargetHit { .. } => "target_hit",
        Event::KillDeferred { .. } => "kill_deferred",
        Event::TargetDestroyed { .. } => "target_destroyed",
        Event::TargetExpired { .. } => "target_expired",
        Event::MovementEnabled => "movement_enabled",
        Event::MovementDisabled => "movement_disabled",
        Event::TargetsCleared => "targets_cleared",
        Event::SessionStarted { .. } => "session_started",
        Event::SessionEnded { .. } => "session_ended",
        Event::ComboChanged { .. } => "combo_changed",
        Event::LevelUp { .. } => "level_up",
        Event::AchievementUnlocked { .. } => "achievement_unlocked",
        Event::PendingKillsChanged { .. } => "pending_kills_changed",
        Event::ClaimSucceeded { .. } => "claim_succeeded",
        Event::ClaimFailed { .. } => "claim_failed",
        Event::StatsReset => "stats_reset",
    }
}
