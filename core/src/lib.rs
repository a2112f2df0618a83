#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the coin shooter engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative target arena, and pure systems. Adapters submit [`Command`]
//! values describing desired arena mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to. Systems consume event streams, read immutable
//! snapshots, and respond exclusively with new command or event batches that
//! the presentation layer drains once per tick.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Delay between spawn attempts before any difficulty scaling is applied.
pub const TARGET_SPAWN_DELAY: Duration = Duration::from_millis(5_000);

/// Lifetime of a target before any difficulty scaling is applied.
pub const TARGET_LIFETIME: Duration = Duration::from_millis(4_000);

/// Health of a target before any difficulty scaling is applied.
pub const TARGET_BASE_HEALTH: u32 = 5;

/// Health removed from a target by a single successful shot.
pub const DAMAGE_PER_HIT: u32 = 1;

/// Minimum time between two consecutive kills.
pub const KILL_COOLDOWN: Duration = Duration::from_millis(1_000);

/// Session score that must be exceeded before targets start moving.
pub const SCORE_FOR_MOVEMENT: u64 = 5;

/// Radius around a target's center that registers a hit, before size scaling.
pub const TARGET_HIT_RADIUS: f32 = 20.0;

/// Distance kept between spawned targets and the arena edges.
pub const SPAWN_MARGIN: f32 = 50.0;

/// Idle window after which an active combo decays to zero.
pub const COMBO_DECAY: Duration = Duration::from_millis(5_000);

/// Upper bound applied to the combo reward multiplier.
pub const MAX_MULTIPLIER: f32 = 5.0;

/// Pending kills required before a claim may be submitted.
pub const MIN_KILLS_FOR_CLAIM: u64 = 10;

/// Point in time measured in whole milliseconds since the Unix epoch.
///
/// The session clock is virtual: it starts from a wall-clock reading and then
/// only advances through `Command::Tick`, which keeps replays and tests
/// independent of real time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since the Unix epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Reads the current wall-clock time.
    ///
    /// Clocks set before the Unix epoch collapse to zero.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self(millis)
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns the timestamp shifted forward by `duration`, saturating at the maximum.
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Time elapsed since `earlier`, or zero when `earlier` lies in the future.
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

/// Commands that express all permissible arena mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the arena clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new target be placed into the arena with full health.
    SpawnTarget {
        /// Archetype of the spawned target.
        kind: TargetKind,
        /// Center of the target in arena units.
        position: ArenaPoint,
        /// Speed the target travels at once it starts moving, in arena units per second.
        speed: f32,
        /// Health the target starts with.
        max_health: u32,
        /// Kill value awarded when the target is destroyed.
        kill_value: u32,
        /// Time the target stays in the arena before expiring.
        lifetime: Duration,
    },
    /// Fires a single shot at the provided arena point.
    Shoot {
        /// Point the shot lands on.
        at: ArenaPoint,
    },
    /// Starts every live target moving and makes future spawns move immediately.
    EnableMovement,
    /// Stops future spawns from moving. Targets already in motion keep moving.
    DisableMovement,
    /// Removes every live target without awarding anything.
    ClearTargets,
}

/// Events broadcast after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the arena clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a target entered the arena.
    TargetSpawned {
        /// Identifier assigned to the target.
        target: TargetId,
        /// Archetype of the target.
        kind: TargetKind,
        /// Spawn position of the target.
        position: ArenaPoint,
        /// Health the target started with.
        max_health: u32,
    },
    /// Reports that a shot was fired, whether or not it connected.
    ShotFired {
        /// Point the shot landed on.
        at: ArenaPoint,
        /// Target struck by the shot, if any.
        hit: Option<TargetId>,
    },
    /// Reports that a shot removed health from a target.
    TargetHit {
        /// Identifier of the struck target.
        target: TargetId,
        /// Health left after the hit.
        remaining_health: u32,
        /// Health the target started with.
        max_health: u32,
    },
    /// Reports that a target reached zero health while the kill cooldown was active.
    KillDeferred {
        /// Identifier of the target that survived.
        target: TargetId,
        /// Time left before another kill is allowed.
        cooldown_remaining: Duration,
    },
    /// Confirms that a target was destroyed by the player.
    TargetDestroyed {
        /// Identifier of the destroyed target.
        target: TargetId,
        /// Archetype of the destroyed target.
        kind: TargetKind,
        /// Base kill value awarded by the target.
        kill_value: u32,
        /// Position of the target when it was destroyed.
        position: ArenaPoint,
    },
    /// Reports that a target left the arena because its lifetime elapsed.
    TargetExpired {
        /// Identifier of the expired target.
        target: TargetId,
    },
    /// Announces that targets now move.
    MovementEnabled,
    /// Announces that new targets spawn standing still again.
    MovementDisabled,
    /// Announces that every live target was removed.
    TargetsCleared,
    /// Announces that a play session began.
    SessionStarted {
        /// Time the session began.
        at: Timestamp,
    },
    /// Announces that a play session ended.
    SessionEnded {
        /// Whole seconds added to the cumulative play time.
        elapsed_seconds: u64,
        /// Targets destroyed during the session.
        session_kills: u64,
    },
    /// Reports a change of the combo streak.
    ComboChanged {
        /// Current streak length.
        combo: u32,
        /// Reward multiplier derived from the streak.
        multiplier: f32,
    },
    /// Reports that the player reached a new level.
    LevelUp {
        /// Level before the kill that triggered the transition.
        old_level: u32,
        /// Level after the transition.
        new_level: u32,
    },
    /// Reports that an achievement was unlocked for the first time.
    AchievementUnlocked {
        /// Achievement that was unlocked.
        achievement: AchievementId,
    },
    /// Reports the pending kill total after it changed.
    PendingKillsChanged {
        /// Kills waiting to be claimed.
        pending: u64,
    },
    /// Confirms that a claim was accepted by the remote ledger.
    ClaimSucceeded {
        /// Details returned by the ledger.
        receipt: ClaimReceipt,
    },
    /// Reports that a claim did not complete; pending kills are preserved.
    ClaimFailed {
        /// Human-readable failure reason.
        reason: String,
    },
    /// Announces that player statistics were restored to their defaults.
    StatsReset,
}

/// Location inside the arena measured in arena units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaPoint {
    x: f32,
    y: f32,
}

impl ArenaPoint {
    /// Creates a new arena point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: ArenaPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Unique identifier assigned to a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(u32);

impl TargetId {
    /// Creates a new target identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Archetypes a target can take.
///
/// Declaration order is canonical: spawn weights are accumulated in this order
/// and ties resolve to the earlier variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Baseline target.
    Normal,
    /// Small, quick, fragile target.
    Fast,
    /// Large, slow, durable target worth several kills.
    Tank,
    /// Rare high-value target.
    Special,
}

impl TargetKind {
    /// Every kind in canonical declaration order.
    pub const ALL: [TargetKind; 4] = [Self::Normal, Self::Fast, Self::Tank, Self::Special];

    /// Static properties of the kind.
    #[must_use]
    pub const fn properties(self) -> TargetProperties {
        match self {
            Self::Normal => TargetProperties {
                health: 5,
                kill_value: 1,
                speed_multiplier: 1.0,
                size_multiplier: 1.0,
                spawn_weight: 100,
            },
            Self::Fast => TargetProperties {
                health: 3,
                kill_value: 1,
                speed_multiplier: 2.0,
                size_multiplier: 0.8,
                spawn_weight: 0,
            },
            Self::Tank => TargetProperties {
                health: 10,
                kill_value: 3,
                speed_multiplier: 0.5,
                size_multiplier: 1.3,
                spawn_weight: 0,
            },
            Self::Special => TargetProperties {
                health: 7,
                kill_value: 5,
                speed_multiplier: 1.5,
                size_multiplier: 1.1,
                spawn_weight: 0,
            },
        }
    }

    /// Stable lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Tank => "tank",
            Self::Special => "special",
        }
    }

    /// Display name shown to players.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::Tank => "Tank",
            Self::Special => "Special",
        }
    }
}

/// Static tuning attached to a [`TargetKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetProperties {
    /// Base health before level scaling.
    pub health: u32,
    /// Kills awarded when destroyed, before combo bonuses.
    pub kill_value: u32,
    /// Factor applied to the level's base velocity.
    pub speed_multiplier: f32,
    /// Factor applied to the hit radius.
    pub size_multiplier: f32,
    /// Default spawn weight; level bands override it.
    pub spawn_weight: u32,
}

/// Immutable representation of a single target used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetSnapshot {
    /// Identifier assigned to the target.
    pub id: TargetId,
    /// Archetype of the target.
    pub kind: TargetKind,
    /// Current center of the target.
    pub position: ArenaPoint,
    /// Remaining health.
    pub health: u32,
    /// Health the target started with.
    pub max_health: u32,
    /// Base kill value awarded on destruction.
    pub kill_value: u32,
    /// Whether the target is currently moving.
    pub moving: bool,
    /// Time the target entered the arena.
    pub spawned_at: Timestamp,
    /// Time the target expires if it survives.
    pub despawn_at: Timestamp,
}

impl TargetSnapshot {
    /// Fraction of health remaining in `[0, 1]`, used by health indicators.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

/// Read-only snapshot describing every live target.
#[derive(Clone, Debug, Default)]
pub struct TargetView {
    snapshots: Vec<TargetSnapshot>,
}

impl TargetView {
    /// Creates a new target view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TargetSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetSnapshot> {
        self.snapshots.iter()
    }

    /// Number of live targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TargetSnapshot> {
        self.snapshots
    }
}

/// Cumulative player statistics persisted as a single record.
///
/// Every counter only grows until an explicit reset. Missing fields in a
/// stored snapshot fall back to their defaults, so older snapshots merge over
/// the current schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    /// Targets destroyed across all sessions.
    pub total_kills: u64,
    /// Longest combo ever reached.
    pub best_combo: u64,
    /// Highest level reached.
    pub level: u32,
    /// Successful claims.
    pub total_claims: u64,
    /// Whole seconds spent playing.
    #[serde(rename = "totalPlayTime")]
    pub total_play_time_seconds: u64,
    /// Shots fired.
    pub total_shots: u64,
    /// Shots that struck a target.
    pub total_hits: u64,
    /// Most kills in a single session.
    pub best_session: u64,
    /// Start of the running session, if one is active.
    #[serde(rename = "sessionStartTime")]
    pub session_start: Option<Timestamp>,
    /// Fast targets destroyed.
    pub fast_targets_killed: u64,
    /// Tank targets destroyed.
    pub tank_targets_killed: u64,
    /// Special targets destroyed.
    pub special_targets_killed: u64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            total_kills: 0,
            best_combo: 0,
            level: 1,
            total_claims: 0,
            total_play_time_seconds: 0,
            total_shots: 0,
            total_hits: 0,
            best_session: 0,
            session_start: None,
            fast_targets_killed: 0,
            tank_targets_killed: 0,
            special_targets_killed: 0,
        }
    }
}

impl PlayerStats {
    /// Reads a numeric field.
    #[must_use]
    pub fn get(&self, field: StatField) -> u64 {
        match field {
            StatField::TotalKills => self.total_kills,
            StatField::BestCombo => self.best_combo,
            StatField::Level => u64::from(self.level),
            StatField::TotalClaims => self.total_claims,
            StatField::TotalPlayTime => self.total_play_time_seconds,
            StatField::TotalShots => self.total_shots,
            StatField::TotalHits => self.total_hits,
            StatField::BestSession => self.best_session,
            StatField::FastTargetsKilled => self.fast_targets_killed,
            StatField::TankTargetsKilled => self.tank_targets_killed,
            StatField::SpecialTargetsKilled => self.special_targets_killed,
        }
    }

    /// Overwrites a numeric field. Levels saturate at `u32::MAX`.
    pub fn put(&mut self, field: StatField, value: u64) {
        match field {
            StatField::TotalKills => self.total_kills = value,
            StatField::BestCombo => self.best_combo = value,
            StatField::Level => self.level = u32::try_from(value).unwrap_or(u32::MAX),
            StatField::TotalClaims => self.total_claims = value,
            StatField::TotalPlayTime => self.total_play_time_seconds = value,
            StatField::TotalShots => self.total_shots = value,
            StatField::TotalHits => self.total_hits = value,
            StatField::BestSession => self.best_session = value,
            StatField::FastTargetsKilled => self.fast_targets_killed = value,
            StatField::TankTargetsKilled => self.tank_targets_killed = value,
            StatField::SpecialTargetsKilled => self.special_targets_killed = value,
        }
    }

    /// Percentage of shots that hit, or zero when no shot was fired.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total_shots == 0 {
            return 0.0;
        }
        self.total_hits as f64 / self.total_shots as f64 * 100.0
    }
}

/// Numeric fields of [`PlayerStats`] addressable by name at the persistence boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatField {
    /// `totalKills`.
    TotalKills,
    /// `bestCombo`.
    BestCombo,
    /// `level`.
    Level,
    /// `totalClaims`.
    TotalClaims,
    /// `totalPlayTime`, in seconds.
    TotalPlayTime,
    /// `totalShots`.
    TotalShots,
    /// `totalHits`.
    TotalHits,
    /// `bestSession`.
    BestSession,
    /// `fastTargetsKilled`.
    FastTargetsKilled,
    /// `tankTargetsKilled`.
    TankTargetsKilled,
    /// `specialTargetsKilled`.
    SpecialTargetsKilled,
}

impl StatField {
    /// Every field in schema order.
    pub const ALL: [StatField; 11] = [
        Self::TotalKills,
        Self::BestCombo,
        Self::Level,
        Self::TotalClaims,
        Self::TotalPlayTime,
        Self::TotalShots,
        Self::TotalHits,
        Self::BestSession,
        Self::FastTargetsKilled,
        Self::TankTargetsKilled,
        Self::SpecialTargetsKilled,
    ];

    /// Name of the field inside the persisted snapshot.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TotalKills => "totalKills",
            Self::BestCombo => "bestCombo",
            Self::Level => "level",
            Self::TotalClaims => "totalClaims",
            Self::TotalPlayTime => "totalPlayTime",
            Self::TotalShots => "totalShots",
            Self::TotalHits => "totalHits",
            Self::BestSession => "bestSession",
            Self::FastTargetsKilled => "fastTargetsKilled",
            Self::TankTargetsKilled => "tankTargetsKilled",
            Self::SpecialTargetsKilled => "specialTargetsKilled",
        }
    }

    /// Resolves a persisted field name. Unknown and non-numeric names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Counter that tracks kills of the provided kind, if the kind has one.
    #[must_use]
    pub const fn kills_of(kind: TargetKind) -> Option<Self> {
        match kind {
            TargetKind::Normal => None,
            TargetKind::Fast => Some(Self::FastTargetsKilled),
            TargetKind::Tank => Some(Self::TankTargetsKilled),
            TargetKind::Special => Some(Self::SpecialTargetsKilled),
        }
    }
}

/// Identifiers of the fixed achievement catalog, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    /// First kill.
    FirstBlood,
    /// Combo of 10.
    ComboMaster,
    /// Combo of 50.
    ComboLegend,
    /// Ten fast targets destroyed.
    SpeedDemon,
    /// Five tank targets destroyed.
    TankBuster,
    /// One special target destroyed.
    LuckyShot,
    /// 100 total kills.
    Centurion,
    /// 500 total kills.
    Veteran,
    /// Accuracy of at least 80%.
    Precision,
    /// 30 minutes of play.
    Marathon,
}

impl AchievementId {
    /// Every identifier in catalog order.
    pub const ALL: [AchievementId; 10] = [
        Self::FirstBlood,
        Self::ComboMaster,
        Self::ComboLegend,
        Self::SpeedDemon,
        Self::TankBuster,
        Self::LuckyShot,
        Self::Centurion,
        Self::Veteran,
        Self::Precision,
        Self::Marathon,
    ];

    /// Stable string identifier used in persisted unlock lists.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstBlood => "first_blood",
            Self::ComboMaster => "combo_master",
            Self::ComboLegend => "combo_legend",
            Self::SpeedDemon => "speed_demon",
            Self::TankBuster => "tank_buster",
            Self::LuckyShot => "lucky_shot",
            Self::Centurion => "centurion",
            Self::Veteran => "veteran",
            Self::Precision => "precision",
            Self::Marathon => "marathon",
        }
    }

    /// Resolves a persisted identifier.
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == id)
    }
}

/// Read-only view of the combo streak used by rule evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComboSnapshot {
    /// Current streak length.
    pub current: u32,
    /// Longest streak ever reached.
    pub max_reached: u32,
}

/// Pacing parameters derived from the player's level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyParameters {
    /// Delay between spawn attempts.
    pub spawn_delay: Duration,
    /// Base target speed in arena units per second.
    pub velocity: f32,
    /// Base target health.
    pub health: u32,
    /// Time a target survives before expiring.
    pub lifetime: Duration,
    /// Number of targets allowed in the arena at once.
    pub max_simultaneous_targets: u32,
}

/// Details returned by the remote ledger for a confirmed claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// Transaction identifier.
    pub transaction: String,
    /// Gas consumed by the transaction.
    pub gas_used: u64,
    /// Block that included the transaction.
    pub block_number: u64,
    /// Kills converted by the claim.
    pub kills: u64,
}

#[cfg(test)]
mod tests {
    use super::{AchievementId, ArenaPoint, PlayerStats, StatField, TargetKind, Timestamp};
    use std::time::Duration;

    #[test]
    fn stat_field_names_resolve_round_trip() {
        for field in StatField::ALL {
            assert_eq!(StatField::from_name(field.name()), Some(field));
        }
        assert_eq!(StatField::from_name("sessionStartTime"), None);
        assert_eq!(StatField::from_name("coins"), None);
    }

    #[test]
    fn player_stats_default_starts_at_level_one() {
        let stats = PlayerStats::default();
        assert_eq!(stats.level, 1);
        assert_eq!(stats.total_kills, 0);
        assert!(stats.session_start.is_none());
        assert_eq!(stats.accuracy(), 0.0);
    }

    #[test]
    fn player_stats_merge_partial_snapshot_over_defaults() {
        let stats: PlayerStats =
            serde_json::from_str(r#"{"totalKills":12,"totalPlayTime":90}"#).expect("parse");
        assert_eq!(stats.total_kills, 12);
        assert_eq!(stats.total_play_time_seconds, 90);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.fast_targets_killed, 0);
    }

    #[test]
    fn player_stats_round_trips_through_bincode() {
        let mut stats = PlayerStats::default();
        stats.put(StatField::TotalKills, 42);
        stats.session_start = Some(Timestamp::from_millis(1_700_000_000_000));
        let bytes = bincode::serialize(&stats).expect("serialize");
        let restored: PlayerStats = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, stats);
    }

    #[test]
    fn accuracy_is_a_percentage() {
        let mut stats = PlayerStats::default();
        stats.put(StatField::TotalShots, 8);
        stats.put(StatField::TotalHits, 6);
        assert!((stats.accuracy() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn level_writes_saturate() {
        let mut stats = PlayerStats::default();
        stats.put(StatField::Level, u64::MAX);
        assert_eq!(stats.level, u32::MAX);
    }

    #[test]
    fn achievement_ids_parse_their_own_strings() {
        for id in AchievementId::ALL {
            assert_eq!(AchievementId::parse(id.as_str()), Some(id));
        }
        assert_eq!(AchievementId::parse("unknown"), None);
    }

    #[test]
    fn only_normal_targets_spawn_by_default() {
        let weights: Vec<u32> = TargetKind::ALL
            .iter()
            .map(|kind| kind.properties().spawn_weight)
            .collect();
        assert_eq!(weights, vec![100, 0, 0, 0]);
        assert_eq!(TargetKind::Tank.properties().kill_value, 3);
    }

    #[test]
    fn timestamps_saturate() {
        let early = Timestamp::from_millis(1_000);
        let late = early.saturating_add(Duration::from_millis(2_500));
        assert_eq!(late.as_millis(), 3_500);
        assert_eq!(late.saturating_duration_since(early), Duration::from_millis(2_500));
        assert_eq!(early.saturating_duration_since(late), Duration::ZERO);
    }

    #[test]
    fn arena_distance_is_euclidean() {
        let origin = ArenaPoint::new(0.0, 0.0);
        assert!((origin.distance(ArenaPoint::new(3.0, 4.0)) - 5.0).abs() < f32::EPSILON);
    }
}
