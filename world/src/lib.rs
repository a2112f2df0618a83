#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative target arena for the coin shooter.
//!
//! The world owns every live target and a virtual clock. It only changes in
//! response to [`Command`] values passed to [`apply`] and reports what happened
//! through [`Event`] values.

use std::{f32::consts::TAU, time::Duration};

use coin_shooter_core::{
    ArenaPoint, Command, Event, TargetId, TargetKind, TargetSnapshot, Timestamp, DAMAGE_PER_HIT,
    KILL_COOLDOWN, TARGET_HIT_RADIUS,
};
use glam::Vec2;

const DEFAULT_ARENA_WIDTH: f32 = 800.0;
const DEFAULT_ARENA_HEIGHT: f32 = 600.0;
const MOVEMENT_SEED: u64 = 0x6d69_7261_c014_5eed;

/// Rectangular play field measured in arena units with its origin at the top left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    width: f32,
    height: f32,
}

impl Arena {
    /// Creates an arena of the provided size. Negative sizes collapse to zero.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether `point` lies inside the arena, borders included.
    #[must_use]
    pub fn contains(&self, point: ArenaPoint) -> bool {
        (0.0..=self.width).contains(&point.x()) && (0.0..=self.height).contains(&point.y())
    }

    fn clamp(&self, position: Vec2) -> Vec2 {
        position.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT)
    }
}

/// Tunable rules applied by the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldRules {
    /// Minimum time between two destroyed targets.
    pub kill_cooldown: Duration,
    /// Hit radius of a target with size multiplier 1.
    pub hit_radius: f32,
    /// Seed for the movement directions given to targets.
    pub movement_seed: u64,
}

impl Default for WorldRules {
    fn default() -> Self {
        Self {
            kill_cooldown: KILL_COOLDOWN,
            hit_radius: TARGET_HIT_RADIUS,
            movement_seed: MOVEMENT_SEED,
        }
    }
}

/// Represents the authoritative arena state.
#[derive(Debug)]
pub struct World {
    arena: Arena,
    rules: WorldRules,
    clock: Timestamp,
    targets: Vec<Target>,
    next_target_id: u32,
    movement_enabled: bool,
    kills_allowed_at: Timestamp,
    rng_state: u64,
}

impl World {
    /// Creates an empty arena whose clock starts at `start`.
    #[must_use]
    pub fn new(arena: Arena, start: Timestamp) -> Self {
        Self::with_rules(arena, start, WorldRules::default())
    }

    /// Creates an empty arena with custom rules.
    #[must_use]
    pub fn with_rules(arena: Arena, start: Timestamp, rules: WorldRules) -> Self {
        Self {
            arena,
            rules,
            clock: start,
            targets: Vec::new(),
            next_target_id: 0,
            movement_enabled: false,
            kills_allowed_at: start,
            rng_state: rules.movement_seed,
        }
    }

    fn allocate_target_id(&mut self) -> TargetId {
        let id = TargetId::new(self.next_target_id);
        self.next_target_id = self.next_target_id.wrapping_add(1);
        id
    }

    fn random_heading(&mut self) -> Vec2 {
        self.rng_state = next_random(self.rng_state);
        let unit = (self.rng_state >> 40) as f32 / (1_u64 << 24) as f32;
        Vec2::from_angle(unit * TAU)
    }

    fn start_moving(&mut self, index: usize) {
        let heading = self.random_heading();
        if let Some(target) = self.targets.get_mut(index) {
            if !target.moving {
                target.velocity = heading * target.speed;
                target.moving = true;
            }
        }
    }

    fn remove_target(&mut self, target_id: TargetId) -> Option<Target> {
        let index = self.targets.iter().position(|target| target.id == target_id)?;
        Some(self.targets.remove(index))
    }

    fn hit_test(&self, at: ArenaPoint) -> Option<TargetId> {
        let point = Vec2::new(at.x(), at.y());
        self.targets
            .iter()
            .find(|target| {
                let radius = self.rules.hit_radius * target.kind.properties().size_multiplier;
                target.position.distance(point) <= radius
            })
            .map(|target| target.id)
    }

    fn advance_movement(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f32();
        let bounds = Vec2::new(self.arena.width, self.arena.height);
        for target in self.targets.iter_mut().filter(|target| target.moving) {
            let mut position = target.position + target.velocity * seconds;
            let mut velocity = target.velocity;
            for axis in 0..2 {
                if position[axis] < 0.0 {
                    position[axis] = -position[axis];
                    velocity[axis] = velocity[axis].abs();
                } else if position[axis] > bounds[axis] {
                    position[axis] = 2.0 * bounds[axis] - position[axis];
                    velocity[axis] = -velocity[axis].abs();
                }
            }
            target.position = self.arena.clamp(position);
            target.velocity = velocity;
        }
    }

    fn expire_targets(&mut self, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let expired: Vec<TargetId> = self
            .targets
            .iter()
            .filter(|target| target.despawn_at <= now)
            .map(|target| target.id)
            .collect();
        for target_id in expired {
            if self.remove_target(target_id).is_some() {
                out_events.push(Event::TargetExpired { target: target_id });
            }
        }
    }

    fn resolve_shot(&mut self, at: ArenaPoint, out_events: &mut Vec<Event>) {
        let hit = self.hit_test(at);
        out_events.push(Event::ShotFired { at, hit });
        let Some(target_id) = hit else {
            return;
        };

        let now = self.clock;
        let Some(target) = self.targets.iter_mut().find(|target| target.id == target_id) else {
            return;
        };
        target.health = target.health.saturating_sub(DAMAGE_PER_HIT);
        out_events.push(Event::TargetHit {
            target: target_id,
            remaining_health: target.health,
            max_health: target.max_health,
        });
        if target.health > 0 {
            return;
        }

        if now < self.kills_allowed_at {
            out_events.push(Event::KillDeferred {
                target: target_id,
                cooldown_remaining: self.kills_allowed_at.saturating_duration_since(now),
            });
            return;
        }

        if let Some(destroyed) = self.remove_target(target_id) {
            self.kills_allowed_at = now.saturating_add(self.rules.kill_cooldown);
            out_events.push(Event::TargetDestroyed {
                target: destroyed.id,
                kind: destroyed.kind,
                kill_value: destroyed.kill_value,
                position: destroyed.point(),
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_movement(dt);
            world.expire_targets(out_events);
        }
        Command::SpawnTarget {
            kind,
            position,
            speed,
            max_health,
            kill_value,
            lifetime,
        } => {
            let id = world.allocate_target_id();
            let position = world.arena.clamp(Vec2::new(position.x(), position.y()));
            let max_health = max_health.max(1);
            world.targets.push(Target {
                id,
                kind,
                position,
                velocity: Vec2::ZERO,
                speed: speed.max(0.0),
                health: max_health,
                max_health,
                kill_value,
                moving: false,
                spawned_at: world.clock,
                despawn_at: world.clock.saturating_add(lifetime),
            });
            if world.movement_enabled {
                world.start_moving(world.targets.len() - 1);
            }
            log::debug!("spawned {} target {}", kind.as_str(), id.get());
            out_events.push(Event::TargetSpawned {
                target: id,
                kind,
                position: ArenaPoint::new(position.x, position.y),
                max_health,
            });
        }
        Command::Shoot { at } => world.resolve_shot(at, out_events),
        Command::EnableMovement => {
            if world.movement_enabled {
                return;
            }
            world.movement_enabled = true;
            for index in 0..world.targets.len() {
                world.start_moving(index);
            }
            out_events.push(Event::MovementEnabled);
        }
        Command::DisableMovement => {
            if !world.movement_enabled {
                return;
            }
            world.movement_enabled = false;
            out_events.push(Event::MovementDisabled);
        }
        Command::ClearTargets => {
            world.targets.clear();
            world.movement_enabled = false;
            out_events.push(Event::TargetsCleared);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Arena, World};
    use coin_shooter_core::{TargetId, TargetSnapshot, TargetView, Timestamp};

    /// Current reading of the arena clock.
    #[must_use]
    pub fn now(world: &World) -> Timestamp {
        world.clock
    }

    /// Provides read-only access to the arena bounds.
    #[must_use]
    pub fn arena(world: &World) -> &Arena {
        &world.arena
    }

    /// Captures a read-only view of every live target.
    #[must_use]
    pub fn target_view(world: &World) -> TargetView {
        TargetView::from_snapshots(world.targets.iter().map(|target| target.snapshot()).collect())
    }

    /// Snapshot of a single live target.
    #[must_use]
    pub fn target(world: &World, target_id: TargetId) -> Option<TargetSnapshot> {
        world
            .targets
            .iter()
            .find(|target| target.id == target_id)
            .map(|target| target.snapshot())
    }

    /// Number of live targets.
    #[must_use]
    pub fn target_count(world: &World) -> usize {
        world.targets.len()
    }

    /// Reports whether targets move.
    #[must_use]
    pub fn movement_enabled(world: &World) -> bool {
        world.movement_enabled
    }

    /// Time left before another target may be destroyed.
    #[must_use]
    pub fn kill_cooldown_remaining(world: &World) -> Duration {
        world.kills_allowed_at.saturating_duration_since(world.clock)
    }
}

#[derive(Clone, Debug)]
struct Target {
    id: TargetId,
    kind: TargetKind,
    position: Vec2,
    velocity: Vec2,
    speed: f32,
    health: u32,
    max_health: u32,
    kill_value: u32,
    moving: bool,
    spawned_at: Timestamp,
    despawn_at: Timestamp,
}

impl Target {
    fn point(&self) -> ArenaPoint {
        ArenaPoint::new(self.position.x, self.position.y)
    }

    fn snapshot(&self) -> TargetSnapshot {
        TargetSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.point(),
            health: self.health,
            max_health: self.max_health,
            kill_value: self.kill_value,
            moving: self.moving,
            spawned_at: self.spawned_at,
            despawn_at: self.despawn_at,
        }
    }
}

fn next_random(state: u64) -> u64 {
    state
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407)
}
