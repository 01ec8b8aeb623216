//! Simulation state and core body types
//!
//! Bodies live in an arena indexed by `BodyId`; captured bodies stay in the
//! arena as tombstones so ids never shift during a run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::ObstacleField;
use super::obstacle::{ContactKind, ObstacleRef};
use super::pendulum::PendulumRig;
use crate::audio::{Cue, Dispatcher};
use crate::config::{ConfigError, FieldConfig};
use crate::consts::SPAWN_CLEARANCE;

/// Index of a body in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub usize);

/// Body lifecycle: pending -> active -> captured, never backward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Spawned, parked at its spawn point
    Pending,
    /// Integrating and colliding
    Active,
    /// Taken by a slot (terminal)
    Captured,
}

/// A ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    /// Position at the start of the current tick (rollback target)
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lifecycle: Lifecycle,
}

impl Body {
    pub fn new(id: BodyId, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            radius,
            lifecycle: Lifecycle::Pending,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.lifecycle == Lifecycle::Captured
    }

    /// pending -> active; returns false if the body was not pending
    pub fn start(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Pending {
            return false;
        }
        self.lifecycle = Lifecycle::Active;
        true
    }

    /// active -> captured; returns false if the body was not active
    pub fn capture(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Active {
            return false;
        }
        self.lifecycle = Lifecycle::Captured;
        true
    }

    /// Undo this tick's move on both axes
    #[inline]
    pub fn rollback(&mut self) {
        self.pos = self.prev_pos;
    }
}

/// Overall run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    Running,
    /// Every spawned body has been captured; a new spawn resumes running
    Settled,
    /// Stop signal received; only a reset leaves this phase
    Stopped,
}

/// Things that happened during a tick, in resolution order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Spawned { body: BodyId },
    Started { body: BodyId },
    Contact {
        body: BodyId,
        kind: ContactKind,
        obstacle: ObstacleRef,
        /// Body position when the overlap was detected
        at: Vec2,
        /// Whether this contact rings the next tone
        sounds: bool,
    },
    Captured { body: BodyId, slot: usize, points: u32 },
    Stopped,
    Reset,
}

/// Complete simulation state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct Simulation {
    pub config: FieldConfig,
    pub seed: u64,
    pub field: ObstacleField,
    /// Body arena (index == id)
    pub bodies: Vec<Body>,
    pub pendulums: Option<PendulumRig>,
    pub dispatcher: Dispatcher,
    pub phase: SimPhase,
    pub time_ticks: u64,
    /// Sum of captured slots' points
    pub score: u64,
    /// Events since the last drain
    pub events: Vec<SimEvent>,
    /// Cues since the last drain, in dispatch order
    pub cues: Vec<Cue>,
    rng: Pcg32,
}

impl Simulation {
    /// Build a board and an empty body arena
    pub fn new(config: FieldConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let field = ObstacleField::generate(&config, &mut rng)?;
        log::info!(
            "Simulation ready: {} pins, {} walls, {} slots (seed {})",
            field.pins.len(),
            field.walls.len(),
            field.slots.len(),
            seed
        );
        Ok(Self {
            config,
            seed,
            field,
            bodies: Vec::new(),
            pendulums: None,
            dispatcher: Dispatcher::default(),
            phase: SimPhase::Running,
            time_ticks: 0,
            score: 0,
            events: Vec::new(),
            cues: Vec::new(),
            rng,
        })
    }

    /// Attach a pendulum rig that runs alongside the board
    pub fn with_pendulums(mut self, rig: PendulumRig) -> Self {
        self.pendulums = Some(rig);
        self
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0)
    }

    /// Bodies that are still on the board (pending or active)
    pub fn live_bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| !b.is_captured())
    }

    pub fn pending_ids(&self) -> Vec<BodyId> {
        self.bodies
            .iter()
            .filter(|b| b.lifecycle == Lifecycle::Pending)
            .map(|b| b.id)
            .collect()
    }

    /// True once at least one body exists and all of them are captured
    pub fn all_captured(&self) -> bool {
        !self.bodies.is_empty() && self.bodies.iter().all(Body::is_captured)
    }

    /// Center x range that keeps a ball clear of both boundary walls
    ///
    /// Collapses to the field center when the field is too narrow.
    pub fn spawn_x_range(&self) -> (f32, f32) {
        let margin = self.config.wall_width + self.config.ball_radius + SPAWN_CLEARANCE;
        let (lo, hi) = (margin, self.config.width - margin);
        if lo < hi {
            (lo, hi)
        } else {
            let center = self.config.width / 2.0;
            (center, center)
        }
    }

    fn random_spawn_x(&mut self) -> f32 {
        let (lo, hi) = self.spawn_x_range();
        self.rng.random_range(lo..=hi)
    }

    fn random_spawn_velocity(&mut self) -> Vec2 {
        let (vx_lo, vx_hi) = self.config.spawn_vx;
        let (vy_lo, vy_hi) = self.config.spawn_vy;
        Vec2::new(
            self.rng.random_range(vx_lo..=vx_hi),
            self.rng.random_range(vy_lo..=vy_hi),
        )
    }

    /// Add a body at the top of the field
    ///
    /// Missing x / velocity are drawn from the seeded RNG. A given x is
    /// clamped into `spawn_x_range` so the ball never starts inside a wall.
    pub fn spawn(&mut self, x: Option<f32>, velocity: Option<Vec2>, active: bool) -> BodyId {
        let id = BodyId(self.bodies.len());
        let x = match x {
            Some(x) => {
                let (lo, hi) = self.spawn_x_range();
                x.clamp(lo, hi)
            }
            None => self.random_spawn_x(),
        };
        let vel = match velocity {
            Some(v) => v,
            None => self.random_spawn_velocity(),
        };
        let mut body = Body::new(id, Vec2::new(x, self.config.spawn_y), self.config.ball_radius);
        body.vel = vel;
        if active {
            body.start();
        }
        self.bodies.push(body);
        self.events.push(SimEvent::Spawned { body: id });
        if active {
            self.events.push(SimEvent::Started { body: id });
        }
        if self.phase == SimPhase::Settled {
            self.phase = SimPhase::Running;
        }
        log::debug!("Spawned body {} at x={:.1} (active: {})", id.0, x, active);
        id
    }

    /// Park `count` pending bodies evenly across the top of the field
    ///
    /// Balls that would overlap a boundary wall are pulled inside it.
    pub fn spawn_row(&mut self, count: u32) -> Vec<BodyId> {
        let gap = self.config.width / count.saturating_add(1) as f32;
        (0..count)
            .map(|i| self.spawn(Some((i + 1) as f32 * gap), None, false))
            .collect()
    }

    /// Start one specific pending body
    pub fn start_body(&mut self, id: BodyId) -> bool {
        let started = self.body_mut(id).is_some_and(Body::start);
        if started {
            self.events.push(SimEvent::Started { body: id });
        } else {
            log::warn!("Start ignored: body {} is not pending", id.0);
        }
        started
    }

    /// Start a pending body chosen by the seeded RNG
    pub fn start_random(&mut self) -> Option<BodyId> {
        let pending = self.pending_ids();
        if pending.is_empty() {
            log::warn!("Start ignored: no pending bodies");
            return None;
        }
        let id = pending[self.rng.random_range(0..pending.len())];
        self.start_body(id).then_some(id)
    }

    /// Regenerate the board and clear every body, score and the tone cursor
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.field = ObstacleField::generate(&self.config, &mut self.rng)?;
        self.bodies.clear();
        self.dispatcher.reset();
        if let Some(rig) = self.pendulums.as_mut() {
            rig.reset();
        }
        self.phase = SimPhase::Running;
        self.time_ticks = 0;
        self.score = 0;
        self.cues.clear();
        self.events.clear();
        self.events.push(SimEvent::Reset);
        log::info!("Simulation reset");
        Ok(())
    }

    /// Take the cues produced so far (host plays them)
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use crate::sim::obstacle::{WallKind, circle_rect_overlap};

    fn sim() -> Simulation {
        Simulation::new(FieldConfig::default(), 42).unwrap()
    }

    #[test]
    fn test_lifecycle_is_one_way() {
        let mut body = Body::new(BodyId(0), Vec2::ZERO, 5.0);
        assert!(!body.capture(), "pending cannot be captured");
        assert!(body.start());
        assert!(!body.start(), "active cannot restart");
        assert!(body.capture());
        assert!(!body.start());
        assert!(!body.capture());
        assert_eq!(body.lifecycle, Lifecycle::Captured);
    }

    #[test]
    fn test_spawn_row_even_spacing() {
        let mut sim = Simulation::new(FieldConfig::from_layout(Layout::SingleLane), 1).unwrap();
        let ids = sim.spawn_row(2);
        assert_eq!(ids, vec![BodyId(0), BodyId(1)]);
        assert_eq!(sim.bodies[0].pos.x, 45.0);
        assert_eq!(sim.bodies[1].pos.x, 90.0);
        assert!(sim.bodies.iter().all(|b| b.lifecycle == Lifecycle::Pending));
        assert!(sim.bodies.iter().all(|b| b.pos.y == sim.config.spawn_y));
    }

    #[test]
    fn test_crowded_row_stays_clear_of_walls() {
        let mut sim = Simulation::new(FieldConfig::from_layout(Layout::SingleLane), 1).unwrap();
        let (lo, hi) = sim.spawn_x_range();
        assert_eq!(lo, sim.config.wall_width + sim.config.ball_radius + SPAWN_CLEARANCE);
        sim.spawn_row(6);
        let xs: Vec<f32> = sim.bodies.iter().map(|b| b.pos.x).collect();
        assert!(xs.iter().all(|x| (lo..=hi).contains(x)), "row x {:?} outside [{}, {}]", xs, lo, hi);
        assert_eq!(xs[0], lo);
        assert_eq!(xs[5], hi);
        // Nobody starts touching a boundary wall
        for body in &sim.bodies {
            for wall in sim.field.walls.iter().filter(|w| w.kind == WallKind::Boundary) {
                assert!(!circle_rect_overlap(body.pos, body.radius, &wall.rect));
            }
        }
    }

    #[test]
    fn test_explicit_spawn_x_is_clamped() {
        let mut sim = Simulation::new(FieldConfig::from_layout(Layout::SingleLane), 1).unwrap();
        let (lo, hi) = sim.spawn_x_range();
        let left = sim.spawn(Some(0.0), None, false);
        let right = sim.spawn(Some(1000.0), None, false);
        assert_eq!(sim.body(left).unwrap().pos.x, lo);
        assert_eq!(sim.body(right).unwrap().pos.x, hi);
    }

    #[test]
    fn test_narrow_field_spawns_at_center() {
        let config = FieldConfig {
            width: 40.0,
            slot_count: 1,
            layer_count: 0,
            ..FieldConfig::default()
        };
        let mut sim = Simulation::new(config, 1).unwrap();
        assert_eq!(sim.spawn_x_range(), (20.0, 20.0));
        let id = sim.spawn(None, None, true);
        assert_eq!(sim.body(id).unwrap().pos.x, 20.0);
    }

    #[test]
    fn test_ids_follow_arena_index() {
        let mut sim = sim();
        for i in 0..4 {
            let id = sim.spawn(None, None, false);
            assert_eq!(id, BodyId(i));
            assert_eq!(sim.body(id).unwrap().id, id);
        }
        assert!(sim.spawn_row(0).is_empty());
    }

    #[test]
    fn test_random_spawn_stays_inside_walls() {
        let mut sim = sim();
        for _ in 0..50 {
            let id = sim.spawn(None, None, true);
            let body = sim.body(id).unwrap();
            let margin = sim.config.wall_width + body.radius;
            assert!(body.pos.x >= margin && body.pos.x <= sim.config.width - margin);
            assert!((-5.0..=5.0).contains(&body.vel.x));
            assert!((-3.0..=1.0).contains(&body.vel.y));
            assert!(body.is_active());
        }
    }

    #[test]
    fn test_start_random_drains_pending() {
        let mut sim = sim();
        sim.spawn_row(3);
        let mut started = Vec::new();
        while let Some(id) = sim.start_random() {
            started.push(id);
        }
        started.sort();
        assert_eq!(started, vec![BodyId(0), BodyId(1), BodyId(2)]);
        assert!(sim.pending_ids().is_empty());
    }

    #[test]
    fn test_start_body_rejects_non_pending() {
        let mut sim = sim();
        let id = sim.spawn(Some(100.0), None, true);
        assert!(!sim.start_body(id));
        assert!(!sim.start_body(BodyId(99)));
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = sim();
        let mut b = sim();
        for _ in 0..5 {
            a.spawn(None, None, true);
            b.spawn(None, None, true);
        }
        for (x, y) in a.bodies.iter().zip(&b.bodies) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
        }
    }

    #[test]
    fn test_reset_clears_run() {
        let mut sim = sim();
        sim.spawn_row(4);
        sim.score = 12;
        sim.reset().unwrap();
        assert!(sim.bodies.is_empty());
        assert_eq!(sim.score, 0);
        assert_eq!(sim.phase, SimPhase::Running);
        assert_eq!(sim.events, vec![SimEvent::Reset]);
        assert_eq!(sim.dispatcher.sequencer().cursor(), 0);
    }

    #[test]
    fn test_all_captured_needs_bodies() {
        let mut sim = sim();
        assert!(!sim.all_captured());
        let id = sim.spawn(Some(100.0), None, true);
        assert!(!sim.all_captured());
        sim.body_mut(id).unwrap().capture();
        assert!(sim.all_captured());
    }
}
