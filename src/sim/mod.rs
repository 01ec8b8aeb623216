//! Deterministic simulation module
//!
//! All board logic lives here. This module must be pure and deterministic:
//! - Fixed tick only (one integration step per frame)
//! - Seeded RNG only
//! - Stable iteration order (bodies by id, obstacles by priority then index)
//! - No rendering or playback dependencies; sounds leave as `Cue`s

pub mod collision;
pub mod field;
pub mod integrator;
pub mod obstacle;
pub mod pendulum;
pub mod response;
pub mod state;
pub mod tick;

pub use collision::{Contact, detect};
pub use field::ObstacleField;
pub use integrator::{integrate, integrate_all};
pub use obstacle::{
    ContactKind, Floor, Obstacle, ObstacleCategory, ObstacleRef, Pin, Rect, Slot, Wall, WallKind,
};
pub use pendulum::{Pendulum, PendulumRig};
pub use response::{Resolution, resolve};
pub use state::{Body, BodyId, Lifecycle, SimEvent, SimPhase, Simulation};
pub use tick::{SpawnRequest, StartRequest, TickInput, tick};
