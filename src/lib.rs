//! Plinko Bells - a falling-ball pin board that plays a melody
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, collisions, responses)
//! - `audio`: Score sequence, cue dispatch and playback sinks
//! - `render`: Plain draw records handed to whatever renders the board
//! - `config`: Construction-time layout and physics options

pub mod audio;
pub mod config;
pub mod render;
pub mod sim;

pub use audio::{AudioSink, Cue, Dispatcher, Sequencer, Tone};
pub use config::{ConfigError, FieldConfig, Layout};
pub use sim::{Simulation, TickInput, tick};

/// Default tuning constants (all distances in pixels, all rates per tick)
pub mod consts {
    /// Downward acceleration added to vy every tick
    pub const GRAVITY: f32 = 0.35;
    /// Target frame clock rate
    pub const FRAME_RATE: u32 = 60;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 25.0;
    /// Pin damping never drops below this factor
    pub const PIN_MIN_DAMPING: f32 = 0.5;
    /// Per-axis speed floor after a pin (or reflect-wall) bounce
    pub const PIN_MIN_AXIS_SPEED: f32 = 1.0;
    /// Speeds below this are floored before taking the reciprocal
    pub const SPEED_EPSILON: f32 = 1.0e-3;

    /// Side-surface bounce: vx *= this
    pub const WALL_SIDE_RESTITUTION: f32 = -0.7;
    /// Floor bounce: vy *= this
    pub const FLOOR_RESTITUTION: f32 = -0.3;

    /// Landing bounce (richer wall-top variant)
    pub const LANDING_FRICTION: f32 = 0.85;
    /// Landing bounce: vy *= this
    pub const LANDING_RESTITUTION: f32 = -0.65;
    /// Per-axis speed floor after a landing bounce
    pub const LANDING_MIN_AXIS_SPEED: f32 = 2.0;
    /// Gap left between ball and wall top after a landing snap
    pub const LANDING_CLEARANCE: f32 = 1.0;

    /// Gap kept between a freshly spawned ball and a boundary wall
    pub const SPAWN_CLEARANCE: f32 = 1.0;

    /// Ticks between automatic starts of pending balls in the native runner
    pub const AUTO_START_INTERVAL: u64 = 120;
}

/// Clamp a value's magnitude to at least `min`, keeping its sign.
///
/// Zero (and anything non-positive) is pushed to `-min`.
#[inline]
pub fn clamp_min_magnitude(value: f32, min: f32) -> f32 {
    if value > 0.0 {
        value.max(min)
    } else {
        value.min(-min)
    }
}

/// Map an x coordinate inside `[0, width]` to a stereo pan in `[-1, 1]`
#[inline]
pub fn stereo_pan(x: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    ((x / width) * 2.0 - 1.0).clamp(-1.0, 1.0)
}
