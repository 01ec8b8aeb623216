//! Board layout and physics options
//!
//! Everything here is fixed when a `Simulation` is constructed. Loaded from
//! JSON when the native runner is given a config path.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while building a board from its configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("slot_count must be at least 1")]
    NoSlots,

    #[error("pin at ({x}, {y}) falls outside the {width}x{height} field")]
    PinOutsideField { x: f32, y: f32, width: f32, height: f32 },

    #[error("{field} ({value}) is taller than the field ({height})")]
    TallerThanField { field: &'static str, value: f32, height: f32 },

    #[error("{field} range is inverted: {min} > {max}")]
    InvertedRange { field: &'static str, min: f32, max: f32 },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// How alternate pin layers are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PinLayout {
    /// Every layer keeps the full row; odd layers shift by half a spacing
    #[default]
    FullRows,
    /// Odd layers lose one pin, forming a triangular lattice
    Triangular,
}

impl PinLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinLayout::FullRows => "FullRows",
            PinLayout::Triangular => "Triangular",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fullrows" | "full" => Some(PinLayout::FullRows),
            "triangular" | "triangle" => Some(PinLayout::Triangular),
            _ => None,
        }
    }

    /// Pins in layer `layer` given the configured row width
    pub fn pins_in_layer(&self, layer: u32, pins_per_layer: u32) -> u32 {
        match self {
            PinLayout::FullRows => pins_per_layer,
            PinLayout::Triangular => pins_per_layer.saturating_sub(layer % 2),
        }
    }
}

/// Which wall-top / wall-side response pair to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WallBounce {
    /// Top: pin-style reflect and damp with full rollback (cue).
    /// Side: vx *= -0.7, x restored (silent).
    #[default]
    Reflect,
    /// Top: vx *= 0.85, vy *= -0.65, both floored at 2, y snapped above the wall (cue).
    /// Side: vx flipped, x restored (cue).
    Landing,
}

impl WallBounce {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallBounce::Reflect => "Reflect",
            WallBounce::Landing => "Landing",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reflect" => Some(WallBounce::Reflect),
            "landing" => Some(WallBounce::Landing),
            _ => None,
        }
    }
}

/// What a slot does with a ball it captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SlotPolicy {
    /// The ball is removed
    #[default]
    Capture,
    /// Slots on the right half release two fresh balls at the top
    Multiply,
}

impl SlotPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotPolicy::Capture => "Capture",
            SlotPolicy::Multiply => "Multiply",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "capture" => Some(SlotPolicy::Capture),
            "multiply" => Some(SlotPolicy::Multiply),
            _ => None,
        }
    }
}

/// Named board presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Layout {
    /// Wide twelve-slot board
    #[default]
    Tray,
    /// Narrow two-slot board with a single pin per layer
    SingleLane,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Tray => "Tray",
            Layout::SingleLane => "SingleLane",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tray" => Some(Layout::Tray),
            "singlelane" | "single" | "lane" => Some(Layout::SingleLane),
            _ => None,
        }
    }
}

/// Construction-time board and physics options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    // === Field ===
    pub width: f32,
    pub height: f32,

    // === Balls ===
    pub ball_radius: f32,
    /// Center y of freshly spawned balls
    pub spawn_y: f32,
    pub spawn_vx: (f32, f32),
    pub spawn_vy: (f32, f32),

    // === Walls and slots ===
    pub wall_width: f32,
    /// Height of the dividers between slots
    pub wall_height: f32,
    pub slot_count: u32,
    pub slot_height: f32,
    pub slot_points_min: u32,
    pub slot_points_max: u32,

    // === Pins ===
    pub layer_count: u32,
    pub pins_per_layer: u32,
    pub pin_radius: f32,
    pub pin_spacing_x: f32,
    pub pin_spacing_y: f32,
    pub horizontal_offset: f32,
    pub vertical_offset: f32,
    pub pin_layout: PinLayout,

    // === Physics ===
    pub gravity: f32,
    pub frame_rate: u32,
    /// Band below a wall's top edge that still counts as the top surface
    pub wall_top_tolerance: f32,
    pub wall_bounce: WallBounce,
    pub slot_policy: SlotPolicy,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::from_layout(Layout::Tray)
    }
}

impl FieldConfig {
    /// Create a config from a named preset
    pub fn from_layout(layout: Layout) -> Self {
        let tray = Self {
            width: 810.0,
            height: 1296.0,

            ball_radius: BALL_RADIUS,
            spawn_y: 10.0 + BALL_RADIUS,
            spawn_vx: (-5.0, 5.0),
            spawn_vy: (-3.0, 1.0),

            wall_width: 5.0,
            wall_height: 250.0,
            slot_count: 12,
            slot_height: 125.0,
            slot_points_min: 1,
            slot_points_max: 10,

            layer_count: 8,
            pins_per_layer: 6,
            pin_radius: 5.0,
            pin_spacing_x: 120.0,
            pin_spacing_y: 80.0,
            horizontal_offset: 40.0,
            vertical_offset: 60.0,
            pin_layout: PinLayout::FullRows,

            gravity: GRAVITY,
            frame_rate: FRAME_RATE,
            wall_top_tolerance: 20.0,
            wall_bounce: WallBounce::Reflect,
            slot_policy: SlotPolicy::Capture,
        };

        match layout {
            Layout::Tray => tray,
            Layout::SingleLane => Self {
                width: 135.0,
                slot_count: 2,
                layer_count: 7,
                pins_per_layer: 1,
                pin_spacing_x: 70.0,
                pin_spacing_y: 100.0,
                horizontal_offset: 35.0,
                ..tray
            },
        }
    }

    /// Width of a single slot (slots always tile the full width)
    pub fn slot_width(&self) -> f32 {
        self.width / self.slot_count.max(1) as f32
    }

    /// Seconds per tick of the frame clock
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }

    /// Check every dimension before a field is generated from it
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("ball_radius", self.ball_radius),
            ("wall_width", self.wall_width),
            ("wall_height", self.wall_height),
            ("slot_height", self.slot_height),
            ("pin_radius", self.pin_radius),
            ("pin_spacing_x", self.pin_spacing_x),
            ("pin_spacing_y", self.pin_spacing_y),
            ("wall_top_tolerance", self.wall_top_tolerance),
            ("frame_rate", self.frame_rate as f32),
        ];
        for (field, value) in positive {
            // Written so NaN is rejected too
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.gravity >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "gravity",
                value: self.gravity,
            });
        }
        if self.slot_count == 0 {
            return Err(ConfigError::NoSlots);
        }
        for (field, value) in [
            ("wall_height", self.wall_height),
            ("slot_height", self.slot_height),
            ("spawn_y", self.spawn_y),
        ] {
            if value > self.height {
                return Err(ConfigError::TallerThanField {
                    field,
                    value,
                    height: self.height,
                });
            }
        }
        if self.slot_points_min > self.slot_points_max {
            return Err(ConfigError::InvertedRange {
                field: "slot_points",
                min: self.slot_points_min as f32,
                max: self.slot_points_max as f32,
            });
        }
        for (field, (min, max)) in [("spawn_vx", self.spawn_vx), ("spawn_vy", self.spawn_vy)] {
            if min > max {
                return Err(ConfigError::InvertedRange { field, min, max });
            }
        }
        Ok(())
    }

    /// Parse a config from JSON; missing keys fall back to the Tray preset
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded board config from {}", path.as_ref().display());
        Ok(config)
    }
}
