//! Obstacle field generation
//!
//! Built once per simulation start from a `FieldConfig`. Nothing here is
//! mutated during a run except the slots' capture bookkeeping.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::obstacle::{Floor, Obstacle, ObstacleCategory, ObstacleRef, Pin, Rect, Slot, Wall, WallKind};
use crate::config::{ConfigError, FieldConfig};

/// All static geometry of one board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    pub width: f32,
    pub height: f32,
    pub pins: Vec<Pin>,
    pub walls: Vec<Wall>,
    pub floors: Vec<Floor>,
    pub slots: Vec<Slot>,
}

/// Pin centers for the configured lattice
///
/// Layer `i` sits at `y = (i + 1) * dy + offset_y`; pin `j` in it at
/// `x = j * dx + slot_width / 2 + (i % 2) * dx / 2 + offset_x`.
pub fn pin_centers(config: &FieldConfig) -> Vec<Vec2> {
    let slot_width = config.slot_width();
    let mut centers = Vec::new();
    for layer in 0..config.layer_count {
        let stagger = (layer % 2) as f32 * (config.pin_spacing_x / 2.0);
        let y = (layer + 1) as f32 * config.pin_spacing_y + config.vertical_offset;
        let count = config.pin_layout.pins_in_layer(layer, config.pins_per_layer);
        for j in 0..count {
            let x = j as f32 * config.pin_spacing_x
                + slot_width / 2.0
                + stagger
                + config.horizontal_offset;
            centers.push(Vec2::new(x, y));
        }
    }
    centers
}

impl ObstacleField {
    /// Generate the board, rolling slot point values from `rng`
    pub fn generate(config: &FieldConfig, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        config.validate()?;

        let width = config.width;
        let height = config.height;

        let mut pins = Vec::new();
        for center in pin_centers(config) {
            let inside = center.x > 0.0 && center.x < width && center.y > 0.0 && center.y < height;
            if !inside {
                return Err(ConfigError::PinOutsideField {
                    x: center.x,
                    y: center.y,
                    width,
                    height,
                });
            }
            pins.push(Pin {
                center,
                radius: config.pin_radius,
            });
        }

        let wall = |rect: Rect, kind: WallKind| Wall {
            rect,
            kind,
            top_band: config.wall_top_tolerance,
        };

        // Boundary walls first, then dividers left to right
        let mut walls = vec![
            wall(Rect::new(0.0, 0.0, config.wall_width, height), WallKind::Boundary),
            wall(
                Rect::new(width - config.wall_width, 0.0, config.wall_width, height),
                WallKind::Boundary,
            ),
        ];
        let slot_width = config.slot_width();
        for i in 1..config.slot_count {
            let x = i as f32 * slot_width - config.wall_width / 2.0;
            walls.push(wall(
                Rect::new(x, height - config.wall_height, config.wall_width, config.wall_height),
                WallKind::Divider,
            ));
        }

        let floors = vec![
            Floor {
                rect: Rect::new(0.0, 0.0, width, config.wall_width),
            },
            Floor {
                rect: Rect::new(0.0, height - config.wall_width, width, config.wall_width),
            },
        ];

        let slots = (0..config.slot_count)
            .map(|i| Slot {
                rect: Rect::new(
                    i as f32 * slot_width,
                    height - config.slot_height,
                    slot_width,
                    config.slot_height,
                ),
                points: rng.random_range(config.slot_points_min..=config.slot_points_max),
                captured: false,
                captures: 0,
            })
            .collect();

        Ok(Self {
            width,
            height,
            pins,
            walls,
            floors,
            slots,
        })
    }

    /// Number of obstacles in one category
    pub fn len_of(&self, category: ObstacleCategory) -> usize {
        match category {
            ObstacleCategory::Pin => self.pins.len(),
            ObstacleCategory::Wall => self.walls.len(),
            ObstacleCategory::Floor => self.floors.len(),
            ObstacleCategory::Slot => self.slots.len(),
        }
    }

    /// Look up an obstacle by handle
    pub fn get(&self, obstacle: ObstacleRef) -> Option<Obstacle<'_>> {
        let index = obstacle.index;
        match obstacle.category {
            ObstacleCategory::Pin => self.pins.get(index).map(Obstacle::Pin),
            ObstacleCategory::Wall => self.walls.get(index).map(Obstacle::Wall),
            ObstacleCategory::Floor => self.floors.get(index).map(Obstacle::Floor),
            ObstacleCategory::Slot => self.slots.get(index).map(Obstacle::Slot),
        }
    }

    /// Obstacles of one category in stable index order
    pub fn iter_category(
        &self,
        category: ObstacleCategory,
    ) -> impl Iterator<Item = (ObstacleRef, Obstacle<'_>)> + '_ {
        (0..self.len_of(category)).filter_map(move |index| {
            let handle = ObstacleRef { category, index };
            self.get(handle).map(|obstacle| (handle, obstacle))
        })
    }

    /// Every obstacle, categories in detection priority order
    pub fn iter(&self) -> impl Iterator<Item = (ObstacleRef, Obstacle<'_>)> + '_ {
        ObstacleCategory::PRIORITY
            .into_iter()
            .flat_map(move |category| self.iter_category(category))
    }

    /// Record a capture on a slot; returns its points
    pub fn mark_captured(&mut self, index: usize) -> Option<u32> {
        let slot = self.slots.get_mut(index)?;
        slot.captured = true;
        slot.captures += 1;
        Some(slot.points)
    }
}
