//! Static collidable geometry and overlap tests
//!
//! Pins are circles; walls, floors and slots are axis-aligned rectangles
//! stored by top-left corner with y growing downward (screen space).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Body;

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Closest point on (or in) the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.min + self.size)
    }
}

/// Circle vs circle: touching counts as overlap
#[inline]
pub fn circle_circle_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Circle vs rectangle via the clamped closest point
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.distance_squared(rect.closest_point(center)) <= radius * radius
}

/// A circular pin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub center: Vec2,
    pub radius: f32,
}

/// Where a wall sits on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallKind {
    /// Full-height wall at the left or right edge
    Boundary,
    /// Short wall separating two slots
    Divider,
}

/// A rectangular wall with a top surface band and side surfaces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
    pub kind: WallKind,
    /// A ball whose lower edge is above `top + top_band` hit the top surface
    pub top_band: f32,
}

impl Wall {
    /// Whether a ball at `pos` is resting on / landing on the top surface
    #[inline]
    pub fn is_top_contact(&self, pos: Vec2, radius: f32) -> bool {
        pos.y + radius < self.rect.top() + self.top_band
    }
}

/// A floor or ceiling plate (no side behavior)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub rect: Rect,
}

/// A scoring slot along the bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub rect: Rect,
    pub points: u32,
    /// Set the first time a ball lands here; never cleared during a run
    pub captured: bool,
    /// Number of balls this slot has taken
    pub captures: u32,
}

/// Obstacle categories in detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObstacleCategory {
    Pin,
    Wall,
    Floor,
    Slot,
}

impl ObstacleCategory {
    /// Fixed order every ball is tested in
    pub const PRIORITY: [ObstacleCategory; 4] = [
        ObstacleCategory::Pin,
        ObstacleCategory::Wall,
        ObstacleCategory::Floor,
        ObstacleCategory::Slot,
    ];
}

/// Stable handle to one obstacle in the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstacleRef {
    pub category: ObstacleCategory,
    pub index: usize,
}

/// What part of an obstacle a ball touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    Pin,
    WallTop,
    WallSide,
    Floor,
    Slot,
}

/// Borrowed view of any obstacle
#[derive(Debug, Clone, Copy)]
pub enum Obstacle<'a> {
    Pin(&'a Pin),
    Wall(&'a Wall),
    Floor(&'a Floor),
    Slot(&'a Slot),
}

impl Obstacle<'_> {
    pub fn category(&self) -> ObstacleCategory {
        match self {
            Obstacle::Pin(_) => ObstacleCategory::Pin,
            Obstacle::Wall(_) => ObstacleCategory::Wall,
            Obstacle::Floor(_) => ObstacleCategory::Floor,
            Obstacle::Slot(_) => ObstacleCategory::Slot,
        }
    }

    /// Test a ball against this obstacle at the ball's current position
    pub fn contact(&self, body: &Body) -> Option<ContactKind> {
        match self {
            Obstacle::Pin(pin) => {
                circle_circle_overlap(body.pos, body.radius, pin.center, pin.radius)
                    .then_some(ContactKind::Pin)
            }
            Obstacle::Wall(wall) => {
                if !circle_rect_overlap(body.pos, body.radius, &wall.rect) {
                    None
                } else if wall.is_top_contact(body.pos, body.radius) {
                    Some(ContactKind::WallTop)
                } else {
                    Some(ContactKind::WallSide)
                }
            }
            Obstacle::Floor(floor) => {
                circle_rect_overlap(body.pos, body.radius, &floor.rect).then_some(ContactKind::Floor)
            }
            Obstacle::Slot(slot) => {
                circle_rect_overlap(body.pos, body.radius, &slot.rect).then_some(ContactKind::Slot)
            }
        }
    }

    /// Reference point used for reflect-style responses
    pub fn center(&self) -> Vec2 {
        match self {
            Obstacle::Pin(pin) => pin.center,
            Obstacle::Wall(wall) => wall.rect.center(),
            Obstacle::Floor(floor) => floor.rect.center(),
            Obstacle::Slot(slot) => slot.rect.center(),
        }
    }
}
