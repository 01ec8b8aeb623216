//! Draw records for whatever presents the board
//!
//! The simulation never draws. Hosts call `draw_list` once per frame and
//! upload the `DrawItem`s as they are (they are `Pod`).

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

use crate::sim::Simulation;

/// Speed (pixels per tick) at which a ball is drawn fully hot
const BALL_HOT_SPEED: f32 = 15.0;

/// What a `DrawItem` is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DrawKind {
    Pin = 0,
    Wall = 1,
    Floor = 2,
    Slot = 3,
    Ball = 4,
    Bob = 5,
    Bar = 6,
}

/// One shape to draw: circles use `size.x` as radius, rectangles use the
/// full `size` around `center`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawItem {
    pub kind: u32,
    pub center: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl DrawItem {
    pub fn circle(kind: DrawKind, center: Vec2, radius: f32, color: [f32; 4]) -> Self {
        Self {
            kind: kind as u32,
            center: center.to_array(),
            size: [radius, radius],
            color,
        }
    }

    pub fn rect(kind: DrawKind, center: Vec2, size: Vec2, color: [f32; 4]) -> Self {
        Self {
            kind: kind as u32,
            center: center.to_array(),
            size: size.to_array(),
            color,
        }
    }
}

/// Colors for board elements
pub mod colors {
    pub const PIN: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const WALL: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const FLOOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const SLOT_OPEN: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const SLOT_CAPTURED: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const BOB: [f32; 4] = [0.9, 0.85, 0.3, 1.0];
    pub const BAR: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    /// Ball at rest
    pub const BALL_COLD: [f32; 4] = [0.2, 0.4, 1.0, 1.0];
    /// Ball at or above the hot speed
    pub const BALL_HOT: [f32; 4] = [1.0, 0.55, 0.1, 1.0];
}

/// Ball color blended from cold to hot by speed
pub fn ball_color(speed: f32) -> [f32; 4] {
    let t = (speed / BALL_HOT_SPEED).clamp(0.0, 1.0);
    Vec4::from_array(colors::BALL_COLD)
        .lerp(Vec4::from_array(colors::BALL_HOT), t)
        .to_array()
}

/// Everything visible this frame, back to front
///
/// Captured balls are left out; slots turn green once they have taken one.
pub fn draw_list(sim: &Simulation) -> Vec<DrawItem> {
    let field = &sim.field;
    let mut items = Vec::with_capacity(
        field.slots.len() + field.floors.len() + field.walls.len() + field.pins.len() + sim.bodies.len(),
    );

    for slot in &field.slots {
        let color = if slot.captured { colors::SLOT_CAPTURED } else { colors::SLOT_OPEN };
        items.push(DrawItem::rect(DrawKind::Slot, slot.rect.center(), slot.rect.size, color));
    }
    for floor in &field.floors {
        items.push(DrawItem::rect(DrawKind::Floor, floor.rect.center(), floor.rect.size, colors::FLOOR));
    }
    for wall in &field.walls {
        items.push(DrawItem::rect(DrawKind::Wall, wall.rect.center(), wall.rect.size, colors::WALL));
    }
    for pin in &field.pins {
        items.push(DrawItem::circle(DrawKind::Pin, pin.center, pin.radius, colors::PIN));
    }

    if let Some(rig) = &sim.pendulums {
        items.push(DrawItem::rect(DrawKind::Bar, rig.bar.center(), rig.bar.size, colors::BAR));
        for pendulum in &rig.pendulums {
            items.push(DrawItem::circle(DrawKind::Bob, pendulum.bob, pendulum.radius, colors::BOB));
        }
    }

    for body in sim.live_bodies() {
        items.push(DrawItem::circle(
            DrawKind::Ball,
            body.pos,
            body.radius,
            ball_color(body.vel.length()),
        ));
    }

    items
}
