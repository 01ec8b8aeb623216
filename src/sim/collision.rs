//! Collision detection against the obstacle field
//!
//! A ball is tested once per tick at its post-integration position against
//! pins, walls, floors and slots, in that order. Every overlap is reported,
//! within a category in field index order.

use glam::Vec2;

use super::field::ObstacleField;
use super::obstacle::{ContactKind, ObstacleRef};
use super::state::Body;

/// One detected overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub obstacle: ObstacleRef,
    pub kind: ContactKind,
    /// Ball center at detection time
    pub at: Vec2,
}

/// All contacts for one ball, in resolution order
///
/// Captured and pending balls never collide.
pub fn detect(body: &Body, field: &ObstacleField) -> Vec<Contact> {
    if !body.is_active() {
        return Vec::new();
    }
    field
        .iter()
        .filter_map(|(obstacle, shape)| {
            shape.contact(body).map(|kind| Contact {
                obstacle,
                kind,
                at: body.pos,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{Floor, ObstacleCategory, Pin, Rect, Slot, Wall, WallKind};
    use crate::sim::state::BodyId;

    /// Hand-built board: two pins, one divider, one floor, one slot all near (100, 100)
    fn crowded_field() -> ObstacleField {
        ObstacleField {
            width: 400.0,
            height: 400.0,
            pins: vec![
                Pin { center: Vec2::new(90.0, 100.0), radius: 5.0 },
                Pin { center: Vec2::new(300.0, 300.0), radius: 5.0 },
                Pin { center: Vec2::new(110.0, 100.0), radius: 5.0 },
            ],
            walls: vec![Wall {
                rect: Rect::new(95.0, 115.0, 10.0, 100.0),
                kind: WallKind::Divider,
                top_band: 20.0,
            }],
            floors: vec![Floor { rect: Rect::new(0.0, 118.0, 400.0, 5.0) }],
            slots: vec![Slot {
                rect: Rect::new(80.0, 110.0, 40.0, 40.0),
                points: 5,
                captured: false,
                captures: 0,
            }],
        }
    }

    fn active_at(x: f32, y: f32) -> Body {
        let mut body = Body::new(BodyId(0), Vec2::new(x, y), 20.0);
        body.start();
        body
    }

    #[test]
    fn test_priority_and_stable_order() {
        let field = crowded_field();
        let contacts = detect(&active_at(100.0, 100.0), &field);
        let handles: Vec<(ObstacleCategory, usize)> = contacts
            .iter()
            .map(|c| (c.obstacle.category, c.obstacle.index))
            .collect();
        assert_eq!(
            handles,
            vec![
                (ObstacleCategory::Pin, 0),
                (ObstacleCategory::Pin, 2),
                (ObstacleCategory::Wall, 0),
                (ObstacleCategory::Floor, 0),
                (ObstacleCategory::Slot, 0),
            ]
        );
        assert_eq!(contacts[2].kind, ContactKind::WallTop);
        assert!(contacts.iter().all(|c| c.at == Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_inactive_bodies_skip_detection() {
        let field = crowded_field();
        let pending = Body::new(BodyId(0), Vec2::new(100.0, 100.0), 20.0);
        assert!(detect(&pending, &field).is_empty());

        let mut captured = active_at(100.0, 100.0);
        captured.capture();
        assert!(detect(&captured, &field).is_empty());
    }

    #[test]
    fn test_clear_board_no_contacts() {
        let field = crowded_field();
        assert!(detect(&active_at(200.0, 40.0), &field).is_empty());
    }
}
