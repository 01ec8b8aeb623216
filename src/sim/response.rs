//! Contact response rules
//!
//! This is an ad-hoc damped bounce, not a rigid-body solver. Each rule
//! mutates the ball's velocity and position and reports whether the contact
//! rings a tone or ends in a capture.

use glam::Vec2;

use super::collision::Contact;
use super::field::ObstacleField;
use super::obstacle::{ContactKind, Obstacle};
use super::state::Body;
use crate::clamp_min_magnitude;
use crate::config::WallBounce;
use crate::consts::*;

/// Outcome of resolving one contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Contact rings the next tone of the score
    pub sounds: bool,
    /// Slot index that took the ball
    pub captured: Option<usize>,
}

impl Resolution {
    fn silent() -> Self {
        Self::default()
    }

    fn sound() -> Self {
        Self {
            sounds: true,
            captured: None,
        }
    }
}

/// Damping applied to a reflected speed: `max(0.5, 1 / speed)`
///
/// `speed` is floored at `SPEED_EPSILON` so a resting ball never divides by zero.
#[inline]
pub fn pin_damping(speed: f32) -> f32 {
    PIN_MIN_DAMPING.max(1.0 / speed.max(SPEED_EPSILON))
}

/// Send the ball straight away from `center`, damped, at least 1 px/tick per axis
///
/// Returns the new velocity and the damping factor used.
pub fn reflect_and_damp(vel: Vec2, at: Vec2, center: Vec2) -> (Vec2, f32) {
    let offset = at - center;
    let angle = offset.y.atan2(offset.x);
    let speed = vel.length().max(SPEED_EPSILON);
    let damping = pin_damping(speed);
    let out = Vec2::new(
        clamp_min_magnitude(speed * angle.cos() * damping, PIN_MIN_AXIS_SPEED),
        clamp_min_magnitude(speed * angle.sin() * damping, PIN_MIN_AXIS_SPEED),
    );
    (out, damping)
}

/// Bounce off a wall's top edge and sit just above it
pub fn landing_bounce(body: &mut Body, wall_top: f32) {
    body.vel.x = clamp_min_magnitude(body.vel.x * LANDING_FRICTION, LANDING_MIN_AXIS_SPEED);
    body.vel.y = clamp_min_magnitude(body.vel.y * LANDING_RESTITUTION, LANDING_MIN_AXIS_SPEED);
    body.pos.y = wall_top - body.radius - LANDING_CLEARANCE;
}

/// Apply the response for `contact` to `body`
///
/// Contacts for a ball that is no longer active (captured earlier in the
/// same tick) are ignored.
pub fn resolve(body: &mut Body, contact: &Contact, field: &ObstacleField, bounce: WallBounce) -> Resolution {
    if !body.is_active() {
        return Resolution::silent();
    }
    let Some(obstacle) = field.get(contact.obstacle) else {
        return Resolution::silent();
    };

    match contact.kind {
        ContactKind::Pin => {
            let (vel, _) = reflect_and_damp(body.vel, contact.at, obstacle.center());
            body.vel = vel;
            body.rollback();
            Resolution::sound()
        }
        ContactKind::WallTop => match bounce {
            WallBounce::Reflect => {
                let (vel, _) = reflect_and_damp(body.vel, contact.at, obstacle.center());
                body.vel = vel;
                body.rollback();
                Resolution::sound()
            }
            WallBounce::Landing => {
                let top = match obstacle {
                    Obstacle::Wall(wall) => wall.rect.top(),
                    _ => obstacle.center().y,
                };
                landing_bounce(body, top);
                Resolution::sound()
            }
        },
        ContactKind::WallSide => {
            body.pos.x = body.prev_pos.x;
            match bounce {
                WallBounce::Reflect => {
                    body.vel.x *= WALL_SIDE_RESTITUTION;
                    Resolution::silent()
                }
                WallBounce::Landing => {
                    body.vel.x = -body.vel.x;
                    Resolution::sound()
                }
            }
        }
        ContactKind::Floor => {
            body.vel.y *= FLOOR_RESTITUTION;
            body.rollback();
            Resolution::silent()
        }
        ContactKind::Slot => {
            if body.capture() {
                Resolution {
                    sounds: false,
                    captured: Some(contact.obstacle.index),
                }
            } else {
                Resolution::silent()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{Floor, ObstacleCategory, ObstacleRef, Pin, Rect, Slot, Wall, WallKind};
    use crate::sim::state::{BodyId, Lifecycle};
    use proptest::prelude::*;

    fn field() -> ObstacleField {
        ObstacleField {
            width: 400.0,
            height: 1005.0,
            pins: vec![Pin { center: Vec2::new(100.0, 100.0), radius: 5.0 }],
            walls: vec![Wall {
                rect: Rect::new(200.0, 800.0, 10.0, 200.0),
                kind: WallKind::Divider,
                top_band: 20.0,
            }],
            floors: vec![Floor { rect: Rect::new(0.0, 1000.0, 400.0, 5.0) }],
            slots: vec![Slot {
                rect: Rect::new(0.0, 900.0, 100.0, 100.0),
                points: 3,
                captured: false,
                captures: 0,
            }],
        }
    }

    fn body(prev: Vec2, pos: Vec2, vel: Vec2) -> Body {
        let mut body = Body::new(BodyId(0), pos, 25.0);
        body.prev_pos = prev;
        body.vel = vel;
        body.start();
        body
    }

    fn contact(category: ObstacleCategory, kind: ContactKind, at: Vec2) -> Contact {
        Contact {
            obstacle: ObstacleRef { category, index: 0 },
            kind,
            at,
        }
    }

    #[test]
    fn test_pin_bounce_reflects_and_rolls_back() {
        let field = field();
        let prev = Vec2::new(100.0, 68.0);
        let at = Vec2::new(100.0, 72.0);
        let mut ball = body(prev, at, Vec2::new(0.0, 4.0));
        let res = resolve(&mut ball, &contact(ObstacleCategory::Pin, ContactKind::Pin, at), &field, WallBounce::Reflect);
        assert!(res.sounds);
        assert_eq!(ball.pos, prev);
        // Straight above the pin: thrown straight up at half speed
        assert!(ball.vel.y <= -2.0 + 1e-4 && ball.vel.y >= -2.0 - 1e-4);
        assert!(ball.vel.x.abs() >= 1.0);
    }

    #[test]
    fn test_zero_speed_on_pin_boundary() {
        let field = field();
        // Resting exactly on the pin (distance == 30 == sum of radii)
        let at = Vec2::new(130.0, 100.0);
        let mut ball = body(at, at, Vec2::ZERO);
        let res = resolve(&mut ball, &contact(ObstacleCategory::Pin, ContactKind::Pin, at), &field, WallBounce::Reflect);
        assert!(res.sounds);
        assert!(ball.vel.is_finite());
        assert!(ball.vel.x >= 1.0, "pushed away from the pin: {:?}", ball.vel);
        assert!(ball.vel.y.abs() >= 1.0);
    }

    #[test]
    fn test_damping_floor() {
        assert_eq!(pin_damping(10.0), 0.5);
        assert_eq!(pin_damping(1.0), 1.0);
        assert!(pin_damping(0.0).is_finite());
    }

    #[test]
    fn test_floor_bounce() {
        let field = field();
        let prev = Vec2::new(50.0, 973.0);
        let at = Vec2::new(50.0, 978.0);
        let mut ball = body(prev, at, Vec2::new(0.0, 5.0));
        let res = resolve(&mut ball, &contact(ObstacleCategory::Floor, ContactKind::Floor, at), &field, WallBounce::Reflect);
        assert!(!res.sounds);
        assert_eq!(ball.vel, Vec2::new(0.0, 5.0 * -0.3));
        assert_eq!(ball.pos, prev);
        assert_eq!(ball.pos.x, 50.0);
    }

    #[test]
    fn test_wall_side_reflect_variant() {
        let field = field();
        let prev = Vec2::new(172.0, 900.0);
        let at = Vec2::new(178.0, 906.0);
        let mut ball = body(prev, at, Vec2::new(6.0, 6.0));
        let res = resolve(&mut ball, &contact(ObstacleCategory::Wall, ContactKind::WallSide, at), &field, WallBounce::Reflect);
        assert!(!res.sounds);
        assert_eq!(ball.vel.x, 6.0 * -0.7);
        assert_eq!(ball.vel.y, 6.0);
        assert_eq!(ball.pos.x, 172.0);
        assert_eq!(ball.pos.y, 906.0);
    }

    #[test]
    fn test_wall_side_landing_variant_flips_and_sounds() {
        let field = field();
        let at = Vec2::new(178.0, 906.0);
        let mut ball = body(Vec2::new(172.0, 900.0), at, Vec2::new(6.0, 6.0));
        let res = resolve(&mut ball, &contact(ObstacleCategory::Wall, ContactKind::WallSide, at), &field, WallBounce::Landing);
        assert!(res.sounds);
        assert_eq!(ball.vel.x, -6.0);
    }

    #[test]
    fn test_wall_top_landing_snaps_above() {
        let field = field();
        let at = Vec2::new(205.0, 780.0);
        let mut ball = body(Vec2::new(205.0, 772.0), at, Vec2::new(0.5, 8.0));
        let res = resolve(&mut ball, &contact(ObstacleCategory::Wall, ContactKind::WallTop, at), &field, WallBounce::Landing);
        assert!(res.sounds);
        assert_eq!(ball.vel.x, 2.0);
        assert_eq!(ball.vel.y, 8.0 * -0.65);
        assert_eq!(ball.pos.y, 800.0 - 25.0 - LANDING_CLEARANCE);
        assert!(ball.pos.y + ball.radius < 800.0);
    }

    #[test]
    fn test_wall_top_reflect_rolls_back() {
        let field = field();
        let prev = Vec2::new(205.0, 772.0);
        let at = Vec2::new(205.0, 780.0);
        let mut ball = body(prev, at, Vec2::new(0.0, 8.0));
        let res = resolve(&mut ball, &contact(ObstacleCategory::Wall, ContactKind::WallTop, at), &field, WallBounce::Reflect);
        assert!(res.sounds);
        assert_eq!(ball.pos, prev);
        assert!(ball.vel.y < 0.0, "bounced upward off the wall: {:?}", ball.vel);
    }

    #[test]
    fn test_slot_capture_is_once() {
        let field = field();
        let at = Vec2::new(50.0, 920.0);
        let mut ball = body(Vec2::new(50.0, 915.0), at, Vec2::new(0.0, 5.0));
        let slot = contact(ObstacleCategory::Slot, ContactKind::Slot, at);
        let first = resolve(&mut ball, &slot, &field, WallBounce::Reflect);
        assert_eq!(first.captured, Some(0));
        assert!(!first.sounds);
        assert_eq!(ball.pos, at, "no rollback on capture");
        assert_eq!(ball.lifecycle, Lifecycle::Captured);

        let second = resolve(&mut ball, &slot, &field, WallBounce::Reflect);
        assert_eq!(second, Resolution::default());
    }

    #[test]
    fn test_captured_ball_ignores_contacts() {
        let field = field();
        let at = Vec2::new(100.0, 72.0);
        let mut ball = body(Vec2::new(100.0, 68.0), at, Vec2::new(0.0, 4.0));
        ball.capture();
        let res = resolve(&mut ball, &contact(ObstacleCategory::Pin, ContactKind::Pin, at), &field, WallBounce::Reflect);
        assert_eq!(res, Resolution::default());
        assert_eq!(ball.vel, Vec2::new(0.0, 4.0));
        assert_eq!(ball.pos, at);
    }

    proptest! {
        #[test]
        fn prop_pin_bounce_axis_floor(
            vx in -30.0f32..30.0,
            vy in -30.0f32..30.0,
            dx in -30.0f32..30.0,
            dy in -30.0f32..30.0,
        ) {
            let center = Vec2::new(100.0, 100.0);
            let (vel, damping) = reflect_and_damp(Vec2::new(vx, vy), center + Vec2::new(dx, dy), center);
            prop_assert!(vel.x.abs() >= PIN_MIN_AXIS_SPEED);
            prop_assert!(vel.y.abs() >= PIN_MIN_AXIS_SPEED);
            prop_assert!(vel.is_finite());
            prop_assert!(damping >= PIN_MIN_DAMPING);
        }

        #[test]
        fn prop_pin_bounce_points_away(
            speed in 2.5f32..30.0,
            angle in -3.1f32..3.1,
        ) {
            // Away-from-center components keep their sign once above the axis floor
            let center = Vec2::ZERO;
            let at = Vec2::new(angle.cos(), angle.sin()) * 30.0;
            let (vel, _) = reflect_and_damp(Vec2::new(0.0, speed), at, center);
            if angle.cos() * speed * 0.5 > PIN_MIN_AXIS_SPEED {
                prop_assert!(vel.x > 0.0);
            }
            if angle.sin() * speed * 0.5 > PIN_MIN_AXIS_SPEED {
                prop_assert!(vel.y > 0.0);
            }
        }
    }
}
