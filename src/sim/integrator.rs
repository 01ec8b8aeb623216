//! Fixed-step gravity integration
//!
//! One call per tick per active body: gravity into vy, remember the
//! position, then move by the new velocity.

use super::state::Body;

/// Advance one body by a tick. Non-active bodies are left untouched.
#[inline]
pub fn integrate(body: &mut Body, gravity: f32) {
    if !body.is_active() {
        return;
    }
    body.vel.y += gravity;
    body.prev_pos = body.pos;
    body.pos += body.vel;
}

/// Advance every active body in arena order
pub fn integrate_all(bodies: &mut [Body], gravity: f32) {
    for body in bodies.iter_mut() {
        integrate(body, gravity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BodyId, Lifecycle};
    use glam::Vec2;

    fn active(pos: Vec2, vel: Vec2) -> Body {
        let mut body = Body::new(BodyId(0), pos, 5.0);
        body.vel = vel;
        body.start();
        body
    }

    #[test]
    fn test_gravity_then_move() {
        let mut body = active(Vec2::new(10.0, 20.0), Vec2::new(1.0, 2.0));
        integrate(&mut body, 0.5);
        assert_eq!(body.vel, Vec2::new(1.0, 2.5));
        assert_eq!(body.prev_pos, Vec2::new(10.0, 20.0));
        assert_eq!(body.pos, Vec2::new(11.0, 22.5));
    }

    #[test]
    fn test_rollback_restores_exactly() {
        let start = Vec2::new(123.456, 78.9);
        let mut body = active(start, Vec2::new(-3.3, 0.7));
        integrate(&mut body, 0.35);
        assert_ne!(body.pos, start);
        body.rollback();
        assert_eq!(body.pos, start);
    }

    #[test]
    fn test_pending_and_captured_do_not_move() {
        let mut pending = Body::new(BodyId(1), Vec2::new(5.0, 5.0), 5.0);
        pending.vel = Vec2::new(1.0, 1.0);
        integrate(&mut pending, 0.35);
        assert_eq!(pending.pos, Vec2::new(5.0, 5.0));
        assert_eq!(pending.vel, Vec2::new(1.0, 1.0));

        let mut captured = active(Vec2::new(5.0, 5.0), Vec2::new(1.0, 1.0));
        captured.capture();
        integrate(&mut captured, 0.35);
        assert_eq!(captured.pos, Vec2::new(5.0, 5.0));
        assert_eq!(captured.lifecycle, Lifecycle::Captured);
    }
}
