//! Collision detection and response
//!
//! Everything here is circles and axis-aligned bounds: ball vs cup, ball vs
//! bomb, and the damped reflections off the arena walls and floor.

use glam::Vec2;

use super::state::{Ball, Bomb, Cup};
use crate::consts::*;

/// Strict circle-vs-circle overlap: hit iff the center distance is less than
/// the sum of radii. A ball exactly epsilon inside the sum registers; exactly
/// epsilon outside does not.
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance_squared(b_pos) < (a_radius + b_radius) * (a_radius + b_radius)
}

/// First not-yet-hit cup the ball overlaps, by id order
///
/// Cups never overlap each other by construction, so at most one can be in
/// contact and the order is immaterial.
pub fn first_cup_overlap(ball: &Ball, cups: &[Cup]) -> Option<usize> {
    cups.iter()
        .position(|cup| !cup.hit && circles_overlap(ball.pos, ball.radius, cup.pos, cup.radius))
}

/// Ball-vs-bomb overlap
#[inline]
pub fn bomb_overlap(ball: &Ball, bomb: &Bomb) -> bool {
    circles_overlap(ball.pos, ball.radius, bomb.pos, bomb.radius)
}

/// Clamp the ball inside the side walls, reflecting horizontal velocity with
/// damping on contact. Returns true if a wall was touched.
pub fn resolve_walls(ball: &mut Ball) -> bool {
    let min_x = ball.radius;
    let max_x = CANVAS_W - ball.radius;
    if ball.pos.x < min_x {
        ball.pos.x = min_x;
        ball.vel.x = -ball.vel.x * WALL_DAMPING;
        true
    } else if ball.pos.x > max_x {
        ball.pos.x = max_x;
        ball.vel.x = -ball.vel.x * WALL_DAMPING;
        true
    } else {
        false
    }
}

/// Outcome of floor contact resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorOutcome {
    /// No floor contact this tick
    Airborne,
    /// Bounced with damped vertical velocity
    Bounced,
    /// Post-bounce vertical speed fell under the settle threshold
    Settled,
}

/// Resolve floor contact: clamp to the floor line, reflect vertical velocity
/// with damping and bleed horizontal speed. Reports `Settled` once the damped
/// bounce is too slow to continue.
pub fn resolve_floor(ball: &mut Ball) -> FloorOutcome {
    let floor_y = CANVAS_H - ball.radius;
    if ball.pos.y <= floor_y {
        return FloorOutcome::Airborne;
    }
    ball.pos.y = floor_y;
    ball.vel.y = -ball.vel.y * FLOOR_DAMPING;
    ball.vel.x *= FLOOR_FRICTION;
    if ball.vel.y.abs() < SETTLE_EPSILON {
        FloorOutcome::Settled
    } else {
        FloorOutcome::Bounced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.001;

    fn ball_at(x: f32, y: f32) -> Ball {
        Ball {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius: 12.0,
        }
    }

    #[test]
    fn test_overlap_just_inside_sum_of_radii() {
        let sum = 28.0 + 12.0;
        let ball = ball_at(300.0 + sum - EPS, 200.0);
        let cup = Cup {
            id: 0,
            pos: Vec2::new(300.0, 200.0),
            radius: 28.0,
            hit: false,
        };
        assert!(circles_overlap(ball.pos, ball.radius, cup.pos, cup.radius));
    }

    #[test]
    fn test_no_overlap_just_outside_sum_of_radii() {
        let sum = 28.0 + 12.0;
        let ball = ball_at(300.0 + sum + EPS, 200.0);
        let cup = Cup {
            id: 0,
            pos: Vec2::new(300.0, 200.0),
            radius: 28.0,
            hit: false,
        };
        assert!(!circles_overlap(ball.pos, ball.radius, cup.pos, cup.radius));
    }

    #[test]
    fn test_hit_cups_are_skipped() {
        let ball = ball_at(300.0, 200.0);
        let cups = [
            Cup {
                id: 0,
                pos: Vec2::new(300.0, 200.0),
                radius: 28.0,
                hit: true,
            },
            Cup {
                id: 1,
                pos: Vec2::new(310.0, 200.0),
                radius: 28.0,
                hit: false,
            },
        ];
        assert_eq!(first_cup_overlap(&ball, &cups), Some(1));
    }

    #[test]
    fn test_wall_reflection_left() {
        let mut ball = ball_at(5.0, 300.0);
        ball.vel = Vec2::new(-10.0, 0.0);
        assert!(resolve_walls(&mut ball));
        assert_eq!(ball.pos.x, ball.radius);
        assert!((ball.vel.x - 10.0 * WALL_DAMPING).abs() < 1e-5);
    }

    #[test]
    fn test_wall_reflection_right() {
        let mut ball = ball_at(CANVAS_W - 5.0, 300.0);
        ball.vel = Vec2::new(10.0, 0.0);
        assert!(resolve_walls(&mut ball));
        assert_eq!(ball.pos.x, CANVAS_W - ball.radius);
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_wall_no_contact_inside() {
        let mut ball = ball_at(300.0, 300.0);
        ball.vel = Vec2::new(3.0, 0.0);
        assert!(!resolve_walls(&mut ball));
        assert_eq!(ball.vel.x, 3.0);
    }

    #[test]
    fn test_floor_bounce_damps_vertical_speed() {
        let mut ball = ball_at(300.0, CANVAS_H);
        ball.vel = Vec2::new(4.0, 10.0);
        assert_eq!(resolve_floor(&mut ball), FloorOutcome::Bounced);
        assert_eq!(ball.pos.y, CANVAS_H - ball.radius);
        assert!(ball.vel.y < 0.0);
        assert!(ball.vel.y.abs() < 10.0);
        assert!((ball.vel.x - 4.0 * FLOOR_FRICTION).abs() < 1e-5);
    }

    #[test]
    fn test_floor_settles_slow_bounce() {
        let mut ball = ball_at(300.0, CANVAS_H);
        // Damped to 0.8, under the settle threshold
        ball.vel = Vec2::new(0.0, 2.0);
        assert_eq!(resolve_floor(&mut ball), FloorOutcome::Settled);
    }
}
