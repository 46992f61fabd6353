//! Property tests for the simulation invariants

use glam::Vec2;
use proptest::prelude::*;

use pyramid_cups::config::{AimMethod, RoundConfig};
use pyramid_cups::consts::*;
use pyramid_cups::sim::{
    Ball, FloorOutcome, GamePhase, GameState, TickInput, build_pyramid, resolve_floor,
    resolve_walls, tick,
};

proptest! {
    /// Floor contact always damps vertical speed (restitution < 1)
    #[test]
    fn floor_bounce_damps_vertical_speed(vy in 1.5f32..80.0, x in 50.0f32..550.0) {
        let mut ball = Ball {
            pos: Vec2::new(x, CANVAS_H + 5.0),
            vel: Vec2::new(0.0, vy),
            radius: 12.0,
        };
        let outcome = resolve_floor(&mut ball);
        prop_assert_ne!(outcome, FloorOutcome::Airborne);
        prop_assert!(ball.vel.y <= 0.0);
        prop_assert!(ball.vel.y.abs() < vy);
        prop_assert_eq!(ball.pos.y, CANVAS_H - ball.radius);
    }

    /// Wall resolution always leaves the ball inside the arena horizontally
    #[test]
    fn wall_resolution_clamps_x(x in -200.0f32..800.0, vx in -60.0f32..60.0) {
        let mut ball = Ball {
            pos: Vec2::new(x, 300.0),
            vel: Vec2::new(vx, 0.0),
            radius: 12.0,
        };
        resolve_walls(&mut ball);
        prop_assert!(ball.pos.x >= ball.radius);
        prop_assert!(ball.pos.x <= CANVAS_W - ball.radius);
    }

    /// Every seed launches with wind inside the configured range
    #[test]
    fn wind_sampled_in_range(seed in any::<u64>()) {
        let config = RoundConfig {
            aim_method: AimMethod::ClickToAim,
            ..Default::default()
        };
        let mut state = GameState::new(seed, config);
        let press = TickInput {
            aim_target: Some(Vec2::new(300.0, 120.0)),
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &press);
        prop_assert_eq!(state.phase, GamePhase::Flying);
        prop_assert!(state.wind >= -WIND_MAX && state.wind <= WIND_MAX);
    }

    /// Pyramid layout produces exactly the requested cups, all on the canvas
    #[test]
    fn pyramid_layout_bounds(count in 0u32..30) {
        let cups = build_pyramid(count, 28.0, 8.0);
        prop_assert_eq!(cups.len() as u32, count);
        for cup in &cups {
            prop_assert!(cup.pos.x - cup.radius >= 0.0);
            prop_assert!(cup.pos.x + cup.radius <= CANVAS_W);
            prop_assert!(cup.pos.y < CANVAS_H);
            prop_assert!(!cup.hit);
        }
    }

    /// A random input script never breaks the core invariants: score is
    /// monotone, charge power stays in bounds, the ball stays inside the
    /// side walls
    #[test]
    fn random_input_scripts_hold_invariants(
        seed in any::<u64>(),
        script in prop::collection::vec((any::<bool>(), any::<bool>(), 0u16..600, 0u16..600), 1..400),
    ) {
        let mut state = GameState::new(seed, RoundConfig::default());
        let mut last_score = state.score();
        for (charge, launch, tx, ty) in script {
            let input = TickInput {
                aim_target: Some(Vec2::new(tx as f32, ty as f32)),
                charge,
                launch,
                pause: false,
            };
            tick(&mut state, &input);

            let score = state.score();
            prop_assert!(score >= last_score);
            last_score = score;

            prop_assert!(state.aim.power >= POWER_MIN && state.aim.power <= POWER_MAX);

            if state.phase == GamePhase::Flying {
                let r = state.ball.radius;
                prop_assert!(state.ball.pos.x >= r && state.ball.pos.x <= CANVAS_W - r);
            }
        }
    }
}
