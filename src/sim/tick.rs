//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! 60 Hz step; the front-end accumulates real time into whole ticks.

use glam::Vec2;

use super::collision::{FloorOutcome, bomb_overlap, first_cup_overlap, resolve_floor, resolve_walls};
use super::state::{GamePhase, GameState};
use crate::config::AimMethod;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
///
/// `charge` is level-triggered (held key); the rest are one-shot and cleared
/// by the caller after each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Pointer position in canvas space, when it moved or pressed this tick
    pub aim_target: Option<Vec2>,
    /// Charge key held (ChargeLever builds power)
    pub charge: bool,
    /// Launch trigger (release / click, depending on aim method)
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause && !matches!(state.phase, GamePhase::Won | GamePhase::TimeUp) {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "paused" } else { "resumed" });
    }
    if state.paused {
        return;
    }

    // Terminal phases are inert until the session resets
    if matches!(state.phase, GamePhase::Won | GamePhase::TimeUp) {
        return;
    }

    state.time_ticks += 1;

    // The bomb patrols in every active phase, aiming included
    if let Some(bomb) = &mut state.bomb {
        bomb.advance();
    }

    // Timed-mode countdown
    if let Some(remaining) = &mut state.timer_ticks {
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            state.ball.stop();
            state.phase = GamePhase::TimeUp;
            log::info!(
                "time up: {}/{} cups in {} throws",
                state.score(),
                state.cups.len(),
                state.throws
            );
            return;
        }
    }

    match state.phase {
        GamePhase::Aiming => aim_phase(state, input),
        GamePhase::Flying => flight_phase(state),
        GamePhase::Settling { ticks_left } => {
            if ticks_left > 1 {
                state.phase = GamePhase::Settling {
                    ticks_left: ticks_left - 1,
                };
            } else {
                state.ball.reposition();
                state.aim.release();
                state.phase = GamePhase::Aiming;
            }
        }
        GamePhase::Won | GamePhase::TimeUp => {}
    }
}

/// Aim input: update angle/power from the pointer, build lever charge,
/// launch when the method's trigger fires
fn aim_phase(state: &mut GameState, input: &TickInput) {
    if !state.cups_remaining() {
        // Nothing to throw at (degenerate zero-cup round)
        return;
    }

    if let Some(target) = input.aim_target {
        let from = state.ball.pos;
        state.aim.aim_at(from, target, state.config.aim_method);
    }

    match state.config.aim_method {
        AimMethod::ChargeLever => {
            if input.charge {
                state.aim.begin_charge();
                state.aim.charge_tick();
            }
            if input.launch && state.aim.charging {
                launch(state);
            }
        }
        AimMethod::DragTarget | AimMethod::ClickToAim => {
            if input.launch && input.aim_target.is_some() {
                launch(state);
            }
        }
    }
}

/// Fire the ball: sample deviation and wind, convert aim to velocity
fn launch(state: &mut GameState) {
    let tier = state.config.difficulty.settings();
    let deviation = state.rng_state.next_uniform(-1.0, 1.0) * tier.aim_deviation;
    state.wind = state.rng_state.next_uniform(-WIND_MAX, WIND_MAX);
    state.ball.vel = state
        .aim
        .launch_velocity(state.config.throw_speed.multiplier(), deviation);
    state.aim.release();
    state.throws += 1;
    state.phase = GamePhase::Flying;
    log::debug!(
        "throw {}: angle {:.2}, speed {:.1}, wind {:.2}",
        state.throws,
        state.aim.angle,
        state.ball.vel.length(),
        state.wind
    );
}

/// One tick of flight: integrate, bounce, then test cups and the bomb
fn flight_phase(state: &mut GameState) {
    let ball = &mut state.ball;
    ball.pos += ball.vel;
    ball.vel.x += state.wind * WIND_ACCEL;
    ball.vel.y += GRAVITY;

    resolve_walls(ball);
    if resolve_floor(ball) == FloorOutcome::Settled {
        ball.stop();
        state.phase = GamePhase::Settling {
            ticks_left: SETTLE_DELAY_TICKS,
        };
        return;
    }

    if let Some(idx) = first_cup_overlap(&state.ball, &state.cups) {
        state.cups[idx].hit = true;
        state.ball.stop();
        if state.cups_remaining() {
            state.phase = GamePhase::Settling {
                ticks_left: SETTLE_DELAY_TICKS,
            };
        } else {
            state.phase = GamePhase::Won;
            log::info!("round won in {} throws", state.throws);
        }
        return;
    }

    if let Some(bomb) = &state.bomb {
        if bomb_overlap(&state.ball, bomb) {
            // Penalty: the throw is a miss, and a timed round loses clock.
            // Score and cup flags stay untouched.
            state.ball.stop();
            state.phase = GamePhase::Settling {
                ticks_left: SETTLE_DELAY_TICKS,
            };
            if let Some(remaining) = &mut state.timer_ticks {
                *remaining = remaining.saturating_sub(BOMB_TIME_PENALTY_TICKS);
            }
            log::info!("bomb hit on throw {}", state.throws);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AimMethod, Difficulty, RoundConfig};
    use crate::launch_point;

    fn lever_config() -> RoundConfig {
        RoundConfig {
            aim_method: AimMethod::ChargeLever,
            ..Default::default()
        }
    }

    /// Hold the lever for `charge_ticks`, then release
    fn charge_and_launch(state: &mut GameState, charge_ticks: u32) {
        let hold = TickInput {
            charge: true,
            ..Default::default()
        };
        for _ in 0..charge_ticks {
            tick(state, &hold);
        }
        let release = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(state, &release);
    }

    /// Run idle ticks
    fn run_ticks(state: &mut GameState, n: u32) {
        let input = TickInput::default();
        for _ in 0..n {
            tick(state, &input);
        }
    }

    #[test]
    fn test_launch_transitions_to_flying() {
        let mut state = GameState::new(7, lever_config());
        assert_eq!(state.phase, GamePhase::Aiming);
        charge_and_launch(&mut state, 20);
        assert_eq!(state.phase, GamePhase::Flying);
        assert_eq!(state.throws, 1);
        assert!(state.ball.vel.length() > 0.0);
    }

    #[test]
    fn test_lever_launch_requires_charge() {
        let mut state = GameState::new(7, lever_config());
        let release = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &release);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.throws, 0);
    }

    #[test]
    fn test_aim_ignored_while_flying() {
        let mut state = GameState::new(7, lever_config());
        charge_and_launch(&mut state, 20);
        let angle_before = state.aim.angle;
        let aim = TickInput {
            aim_target: Some(Vec2::new(0.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &aim);
        assert_eq!(state.aim.angle, angle_before);
    }

    #[test]
    fn test_drag_target_launches_on_press() {
        let config = RoundConfig {
            aim_method: AimMethod::DragTarget,
            ..Default::default()
        };
        let mut state = GameState::new(7, config);
        let press = TickInput {
            aim_target: Some(Vec2::new(300.0, 120.0)),
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &press);
        assert_eq!(state.phase, GamePhase::Flying);
        // Straight-up throw
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn test_click_to_aim_uses_fixed_power() {
        let config = RoundConfig {
            aim_method: AimMethod::ClickToAim,
            difficulty: Difficulty::Easy, // zero aim deviation
            ..Default::default()
        };
        let mut state = GameState::new(7, config);
        let press = TickInput {
            aim_target: Some(Vec2::new(300.0, 120.0)),
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &press);
        assert!((state.ball.vel.length() - CLICK_POWER).abs() < 1e-3);
    }

    #[test]
    fn test_floor_bounces_decay_and_settle() {
        // The worked example: gravity 0.25/tick, no wind, straight-up throw.
        // Cups cleared so the flight ends on the floor, not in a cup.
        let mut state = GameState::new(7, lever_config());
        state.cups.clear();
        state.phase = GamePhase::Flying;
        state.wind = 0.0;
        state.ball.vel = Vec2::new(0.0, -20.0);

        let mut bounce_speeds: Vec<f32> = Vec::new();
        let mut prev_vy = state.ball.vel.y;
        let mut settled_at = None;
        for i in 0..4000 {
            tick(&mut state, &TickInput::default());
            if let GamePhase::Settling { .. } = state.phase {
                settled_at = Some(i);
                break;
            }
            // A sign flip from downward to upward is a floor bounce
            if prev_vy > 0.0 && state.ball.vel.y < 0.0 {
                bounce_speeds.push(state.ball.vel.y.abs());
            }
            prev_vy = state.ball.vel.y;
        }
        assert!(settled_at.is_some(), "ball never settled");
        assert!(!bounce_speeds.is_empty());
        for pair in bounce_speeds.windows(2) {
            assert!(pair[1] < pair[0], "bounce speed must strictly decrease");
        }

        // After the settle delay the ball is back at the launch point
        run_ticks(&mut state, SETTLE_DELAY_TICKS);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.ball.pos, launch_point());
    }

    #[test]
    fn test_ball_stays_inside_walls() {
        let mut state = GameState::new(7, lever_config());
        state.phase = GamePhase::Flying;
        state.wind = WIND_MAX;
        state.ball.vel = Vec2::new(40.0, -25.0);
        for _ in 0..2000 {
            tick(&mut state, &TickInput::default());
            let r = state.ball.radius;
            assert!(state.ball.pos.x >= r && state.ball.pos.x <= CANVAS_W - r);
            if !matches!(state.phase, GamePhase::Flying) {
                break;
            }
        }
    }

    #[test]
    fn test_cup_hit_scores_and_settles() {
        let mut state = GameState::new(7, lever_config());
        let cup = state.cups[0];
        state.phase = GamePhase::Flying;
        state.wind = 0.0;
        // One tick of motion away, heading straight at the cup center
        state.ball.pos = cup.pos + Vec2::new(0.0, cup.radius + state.ball.radius + 3.0);
        state.ball.vel = Vec2::new(0.0, -4.0);

        tick(&mut state, &TickInput::default());
        assert!(state.cups[0].hit);
        assert_eq!(state.score(), 1);
        assert!(matches!(state.phase, GamePhase::Settling { .. }));
        assert_eq!(state.ball.vel, Vec2::ZERO);

        run_ticks(&mut state, SETTLE_DELAY_TICKS);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.ball.pos, launch_point());
    }

    #[test]
    fn test_win_exactly_when_all_cups_hit() {
        let mut state = GameState::new(7, lever_config());
        let n = state.cups.len();
        // All but one down: not a win yet
        for cup in state.cups.iter_mut().take(n - 1) {
            cup.hit = true;
        }
        assert_ne!(state.phase, GamePhase::Won);

        let last = state.cups[n - 1];
        state.phase = GamePhase::Flying;
        state.wind = 0.0;
        state.ball.pos = last.pos + Vec2::new(0.0, last.radius + state.ball.radius + 3.0);
        state.ball.vel = Vec2::new(0.0, -4.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.score() as usize, n);
    }

    #[test]
    fn test_wind_in_range_and_constant_per_flight() {
        let mut state = GameState::new(99, lever_config());
        for _ in 0..8 {
            charge_and_launch(&mut state, 15);
            assert!(state.wind >= -WIND_MAX && state.wind <= WIND_MAX);
            let wind = state.wind;
            // Wind holds for the whole flight
            while state.phase == GamePhase::Flying {
                tick(&mut state, &TickInput::default());
                assert_eq!(state.wind, wind);
            }
            // Ride out the settle delay; a lucky win just starts a new round
            loop {
                match state.phase {
                    GamePhase::Aiming => break,
                    GamePhase::Won | GamePhase::TimeUp => {
                        state.reset_round();
                        break;
                    }
                    _ => tick(&mut state, &TickInput::default()),
                }
            }
        }
    }

    #[test]
    fn test_score_resets_only_on_reset_round() {
        let mut state = GameState::new(7, lever_config());
        state.cups[0].hit = true;
        state.cups[1].hit = true;
        assert_eq!(state.score(), 2);
        run_ticks(&mut state, 120);
        assert_eq!(state.score(), 2);
        state.reset_round();
        assert_eq!(state.score(), 0);
        assert_eq!(state.throws, 0);
    }

    #[test]
    fn test_reset_cancels_pending_reposition() {
        let mut state = GameState::new(7, lever_config());
        state.phase = GamePhase::Settling {
            ticks_left: SETTLE_DELAY_TICKS,
        };
        state.ball.pos = Vec2::new(80.0, 550.0);
        state.reset_round();
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.ball.pos, launch_point());
        // No stale settle state fires later
        run_ticks(&mut state, SETTLE_DELAY_TICKS * 2);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.ball.pos, launch_point());
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let mut state = GameState::new(7, lever_config());
        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &toggle);
        assert!(state.paused);
        let ticks = state.time_ticks;
        run_ticks(&mut state, 10);
        assert_eq!(state.time_ticks, ticks);
        tick(&mut state, &toggle);
        assert!(!state.paused);
        run_ticks(&mut state, 10);
        assert_eq!(state.time_ticks, ticks + 10);
    }

    #[test]
    fn test_timed_round_times_out() {
        let config = RoundConfig {
            timed_secs: Some(1),
            ..lever_config()
        };
        let mut state = GameState::new(7, config);
        run_ticks(&mut state, TICK_HZ);
        assert_eq!(state.phase, GamePhase::TimeUp);
        // Terminal: further input is inert
        charge_and_launch(&mut state, 10);
        assert_eq!(state.phase, GamePhase::TimeUp);
        assert_eq!(state.throws, 0);
    }

    #[test]
    fn test_bomb_hit_is_a_miss_with_time_penalty() {
        let config = RoundConfig {
            bomb: true,
            timed_secs: Some(30),
            ..lever_config()
        };
        let mut state = GameState::new(7, config);
        let score_before = state.score();

        // Park the flying ball on the bomb's patrol line
        let bomb = state.bomb.expect("bomb enabled");
        state.phase = GamePhase::Flying;
        state.wind = 0.0;
        state.ball.pos = bomb.pos;
        state.ball.vel = Vec2::ZERO;
        let timer_before = state.timer_ticks.unwrap();

        tick(&mut state, &TickInput::default());
        assert!(matches!(state.phase, GamePhase::Settling { .. }));
        assert_eq!(state.score(), score_before);
        assert!(state.cups.iter().all(|c| !c.hit));
        let timer_after = state.timer_ticks.unwrap();
        // The tick itself costs one, the bomb costs the penalty
        assert_eq!(timer_after, timer_before - 1 - BOMB_TIME_PENALTY_TICKS);
    }

    #[test]
    fn test_zero_cup_round_is_inert() {
        let mut state = GameState::new(7, lever_config());
        state.cups.clear();
        charge_and_launch(&mut state, 20);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.throws, 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and input script stay identical
        let mut a = GameState::new(424242, lever_config());
        let mut b = GameState::new(424242, lever_config());

        let hold = TickInput {
            charge: true,
            ..Default::default()
        };
        let release = TickInput {
            launch: true,
            ..Default::default()
        };
        let idle = TickInput::default();

        for _ in 0..25 {
            tick(&mut a, &hold);
            tick(&mut b, &hold);
        }
        tick(&mut a, &release);
        tick(&mut b, &release);
        for _ in 0..600 {
            tick(&mut a, &idle);
            tick(&mut b, &idle);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.wind, b.wind);
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.rng_state, b.rng_state);
    }
}
