//! Game state and core simulation types
//!
//! All state that must survive a save/restore (and everything determinism
//! depends on) lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::RoundConfig;
use crate::consts::*;
use crate::launch_point;

/// Current phase of a round
///
/// The source material stopped the ball and repositioned it with a wall-clock
/// callback; here the delay is an explicit `Settling` state so tests can step
/// time deterministically, and a reset mid-settle simply discards the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball idle at the launch point, accepting aim input
    Aiming,
    /// Ball in flight under gravity and wind
    Flying,
    /// Ball stopped; counting down to the reposition at the launch point
    Settling { ticks_left: u32 },
    /// Every cup hit
    Won,
    /// Timed round ran out of clock
    TimeUp,
}

/// The single ball
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn at_launch(radius: f32) -> Self {
        Self {
            pos: launch_point(),
            vel: Vec2::ZERO,
            // Guard against a nonsensical tier definition
            radius: radius.max(1.0),
        }
    }

    /// Zero velocity in place (cup hit, bomb hit, or settled on the floor)
    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
    }

    /// Return to the launch point, ready for the next throw
    pub fn reposition(&mut self) {
        self.pos = launch_point();
        self.vel = Vec2::ZERO;
    }
}

/// A static circular target; permanently inactive once hit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cup {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hit: bool,
}

/// Patrolling obstacle; bounces between its x-bounds every tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: Vec2,
    pub radius: f32,
    pub vel_x: f32,
}

impl Bomb {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(BOMB_MIN_X, BOMB_Y),
            radius: BOMB_RADIUS,
            vel_x: BOMB_SPEED,
        }
    }

    /// Advance one tick, reflecting off the patrol bounds
    pub fn advance(&mut self) {
        self.pos.x += self.vel_x;
        if self.pos.x <= BOMB_MIN_X {
            self.pos.x = BOMB_MIN_X;
            self.vel_x = self.vel_x.abs();
        } else if self.pos.x >= BOMB_MAX_X {
            self.pos.x = BOMB_MAX_X;
            self.vel_x = -self.vel_x.abs();
        }
    }
}

impl Default for Bomb {
    fn default() -> Self {
        Self::new()
    }
}

/// Aim direction and charge level for the next throw
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AimState {
    /// Launch angle in radians (y-down screen space)
    pub angle: f32,
    /// Launch speed, clamped to [POWER_MIN, POWER_MAX]
    pub power: f32,
    /// Charge key currently held (ChargeLever method)
    pub charging: bool,
}

impl Default for AimState {
    fn default() -> Self {
        Self {
            // Straight up
            angle: -std::f32::consts::FRAC_PI_2,
            power: POWER_MIN,
            charging: false,
        }
    }
}

/// RNG state wrapper for serialization
///
/// Each draw derives a one-shot Pcg32 from the seed and a draw counter, so
/// the state serializes as two integers and restores mid-round exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Uniform sample in [lo, hi]
    pub fn next_uniform(&mut self, lo: f32, hi: f32) -> f32 {
        let stream = self.seed ^ self.draws.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        self.draws = self.draws.wrapping_add(1);
        let mut rng = Pcg32::seed_from_u64(stream);
        rng.random_range(lo..=hi)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Round seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Options this round started with
    pub config: RoundConfig,
    /// Current phase
    pub phase: GamePhase,
    /// Tick freeze, toggled by the front-end (Escape / tab blur)
    pub paused: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Throws launched this round
    pub throws: u32,
    /// Ticks remaining in a timed round; None when untimed
    pub timer_ticks: Option<u32>,
    /// Wind strength for the current flight, resampled on every launch
    pub wind: f32,
    pub ball: Ball,
    pub aim: AimState,
    /// Cup pyramid (sorted by id)
    pub cups: Vec<Cup>,
    /// Patrolling obstacle, when the round enables it
    pub bomb: Option<Bomb>,
}

impl GameState {
    /// Create a fresh round with the given seed and options
    pub fn new(seed: u64, config: RoundConfig) -> Self {
        let tier = config.difficulty.settings();
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            config,
            phase: GamePhase::Aiming,
            paused: false,
            time_ticks: 0,
            throws: 0,
            timer_ticks: config.timer_ticks(),
            wind: 0.0,
            ball: Ball::at_launch(tier.ball_radius),
            aim: AimState::default(),
            cups: Vec::new(),
            bomb: config.bomb.then(Bomb::new),
        };
        state.cups = build_pyramid(tier.cup_count, tier.cup_radius, tier.cup_spacing);
        state
    }

    /// Count of hit cups; the score, by definition
    pub fn score(&self) -> u32 {
        self.cups.iter().filter(|c| c.hit).count() as u32
    }

    /// At least one cup still standing
    pub fn cups_remaining(&self) -> bool {
        self.cups.iter().any(|c| !c.hit)
    }

    /// Aim input is accepted only while idle with something left to hit
    pub fn accepting_aim(&self) -> bool {
        self.phase == GamePhase::Aiming && self.cups_remaining() && !self.paused
    }

    /// Rebuild the round: cups restored, ball repositioned, aim and clock
    /// reset. Cancels any pending settle reposition.
    pub fn reset_round(&mut self) {
        let tier = self.config.difficulty.settings();
        self.cups = build_pyramid(tier.cup_count, tier.cup_radius, tier.cup_spacing);
        self.ball = Ball::at_launch(tier.ball_radius);
        self.aim = AimState::default();
        self.bomb = self.config.bomb.then(Bomb::new);
        self.timer_ticks = self.config.timer_ticks();
        self.wind = 0.0;
        self.throws = 0;
        self.phase = GamePhase::Aiming;
        self.paused = false;
        log::info!(
            "round reset: {} cups, {:?}",
            self.cups.len(),
            self.config.difficulty
        );
    }
}

/// Arrange `count` cups into a pyramid: row r holds r+1 cups, rows filled
/// top-down and the last row truncated to hit the count exactly. Rows are
/// centered horizontally; a zero count yields an empty set.
pub fn build_pyramid(count: u32, cup_radius: f32, spacing: f32) -> Vec<Cup> {
    let radius = cup_radius.max(1.0);
    let mut cups = Vec::with_capacity(count as usize);
    let step = radius * 2.0 + spacing;
    let mut row = 0u32;
    while (cups.len() as u32) < count {
        let in_row = (row + 1).min(count - cups.len() as u32);
        let row_width = in_row as f32 * radius * 2.0 + (in_row - 1) as f32 * spacing;
        let x_start = (CANVAS_W - row_width) / 2.0 + radius;
        let y = PYRAMID_TOP_Y + row as f32 * step;
        for i in 0..in_row {
            cups.push(Cup {
                id: cups.len() as u32,
                pos: Vec2::new(x_start + i as f32 * step, y),
                radius,
                hit: false,
            });
        }
        row += 1;
    }
    cups
}
