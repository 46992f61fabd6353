//! Pyramid of Cups - a browser cup-toss arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `config`: Difficulty tiers, map themes and per-round options
//! - `renderer`: Canvas2D rendering (wasm only)
//! - `settings`: Player preferences persisted to LocalStorage
//! - `scoreboard`: Local leaderboard of cleared rounds

pub mod config;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use config::{AimMethod, Difficulty, MapTheme, RoundConfig, ThrowSpeed};
pub use scoreboard::Scoreboard;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate. All physics constants below are per-tick
    /// quantities at this rate.
    pub const TICK_HZ: u32 = 60;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Render surface dimensions (logical units)
    pub const CANVAS_W: f32 = 600.0;
    pub const CANVAS_H: f32 = 600.0;

    /// Downward acceleration applied each tick while the ball flies
    pub const GRAVITY: f32 = 0.25;
    /// Horizontal acceleration per unit of wind strength
    pub const WIND_ACCEL: f32 = 0.08;
    /// Wind strength is resampled into [-WIND_MAX, WIND_MAX] on every launch
    pub const WIND_MAX: f32 = 0.6;

    /// Vertical restitution on floor contact
    pub const FLOOR_DAMPING: f32 = 0.4;
    /// Horizontal velocity retained on floor contact
    pub const FLOOR_FRICTION: f32 = 0.7;
    /// Horizontal restitution on wall contact
    pub const WALL_DAMPING: f32 = 0.7;
    /// Below this post-bounce vertical speed the ball counts as stopped
    pub const SETTLE_EPSILON: f32 = 1.0;
    /// Delay between the ball stopping and its return to the launch point
    /// (500 ms at TICK_HZ)
    pub const SETTLE_DELAY_TICKS: u32 = TICK_HZ / 2;

    /// Launch power bounds and charge build-up per tick
    pub const POWER_MIN: f32 = 8.0;
    pub const POWER_MAX: f32 = 44.0;
    pub const CHARGE_RATE: f32 = 0.6;
    /// Power per unit of drag distance (DragTarget aim method)
    pub const DRAG_POWER_SCALE: f32 = 0.1;
    /// Fixed launch power for the ClickToAim method
    pub const CLICK_POWER: f32 = 26.0;

    /// Launch point sits this far above the floor, horizontally centered
    pub const LAUNCH_Y_OFFSET: f32 = 60.0;
    /// Top row of the cup pyramid
    pub const PYRAMID_TOP_Y: f32 = 120.0;

    /// Bomb obstacle patrol band
    pub const BOMB_RADIUS: f32 = 20.0;
    pub const BOMB_SPEED: f32 = 2.5;
    pub const BOMB_Y: f32 = 330.0;
    pub const BOMB_MIN_X: f32 = 60.0;
    pub const BOMB_MAX_X: f32 = 540.0;
    /// Timed-mode clock penalty for hitting the bomb (3 s)
    pub const BOMB_TIME_PENALTY_TICKS: u32 = 3 * TICK_HZ;
}

/// Launch point for the ball (and the spot it returns to after a throw)
#[inline]
pub fn launch_point() -> Vec2 {
    Vec2::new(consts::CANVAS_W / 2.0, consts::CANVAS_H - consts::LAUNCH_Y_OFFSET)
}

/// Unit vector for an angle (radians, y-down screen space)
#[inline]
pub fn dir_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle (radians) of the vector from `from` toward `to`
#[inline]
pub fn angle_toward(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_from_angle_up_is_negative_y() {
        let dir = dir_from_angle(-std::f32::consts::FRAC_PI_2);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_angle_toward_roundtrip() {
        let from = launch_point();
        let to = Vec2::new(300.0, 120.0);
        let angle = angle_toward(from, to);
        let dir = dir_from_angle(angle);
        // Straight up from the launch point
        assert!(dir.x.abs() < 1e-6);
        assert!(dir.y < 0.0);
    }
}
