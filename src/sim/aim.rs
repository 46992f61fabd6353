//! Aim input handling
//!
//! The three input schemes (drag a target, pull a charge lever, click to
//! throw) differ only in where launch power comes from; direction always
//! follows the pointer. `tick` routes pointer/charge input through here while
//! the ball is idle.

use glam::Vec2;

use super::state::AimState;
use crate::config::AimMethod;
use crate::consts::*;
use crate::{angle_toward, dir_from_angle};

impl AimState {
    /// Point the aim from the ball toward a pointer target. DragTarget and
    /// ClickToAim also derive their launch power here.
    pub fn aim_at(&mut self, from: Vec2, target: Vec2, method: AimMethod) {
        self.angle = angle_toward(from, target);
        match method {
            AimMethod::DragTarget => {
                self.power = (from.distance(target) * DRAG_POWER_SCALE)
                    .clamp(POWER_MIN, POWER_MAX);
            }
            AimMethod::ClickToAim => self.power = CLICK_POWER,
            AimMethod::ChargeLever => {}
        }
    }

    /// Start pulling the lever (ChargeLever); resets power to the floor
    pub fn begin_charge(&mut self) {
        if !self.charging {
            self.charging = true;
            self.power = POWER_MIN;
        }
    }

    /// One tick of lever pull; saturates at POWER_MAX
    pub fn charge_tick(&mut self) {
        if self.charging {
            self.power = (self.power + CHARGE_RATE).min(POWER_MAX);
        }
    }

    /// Drop back to the resting state after a launch or reset
    pub fn release(&mut self) {
        self.charging = false;
        self.power = POWER_MIN;
    }

    /// Launch velocity for the current aim. `deviation` is the pre-sampled
    /// angle perturbation from the difficulty tier.
    pub fn launch_velocity(&self, speed_mult: f32, deviation: f32) -> Vec2 {
        let speed = self.power.clamp(POWER_MIN, POWER_MAX) * speed_mult;
        dir_from_angle(self.angle + deviation) * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_builds_and_saturates() {
        let mut aim = AimState::default();
        aim.begin_charge();
        assert_eq!(aim.power, POWER_MIN);
        for _ in 0..10 {
            aim.charge_tick();
        }
        assert!(aim.power > POWER_MIN);
        // Way past the cap
        for _ in 0..10_000 {
            aim.charge_tick();
        }
        assert_eq!(aim.power, POWER_MAX);
    }

    #[test]
    fn test_charge_ignored_unless_pulling() {
        let mut aim = AimState::default();
        aim.charge_tick();
        assert_eq!(aim.power, POWER_MIN);
    }

    #[test]
    fn test_drag_power_clamped() {
        let mut aim = AimState::default();
        let from = Vec2::new(300.0, 540.0);
        // Tiny drag clamps up to the floor
        aim.aim_at(from, from + Vec2::new(0.0, -1.0), AimMethod::DragTarget);
        assert_eq!(aim.power, POWER_MIN);
        // Huge drag clamps down to the cap
        aim.aim_at(from, from + Vec2::new(0.0, -5000.0), AimMethod::DragTarget);
        assert_eq!(aim.power, POWER_MAX);
    }

    #[test]
    fn test_click_uses_fixed_power() {
        let mut aim = AimState::default();
        let from = Vec2::new(300.0, 540.0);
        aim.aim_at(from, Vec2::new(300.0, 120.0), AimMethod::ClickToAim);
        assert_eq!(aim.power, CLICK_POWER);
    }

    #[test]
    fn test_launch_velocity_magnitude_and_direction() {
        let mut aim = AimState::default();
        let from = Vec2::new(300.0, 540.0);
        aim.aim_at(from, Vec2::new(300.0, 120.0), AimMethod::ClickToAim);
        let vel = aim.launch_velocity(1.0, 0.0);
        assert!((vel.length() - CLICK_POWER).abs() < 1e-4);
        // Straight up
        assert!(vel.x.abs() < 1e-4);
        assert!(vel.y < 0.0);
    }

    #[test]
    fn test_throw_speed_scales_velocity() {
        let mut aim = AimState::default();
        aim.power = 20.0;
        let slow = aim.launch_velocity(0.8, 0.0).length();
        let fast = aim.launch_velocity(1.25, 0.0).length();
        assert!((slow - 16.0).abs() < 1e-4);
        assert!((fast - 25.0).abs() < 1e-4);
    }
}
