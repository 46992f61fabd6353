//! Per-round configuration: difficulty tiers, map themes, throw speed,
//! aim method and the timed/bomb toggles.
//!
//! Selected in the menu before a round starts and snapshotted into the
//! `GameState` so a saved round replays with the options it began with.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_HZ;

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Static per-tier tuning
#[derive(Debug, Clone, Copy)]
pub struct DifficultySettings {
    pub ball_radius: f32,
    pub cup_radius: f32,
    /// Random launch-angle perturbation, uniform in +/- this many radians
    pub aim_deviation: f32,
    pub cup_count: u32,
    pub cup_spacing: f32,
}

impl Difficulty {
    pub fn settings(&self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                ball_radius: 14.0,
                cup_radius: 32.0,
                aim_deviation: 0.0,
                cup_count: 3,
                cup_spacing: 10.0,
            },
            Difficulty::Normal => DifficultySettings {
                ball_radius: 12.0,
                cup_radius: 28.0,
                aim_deviation: 0.02,
                cup_count: 6,
                cup_spacing: 8.0,
            },
            Difficulty::Hard => DifficultySettings {
                ball_radius: 10.0,
                cup_radius: 22.0,
                aim_deviation: 0.05,
                cup_count: 10,
                cup_spacing: 6.0,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Cosmetic map themes (background ornaments and palette only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MapTheme {
    #[default]
    Hearts,
    Stars,
    Bows,
}

impl MapTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapTheme::Hearts => "Hearts",
            MapTheme::Stars => "Stars",
            MapTheme::Bows => "Bows",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hearts" => Some(MapTheme::Hearts),
            "stars" => Some(MapTheme::Stars),
            "bows" => Some(MapTheme::Bows),
            _ => None,
        }
    }
}

/// Throw-speed tiers, a straight multiplier on launch velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThrowSpeed {
    Gentle,
    #[default]
    Normal,
    Wild,
}

impl ThrowSpeed {
    pub fn multiplier(&self) -> f32 {
        match self {
            ThrowSpeed::Gentle => 0.8,
            ThrowSpeed::Normal => 1.0,
            ThrowSpeed::Wild => 1.25,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThrowSpeed::Gentle => "Gentle",
            ThrowSpeed::Normal => "Normal",
            ThrowSpeed::Wild => "Wild",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gentle" | "slow" => Some(ThrowSpeed::Gentle),
            "normal" => Some(ThrowSpeed::Normal),
            "wild" | "fast" => Some(ThrowSpeed::Wild),
            _ => None,
        }
    }
}

/// How pointer/keyboard input becomes a launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AimMethod {
    /// Pointer-down picks a target point; power scales with its distance
    DragTarget,
    /// Pointer aims, holding the charge key builds power, release launches
    #[default]
    ChargeLever,
    /// Pointer-down aims at the click and launches at fixed power
    ClickToAim,
}

impl AimMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AimMethod::DragTarget => "DragTarget",
            AimMethod::ChargeLever => "ChargeLever",
            AimMethod::ClickToAim => "ClickToAim",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dragtarget" | "drag" => Some(AimMethod::DragTarget),
            "chargelever" | "lever" | "charge" => Some(AimMethod::ChargeLever),
            "clicktoaim" | "click" => Some(AimMethod::ClickToAim),
            _ => None,
        }
    }
}

/// Default timed-round length in seconds
pub const TIMED_ROUND_SECS: u32 = 60;

/// Everything the menu decides before a round starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub difficulty: Difficulty,
    pub theme: MapTheme,
    pub throw_speed: ThrowSpeed,
    pub aim_method: AimMethod,
    /// Countdown length in seconds; None plays untimed
    pub timed_secs: Option<u32>,
    /// Spawn the patrolling bomb obstacle
    pub bomb: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            theme: MapTheme::Hearts,
            throw_speed: ThrowSpeed::Normal,
            aim_method: AimMethod::ChargeLever,
            timed_secs: None,
            bomb: false,
        }
    }
}

impl RoundConfig {
    /// Countdown length in ticks, if this round is timed
    pub fn timer_ticks(&self) -> Option<u32> {
        self.timed_secs.map(|secs| secs * TICK_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_roundtrip() {
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("nope"), None);
    }

    #[test]
    fn test_harder_tiers_shrink_targets() {
        let easy = Difficulty::Easy.settings();
        let hard = Difficulty::Hard.settings();
        assert!(hard.cup_radius < easy.cup_radius);
        assert!(hard.cup_count > easy.cup_count);
        assert!(hard.aim_deviation > easy.aim_deviation);
    }

    #[test]
    fn test_timer_ticks() {
        let mut config = RoundConfig::default();
        assert_eq!(config.timer_ticks(), None);
        config.timed_secs = Some(TIMED_ROUND_SECS);
        assert_eq!(config.timer_ticks(), Some(TIMED_ROUND_SECS * TICK_HZ));
    }
}
