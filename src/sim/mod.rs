//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod aim;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{FloorOutcome, circles_overlap, resolve_floor, resolve_walls};
pub use state::{AimState, Ball, Bomb, Cup, GamePhase, GameState, RngState, build_pyramid};
pub use tick::{TickInput, tick};
