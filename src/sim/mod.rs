//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (row-major over the brick grid)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, WallHits, ball_brick_collision, reflect_velocity};
pub use rect::Rect;
pub use state::{Ball, BrickGrid, GameEvent, GamePhase, GameState, Paddle, launch_velocity};
pub use tick::{Command, TickInput, apply_command, tick};
