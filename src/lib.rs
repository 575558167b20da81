//! Brick Breaker - a fixed-timestep Breakout
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, game state)
//! - `driver`: Frame driver turning wall-clock time into fixed ticks
//! - `headless`: Autopilot runs without a terminal
//! - `audio`: Sound cues and the tone scheduler
//! - `renderer`: Per-frame view snapshot and the terminal renderer
//! - `platform`: Terminal input translation
//! - `settings`: Frontend preferences

pub mod audio;
pub mod driver;
pub mod headless;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::{FrameDriver, FrameInput, FrameReport};
pub use settings::{AudioMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock frame the driver will absorb (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Playfield dimensions
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 14.0;
    pub const PADDLE_Y: f32 = 560.0;

    /// Ball defaults (square bounding box)
    pub const BALL_SIZE: f32 = 10.0;
    pub const BALL_SPEED: f32 = 320.0;
    /// Ball spawn offset below the vertical center
    pub const BALL_SPAWN_DROP: f32 = 60.0;

    /// Brick grid layout
    pub const BRICK_ROWS: usize = 6;
    pub const BRICK_COLS: usize = 10;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 22.0;
    pub const BRICK_LEFT: f32 = 65.0;
    pub const BRICK_TOP: f32 = 80.0;
    pub const BRICK_GAP: f32 = 6.0;

    /// Points per broken brick
    pub const BRICK_SCORE: u32 = 10;
    /// Lives at the start of a game
    pub const START_LIVES: u8 = 3;

    /// Distance a resolved ball is pushed clear of the surface it hit
    pub const SEPARATION: f32 = 1.0;
    /// Paddle deflection spread: launch angle = (u - 0.5) * PADDLE_DEFLECT
    pub const PADDLE_DEFLECT: f32 = std::f32::consts::PI / 1.2;
}
