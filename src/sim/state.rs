//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in `GameState`; nothing is global.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen until the player toggles pause again
    Paused,
    /// Every brick is gone (terminal until reset)
    Won,
    /// Out of lives (terminal until reset)
    Lost,
}

impl GamePhase {
    /// Won and Lost only leave via an explicit reset
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new game started (initial start or reset)
    RoundStart,
    /// Ball bounced off the left, right or top edge
    WallBounce,
    /// Ball bounced off the paddle
    PaddleBounce,
    /// A brick was destroyed
    BrickBroken { row: usize, col: usize },
    /// Ball fell past the bottom edge
    LifeLost { lives_left: u8 },
    /// Last brick destroyed
    Won,
    /// Last life lost
    Lost,
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                ((WINDOW_WIDTH - PADDLE_WIDTH) / 2.0).floor(),
                PADDLE_Y,
                PADDLE_WIDTH,
                PADDLE_HEIGHT,
            ),
        }
    }
}

impl Paddle {
    /// Center the paddle on `x`, keeping it fully on screen
    pub fn center_on(&mut self, x: f32) {
        let left = (x - self.rect.w / 2.0).clamp(0.0, WINDOW_WIDTH - self.rect.w);
        self.rect.set_left(left);
    }
}

/// The ball: a square bounding box plus velocity in units/second.
/// Positive `vel.y` moves down the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub rect: Rect,
    pub vel: Vec2,
}

impl Ball {
    /// Ball at the round-start spot with the given launch velocity
    pub fn spawn(vel: Vec2) -> Self {
        Self {
            rect: Rect::new(
                ((WINDOW_WIDTH - BALL_SIZE) / 2.0).floor(),
                (WINDOW_HEIGHT / 2.0).floor() + BALL_SPAWN_DROP,
                BALL_SIZE,
                BALL_SIZE,
            ),
            vel,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Draw a launch velocity: 45-90 degrees off horizontal, random horizontal
/// direction, always upward, fixed speed.
pub fn launch_velocity(rng: &mut Pcg32) -> Vec2 {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    let angle = FRAC_PI_4 + rng.random::<f32>() * (FRAC_PI_2 - FRAC_PI_4);
    let dir = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
    Vec2::new(
        angle.cos() * BALL_SPEED * dir,
        -(angle.sin() * BALL_SPEED).abs(),
    )
}

/// Alive flags for the brick grid. Row 0 is the top row.
///
/// Bricks store no geometry; their rectangles come from the grid index and
/// the layout constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickGrid {
    alive: [[bool; BRICK_COLS]; BRICK_ROWS],
}

impl Default for BrickGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl BrickGrid {
    /// A full grid, every brick alive
    pub fn new() -> Self {
        Self {
            alive: [[true; BRICK_COLS]; BRICK_ROWS],
        }
    }

    /// Screen rectangle of the brick at (row, col)
    pub fn rect_of(row: usize, col: usize) -> Rect {
        Rect::new(
            BRICK_LEFT + col as f32 * (BRICK_WIDTH + BRICK_GAP),
            BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP),
            BRICK_WIDTH,
            BRICK_HEIGHT,
        )
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.alive[row][col]
    }

    /// Mark a brick dead. Returns false if it was already dead.
    pub fn kill(&mut self, row: usize, col: usize) -> bool {
        std::mem::replace(&mut self.alive[row][col], false)
    }

    pub fn alive_count(&self) -> usize {
        self.alive.iter().flatten().filter(|&&b| b).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.alive.iter().flatten().all(|&b| !b)
    }

    /// Alive bricks in row-major order (row 0 first, then by column)
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, usize, Rect)> + '_ {
        (0..BRICK_ROWS).flat_map(move |row| {
            (0..BRICK_COLS)
                .filter(move |&col| self.alive[row][col])
                .map(move |col| (row, col, Self::rect_of(row, col)))
        })
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Launch-angle RNG
    pub rng: Pcg32,
    /// Player lives
    pub lives: u8,
    /// Score
    pub score: u32,
    /// Simulation tick counter (ticks actually simulated)
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Player paddle
    pub paddle: Paddle,
    /// The ball
    pub ball: Ball,
    /// Brick grid
    pub bricks: BrickGrid,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball = Ball::spawn(launch_velocity(&mut rng));
        Self {
            seed,
            rng,
            lives: START_LIVES,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            paddle: Paddle::default(),
            ball,
            bricks: BrickGrid::new(),
            events: vec![GameEvent::RoundStart],
        }
    }

    /// Full restart: bricks, lives, score and phase. The RNG stream carries
    /// on so consecutive games get different launches.
    pub fn reset(&mut self) {
        self.bricks = BrickGrid::new();
        self.lives = START_LIVES;
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.respawn();
        self.events.push(GameEvent::RoundStart);
        log::info!("Game reset (seed {})", self.seed);
    }

    /// Put paddle and ball back at the round-start layout with a fresh
    /// launch. Bricks and score are untouched.
    pub fn respawn(&mut self) {
        self.paddle = Paddle::default();
        self.ball = Ball::spawn(launch_velocity(&mut self.rng));
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
