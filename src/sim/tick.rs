//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::{ball_fell_out, resolve_bricks, resolve_paddle, resolve_walls};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Target paddle center x (from the pointer), in world units
    pub target_x: Option<f32>,
    /// Idle/demo mode - the paddle follows the ball
    pub autopilot: bool,
}

/// Discrete player commands, applied between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Playing <-> Paused
    TogglePause,
    /// Start a fresh game from any phase
    Reset,
}

/// Apply a player command to the state machine
pub fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::TogglePause => match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused at tick {}", state.time_ticks);
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed at tick {}", state.time_ticks);
            }
            // Terminal phases only leave via Reset
            GamePhase::Won | GamePhase::Lost => {}
        },
        Command::Reset => state.reset(),
    }
}

/// Advance the game state by one fixed timestep
///
/// Order within a tick is fixed: paddle, ball integration, walls, bottom
/// edge, paddle bounce, bricks. A life loss ends the tick early so the same
/// step can never also score a brick.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Paused, Won and Lost all freeze the simulation
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    // Update paddle position
    let target = if input.autopilot {
        Some(state.ball.rect.center_x())
    } else {
        input.target_x
    };
    if let Some(x) = target {
        state.paddle.center_on(x);
    }

    // Constant-velocity Euler step
    state.ball.rect.translate(state.ball.vel * dt);

    let walls = resolve_walls(&mut state.ball, WINDOW_WIDTH);
    for _ in 0..walls.count() {
        state.events.push(GameEvent::WallBounce);
    }

    if ball_fell_out(&state.ball, WINDOW_HEIGHT) {
        lose_life(state);
        return;
    }

    if resolve_paddle(&mut state.ball, &state.paddle) {
        state.events.push(GameEvent::PaddleBounce);
    }

    if let Some((row, col)) = resolve_bricks(&mut state.ball, &mut state.bricks) {
        state.score += BRICK_SCORE;
        state.events.push(GameEvent::BrickBroken { row, col });
        log::debug!(
            "Brick ({}, {}) broken, score {}, {} left",
            row,
            col,
            state.score,
            state.bricks.alive_count()
        );

        if state.bricks.is_cleared() {
            state.phase = GamePhase::Won;
            state.events.push(GameEvent::Won);
            log::info!("All bricks cleared! Final score {}", state.score);
        }
    }
}

fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::LifeLost {
        lives_left: state.lives,
    });

    if state.lives == 0 {
        state.phase = GamePhase::Lost;
        state.events.push(GameEvent::Lost);
        log::info!("Game over, final score {}", state.score);
    } else {
        state.respawn();
        log::debug!("Life lost, {} remaining", state.lives);
    }
}
