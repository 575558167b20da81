//! Per-frame snapshot handed to the renderer
//!
//! Built once per rendered frame from `GameState`, however many ticks ran.

use crate::sim::{GamePhase, GameState, Rect};

/// 8-bit RGB color
pub type Rgb = [u8; 3];

/// Colors for game elements
pub mod colors {
    use super::Rgb;

    pub const BACKGROUND: Rgb = [10, 10, 15];
    pub const FOREGROUND: Rgb = [200, 220, 240];
    pub const PADDLE: Rgb = [200, 200, 200];
    pub const BALL: Rgb = [250, 250, 250];
}

/// Brick color for a grid row (row 0 = top)
pub fn brick_color(row: usize) -> Rgb {
    let r = row as i32;
    [
        (40 + r * 35).clamp(0, 255) as u8,
        (120 + r * 15).min(255) as u8,
        (180 - r * 20).max(0) as u8,
    ]
}

/// Scale a color toward black, `factor` in 0.0 - 1.0
pub fn shade(color: Rgb, factor: f32) -> Rgb {
    color.map(|c| (c as f32 * factor.clamp(0.0, 1.0)).round() as u8)
}

/// Message shown over the playfield for a phase
pub fn overlay_message(phase: GamePhase) -> Option<&'static str> {
    match phase {
        GamePhase::Playing => None,
        GamePhase::Paused => Some("PAUSED - Press P to resume"),
        GamePhase::Won => Some("YOU WIN! Press R to play again"),
        GamePhase::Lost => Some("GAME OVER - Press R to retry"),
    }
}

/// Controls reminder
pub const HINT: &str = "Mouse/arrows to move | P=Pause | R=Reset | M=Mute | Q=Quit";

/// One alive brick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickView {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    pub color: Rgb,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub paddle: Rect,
    pub ball: Rect,
    pub bricks: Vec<BrickView>,
    pub score: u32,
    pub lives: u8,
    pub overlay: Option<&'static str>,
    /// Status line, e.g. "Score: 40  Lives: 2"
    pub hud: String,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let bricks = state
            .bricks
            .iter_alive()
            .map(|(row, col, rect)| BrickView {
                row,
                col,
                rect,
                color: brick_color(row),
            })
            .collect();

        Self {
            paddle: state.paddle.rect,
            ball: state.ball.rect,
            bricks,
            score: state.score,
            lives: state.lives,
            overlay: overlay_message(state.phase),
            hud: format!("Score: {}  Lives: {}", state.score, state.lives),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_brick_colors_by_row() {
        assert_eq!(brick_color(0), [40, 120, 180]);
        assert_eq!(brick_color(5), [215, 195, 80]);
        // Saturates instead of wrapping
        assert_eq!(brick_color(10), [255, 255, 0]);
    }

    #[test]
    fn test_shade() {
        assert_eq!(shade([200, 100, 0], 0.5), [100, 50, 0]);
        assert_eq!(shade([200, 100, 0], 2.0), [200, 100, 0]);
    }

    #[test]
    fn test_capture_lists_alive_bricks() {
        let mut state = GameState::new(1);
        state.bricks.kill(0, 0);
        state.score = 10;

        let view = FrameView::capture(&state);
        assert_eq!(view.bricks.len(), BRICK_ROWS * BRICK_COLS - 1);
        assert_eq!((view.bricks[0].row, view.bricks[0].col), (0, 1));
        assert_eq!(view.bricks[0].color, brick_color(0));
        assert_eq!(view.hud, "Score: 10  Lives: 3");
        assert_eq!(view.overlay, None);
    }

    #[test]
    fn test_overlay_per_phase() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::Paused;
        assert_eq!(
            FrameView::capture(&state).overlay,
            Some("PAUSED - Press P to resume")
        );
        state.phase = GamePhase::Lost;
        assert!(FrameView::capture(&state).overlay.unwrap().starts_with("GAME OVER"));
        state.phase = GamePhase::Won;
        assert!(FrameView::capture(&state).overlay.unwrap().starts_with("YOU WIN"));
    }
}
