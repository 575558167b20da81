//! Platform abstraction layer
//!
//! Translates terminal events into the game's input vocabulary: a pointer
//! position in world units plus discrete commands. Mouse motion drives the
//! paddle directly; arrow keys nudge it.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::driver::FrameInput;
use crate::renderer::terminal::Viewport;
use crate::sim::{Command, GamePhase, GameState};

/// World units the paddle moves per arrow key press
pub const KEY_STEP: f32 = 40.0;

/// Whether the frontend loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Stateful mapping from terminal events to frame input
#[derive(Debug, Clone)]
pub struct InputMapper {
    viewport: Viewport,
}

impl InputMapper {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fold one terminal event into this frame's input
    pub fn handle(&mut self, event: &Event, state: &GameState, frame: &mut FrameInput) -> Control {
        match event {
            Event::Key(key) => self.handle_key(key, state, frame),
            Event::Mouse(mouse) => {
                if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                    frame.pointer_x = Some(self.viewport.world_x(mouse.column));
                }
                Control::Continue
            }
            Event::Resize(cols, rows) => {
                self.viewport = Viewport::new(*cols, *rows);
                log::debug!("Terminal resized to {}x{}", cols, rows);
                Control::Continue
            }
            Event::FocusLost => {
                // Auto-pause when the terminal loses focus
                if state.phase == GamePhase::Playing && !frame.commands.contains(&Command::TogglePause)
                {
                    frame.commands.push(Command::TogglePause);
                    log::info!("Auto-paused (focus lost)");
                }
                Control::Continue
            }
            _ => Control::Continue,
        }
    }

    fn handle_key(&self, key: &KeyEvent, state: &GameState, frame: &mut FrameInput) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }

        // Movement keys auto-repeat; everything else fires on press only
        let nudge = |frame: &mut FrameInput, delta: f32| {
            let from = frame
                .pointer_x
                .unwrap_or_else(|| state.paddle.rect.center_x());
            frame.pointer_x = Some(from + delta);
        };

        match key.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => nudge(frame, -KEY_STEP),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => nudge(frame, KEY_STEP),
            _ if key.kind == KeyEventKind::Repeat => {}
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit;
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Control::Quit,
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
                frame.commands.push(Command::TogglePause);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => frame.commands.push(Command::Reset),
            // Two presses in one frame cancel out
            KeyCode::Char('m') | KeyCode::Char('M') => frame.toggle_mute = !frame.toggle_mute,
            _ => {}
        }
        Control::Continue
    }
}
