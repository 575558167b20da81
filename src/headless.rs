//! Headless autopilot runs
//!
//! Drives the simulation without a terminal at exactly one tick per frame,
//! restarting finished rounds, and reports where it ended up.

use serde::Serialize;

use crate::audio::AudioManager;
use crate::consts::SIM_DT;
use crate::driver::{FrameDriver, FrameInput};
use crate::sim::{Command, GamePhase, GameState};

/// Final state of a headless run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub seed: u64,
    /// Simulation ticks actually run
    pub ticks: u64,
    /// Rounds started, including the first
    pub rounds: u32,
    pub score: u32,
    pub lives: u8,
    pub phase: GamePhase,
    pub bricks_left: usize,
}

/// Run `state` under autopilot until `ticks` more simulation ticks have run.
///
/// Frames that apply a reset run no tick, so the loop counts ticks rather
/// than frames.
pub fn run(mut state: GameState, ticks: u64) -> Summary {
    let mut driver = FrameDriver::new();
    driver.set_autopilot(true);
    let mut audio = AudioManager::silent();
    let mut rounds = 1;
    let target = state.time_ticks.saturating_add(ticks);

    while state.time_ticks < target {
        let mut input = FrameInput::default();
        if state.phase.is_terminal() {
            log::info!("Round over ({:?}), score {}", state.phase, state.score);
            input.commands.push(Command::Reset);
            rounds += 1;
        } else if state.phase == GamePhase::Paused {
            input.commands.push(Command::TogglePause);
        }
        driver.frame(&mut state, &input, SIM_DT, &mut audio);
    }

    Summary {
        seed: state.seed,
        ticks: state.time_ticks,
        rounds,
        score: state.score,
        lives: state.lives,
        phase: state.phase,
        bricks_left: state.bricks.alive_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_requested_ticks() {
        let summary = run(GameState::new(5), 600);
        assert_eq!(summary.ticks, 600);
        assert_eq!(summary.seed, 5);
    }

    #[test]
    fn test_reset_frames_do_not_count_as_ticks() {
        let mut state = GameState::new(11);
        state.phase = GamePhase::Lost;
        state.lives = 0;

        let summary = run(state, 10);
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.rounds, 2);
        assert_eq!(summary.lives, 3);
        assert_eq!(summary.phase, GamePhase::Playing);
    }

    #[test]
    fn test_paused_state_is_resumed() {
        let mut state = GameState::new(3);
        state.phase = GamePhase::Paused;
        assert_eq!(run(state, 5).ticks, 5);
    }

    #[test]
    fn test_same_seed_same_summary() {
        assert_eq!(run(GameState::new(77), 2000), run(GameState::new(77), 2000));
    }
}
