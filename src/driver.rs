//! Frame driver
//!
//! Turns variable wall-clock frame times into whole fixed simulation ticks.
//! Each rendered frame: absorb elapsed time, apply the frame's commands, run
//! zero or more ticks, then hand the resulting events to audio.

use crate::audio::AudioManager;
use crate::consts::*;
use crate::sim::{Command, GameState, TickInput, apply_command, tick};

/// Everything the input collaborator produced for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Latest pointer x in world units, if it moved this frame
    pub pointer_x: Option<f32>,
    /// Discrete commands, applied in order before any tick
    pub commands: Vec<Command>,
    /// Flip audio mute
    pub toggle_mute: bool,
}

/// What happened while driving one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Fixed time slices consumed this frame. Slices are consumed while
    /// Paused, Won or Lost too, when `tick` leaves the state untouched.
    pub steps: u32,
    /// True if the substep cap was hit and leftover time was thrown away
    pub dropped_backlog: bool,
}

/// Number of frames the FPS estimate averages over
const FPS_WINDOW: usize = 60;

/// Fixed-timestep driver state
#[derive(Debug, Clone)]
pub struct FrameDriver {
    accumulator: f32,
    max_substeps: u32,
    input: TickInput,
    // FPS tracking
    frame_times: [f32; FPS_WINDOW],
    frame_index: usize,
    frames_seen: usize,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
            input: TickInput::default(),
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frames_seen: 0,
        }
    }

    /// Let the paddle follow the ball instead of the pointer
    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    /// Time carried over to the next frame (always below one tick after a frame)
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Average frames per second over the last `FPS_WINDOW` frames
    pub fn fps(&self) -> u32 {
        let n = self.frames_seen.min(FPS_WINDOW);
        let total: f32 = self.frame_times[..n].iter().sum();
        if n == 0 || total <= 0.0 {
            return 0;
        }
        (n as f32 / total).round() as u32
    }

    /// Drive one rendered frame
    pub fn frame(
        &mut self,
        state: &mut GameState,
        input: &FrameInput,
        frame_dt: f32,
        audio: &mut AudioManager,
    ) -> FrameReport {
        // NaN would poison the accumulator for good
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        for &command in &input.commands {
            apply_command(state, command);
            if command == Command::Reset {
                self.accumulator = 0.0;
            }
        }

        if input.toggle_mute {
            audio.set_muted(!audio.is_muted());
            log::info!("Audio {}", if audio.is_muted() { "muted" } else { "unmuted" });
        }

        // The pointer only reports movement; keep the last known position
        if input.pointer_x.is_some() {
            self.input.target_x = input.pointer_x;
        }

        let mut report = FrameReport::default();
        while self.accumulator >= SIM_DT && report.steps < self.max_substeps {
            tick(state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            report.steps += 1;
        }

        if self.accumulator >= SIM_DT {
            log::debug!(
                "Frame fell behind, dropping {:.1} ms of simulation",
                (self.accumulator - self.accumulator % SIM_DT) * 1000.0
            );
            self.accumulator %= SIM_DT;
            report.dropped_backlog = true;
        }

        for event in state.drain_events() {
            audio.play_event(&event);
        }
        audio.advance(dt);

        self.frame_times[self.frame_index] = dt;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames_seen += 1;

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn run(driver: &mut FrameDriver, state: &mut GameState, input: &FrameInput, dt: f32) -> FrameReport {
        driver.frame(state, input, dt, &mut AudioManager::silent())
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        let idle = FrameInput::default();

        // Half a tick: nothing runs yet
        assert_eq!(run(&mut driver, &mut state, &idle, SIM_DT * 0.5).steps, 0);
        // The second half completes one tick
        assert_eq!(run(&mut driver, &mut state, &idle, SIM_DT * 0.6).steps, 1);
        assert_eq!(state.time_ticks, 1);
        assert!(driver.accumulator() < SIM_DT);
    }

    #[test]
    fn test_slow_frame_runs_several_ticks() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        let report = run(&mut driver, &mut state, &FrameInput::default(), SIM_DT * 3.5);
        assert_eq!(report.steps, 3);
        assert!(!report.dropped_backlog);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        // A two second stall is clamped and capped, never 120 catch-up ticks
        let report = run(&mut driver, &mut state, &FrameInput::default(), 2.0);
        assert_eq!(report.steps, MAX_SUBSTEPS);
        assert!(report.dropped_backlog);
        assert!(driver.accumulator() < SIM_DT);

        // Next normal frame behaves normally
        let report = run(&mut driver, &mut state, &FrameInput::default(), SIM_DT);
        assert!(report.steps <= 1);
        assert!(!report.dropped_backlog);
    }

    #[test]
    fn test_pointer_is_sticky() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        let moved = FrameInput {
            pointer_x: Some(120.0),
            ..Default::default()
        };
        run(&mut driver, &mut state, &moved, SIM_DT);
        assert_eq!(state.paddle.rect.center_x(), 120.0);

        // No movement reported: paddle stays put
        run(&mut driver, &mut state, &FrameInput::default(), SIM_DT);
        assert_eq!(state.paddle.rect.center_x(), 120.0);
    }

    #[test]
    fn test_commands_apply_before_ticks() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        let pause = FrameInput {
            commands: vec![Command::TogglePause],
            ..Default::default()
        };
        let report = run(&mut driver, &mut state, &pause, SIM_DT * 2.0);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.time_ticks, 0);
        // Ticks are consumed even while paused, so unpausing doesn't burst
        assert_eq!(report.steps, 2);

        let resume = pause.clone();
        run(&mut driver, &mut state, &resume, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_reset_clears_backlog() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        state.phase = GamePhase::Lost;
        let reset = FrameInput {
            commands: vec![Command::Reset],
            ..Default::default()
        };
        let report = run(&mut driver, &mut state, &reset, SIM_DT * 4.0);
        assert_eq!(report.steps, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_events_are_drained() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        assert!(!state.events.is_empty());
        run(&mut driver, &mut state, &FrameInput::default(), SIM_DT);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_same_frames_same_trajectory() {
        let frames: Vec<(FrameInput, f32)> = (0..600)
            .map(|i| {
                let input = FrameInput {
                    pointer_x: (i % 7 == 0).then_some((i * 13 % 800) as f32),
                    commands: if i == 300 { vec![Command::Reset] } else { vec![] },
                    toggle_mute: false,
                };
                // Jittery frame times
                (input, 0.010 + (i % 5) as f32 * 0.003)
            })
            .collect();

        let play = || {
            let mut driver = FrameDriver::new();
            let mut state = GameState::new(2024);
            for (input, dt) in &frames {
                run(&mut driver, &mut state, input, *dt);
            }
            serde_json::to_string(&state).unwrap()
        };

        assert_eq!(play(), play());
    }

    #[test]
    fn test_non_finite_frame_time_is_ignored() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        let idle = FrameInput::default();

        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(run(&mut driver, &mut state, &idle, bad).steps, 0);
            assert!(driver.accumulator().is_finite());
        }

        let mut ticks = 0;
        for _ in 0..60 {
            ticks += run(&mut driver, &mut state, &idle, SIM_DT).steps;
        }
        assert_eq!(ticks, 60);
        assert_eq!(state.time_ticks, 60);
    }

    #[test]
    fn test_paused_frame_consumes_slices_without_ticking() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        apply_command(&mut state, Command::TogglePause);

        let report = run(&mut driver, &mut state, &FrameInput::default(), SIM_DT * 3.0);
        assert_eq!(report.steps, 3);
        assert_eq!(state.time_ticks, 0);
        assert!(driver.accumulator() < SIM_DT);
    }

    #[test]
    fn test_toggle_mute() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        let mut audio = AudioManager::silent();
        let mute = FrameInput {
            toggle_mute: true,
            ..Default::default()
        };

        driver.frame(&mut state, &mute, SIM_DT, &mut audio);
        assert!(audio.is_muted());
        driver.frame(&mut state, &FrameInput::default(), SIM_DT, &mut audio);
        assert!(audio.is_muted());
        driver.frame(&mut state, &mute, SIM_DT, &mut audio);
        assert!(!audio.is_muted());
    }

    #[test]
    fn test_fps_estimate() {
        let mut driver = FrameDriver::new();
        let mut state = GameState::new(1);
        assert_eq!(driver.fps(), 0);
        for _ in 0..30 {
            run(&mut driver, &mut state, &FrameInput::default(), 0.02);
        }
        assert_eq!(driver.fps(), 50);
    }
}
