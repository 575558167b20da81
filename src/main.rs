//! Brick Breaker entry point
//!
//! Parses the command line, then either runs the interactive terminal game or
//! a headless autopilot session that prints a JSON summary.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use brick_breaker::audio::AudioManager;
use brick_breaker::headless;
use brick_breaker::platform::{Control, InputMapper};
use brick_breaker::renderer::{FrameView, TerminalRenderer, Viewport, rasterize};
use brick_breaker::sim::GameState;
use brick_breaker::{FrameDriver, FrameInput, Settings};

#[derive(Parser, Debug)]
#[command(name = "brick-breaker", about = "Fixed-timestep Breakout in the terminal")]
struct Cli {
    /// RNG seed for launch angles (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Let the paddle follow the ball
    #[arg(long)]
    autopilot: bool,

    /// Run this many simulation ticks under autopilot without a terminal,
    /// then print a JSON summary
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.autopilot |= cli.autopilot;

    let seed = cli.seed.unwrap_or_else(time_seed);
    log::info!("Game initialized with seed: {}", seed);

    match cli.headless {
        Some(ticks) => run_headless(seed, ticks),
        None => run_terminal(seed, &settings),
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn run_headless(seed: u64, ticks: u64) -> anyhow::Result<()> {
    let summary = headless::run(GameState::new(seed), ticks);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Puts the terminal into game mode and restores it on drop, including on
/// error and panic unwinding
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            Hide,
            EnableMouseCapture,
            EnableFocusChange
        )
        .context("setting up terminal")?;
        Ok(Self { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            DisableFocusChange,
            DisableMouseCapture,
            Show,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn run_terminal(seed: u64, settings: &Settings) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size().context("querying terminal size")?;
    let _guard = TerminalGuard::enter()?;

    let mut renderer = TerminalRenderer::new(io::stdout());
    let mut mapper = InputMapper::new(Viewport::new(cols, rows));
    let mut state = GameState::new(seed);
    let mut driver = FrameDriver::new();
    driver.set_autopilot(settings.autopilot);
    let mut audio = AudioManager::for_mode(settings.audio);
    audio.set_master_volume(settings.master_volume);
    log::info!("Audio: {}", settings.audio.as_str());

    let frame_budget = settings.frame_duration();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        let mut input = FrameInput::default();
        while event::poll(Duration::ZERO).context("polling input")? {
            let ev = event::read().context("reading input")?;
            if mapper.handle(&ev, &state, &mut input) == Control::Quit {
                log::info!("Quit with score {}", state.score);
                return Ok(());
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        let report = driver.frame(&mut state, &input, dt, &mut audio);
        if report.dropped_backlog {
            log::warn!("Simulation backlog dropped after {} steps", report.steps);
        }

        let fps = settings.show_fps.then(|| driver.fps());
        let canvas = rasterize(&FrameView::capture(&state), mapper.viewport(), fps);
        renderer.draw(&canvas).context("drawing frame")?;

        if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}
