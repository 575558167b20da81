//! Audio cues and the tone scheduler
//!
//! The simulation only reports events. Here they become short synthesized
//! tones, queued with a delay so multi-tone cues (the round-start jingle)
//! play in sequence without a platform timer. Playback goes through an
//! [`AudioSink`]; a sink that fails is dropped and the game carries on
//! silently.

use std::io::{self, Write};

use crate::settings::AudioMode;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a side or the top wall
    WallBounce,
    /// Ball hits paddle
    PaddleBounce,
    /// Brick destroyed
    BrickBreak,
    /// Ball fell past the bottom
    LifeLost,
    /// Last brick cleared
    GameWon,
    /// New game started
    RoundStart,
}

/// A single decaying sine tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    pub duration_ms: u32,
    /// Peak amplitude, 0.0 - 1.0
    pub volume: f32,
}

impl Tone {
    pub const fn new(freq_hz: f32, duration_ms: u32, volume: f32) -> Self {
        Self {
            freq_hz,
            duration_ms,
            volume,
        }
    }
}

const WALL: Tone = Tone::new(700.0, 30, 0.35);
const PADDLE: Tone = Tone::new(900.0, 40, 0.4);
const BRICK: Tone = Tone::new(1200.0, 50, 0.45);
const LOSE: Tone = Tone::new(200.0, 180, 0.5);
const WIN: Tone = Tone::new(1500.0, 220, 0.5);
const START_LOW: Tone = Tone::new(600.0, 60, 0.4);
const START_HIGH: Tone = Tone::new(800.0, 60, 0.4);

/// Gap between the two round-start tones (seconds)
pub const JINGLE_STAGGER: f32 = 0.08;

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::RoundStart => Some(SoundEffect::RoundStart),
            GameEvent::WallBounce => Some(SoundEffect::WallBounce),
            GameEvent::PaddleBounce => Some(SoundEffect::PaddleBounce),
            GameEvent::BrickBroken { .. } => Some(SoundEffect::BrickBreak),
            GameEvent::LifeLost { .. } => Some(SoundEffect::LifeLost),
            GameEvent::Won => Some(SoundEffect::GameWon),
            // The final LifeLost cue already covers it
            GameEvent::Lost => None,
        }
    }

    /// Tones making up this cue, as (delay seconds, tone)
    pub fn tones(self) -> &'static [(f32, Tone)] {
        match self {
            SoundEffect::WallBounce => &[(0.0, WALL)],
            SoundEffect::PaddleBounce => &[(0.0, PADDLE)],
            SoundEffect::BrickBreak => &[(0.0, BRICK)],
            SoundEffect::LifeLost => &[(0.0, LOSE)],
            SoundEffect::GameWon => &[(0.0, WIN)],
            SoundEffect::RoundStart => &[(0.0, START_LOW), (JINGLE_STAGGER, START_HIGH)],
        }
    }
}

/// Something that can make a noise
pub trait AudioSink {
    /// Start playing a tone. Must not block.
    fn play(&mut self, tone: &Tone) -> io::Result<()>;

    /// Called once per frame after the frame's tones were handed over
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Swallows everything
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _tone: &Tone) -> io::Result<()> {
        Ok(())
    }
}

/// Logs each tone at debug level
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, tone: &Tone) -> io::Result<()> {
        log::debug!(
            "tone {:.0} Hz, {} ms, vol {:.2}",
            tone.freq_hz,
            tone.duration_ms,
            tone.volume
        );
        Ok(())
    }
}

/// Terminal bell. Rings at most once per frame however many tones are due.
pub struct BellSink<W: Write> {
    out: W,
    pending: bool,
}

impl<W: Write> BellSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for BellSink<W> {
    fn play(&mut self, _tone: &Tone) -> io::Result<()> {
        self.pending = true;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if std::mem::take(&mut self.pending) {
            self.out.write_all(b"\x07")?;
            self.out.flush()?;
        }
        Ok(())
    }
}

/// A tone waiting for its start time
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scheduled {
    at: f64,
    tone: Tone,
}

/// Queue of (delay, tone) pairs drained by the frame driver
#[derive(Debug, Default)]
pub struct AudioQueue {
    // f64 so frame-sized steps still register after days of uptime
    clock: f64,
    pending: Vec<Scheduled>,
}

impl AudioQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue every tone of a cue relative to now
    pub fn schedule(&mut self, effect: SoundEffect) {
        for &(delay, tone) in effect.tones() {
            self.pending.push(Scheduled {
                at: self.clock + delay as f64,
                tone,
            });
        }
    }

    /// Advance the clock and return the tones now due, in schedule order
    pub fn advance(&mut self, dt: f32) -> Vec<Tone> {
        self.clock += dt.max(0.0) as f64;
        let clock = self.clock;

        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.at <= clock {
                due.push(*s);
                false
            } else {
                true
            }
        });
        // Stable sort keeps same-time tones in the order they were queued
        due.sort_by(|a, b| a.at.total_cmp(&b.at));
        due.into_iter().map(|s| s.tone).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    queue: AudioQueue,
    master_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink: Some(sink),
            queue: AudioQueue::new(),
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Manager with no output at all
    pub fn silent() -> Self {
        Self {
            sink: None,
            queue: AudioQueue::new(),
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Build the sink for a settings mode
    pub fn for_mode(mode: AudioMode) -> Self {
        match mode {
            AudioMode::Off => Self::silent(),
            AudioMode::Log => Self::new(Box::new(LogSink)),
            AudioMode::Bell => Self::new(Box::new(BellSink::new(io::stdout()))),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// True while a sink is still attached
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Queue a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.sink.is_some() {
            self.queue.schedule(effect);
        }
    }

    /// Queue the cue for a simulation event
    pub fn play_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }

    /// Advance time and hand due tones to the sink
    pub fn advance(&mut self, dt: f32) {
        let due = self.queue.advance(dt);
        let vol = self.effective_volume();
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let mut result = Ok(());
        if vol > 0.0 {
            for tone in &due {
                let scaled = Tone {
                    volume: tone.volume * vol,
                    ..*tone
                };
                result = sink.play(&scaled);
                if result.is_err() {
                    break;
                }
            }
        }
        if result.is_ok() {
            result = sink.flush();
        }

        if let Err(e) = result {
            log::warn!("Audio output failed ({}), continuing without sound", e);
            self.sink = None;
            self.queue.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every tone it is given
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Tone>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, tone: &Tone) -> io::Result<()> {
            self.0.borrow_mut().push(*tone);
            Ok(())
        }
    }

    struct Broken;

    impl AudioSink for Broken {
        fn play(&mut self, _tone: &Tone) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "no device"))
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BrickBroken { row: 1, col: 2 }),
            Some(SoundEffect::BrickBreak)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Won),
            Some(SoundEffect::GameWon)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::Lost), None);
    }

    #[test]
    fn test_round_start_jingle_is_staggered() {
        let mut queue = AudioQueue::new();
        queue.schedule(SoundEffect::RoundStart);

        let first = queue.advance(0.0);
        assert_eq!(first, vec![START_LOW]);
        assert_eq!(queue.len(), 1);

        assert!(queue.advance(0.05).is_empty());
        let second = queue.advance(0.04);
        assert_eq!(second, vec![START_HIGH]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_jingle_completes_after_long_uptime() {
        let mut queue = AudioQueue::new();
        // About twelve days in
        queue.clock = 1.0e6;
        queue.schedule(SoundEffect::RoundStart);
        assert_eq!(queue.advance(1.0 / 60.0), vec![START_LOW]);

        let mut later = Vec::new();
        for _ in 0..5 {
            later.extend(queue.advance(1.0 / 60.0));
        }
        assert_eq!(later, vec![START_HIGH]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_due_tones_keep_order() {
        let mut queue = AudioQueue::new();
        queue.schedule(SoundEffect::RoundStart);
        queue.schedule(SoundEffect::BrickBreak);
        queue.schedule(SoundEffect::WallBounce);

        let tones = queue.advance(1.0);
        assert_eq!(tones, vec![START_LOW, BRICK, WALL, START_HIGH]);
    }

    #[test]
    fn test_manager_plays_and_scales_volume() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.set_master_volume(0.5);
        audio.play_event(&GameEvent::PaddleBounce);
        audio.play_event(&GameEvent::Lost);
        audio.advance(1.0 / 60.0);

        let played = recorder.0.borrow();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].freq_hz, 900.0);
        assert!((played[0].volume - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()));
        audio.set_muted(true);
        audio.play(SoundEffect::GameWon);
        audio.advance(1.0);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_failing_sink_degrades_to_silence() {
        let mut audio = AudioManager::new(Box::new(Broken));
        audio.play(SoundEffect::WallBounce);
        audio.advance(0.1);
        assert!(!audio.is_enabled());

        // Further cues are dropped without error
        audio.play(SoundEffect::BrickBreak);
        audio.advance(0.1);
        assert!(!audio.is_enabled());
    }

    #[test]
    fn test_bell_rings_once_per_frame() {
        let mut bell = BellSink::new(Vec::new());
        bell.play(&WALL).unwrap();
        bell.play(&BRICK).unwrap();
        bell.flush().unwrap();
        bell.flush().unwrap();
        assert_eq!(bell.into_inner(), b"\x07".to_vec());
    }
}
