//! Frontend settings and preferences
//!
//! Read from an optional JSON file. Gameplay constants are fixed; only how
//! the game is presented can be changed here.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Where sound cues go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioMode {
    /// No audio at all
    Off,
    /// Log each tone (visible with RUST_LOG=debug)
    Log,
    /// Ring the terminal bell
    #[default]
    Bell,
}

impl AudioMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioMode::Off => "off",
            AudioMode::Log => "log",
            AudioMode::Bell => "bell",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Audio output
    pub audio: AudioMode,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Show FPS counter in the HUD
    pub show_fps: bool,
    /// Render rate the frontend paces itself to
    pub target_fps: u32,
    /// Let the paddle follow the ball
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio: AudioMode::Bell,
            master_volume: 0.8,
            show_fps: false,
            target_fps: 60,
            autopilot: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(json).context("invalid settings JSON")?;
        Ok(settings.sanitized())
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = Self::from_json(&json)
            .with_context(|| format!("parsing settings from {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Clamp values into usable ranges
    fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.target_fps = self.target_fps.clamp(10, 240);
        self
    }

    /// Wall-clock duration of one rendered frame
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "audio": "off", "autopilot": true }"#).unwrap();
        assert_eq!(settings.audio, AudioMode::Off);
        assert!(settings.autopilot);
        assert_eq!(settings.target_fps, 60);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings =
            Settings::from_json(r#"{ "master_volume": 3.0, "target_fps": 1000 }"#).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.target_fps, 240);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{ audio: loud").is_err());
        assert!(Settings::from_json(r#"{ "audio": "loud" }"#).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Settings::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("reading settings"));
    }

    #[test]
    fn test_frame_duration() {
        let settings = Settings::default();
        let d = settings.frame_duration();
        assert!((d.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
    }
}
