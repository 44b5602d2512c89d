//! Session settings
//!
//! Loaded from a JSON file on native, passed in as a JSON string on the web.
//! Every field has a default, so a partial file (or `{}`) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::SimConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Deterministic simulation configuration
    pub sim: SimConfig,

    // === Timeline ===
    /// Snapshots retained by the timeline ring
    pub snapshot_capacity: usize,
    /// Input edge events kept per recording
    pub input_event_capacity: usize,
    /// Frames the loop recorder can hold
    pub loop_capacity: usize,
    /// Initial playback speed (0.0 - 4.0)
    pub playback_speed: f32,
    /// Wrap playback and frame stepping at the ends of the recording
    pub loop_enabled: bool,

    // === Diagnostics ===
    /// Live frames between status log lines (0 disables them)
    pub status_interval: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),

            snapshot_capacity: MAX_REPLAY_FRAMES,
            input_event_capacity: MAX_REPLAY_EVENTS,
            loop_capacity: LOOP_MAX_INPUTS,
            playback_speed: 1.0,
            loop_enabled: true,

            status_interval: 120,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Read and parse a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Pull out-of-range values back into range
    pub fn sanitized(mut self) -> Self {
        for (name, value) in [
            ("snapshot_capacity", &mut self.snapshot_capacity),
            ("input_event_capacity", &mut self.input_event_capacity),
            ("loop_capacity", &mut self.loop_capacity),
        ] {
            if *value == 0 {
                log::warn!("{name} must be at least 1, using 1");
                *value = 1;
            }
        }

        let speed = self.playback_speed;
        if speed.is_nan() {
            log::warn!("playback_speed is NaN, using 1.0");
            self.playback_speed = 1.0;
        } else if !(0.0..=MAX_PLAYBACK_SPEED).contains(&speed) {
            self.playback_speed = speed.clamp(0.0, MAX_PLAYBACK_SPEED);
            log::warn!(
                "playback_speed {speed} out of range, using {}",
                self.playback_speed
            );
        }

        self
    }
}
