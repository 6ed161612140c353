//! Bass-threshold beat detection with a refractory window.
//!
//! This is a plain threshold filter, not spectral-flux onset detection:
//! sustained loud bass produces a beat every refractory interval, and quiet
//! onsets below the threshold are missed.

use crate::constants::{BEAT_REFRACTORY_SEC, BEAT_THRESHOLD};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeatConfig {
    pub threshold: f32,
    pub refractory_sec: f64,
}

impl Default for BeatConfig {
    fn default() -> Self {
        Self {
            threshold: BEAT_THRESHOLD,
            refractory_sec: BEAT_REFRACTORY_SEC,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeatState {
    /// Elapsed time of the most recent beat; negative infinity before the first.
    pub last_beat_sec: f64,
    /// True only on the frame a new beat fired.
    pub is_beat: bool,
}

impl Default for BeatState {
    fn default() -> Self {
        Self {
            last_beat_sec: f64::NEG_INFINITY,
            is_beat: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct BeatDetector {
    config: BeatConfig,
    state: BeatState,
}

impl BeatDetector {
    pub fn new(config: BeatConfig) -> Self {
        Self {
            config,
            state: BeatState::default(),
        }
    }

    /// Start from a known last-beat time instead of "never".
    pub fn with_last_beat(config: BeatConfig, last_beat_sec: f64) -> Self {
        Self {
            config,
            state: BeatState {
                last_beat_sec,
                is_beat: false,
            },
        }
    }

    pub fn config(&self) -> BeatConfig {
        self.config
    }

    pub fn state(&self) -> BeatState {
        self.state
    }

    pub fn detect(&mut self, bass: f32, elapsed_sec: f64) -> BeatState {
        let fire = bass > self.config.threshold
            && elapsed_sec - self.state.last_beat_sec > self.config.refractory_sec;
        if fire {
            self.state.last_beat_sec = elapsed_sec;
            log::debug!("[beat] bass={:.2} t={:.2}", bass, elapsed_sec);
        }
        self.state.is_beat = fire;
        self.state
    }

    pub fn reset(&mut self) {
        self.state = BeatState::default();
    }
}
