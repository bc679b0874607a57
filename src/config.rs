//! Configuration management for lesson gating and sound output
//!
//! This module provides runtime configuration loading from JSON files, so
//! gating thresholds, lesson content and the sound backend can be changed
//! without recompiling. Every section has defaults and a missing or broken
//! file never stops a session from starting.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::lesson::presets;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tutorial: TutorialConfig,
    pub free_play: FreePlayConfig,
    pub challenge: ChallengeConfig,
    pub sound: SoundConfig,
    pub session: SessionConfig,
}

/// Tutorial gating parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialConfig {
    /// Ordered lesson labels; empty means the default lesson
    pub lesson: Vec<String>,
    /// Minimum confidence for a prediction to count as correct
    pub confidence_threshold: f32,
    /// Minimum time between two accepted steps
    pub debounce_ms: u64,
    /// Frames without the locked label needed to release the gate
    pub release_frames: u32,
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            lesson: presets::default_lesson(),
            confidence_threshold: 0.6,
            debounce_ms: 500,
            release_frames: 5,
        }
    }
}

/// Free play trigger parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FreePlayConfig {
    /// Minimum confidence for a prediction to sound
    pub min_confidence: f32,
    pub note_seconds: f32,
}

impl Default for FreePlayConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            note_seconds: 0.3,
        }
    }
}

/// Challenge mode parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Candidate patterns; one is picked at random per round
    pub patterns: Vec<Vec<String>>,
    pub confidence_threshold: f32,
    pub note_seconds: f32,
    /// Fixed RNG seed for reproducible pattern order
    pub seed: Option<u64>,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            patterns: presets::challenge_patterns(),
            confidence_threshold: 0.6,
            note_seconds: 0.25,
            seed: None,
        }
    }
}

/// Which sound backend to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundBackendKind {
    /// Log each trigger
    #[default]
    Log,
    /// Drop every trigger
    Silent,
    /// Render each trigger to a WAV file
    Wav,
    /// Play on the default output device (needs the `playback` feature)
    Live,
}

/// Sound output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub backend: SoundBackendKind,
    /// Output directory for the WAV backend
    pub wav_dir: Option<PathBuf>,
    /// Peak amplitude of rendered chords
    pub amplitude: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            backend: SoundBackendKind::Log,
            wav_dir: None,
            amplitude: 0.8,
        }
    }
}

/// Session-level options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Append-only NDJSON event log; disabled when unset
    pub event_log: Option<PathBuf>,
    /// Pin the coach to level 1 / 60 bpm before every frame
    pub lock_level: bool,
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn load() -> Self {
        Self::load_from_file("assets/guided_piano.json")
    }
}
