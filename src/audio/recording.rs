//! Recording sound backend for tests and fixture replays
//!
//! Clones share one history, so a handle kept by the caller sees every
//! trigger made through a clone moved into a mode or session.

use std::sync::{Arc, Mutex};

use super::SoundPlayer;

/// One recorded trigger
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedNotes {
    pub notes: Vec<String>,
    pub duration_secs: f32,
}

/// Remembers every trigger instead of sounding it
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    history: Arc<Mutex<Vec<PlayedNotes>>>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every trigger so far
    pub fn played(&self) -> Vec<PlayedNotes> {
        match self.history.lock() {
            Ok(history) => history.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut history) = self.history.lock() {
            history.clear();
        }
    }
}

impl SoundPlayer for RecordingPlayer {
    fn play_notes(&self, notes: &[&str], duration_secs: f32) {
        let entry = PlayedNotes {
            notes: notes.iter().map(|n| n.to_string()).collect(),
            duration_secs,
        };
        match self.history.lock() {
            Ok(mut history) => history.push(entry),
            Err(_) => log::error!("[RecordingPlayer] history lock poisoned; trigger dropped"),
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
