// FreePlayMode - sound whatever is shown
//
// Stateless: every confident, mapped prediction is played straight away.
// The coach is never consulted.

use crate::audio::SoundPlayer;
use crate::config::FreePlayConfig;
use crate::lesson::progress::{round_confidence, FreePlayFrame};
use crate::notes::notes_for;

#[derive(Debug, Clone)]
pub struct FreePlayMode {
    min_confidence: f32,
    note_seconds: f32,
}

impl Default for FreePlayMode {
    fn default() -> Self {
        Self::from_config(&FreePlayConfig::default())
    }
}

impl FreePlayMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &FreePlayConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            note_seconds: config.note_seconds,
        }
    }

    /// Play the notes for `label` when the prediction is confident enough
    pub fn handle_observation(
        &self,
        player: &dyn SoundPlayer,
        label: &str,
        confidence: f32,
    ) -> FreePlayFrame {
        let notes = notes_for(label);
        let played = if !notes.is_empty() && confidence >= self.min_confidence {
            player.play_notes(notes, self.note_seconds);
            notes.iter().map(|n| n.to_string()).collect()
        } else {
            Vec::new()
        };

        FreePlayFrame {
            played,
            conf: round_confidence(confidence),
        }
    }
}
