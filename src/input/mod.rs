// Input module - where per-frame predictions come from
//
// The lesson engine never looks at images. Something upstream turns a frame
// into a (label, confidence) pair; this module defines that seam plus the
// sources the crate ships: a constant stub classifier, the raised-finger
// chord mapping and scripted NDJSON replays.

pub mod fingers;
pub mod scripted;

pub use fingers::{FingerChordPlayer, FingerFrame};
pub use scripted::ScriptedSource;

use serde::{Deserialize, Serialize};

use crate::lesson::presets;

/// Label reported when no finger is raised
pub const NO_GESTURE_LABEL: &str = "NONE";

/// One recognised frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub label: String,
    /// Classifier confidence in [0, 1]
    pub confidence: f32,
    /// Milliseconds since the previous observation
    #[serde(default)]
    pub reaction_ms: u64,
}

impl Observation {
    pub fn new(label: impl Into<String>, confidence: f32, reaction_ms: u64) -> Self {
        Self {
            label: label.into(),
            confidence,
            reaction_ms,
        }
    }
}

/// A stream of observations; `None` means the stream has ended
pub trait ObservationSource {
    fn next_observation(&mut self) -> Option<Observation>;

    /// Short source name for logs
    fn name(&self) -> &'static str;
}

/// Classifier stand-in used when no trained model is available
///
/// Emits `NOTE_C4` at 0.7 forever.
#[derive(Debug, Clone)]
pub struct StubClassifier {
    reaction_ms: u64,
}

impl StubClassifier {
    pub const LABEL: &'static str = "NOTE_C4";
    pub const CONFIDENCE: f32 = 0.7;

    /// Stub that reports `reaction_ms` between frames
    pub fn new(reaction_ms: u64) -> Self {
        Self { reaction_ms }
    }

    pub fn predict(&self) -> (&'static str, f32) {
        (Self::LABEL, Self::CONFIDENCE)
    }
}

impl Default for StubClassifier {
    fn default() -> Self {
        Self::new(33)
    }
}

impl ObservationSource for StubClassifier {
    fn next_observation(&mut self) -> Option<Observation> {
        let (label, confidence) = self.predict();
        Some(Observation::new(label, confidence, self.reaction_ms))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Chords for raised fingers, thumb to pinky
const FINGER_CHORDS: [&str; 5] = presets::D_MAJOR_FINGER_LESSON;

const FINGER_CONFIDENCE: f32 = 0.9;

/// Map a raised-finger reading (thumb..pinky) to a chord label
///
/// The lowest raised finger wins. With no finger raised the label is
/// [`NO_GESTURE_LABEL`] at zero confidence.
pub fn finger_chord_label(raised: [bool; 5]) -> (&'static str, f32) {
    raised
        .iter()
        .position(|up| *up)
        .map(|finger| (FINGER_CHORDS[finger], FINGER_CONFIDENCE))
        .unwrap_or((NO_GESTURE_LABEL, 0.0))
}
