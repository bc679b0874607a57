// Per-frame result records and progress helpers
//
// These are the plain-data records handed to the display/audio adapters after
// every observation. Field names match the JSON the dashboard consumes.

use serde::{Deserialize, Serialize};

use crate::lesson::coach::CoachSummary;

/// Gate phase of the lesson sequencer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum StepPhase {
    /// Waiting for the current target to be shown with enough confidence
    AwaitingMatch,
    /// A step was just accepted; the same gesture must disappear first
    AwaitingRelease {
        locked_label: String,
        release_count: u32,
    },
    /// Every step has been played
    Complete,
}

impl StepPhase {
    pub fn is_awaiting_release(&self) -> bool {
        matches!(self, StepPhase::AwaitingRelease { .. })
    }
}

/// Tutorial frame result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonFrame {
    /// Target after this frame; `None` once the lesson is complete
    pub target: Option<String>,
    pub pred: String,
    pub conf: f32,
    pub coach: CoachSummary,
    pub done: bool,
}

/// Free play frame result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreePlayFrame {
    pub played: Vec<String>,
    pub conf: f32,
}

/// Challenge frame result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeFrame {
    /// Target that was judged this frame
    pub target: String,
    pub pred: String,
    pub conf: f32,
    pub coach: CoachSummary,
}

/// On-screen cue computed against the target shown *before* the frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cue", content = "target", rename_all = "snake_case")]
pub enum StepCue {
    Match(String),
    Miss(String),
    Complete,
}

impl StepCue {
    /// Cue for a prediction against the pre-frame target
    pub fn evaluate(target_before: Option<&str>, label: &str, confidence: f32) -> Self {
        match target_before {
            None => StepCue::Complete,
            Some(target) if label == target && confidence >= CUE_CONFIDENCE => {
                StepCue::Match(target.to_string())
            }
            Some(target) => StepCue::Miss(target.to_string()),
        }
    }

    pub fn display_text(&self) -> String {
        match self {
            StepCue::Match(target) => format!("Nice! {}", target),
            StepCue::Miss(target) => format!("Try again! Play {}", target),
            StepCue::Complete => "Lesson complete!".to_string(),
        }
    }
}

/// Confidence the pre-check cue treats as a hit
pub const CUE_CONFIDENCE: f32 = 0.6;

/// Progress percentage (0-100) for a step index within a lesson
pub fn progress_percent(index: usize, len: usize) -> u8 {
    if len == 0 || index >= len {
        return 100;
    }
    ((100 * index) / len) as u8
}

/// Round a confidence to two decimals for reporting
pub fn round_confidence(confidence: f32) -> f32 {
    (confidence * 100.0).round() / 100.0
}
