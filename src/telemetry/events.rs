//! Telemetry event types published by training sessions.

use serde::{Deserialize, Serialize};

/// Which subsystem raised a telemetry error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSource {
    Sound,
    SessionLog,
}

/// Lesson progress and difficulty events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum LessonEvent {
    StepAdvanced {
        target: String,
        index: usize,
        lesson_len: usize,
    },
    LessonComplete {
        steps: usize,
        accuracy: f64,
    },
    DifficultyChanged {
        tempo_bpm: u32,
        level: u8,
    },
    NotesPlayed {
        label: String,
        notes: Vec<String>,
    },
    Error {
        source: ErrorSource,
        code: i32,
        context: String,
    },
}
