// AdaptiveCoach - session accuracy/reaction statistics and difficulty
//
// The coach is updated once per judged frame. Accuracy is measured over the
// whole session (correct / total ever), so tempo and level settle down as the
// attempt count grows. The smoothing weights, bpm steps and accuracy cut
// points below are part of the behaviour and must not be tuned.

use serde::{Deserialize, Serialize};

const EMA_KEEP: f64 = 0.8;
const EMA_NEW: f64 = 0.2;

pub const MIN_TEMPO_BPM: u32 = 40;
pub const MAX_TEMPO_BPM: u32 = 140;
pub const START_TEMPO_BPM: u32 = 60;
const TEMPO_STEP_BPM: u32 = 5;
const TEMPO_UP_ACCURACY: f64 = 0.9;
const TEMPO_DOWN_ACCURACY: f64 = 0.7;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;
const LEVEL_UP_ACCURACY: f64 = 0.92;
const LEVEL_DOWN_ACCURACY: f64 = 0.6;

const HINT_MATCH: &str = "Great! Keep the posture steady.";
const HINT_MISS: &str = "Focus the target finger lift and keep wrist centered.";

/// Raw attempt counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    pub total_attempts: u32,
    pub correct_attempts: u32,
    /// Exponentially smoothed reaction time
    pub avg_reaction_ms: f64,
}

impl Metrics {
    /// Accuracy over every attempt so far (0.0 before the first attempt)
    pub fn accuracy(&self) -> f64 {
        self.correct_attempts as f64 / self.total_attempts.max(1) as f64
    }
}

/// Read-only view of the coach reported with every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoachSummary {
    /// Accuracy rounded to 3 decimals
    pub accuracy: f64,
    /// Smoothed reaction time, truncated
    pub avg_reaction_ms: u64,
    pub tempo_bpm: u32,
    pub level: u8,
}

/// Adaptive difficulty coach
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveCoach {
    metrics: Metrics,
    tempo_bpm: u32,
    level: u8,
}

impl Default for AdaptiveCoach {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveCoach {
    pub fn new() -> Self {
        Self {
            metrics: Metrics::default(),
            tempo_bpm: START_TEMPO_BPM,
            level: MIN_LEVEL,
        }
    }

    /// Record one judged attempt
    ///
    /// # Arguments
    /// * `correct` - Whether the attempt matched the target
    /// * `reaction_ms` - Elapsed time for this attempt
    pub fn update(&mut self, correct: bool, reaction_ms: u64) {
        let m = &mut self.metrics;
        m.total_attempts += 1;
        if correct {
            m.correct_attempts += 1;
        }

        if m.total_attempts == 1 {
            m.avg_reaction_ms = reaction_ms as f64;
        } else {
            m.avg_reaction_ms = EMA_KEEP * m.avg_reaction_ms + EMA_NEW * reaction_ms as f64;
        }

        let acc = m.accuracy();
        let (tempo_before, level_before) = (self.tempo_bpm, self.level);

        if acc > TEMPO_UP_ACCURACY {
            self.tempo_bpm = (self.tempo_bpm + TEMPO_STEP_BPM).min(MAX_TEMPO_BPM);
        } else if acc < TEMPO_DOWN_ACCURACY {
            self.tempo_bpm = self
                .tempo_bpm
                .saturating_sub(TEMPO_STEP_BPM)
                .max(MIN_TEMPO_BPM);
        }

        if acc > LEVEL_UP_ACCURACY && self.level < MAX_LEVEL {
            self.level += 1;
        } else if acc < LEVEL_DOWN_ACCURACY && self.level > MIN_LEVEL {
            self.level -= 1;
        }

        if self.level != level_before || self.tempo_bpm != tempo_before {
            log::debug!(
                "[Coach] acc={:.3} tempo {} -> {} bpm, level {} -> {}",
                acc,
                tempo_before,
                self.tempo_bpm,
                level_before,
                self.level
            );
        }
    }

    /// Feedback line for the last prediction against the current target
    pub fn hint(&self, last_pred: &str, target: &str) -> String {
        if last_pred == target {
            HINT_MATCH.to_string()
        } else {
            HINT_MISS.to_string()
        }
    }

    pub fn summary(&self) -> CoachSummary {
        CoachSummary {
            accuracy: (self.metrics.accuracy() * 1000.0).round() / 1000.0,
            avg_reaction_ms: self.metrics.avg_reaction_ms as u64,
            tempo_bpm: self.tempo_bpm,
            level: self.level,
        }
    }

    /// Put tempo and level back to their starting values, keeping the counters
    ///
    /// Used by the "lock level" session option; this is the only way besides
    /// `update` that tempo or level move.
    pub fn pin_to_entry_level(&mut self) {
        self.tempo_bpm = START_TEMPO_BPM;
        self.level = MIN_LEVEL;
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn tempo_bpm(&self) -> u32 {
        self.tempo_bpm
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}
