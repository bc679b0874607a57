// TutorialMode - step-by-step lesson gate
//
// Each lesson step goes through three phases:
// 1. AwaitingMatch: the coach judges every frame against the current target.
//    A confident match outside the debounce window plays the target once and
//    advances.
// 2. AwaitingRelease: the accepted gesture must disappear for a few frames
//    before anything is judged again. These frames never reach the coach.
// 3. Complete: after the last step every frame reports `done` and nothing
//    changes.

use crate::audio::{SoundPlayer, DEFAULT_NOTE_SECONDS};
use crate::clock::Clock;
use crate::config::TutorialConfig;
use crate::lesson::coach::AdaptiveCoach;
use crate::lesson::presets;
use crate::lesson::progress::{progress_percent, round_confidence, LessonFrame, StepPhase};
use crate::notes::notes_for;

/// Confidence at which a still-visible locked gesture counts as held
const RELEASE_HOLD_CONFIDENCE: f32 = 0.5;

pub struct TutorialMode {
    lesson: Vec<String>,
    current_index: usize,
    phase: StepPhase,
    cooldown_until_ms: u64,
    confidence_threshold: f32,
    debounce_ms: u64,
    release_frames_needed: u32,
    clock: Box<dyn Clock>,
}

impl TutorialMode {
    /// Create a tutorial with default gating
    ///
    /// # Arguments
    /// * `lesson` - Ordered target labels; an empty lesson uses the default
    /// * `clock` - Time source for the debounce window
    pub fn new(lesson: Vec<String>, clock: Box<dyn Clock>) -> Self {
        Self::from_config(
            &TutorialConfig {
                lesson,
                ..TutorialConfig::default()
            },
            clock,
        )
    }

    pub fn from_config(config: &TutorialConfig, clock: Box<dyn Clock>) -> Self {
        let lesson = if config.lesson.is_empty() {
            log::warn!("[Tutorial] Empty lesson supplied, using the default lesson");
            presets::default_lesson()
        } else {
            config.lesson.clone()
        };

        Self {
            lesson,
            current_index: 0,
            phase: StepPhase::AwaitingMatch,
            cooldown_until_ms: 0,
            confidence_threshold: config.confidence_threshold,
            debounce_ms: config.debounce_ms,
            release_frames_needed: config.release_frames,
            clock,
        }
    }

    /// Process one frame's prediction
    ///
    /// # Arguments
    /// * `coach` - Session coach, updated once per judged frame
    /// * `player` - Sound output for accepted steps
    /// * `label` - Predicted label
    /// * `confidence` - Prediction confidence (0.0-1.0)
    /// * `reaction_ms` - Time since the previous frame
    pub fn handle_observation(
        &mut self,
        coach: &mut AdaptiveCoach,
        player: &dyn SoundPlayer,
        label: &str,
        confidence: f32,
        reaction_ms: u64,
    ) -> LessonFrame {
        if self.is_done() {
            return self.frame(coach, label, confidence);
        }

        if let StepPhase::AwaitingRelease {
            locked_label,
            release_count,
        } = &mut self.phase
        {
            let mut released = false;
            if label == locked_label.as_str() && confidence >= RELEASE_HOLD_CONFIDENCE {
                *release_count = 0;
            } else {
                *release_count += 1;
                released = *release_count >= self.release_frames_needed;
            }

            if released {
                log::debug!("[Tutorial] Gesture released, judging step {}", self.current_index);
                self.phase = StepPhase::AwaitingMatch;
            }
            return self.frame(coach, label, confidence);
        }

        let target = self.lesson[self.current_index].as_str();
        let correct = label == target && confidence >= self.confidence_threshold;
        coach.update(correct, reaction_ms);

        let now = self.clock.now_ms();
        if correct && now >= self.cooldown_until_ms {
            let notes = notes_for(target);
            if !notes.is_empty() {
                player.play_notes(notes, DEFAULT_NOTE_SECONDS);
            }

            self.current_index += 1;
            self.cooldown_until_ms = now.saturating_add(self.debounce_ms);
            log::info!(
                "[Tutorial] Step {}/{} accepted: {}",
                self.current_index,
                self.lesson.len(),
                label
            );

            self.phase = if self.is_done() {
                log::info!("[Tutorial] Lesson complete");
                StepPhase::Complete
            } else {
                StepPhase::AwaitingRelease {
                    locked_label: label.to_string(),
                    release_count: 0,
                }
            };
        }

        self.frame(coach, label, confidence)
    }

    fn frame(&self, coach: &AdaptiveCoach, label: &str, confidence: f32) -> LessonFrame {
        LessonFrame {
            target: self.target_label().map(str::to_string),
            pred: label.to_string(),
            conf: round_confidence(confidence),
            coach: coach.summary(),
            done: self.is_done(),
        }
    }

    /// Current target, `None` once the lesson is complete
    pub fn target_label(&self) -> Option<&str> {
        self.lesson.get(self.current_index).map(String::as_str)
    }

    pub fn is_done(&self) -> bool {
        self.current_index >= self.lesson.len()
    }

    /// Back to the first step with no gate and no cooldown
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.phase = StepPhase::AwaitingMatch;
        self.cooldown_until_ms = 0;
    }

    pub fn lesson(&self) -> &[String] {
        &self.lesson
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn phase(&self) -> &StepPhase {
        &self.phase
    }

    /// False once complete: the final step goes straight to `Complete` without a release gate
    pub fn awaiting_release(&self) -> bool {
        self.phase.is_awaiting_release()
    }

    pub fn locked_label(&self) -> Option<&str> {
        match &self.phase {
            StepPhase::AwaitingRelease { locked_label, .. } => Some(locked_label),
            _ => None,
        }
    }

    pub fn release_count(&self) -> u32 {
        match &self.phase {
            StepPhase::AwaitingRelease { release_count, .. } => *release_count,
            _ => 0,
        }
    }

    pub fn cooldown_until_ms(&self) -> u64 {
        self.cooldown_until_ms
    }

    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.current_index, self.lesson.len())
    }
}

#[cfg(test)]
#[path = "tutorial_tests.rs"]
mod tests;
