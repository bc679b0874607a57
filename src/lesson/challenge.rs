// ChallengeMode - random pattern drill
//
// One of the configured patterns is picked at random. Every frame is judged
// against the current target and always updates the coach. A correct frame
// plays the target, advances, and after the last step a fresh pattern is
// drawn. There is no release gate and no debounce here.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::SoundPlayer;
use crate::config::ChallengeConfig;
use crate::lesson::coach::AdaptiveCoach;
use crate::lesson::presets;
use crate::lesson::progress::{round_confidence, ChallengeFrame};
use crate::notes::notes_for;

pub struct ChallengeMode {
    patterns: Vec<Vec<String>>,
    pattern_index: usize,
    pos: usize,
    confidence_threshold: f32,
    note_seconds: f32,
    rng: StdRng,
    rounds_completed: u32,
}

impl ChallengeMode {
    /// Create a challenge with the built-in patterns and a random seed
    pub fn new() -> Self {
        Self::from_config(&ChallengeConfig::default())
    }

    /// Create a challenge from config
    ///
    /// Empty patterns are dropped; if nothing is left the built-in patterns
    /// are used. A configured `seed` makes the pattern order reproducible.
    pub fn from_config(config: &ChallengeConfig) -> Self {
        let mut patterns: Vec<Vec<String>> = config
            .patterns
            .iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect();
        if patterns.is_empty() {
            log::warn!("[Challenge] No usable patterns configured, using built-in patterns");
            patterns = presets::challenge_patterns();
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut mode = Self {
            patterns,
            pattern_index: 0,
            pos: 0,
            confidence_threshold: config.confidence_threshold,
            note_seconds: config.note_seconds,
            rng,
            rounds_completed: 0,
        };
        mode.pick_pattern();
        mode
    }

    fn pick_pattern(&mut self) {
        self.pattern_index = self.rng.gen_range(0..self.patterns.len());
        self.pos = 0;
        log::debug!(
            "[Challenge] New pattern: {:?}",
            self.patterns[self.pattern_index]
        );
    }

    /// Draw a fresh pattern and start from its first step
    pub fn reset(&mut self) {
        self.pick_pattern();
    }

    pub fn target_label(&self) -> &str {
        &self.patterns[self.pattern_index][self.pos]
    }

    pub fn pattern(&self) -> &[String] {
        &self.patterns[self.pattern_index]
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Patterns finished since construction
    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn handle_observation(
        &mut self,
        coach: &mut AdaptiveCoach,
        player: &dyn SoundPlayer,
        label: &str,
        confidence: f32,
        reaction_ms: u64,
    ) -> ChallengeFrame {
        let target = self.target_label().to_string();
        let correct = label == target && confidence >= self.confidence_threshold;
        coach.update(correct, reaction_ms);

        if correct {
            let notes = notes_for(&target);
            if !notes.is_empty() {
                player.play_notes(notes, self.note_seconds);
            }
            self.pos += 1;
            if self.pos >= self.pattern().len() {
                self.rounds_completed += 1;
                log::info!("[Challenge] Pattern {} cleared", self.rounds_completed);
                self.pick_pattern();
            }
        }

        ChallengeFrame {
            target,
            pred: label.to_string(),
            conf: round_confidence(confidence),
            coach: coach.summary(),
        }
    }
}

impl Default for ChallengeMode {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingPlayer;

    fn single_pattern(labels: &[&str]) -> ChallengeConfig {
        ChallengeConfig {
            patterns: vec![labels.iter().map(|s| s.to_string()).collect()],
            seed: Some(7),
            ..ChallengeConfig::default()
        }
    }

    #[test]
    fn test_picks_one_of_the_builtin_patterns() {
        let mode = ChallengeMode::new();
        assert!(presets::challenge_patterns().contains(&mode.pattern().to_vec()));
        assert_eq!(mode.position(), 0);
    }

    #[test]
    fn test_correct_frame_plays_and_advances() {
        let mut mode = ChallengeMode::from_config(&single_pattern(&["G_CHORD", "C_CHORD"]));
        let mut coach = AdaptiveCoach::new();
        let player = RecordingPlayer::new();

        let frame = mode.handle_observation(&mut coach, &player, "G_CHORD", 0.6, 200);

        assert_eq!(frame.target, "G_CHORD");
        assert_eq!(mode.target_label(), "C_CHORD");
        let played = player.played();
        assert_eq!(played[0].notes, vec!["G4", "B4", "D5"]);
        assert_eq!(played[0].duration_secs, 0.25);
        assert_eq!(coach.metrics().correct_attempts, 1);
    }

    #[test]
    fn test_miss_still_updates_coach() {
        let mut mode = ChallengeMode::from_config(&single_pattern(&["G_CHORD", "C_CHORD"]));
        let mut coach = AdaptiveCoach::new();
        let player = RecordingPlayer::new();

        mode.handle_observation(&mut coach, &player, "G_CHORD", 0.59, 200);
        mode.handle_observation(&mut coach, &player, "C_CHORD", 0.99, 200);

        assert_eq!(mode.position(), 0);
        assert_eq!(coach.metrics().total_attempts, 2);
        assert_eq!(coach.metrics().correct_attempts, 0);
        assert!(player.played().is_empty());
    }

    #[test]
    fn test_finishing_pattern_wraps_to_new_round() {
        let mut mode = ChallengeMode::from_config(&single_pattern(&["NOTE_C4", "NOTE_D4"]));
        let mut coach = AdaptiveCoach::new();
        let player = RecordingPlayer::new();

        mode.handle_observation(&mut coach, &player, "NOTE_C4", 0.9, 100);
        let frame = mode.handle_observation(&mut coach, &player, "NOTE_D4", 0.9, 100);

        assert_eq!(frame.target, "NOTE_D4");
        assert_eq!(mode.position(), 0);
        assert_eq!(mode.rounds_completed(), 1);
        assert_eq!(mode.target_label(), "NOTE_C4");
    }

    #[test]
    fn test_same_seed_same_pattern_order() {
        let config = ChallengeConfig {
            seed: Some(42),
            ..ChallengeConfig::default()
        };
        let mut a = ChallengeMode::from_config(&config);
        let mut b = ChallengeMode::from_config(&config);
        for _ in 0..10 {
            assert_eq!(a.pattern(), b.pattern());
            a.reset();
            b.reset();
        }
    }

    #[test]
    fn test_empty_patterns_fall_back_to_builtin() {
        let config = ChallengeConfig {
            patterns: vec![vec![], vec![]],
            seed: Some(1),
            ..ChallengeConfig::default()
        };
        let mode = ChallengeMode::from_config(&config);
        assert!(presets::challenge_patterns().contains(&mode.pattern().to_vec()));
    }

    #[test]
    fn test_unmapped_target_advances_silently() {
        let mut mode = ChallengeMode::from_config(&single_pattern(&["WAVE", "NOTE_C4"]));
        let mut coach = AdaptiveCoach::new();
        let player = RecordingPlayer::new();

        mode.handle_observation(&mut coach, &player, "WAVE", 0.9, 100);
        assert_eq!(mode.position(), 1);
        assert!(player.played().is_empty());
    }
}
