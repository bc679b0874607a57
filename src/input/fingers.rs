// Finger chords - polyphonic chord triggering from raised fingers
//
// Every finger owns one chord of the D-major family. A finger that goes up
// starts its chord once; the chord stays active until the finger is down
// and the sustain window since it started has passed. Only then can the
// same finger trigger again.

use serde::Serialize;

use super::FINGER_CHORDS;
use crate::audio::SoundPlayer;
use crate::clock::Clock;
use crate::notes::notes_for;

/// How long a chord stays active after it starts
pub const DEFAULT_SUSTAIN_MS: u64 = 2_000;

/// Playback length of each triggered chord
pub const FINGER_NOTE_SECONDS: f32 = 0.25;

/// Result of one raised-finger reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FingerFrame {
    /// Chord labels started on this reading, thumb first
    pub started: Vec<&'static str>,
    /// Fingers (0 = thumb) whose chord is still active
    pub active: Vec<usize>,
}

pub struct FingerChordPlayer {
    clock: Box<dyn Clock>,
    sustain_ms: u64,
    /// Start time per finger while its chord is active
    active_since: [Option<u64>; 5],
}

impl FingerChordPlayer {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self::with_sustain(clock, DEFAULT_SUSTAIN_MS)
    }

    pub fn with_sustain(clock: Box<dyn Clock>, sustain_ms: u64) -> Self {
        Self {
            clock,
            sustain_ms,
            active_since: [None; 5],
        }
    }

    /// Apply one reading of raised fingers (thumb..pinky)
    pub fn update(&mut self, player: &dyn SoundPlayer, raised: [bool; 5]) -> FingerFrame {
        let now = self.clock.now_ms();
        let mut started = Vec::new();

        for (finger, up) in raised.iter().enumerate() {
            match self.active_since[finger] {
                None if *up => {
                    let label = FINGER_CHORDS[finger];
                    player.play_notes(notes_for(label), FINGER_NOTE_SECONDS);
                    self.active_since[finger] = Some(now);
                    started.push(label);
                }
                Some(since) if !*up && now.saturating_sub(since) >= self.sustain_ms => {
                    log::debug!("[Fingers] Finger {} released", finger);
                    self.active_since[finger] = None;
                }
                _ => {}
            }
        }

        if !started.is_empty() {
            log::debug!("[Fingers] Started {:?}", started);
        }

        FingerFrame {
            started,
            active: self.active_fingers(),
        }
    }

    pub fn active_fingers(&self) -> Vec<usize> {
        self.active_since
            .iter()
            .enumerate()
            .filter_map(|(finger, since)| since.map(|_| finger))
            .collect()
    }

    /// Drop every active chord
    pub fn reset(&mut self) {
        self.active_since = [None; 5];
    }
}
