// Audio module - sound playback backends for recognised gestures
//
// The lesson modes only see the `SoundPlayer` trait. Playback is
// fire-and-forget: a backend that fails to render logs the error and the
// lesson carries on.

pub mod log_player;
pub mod recording;
pub mod synth;
pub mod wav;

#[cfg(feature = "playback")]
pub mod cpal_player;

pub use log_player::LogPlayer;
pub use recording::{PlayedNotes, RecordingPlayer};
pub use wav::WavPlayer;

#[cfg(feature = "playback")]
pub use cpal_player::CpalPlayer;

use crate::config::{SoundBackendKind, SoundConfig};
use crate::error::{log_sound_error, ErrorCode, SoundError};
use crate::telemetry::{self, ErrorSource};

/// Seconds a tutorial or free play note sounds for
pub const DEFAULT_NOTE_SECONDS: f32 = 0.3;

/// Anything that can sound a set of pitches
pub trait SoundPlayer {
    /// Sound `notes` together for `duration_secs`. No result is reported back.
    fn play_notes(&self, notes: &[&str], duration_secs: f32);

    /// Short backend name for logs and reports
    fn name(&self) -> &'static str;
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for Box<P> {
    fn play_notes(&self, notes: &[&str], duration_secs: f32) {
        (**self).play_notes(notes, duration_secs)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Open the configured backend, degrading to [`LogPlayer`] on failure
pub fn open_player(config: &SoundConfig) -> Box<dyn SoundPlayer> {
    match try_open_player(config) {
        Ok(player) => {
            log::info!("[SoundEngine] Using {} backend", player.name());
            player
        }
        Err(err) => {
            log_sound_error(&err, "open_player");
            telemetry::hub().record_error(ErrorSource::Sound, err.code(), err.message());
            log::warn!("[SoundEngine] Falling back to log-only playback");
            Box::new(LogPlayer::new())
        }
    }
}

/// Open the configured backend without fallback
pub fn try_open_player(config: &SoundConfig) -> Result<Box<dyn SoundPlayer>, SoundError> {
    match config.backend {
        SoundBackendKind::Log => Ok(Box::new(LogPlayer::new())),
        SoundBackendKind::Silent => Ok(Box::new(LogPlayer::silent())),
        SoundBackendKind::Wav => {
            let dir = config
                .wav_dir
                .clone()
                .ok_or_else(|| SoundError::BackendUnavailable {
                    backend: "wav".to_string(),
                    reason: "no wav_dir configured".to_string(),
                })?;
            Ok(Box::new(WavPlayer::new(dir, config.amplitude)?))
        }
        SoundBackendKind::Live => open_live(config),
    }
}

#[cfg(feature = "playback")]
fn open_live(config: &SoundConfig) -> Result<Box<dyn SoundPlayer>, SoundError> {
    Ok(Box::new(CpalPlayer::open(config.amplitude)?))
}

#[cfg(not(feature = "playback"))]
fn open_live(_config: &SoundConfig) -> Result<Box<dyn SoundPlayer>, SoundError> {
    Err(SoundError::BackendUnavailable {
        backend: "live".to_string(),
        reason: "built without the `playback` feature".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_backend_opens() {
        let config = SoundConfig::default();
        let player = open_player(&config);
        assert_eq!(player.name(), "log");
    }

    #[test]
    fn test_wav_backend_without_dir_falls_back() {
        let config = SoundConfig {
            backend: SoundBackendKind::Wav,
            wav_dir: None,
            ..SoundConfig::default()
        };
        assert!(try_open_player(&config).is_err());
        assert_eq!(open_player(&config).name(), "log");
    }

    #[cfg(not(feature = "playback"))]
    #[test]
    fn test_live_backend_unavailable_without_feature() {
        let config = SoundConfig {
            backend: SoundBackendKind::Live,
            ..SoundConfig::default()
        };
        match try_open_player(&config) {
            Err(SoundError::BackendUnavailable { backend, .. }) => assert_eq!(backend, "live"),
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(player) => panic!("expected failure, opened {}", player.name()),
        }
    }

    #[test]
    fn test_boxed_player_forwards() {
        let recorder = RecordingPlayer::new();
        let boxed: Box<RecordingPlayer> = Box::new(recorder.clone());
        boxed.play_notes(&["C4"], 0.3);
        assert_eq!(recorder.played().len(), 1);
    }
}
