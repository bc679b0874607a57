//! WAV sound backend
//!
//! Renders every trigger to a numbered 16-bit mono WAV file in an output
//! directory. Useful on machines without an audio device and for listening
//! back to a replayed session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::synth::{render_chord, SYNTH_SAMPLE_RATE};
use super::SoundPlayer;
use crate::error::{log_sound_error, ErrorCode, SoundError};
use crate::telemetry::{self, ErrorSource};

/// Renders triggers into `<dir>/<seq>_<notes>.wav`
#[derive(Debug)]
pub struct WavPlayer {
    dir: PathBuf,
    amplitude: f32,
    sequence: AtomicU64,
}

impl WavPlayer {
    /// Create the player, creating `dir` if needed
    pub fn new<P: Into<PathBuf>>(dir: P, amplitude: f32) -> Result<Self, SoundError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| SoundError::BackendUnavailable {
            backend: "wav".to_string(),
            reason: format!("cannot create {}: {}", dir.display(), err),
        })?;
        Ok(Self {
            dir,
            amplitude,
            sequence: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render and write one trigger, returning the written path
    pub fn render(&self, notes: &[&str], duration_secs: f32) -> Result<PathBuf, SoundError> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(SoundError::InvalidDuration {
                seconds: duration_secs,
            });
        }

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let stem = if notes.is_empty() {
            "rest".to_string()
        } else {
            notes.join("-").replace('#', "s")
        };
        let path = self.dir.join(format!("{seq:04}_{stem}.wav"));
        let samples = render_chord(notes, duration_secs, SYNTH_SAMPLE_RATE, self.amplitude);
        write_wav(&path, &samples, SYNTH_SAMPLE_RATE)?;
        Ok(path)
    }
}

impl SoundPlayer for WavPlayer {
    fn play_notes(&self, notes: &[&str], duration_secs: f32) {
        match self.render(notes, duration_secs) {
            Ok(path) => log::debug!("[SoundEngine] Rendered {:?} to {}", notes, path.display()),
            Err(err) => {
                log_sound_error(&err, "WavPlayer::play_notes");
                telemetry::hub().record_error(ErrorSource::Sound, err.code(), err.message());
            }
        }
    }

    fn name(&self) -> &'static str {
        "wav"
    }
}

/// Write mono f32 samples as 16-bit PCM
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), SoundError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let with_path = |err: hound::Error| SoundError::WavWriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(with_path)?;
    for sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value).map_err(with_path)?;
    }
    writer.finalize().map_err(with_path)
}
