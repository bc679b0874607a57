// Sound backend error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Sound error code constants
///
/// Error code range: 3001-3004
pub struct SoundErrorCodes {}

impl SoundErrorCodes {
    /// Requested backend is not compiled in or has no output device
    pub const BACKEND_UNAVAILABLE: i32 = 3001;

    /// Failed to open or start an output stream
    pub const STREAM_OPEN_FAILED: i32 = 3002;

    /// Failed to create or write a rendered WAV file
    pub const WAV_WRITE_FAILED: i32 = 3003;

    /// Playback duration was negative or not finite
    pub const INVALID_DURATION: i32 = 3004;
}

/// Log a sound error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_sound_error(err: &SoundError, context: &str) {
    error!(
        "Sound error in {}: code={}, component=SoundEngine, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Sound-related errors
///
/// Raised while opening a backend or rendering notes. Playback itself is
/// fire-and-forget, so these never reach the lesson modes.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundError {
    /// Backend is not available on this build or machine
    BackendUnavailable { backend: String, reason: String },

    /// Output stream could not be opened
    StreamOpenFailed { reason: String },

    /// WAV rendering failed
    WavWriteFailed { path: String, reason: String },

    /// Duration must be a finite, non-negative number of seconds
    InvalidDuration { seconds: f32 },
}

impl ErrorCode for SoundError {
    fn code(&self) -> i32 {
        match self {
            SoundError::BackendUnavailable { .. } => SoundErrorCodes::BACKEND_UNAVAILABLE,
            SoundError::StreamOpenFailed { .. } => SoundErrorCodes::STREAM_OPEN_FAILED,
            SoundError::WavWriteFailed { .. } => SoundErrorCodes::WAV_WRITE_FAILED,
            SoundError::InvalidDuration { .. } => SoundErrorCodes::INVALID_DURATION,
        }
    }

    fn message(&self) -> String {
        match self {
            SoundError::BackendUnavailable { backend, reason } => {
                format!("Sound backend '{}' unavailable: {}", backend, reason)
            }
            SoundError::StreamOpenFailed { reason } => {
                format!("Failed to open output stream: {}", reason)
            }
            SoundError::WavWriteFailed { path, reason } => {
                format!("Failed to write WAV {}: {}", path, reason)
            }
            SoundError::InvalidDuration { seconds } => {
                format!("Invalid playback duration: {}s", seconds)
            }
        }
    }
}

impl fmt::Display for SoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SoundError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SoundError {}
