// Error types for the guided piano trainer
//
// The lesson core itself never fails; these types cover the collaborators
// around it (sound backends, session event log, lesson construction) with
// numeric codes so a UI layer can react without string matching.

mod session;
mod sound;

pub use session::{log_session_error, SessionError, SessionErrorCodes};
pub use sound::{log_sound_error, SoundError, SoundErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
