// Session error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Session error code constants
///
/// Error code range: 4001-4004
pub struct SessionErrorCodes {}

impl SessionErrorCodes {
    /// Event log could not be opened or appended to
    pub const LOG_IO: i32 = 4001;

    /// Event could not be serialized to JSON
    pub const LOG_SERIALIZE: i32 = 4002;

    /// Logged events must serialize to a JSON object
    pub const EVENT_NOT_OBJECT: i32 = 4003;

    /// A lesson needs at least one step
    pub const EMPTY_LESSON: i32 = 4004;
}

/// Log a session error with structured context
pub fn log_session_error(err: &SessionError, context: &str) {
    error!(
        "Session error in {}: code={}, component=TrainingSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Session-related errors
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// I/O failure on the event log
    LogIo { path: String, reason: String },

    /// JSON serialization failure
    LogSerialize { reason: String },

    /// Event serialized to something other than a JSON object
    EventNotObject { kind: String },

    /// Lesson was constructed without steps
    EmptyLesson,
}

impl ErrorCode for SessionError {
    fn code(&self) -> i32 {
        match self {
            SessionError::LogIo { .. } => SessionErrorCodes::LOG_IO,
            SessionError::LogSerialize { .. } => SessionErrorCodes::LOG_SERIALIZE,
            SessionError::EventNotObject { .. } => SessionErrorCodes::EVENT_NOT_OBJECT,
            SessionError::EmptyLesson => SessionErrorCodes::EMPTY_LESSON,
        }
    }

    fn message(&self) -> String {
        match self {
            SessionError::LogIo { path, reason } => {
                format!("Session log I/O error on {}: {}", path, reason)
            }
            SessionError::LogSerialize { reason } => {
                format!("Failed to serialize session event: {}", reason)
            }
            SessionError::EventNotObject { kind } => {
                format!("Session events must be JSON objects (got {})", kind)
            }
            SessionError::EmptyLesson => "Lesson must contain at least one step".to_string(),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SessionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SessionError {}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::LogSerialize {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_codes() {
        assert_eq!(
            SessionError::LogIo {
                path: "a".to_string(),
                reason: "b".to_string()
            }
            .code(),
            4001
        );
        assert_eq!(
            SessionError::LogSerialize {
                reason: "b".to_string()
            }
            .code(),
            4002
        );
        assert_eq!(
            SessionError::EventNotObject {
                kind: "array".to_string()
            }
            .code(),
            4003
        );
        assert_eq!(SessionError::EmptyLesson.code(), 4004);
    }

    #[test]
    fn test_session_error_messages() {
        let err = SessionError::EventNotObject {
            kind: "array".to_string(),
        };
        assert_eq!(err.message(), "Session events must be JSON objects (got array)");
        assert!(SessionError::EmptyLesson.message().contains("at least one step"));
    }

    #[test]
    fn test_error_code_trait_object() {
        let err: &dyn ErrorCode = &SessionError::EmptyLesson;
        assert_eq!(err.code(), SessionErrorCodes::EMPTY_LESSON);
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SessionError = parse_err.into();
        assert!(matches!(err, SessionError::LogSerialize { .. }));
    }
}
