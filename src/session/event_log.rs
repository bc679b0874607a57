//! Append-only NDJSON session event log.
//!
//! Every event is written as one JSON object per line with a `timestamp`
//! field (ms since the Unix epoch) added. Existing content is never touched.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::error::SessionError;

pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    /// Prepare a log at `path`, creating missing parent directories
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| SessionError::LogIo {
                path: parent.display().to_string(),
                reason: err.to_string(),
            })?;
        }
        log::debug!("[SessionLog] Appending events to {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `event` stamped with the current wall-clock time
    pub fn append<T: Serialize>(&self, event: &T) -> Result<(), SessionError> {
        self.append_at(event, SystemClock.now_ms())
    }

    /// Append `event` with an explicit timestamp
    ///
    /// A `timestamp` key already present in the event is overwritten.
    pub fn append_at<T: Serialize>(&self, event: &T, timestamp_ms: u64) -> Result<(), SessionError> {
        let mut value = serde_json::to_value(event)?;
        match value.as_object_mut() {
            Some(map) => {
                map.insert("timestamp".to_string(), Value::from(timestamp_ms));
            }
            None => {
                return Err(SessionError::EventNotObject {
                    kind: json_kind(&value).to_string(),
                })
            }
        }

        let mut line = serde_json::to_string(&value)?;
        line.push('\n');

        let io_err = |err: std::io::Error| SessionError::LogIo {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).map_err(io_err)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn appends_one_line_per_event_with_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::open(dir.path().join("nested/deeper/session.jsonl")).unwrap();

        log.append(&json!({"event": "start"})).unwrap();
        log.append_at(&json!({"event": "frame", "label": "NOTE_C4"}), 1234)
            .unwrap();

        let lines = read_lines(log.path());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "start");
        assert!(lines[0]["timestamp"].as_u64().unwrap() > 1_600_000_000_000);
        assert_eq!(lines[1]["label"], "NOTE_C4");
        assert_eq!(lines[1]["timestamp"], 1234);
    }

    #[test]
    fn keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        fs::write(&path, "{\"event\":\"old\"}\n").unwrap();

        let log = SessionLog::open(&path).unwrap();
        log.append_at(&json!({"event": "new"}), 1).unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines[0]["event"], "old");
        assert_eq!(lines[1]["event"], "new");
    }

    #[test]
    fn timestamp_overrides_caller_field() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::open(dir.path().join("s.jsonl")).unwrap();
        log.append_at(&json!({"timestamp": 1}), 99).unwrap();
        assert_eq!(read_lines(log.path())[0]["timestamp"], 99);
    }

    #[test]
    fn rejects_non_object_events() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::open(dir.path().join("s.jsonl")).unwrap();

        let err = log.append(&vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            SessionError::EventNotObject {
                kind: "array".to_string()
            }
        );
        assert!(!log.path().exists());
    }

    #[test]
    fn unwritable_path_is_log_io() {
        let dir = tempfile::tempdir().unwrap();
        // The log path is an existing directory
        let log = SessionLog::open(dir.path()).unwrap();
        let err = log.append(&json!({"event": "x"})).unwrap_err();
        assert!(matches!(err, SessionError::LogIo { .. }));
    }
}
