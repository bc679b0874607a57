// Built-in lesson content

use crate::error::SessionError;

/// Default tutorial: three single notes then a C major chord
pub const DEFAULT_LESSON: [&str; 4] = ["NOTE_C4", "NOTE_D4", "NOTE_E4", "C_CHORD"];

/// Finger-chord tutorial for the raised-finger detector (thumb to pinky)
pub const D_MAJOR_FINGER_LESSON: [&str; 5] = [
    "CHORD_D_MAJOR",
    "CHORD_E_MINOR",
    "CHORD_FSHARP_MINOR",
    "CHORD_G_MAJOR",
    "CHORD_A_MAJOR",
];

pub fn default_lesson() -> Vec<String> {
    DEFAULT_LESSON.iter().map(|s| s.to_string()).collect()
}

pub fn d_major_finger_lesson() -> Vec<String> {
    D_MAJOR_FINGER_LESSON.iter().map(|s| s.to_string()).collect()
}

/// Patterns challenge mode picks from
pub fn challenge_patterns() -> Vec<Vec<String>> {
    vec![
        vec!["NOTE_C4".into(), "NOTE_D4".into(), "NOTE_E4".into()],
        vec!["G_CHORD".into(), "C_CHORD".into()],
    ]
}

/// Resolve a lesson by preset name
pub fn named_lesson(name: &str) -> Option<Vec<String>> {
    match name {
        "default" | "notes" => Some(default_lesson()),
        "d-major" | "fingers" => Some(d_major_finger_lesson()),
        _ => None,
    }
}

/// Parse a comma separated lesson ("NOTE_C4, NOTE_D4,C_CHORD")
pub fn parse_lesson(text: &str) -> Result<Vec<String>, SessionError> {
    let steps: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if steps.is_empty() {
        return Err(SessionError::EmptyLesson);
    }
    Ok(steps)
}
