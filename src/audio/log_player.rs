//! Log-only sound backend
//!
//! Used when no audio device or output directory is available. The lesson
//! still runs; each trigger becomes a log line.

use super::SoundPlayer;

/// Writes each trigger to the log instead of sounding it
#[derive(Debug, Clone, Default)]
pub struct LogPlayer {
    silent: bool,
}

impl LogPlayer {
    pub fn new() -> Self {
        Self { silent: false }
    }

    /// Player that drops every trigger without logging
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

impl SoundPlayer for LogPlayer {
    fn play_notes(&self, notes: &[&str], duration_secs: f32) {
        if !self.silent {
            log::info!("[SOUND] {:?} for {:.2}s", notes, duration_secs);
        }
    }

    fn name(&self) -> &'static str {
        if self.silent {
            "silent"
        } else {
            "log"
        }
    }
}
