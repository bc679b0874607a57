// Guided Piano Core - adaptive gesture-to-music lesson engine
// Frame-driven lesson sequencing, difficulty coaching and sound triggers

// Module declarations
pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod input;
pub mod lesson;
pub mod notes;
pub mod session;
pub mod telemetry;

// Re-exports for convenience
pub use input::Observation;
pub use lesson::{AdaptiveCoach, FreePlayMode, TutorialMode};
pub use session::{FrameReport, ModeKind, TrainingSession};

/// Install the stderr log subscriber
///
/// `log` records are bridged into it. The level comes from `RUST_LOG`
/// (`error`, `warn`, `info`, `debug`, `trace`) and defaults to `warn`.
/// Calling this more than once is harmless.
pub fn init_logging() {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::WARN);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
