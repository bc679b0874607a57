// Lesson module - coach, practice modes and lesson content

pub mod challenge;
pub mod coach;
pub mod free_play;
pub mod presets;
pub mod progress;
pub mod tutorial;

pub use challenge::ChallengeMode;
pub use coach::{AdaptiveCoach, CoachSummary, Metrics};
pub use free_play::FreePlayMode;
pub use progress::{progress_percent, ChallengeFrame, FreePlayFrame, LessonFrame, StepCue, StepPhase};
pub use tutorial::TutorialMode;
