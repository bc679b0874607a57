// TrainingSession - one practice session wiring input to the lesson modes
//
// A session owns the coach, the active mode and the sound output. Each
// observation goes through `process`, which:
// 1. Pins the coach back to entry level when the lock option is set
// 2. Computes the on-screen cue against the target shown *before* the frame
// 3. Hands the observation to the active mode
// 4. Publishes telemetry and appends the frame to the event log
//
// Nothing in here fails a frame. Log and telemetry problems are reported and
// the report is still returned.

pub mod event_log;

pub use event_log::SessionLog;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::audio::{open_player, SoundPlayer};
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::error::{log_session_error, ErrorCode};
use crate::input::{Observation, ObservationSource};
use crate::lesson::{
    AdaptiveCoach, ChallengeFrame, ChallengeMode, FreePlayFrame, FreePlayMode, LessonFrame,
    StepCue, TutorialMode,
};
use crate::notes::notes_for;
use crate::telemetry::{self, ErrorSource, LessonEvent, TelemetryCollector};

/// Which practice mode a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    #[default]
    Tutorial,
    FreePlay,
    Challenge,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModeKind::Tutorial => "tutorial",
            ModeKind::FreePlay => "free-play",
            ModeKind::Challenge => "challenge",
        };
        f.write_str(name)
    }
}

impl FromStr for ModeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tutorial" => Ok(ModeKind::Tutorial),
            "free-play" | "free_play" | "freeplay" => Ok(ModeKind::FreePlay),
            "challenge" => Ok(ModeKind::Challenge),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

/// The mode currently receiving observations
pub enum ActiveMode {
    Tutorial(TutorialMode),
    FreePlay(FreePlayMode),
    Challenge(ChallengeMode),
}

impl ActiveMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            ActiveMode::Tutorial(_) => ModeKind::Tutorial,
            ActiveMode::FreePlay(_) => ModeKind::FreePlay,
            ActiveMode::Challenge(_) => ModeKind::Challenge,
        }
    }
}

/// Mode-specific frame result, tagged with the mode name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ModeFrame {
    Tutorial(LessonFrame),
    FreePlay(FreePlayFrame),
    Challenge(ChallengeFrame),
}

/// Everything a display needs after one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame: ModeFrame,
    /// Pre-check cue (tutorial only)
    pub cue: Option<StepCue>,
    /// Lesson progress after the frame (tutorial only)
    pub progress_percent: Option<u8>,
    /// Coach feedback against the pre-frame target
    pub hint: Option<String>,
    /// Whether the frame moved the lesson or pattern forward
    pub advanced: bool,
}

pub struct TrainingSession {
    config: AppConfig,
    coach: AdaptiveCoach,
    mode: ActiveMode,
    player: Box<dyn SoundPlayer>,
    clock: Arc<dyn Clock + Sync>,
    event_log: Option<SessionLog>,
    telemetry: Arc<TelemetryCollector>,
    frames_processed: u64,
}

impl TrainingSession {
    /// Create a session with explicit collaborators
    ///
    /// # Arguments
    /// * `config` - Lesson and session settings
    /// * `kind` - Mode to start in
    /// * `player` - Sound output for accepted steps
    /// * `clock` - Time source for tutorial debounce
    pub fn new(
        config: AppConfig,
        kind: ModeKind,
        player: Box<dyn SoundPlayer>,
        clock: Arc<dyn Clock + Sync>,
    ) -> Self {
        let event_log = config
            .session
            .event_log
            .as_ref()
            .and_then(|path| match SessionLog::open(path.clone()) {
                Ok(event_log) => Some(event_log),
                Err(err) => {
                    log_session_error(&err, "TrainingSession::new");
                    log::warn!("[Session] Continuing without an event log");
                    None
                }
            });

        let mode = build_mode(kind, &config, &clock);
        log::info!(
            "[Session] Starting {} session with {} sound backend",
            kind,
            player.name()
        );

        Self {
            config,
            coach: AdaptiveCoach::new(),
            mode,
            player,
            clock,
            event_log,
            telemetry: telemetry::hub(),
            frames_processed: 0,
        }
    }

    /// Create a session with the configured sound backend and the wall clock
    pub fn from_config(config: AppConfig, kind: ModeKind) -> Self {
        let player = open_player(&config.sound);
        Self::new(config, kind, player, Arc::new(SystemClock))
    }

    /// Publish to `collector` instead of the global hub
    pub fn with_telemetry(mut self, collector: Arc<TelemetryCollector>) -> Self {
        self.telemetry = collector;
        self
    }

    /// Append frames to `event_log`, replacing any configured log
    pub fn with_event_log(mut self, event_log: SessionLog) -> Self {
        self.event_log = Some(event_log);
        self
    }

    /// Run one observation through the active mode
    pub fn process(&mut self, obs: &Observation) -> FrameReport {
        if self.config.session.lock_level {
            self.coach.pin_to_entry_level();
        }
        let tempo_before = self.coach.tempo_bpm();
        let level_before = self.coach.level();

        let label = obs.label.as_str();
        let mut events = Vec::new();

        let report = match &mut self.mode {
            ActiveMode::Tutorial(tutorial) => {
                let target_before = tutorial.target_label().map(str::to_string);
                let index_before = tutorial.current_index();
                let cue = StepCue::evaluate(target_before.as_deref(), label, obs.confidence);

                let frame = tutorial.handle_observation(
                    &mut self.coach,
                    self.player.as_ref(),
                    label,
                    obs.confidence,
                    obs.reaction_ms,
                );

                let advanced = tutorial.current_index() > index_before;
                if let (true, Some(target)) = (advanced, target_before.as_deref()) {
                    push_advance_events(
                        &mut events,
                        target,
                        tutorial.current_index(),
                        tutorial.lesson().len(),
                    );
                    if frame.done {
                        events.push(LessonEvent::LessonComplete {
                            steps: tutorial.lesson().len(),
                            accuracy: frame.coach.accuracy,
                        });
                    }
                }

                FrameReport {
                    hint: target_before
                        .as_deref()
                        .map(|target| self.coach.hint(label, target)),
                    cue: Some(cue),
                    progress_percent: Some(tutorial.progress_percent()),
                    advanced,
                    frame: ModeFrame::Tutorial(frame),
                }
            }
            ActiveMode::FreePlay(free_play) => {
                let frame = free_play.handle_observation(self.player.as_ref(), label, obs.confidence);
                if !frame.played.is_empty() {
                    events.push(LessonEvent::NotesPlayed {
                        label: label.to_string(),
                        notes: frame.played.clone(),
                    });
                }
                FrameReport {
                    frame: ModeFrame::FreePlay(frame),
                    cue: None,
                    progress_percent: None,
                    hint: None,
                    advanced: false,
                }
            }
            ActiveMode::Challenge(challenge) => {
                let position_before = challenge.position();
                let pattern_len = challenge.pattern().len();
                let rounds_before = challenge.rounds_completed();

                let frame = challenge.handle_observation(
                    &mut self.coach,
                    self.player.as_ref(),
                    label,
                    obs.confidence,
                    obs.reaction_ms,
                );

                let advanced = challenge.position() != position_before
                    || challenge.rounds_completed() != rounds_before;
                if advanced {
                    push_advance_events(
                        &mut events,
                        &frame.target,
                        position_before + 1,
                        pattern_len,
                    );
                }

                FrameReport {
                    hint: Some(self.coach.hint(label, &frame.target)),
                    cue: None,
                    progress_percent: None,
                    advanced,
                    frame: ModeFrame::Challenge(frame),
                }
            }
        };

        if self.coach.tempo_bpm() != tempo_before || self.coach.level() != level_before {
            events.push(LessonEvent::DifficultyChanged {
                tempo_bpm: self.coach.tempo_bpm(),
                level: self.coach.level(),
            });
        }

        for event in events {
            self.telemetry.publish(event);
        }
        self.frames_processed += 1;
        self.write_event(&report);
        report
    }

    /// Feed every observation from `source` (at most `max_frames`)
    pub fn run(
        &mut self,
        source: &mut dyn ObservationSource,
        max_frames: Option<usize>,
    ) -> Vec<FrameReport> {
        let mut reports = Vec::new();
        while max_frames.map_or(true, |max| reports.len() < max) {
            let Some(obs) = source.next_observation() else {
                break;
            };
            reports.push(self.process(&obs));
        }
        log::debug!(
            "[Session] {} frames from {} source",
            reports.len(),
            source.name()
        );
        reports
    }

    fn write_event(&self, report: &FrameReport) {
        let Some(event_log) = &self.event_log else {
            return;
        };
        let stamped = self.clock.now_ms();
        if let Err(err) = event_log.append_at(report, stamped) {
            log_session_error(&err, "TrainingSession::process");
            log::warn!(
                "[Session] Frame {} at {} ms was not logged",
                self.frames_processed,
                stamped
            );
            self.telemetry
                .record_error(ErrorSource::SessionLog, err.code(), err.message());
        }
    }

    /// Start over: fresh coach and the current mode from its first step
    pub fn reset(&mut self) {
        self.coach = AdaptiveCoach::new();
        self.mode = build_mode(self.mode.kind(), &self.config, &self.clock);
        self.frames_processed = 0;
        log::info!("[Session] Reset {} session", self.mode.kind());
    }

    /// Switch to another mode; the coach keeps its statistics
    pub fn switch_mode(&mut self, kind: ModeKind) {
        log::info!("[Session] Switching {} -> {}", self.mode.kind(), kind);
        self.mode = build_mode(kind, &self.config, &self.clock);
    }

    /// Current target, if the active mode has one
    pub fn target_label(&self) -> Option<&str> {
        match &self.mode {
            ActiveMode::Tutorial(tutorial) => tutorial.target_label(),
            ActiveMode::FreePlay(_) => None,
            ActiveMode::Challenge(challenge) => Some(challenge.target_label()),
        }
    }

    /// Notes the current target would sound
    pub fn target_notes(&self) -> &'static [&'static str] {
        self.target_label().map(notes_for).unwrap_or(&[])
    }

    pub fn coach(&self) -> &AdaptiveCoach {
        &self.coach
    }

    pub fn mode(&self) -> &ActiveMode {
        &self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn player_name(&self) -> &'static str {
        self.player.name()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}

fn build_mode(kind: ModeKind, config: &AppConfig, clock: &Arc<dyn Clock + Sync>) -> ActiveMode {
    match kind {
        ModeKind::Tutorial => ActiveMode::Tutorial(TutorialMode::from_config(
            &config.tutorial,
            Box::new(Arc::clone(clock)),
        )),
        ModeKind::FreePlay => ActiveMode::FreePlay(FreePlayMode::from_config(&config.free_play)),
        ModeKind::Challenge => ActiveMode::Challenge(ChallengeMode::from_config(&config.challenge)),
    }
}

fn push_advance_events(events: &mut Vec<LessonEvent>, target: &str, index: usize, lesson_len: usize) {
    events.push(LessonEvent::StepAdvanced {
        target: target.to_string(),
        index,
        lesson_len,
    });
    let notes = notes_for(target);
    if !notes.is_empty() {
        events.push(LessonEvent::NotesPlayed {
            label: target.to_string(),
            notes: notes.iter().map(|n| n.to_string()).collect(),
        });
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
