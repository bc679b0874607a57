//! Fixture utilities for the deterministic replay harness.
//!
//! This module discovers observation scripts on disk, parses optional
//! expectation JSON, and replays scripts through a [`TrainingSession`] with a
//! manual clock so results never depend on wall time. It backs the CLI and
//! the integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::audio::RecordingPlayer;
use crate::clock::ManualClock;
use crate::config::AppConfig;
use crate::input::{Observation, ObservationSource, ScriptedSource};
use crate::lesson::CoachSummary;
use crate::session::{ActiveMode, FrameReport, ModeKind, TrainingSession};
use crate::telemetry::TelemetryCollector;

/// Default location for fixture scripts and expectations.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

const SCRIPT_EXTENSION: &str = "jsonl";

/// Seed used for challenge replays when the config leaves it unset.
pub const REPLAY_SEED: u64 = 0x5eed;

/// Metadata describing an available fixture.
#[derive(Clone, Debug)]
pub struct FixtureMetadata {
    pub name: String,
    pub script_path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// Loaded fixture script plus expectations.
pub struct FixtureData {
    pub metadata: FixtureMetadata,
    pub observations: Vec<Observation>,
    pub expectations: Option<FixtureExpectations>,
}

/// JSON expectation schema; only the fields present are checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureExpectations {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub final_index: Option<usize>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub advances: Option<usize>,
    #[serde(default)]
    pub coach_level: Option<u8>,
    #[serde(default)]
    pub notes_played: Option<usize>,
}

impl FixtureExpectations {
    pub fn verify(&self, actual: &ReplaySummary) -> std::result::Result<(), ExpectationDiff> {
        let mut failures = Vec::new();

        check(&mut failures, "final_index", self.final_index, actual.final_index);
        check(&mut failures, "done", self.done, actual.done);
        check(&mut failures, "advances", self.advances, actual.advances);
        check(&mut failures, "coach_level", self.coach_level, actual.coach.level);
        check(&mut failures, "notes_played", self.notes_played, actual.notes_played);

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

fn check<T: PartialEq + Serialize>(
    failures: &mut Vec<ExpectationFailure>,
    field: &'static str,
    expected: Option<T>,
    actual: T,
) {
    if let Some(expected) = expected {
        if expected != actual {
            failures.push(ExpectationFailure {
                field,
                expected: json!(expected),
                actual: json!(actual),
            });
        }
    }
}

/// Outcome of comparing a replay with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> Value {
        json!({
            "failures": self.failures.iter().map(|failure| {
                json!({
                    "field": failure.field,
                    "expected": failure.expected,
                    "actual": failure.actual,
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Detailed diff entry for a single field.
#[derive(Debug)]
pub struct ExpectationFailure {
    pub field: &'static str,
    pub expected: Value,
    pub actual: Value,
}

/// End state of a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub fixture: String,
    pub mode: ModeKind,
    pub frame_count: usize,
    /// Tutorial step index or challenge pattern position after the last frame
    pub final_index: usize,
    pub done: bool,
    pub advances: usize,
    pub notes_played: usize,
    pub coach: CoachSummary,
}

/// Summary plus every frame report, in order.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub summary: ReplaySummary,
    pub frames: Vec<FrameReport>,
}

/// Catalog responsible for discovering fixtures on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all fixtures by their metadata.
    pub fn discover(&self) -> Result<Vec<FixtureMetadata>> {
        let mut fixtures = Vec::new();
        if !self.root.exists() {
            return Ok(fixtures);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) == Some(SCRIPT_EXTENSION) {
                    fixtures.push(self.metadata_for_path(&path)?);
                }
            }
        }

        fixtures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fixtures)
    }

    /// Load a fixture script + expectations for provided name or path.
    pub fn load(&self, fixture: &str, override_expect: Option<PathBuf>) -> Result<FixtureData> {
        let script_path = self.resolve_fixture_path(fixture)?;
        let metadata = self.metadata_for_path(&script_path)?;
        let mut source = ScriptedSource::from_path(&script_path)?;
        let mut observations = Vec::with_capacity(source.remaining());
        while let Some(obs) = source.next_observation() {
            observations.push(obs);
        }

        let expectation_path = override_expect.or(metadata.expect_path.clone());
        let expectations = match expectation_path {
            Some(path) => {
                let json = fs::read_to_string(&path)
                    .with_context(|| format!("reading expectation {}", path.display()))?;
                Some(
                    serde_json::from_str(&json)
                        .with_context(|| format!("parsing {}", path.display()))?,
                )
            }
            None => None,
        };

        Ok(FixtureData {
            metadata,
            observations,
            expectations,
        })
    }

    fn resolve_fixture_path(&self, fixture: &str) -> Result<PathBuf> {
        let as_path = Path::new(fixture);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{fixture}.{SCRIPT_EXTENSION}"));
        if candidate.exists() {
            Ok(candidate)
        } else {
            Err(anyhow!(
                "Fixture '{fixture}' not found in {}",
                self.root.display()
            ))
        }
    }

    fn metadata_for_path(&self, script_path: &Path) -> Result<FixtureMetadata> {
        let name = script_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("Invalid fixture name for {}", script_path.display()))?
            .to_string();
        let expect_path = script_path.with_file_name(format!("{name}.expect.json"));
        Ok(FixtureMetadata {
            name,
            script_path: script_path.to_path_buf(),
            expect_path: expect_path.exists().then_some(expect_path),
        })
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_ROOT)
    }
}

/// Replays observations through a session driven by a manual clock.
///
/// The clock advances by each observation's `reaction_ms` before the frame is
/// processed. Sound goes to a recording player so replays stay silent.
pub struct FixtureReplayer {
    config: AppConfig,
    mode: ModeKind,
}

impl FixtureReplayer {
    pub fn new(mut config: AppConfig, mode: ModeKind) -> Self {
        if config.challenge.seed.is_none() {
            config.challenge.seed = Some(REPLAY_SEED);
        }
        Self { config, mode }
    }

    /// Append every replayed frame to an NDJSON log at `path`
    pub fn with_event_log(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.config.session.event_log = path;
        }
        self
    }

    pub fn run(&self, data: &FixtureData) -> ReplayOutcome {
        let mut source = ScriptedSource::new(data.observations.iter().cloned());
        self.run_source(&data.metadata.name, &mut source, None)
    }

    /// Replay `source` until it ends or `max_frames` frames were processed
    pub fn run_source(
        &self,
        name: &str,
        source: &mut dyn ObservationSource,
        max_frames: Option<usize>,
    ) -> ReplayOutcome {
        let _span = tracing::info_span!("replay", fixture = name, mode = %self.mode).entered();
        let clock = ManualClock::new(0);
        let player = RecordingPlayer::new();
        let mut session = TrainingSession::new(
            self.config.clone(),
            self.mode,
            Box::new(player.clone()),
            Arc::new(clock.clone()),
        )
        .with_telemetry(Arc::new(TelemetryCollector::default()));

        let mut frames = Vec::new();
        while max_frames.map_or(true, |max| frames.len() < max) {
            let Some(obs) = source.next_observation() else {
                break;
            };
            clock.advance(obs.reaction_ms);
            frames.push(session.process(&obs));
        }

        let (final_index, done) = match session.mode() {
            ActiveMode::Tutorial(tutorial) => (tutorial.current_index(), tutorial.is_done()),
            ActiveMode::Challenge(challenge) => (challenge.position(), false),
            ActiveMode::FreePlay(_) => (0, false),
        };

        let summary = ReplaySummary {
            fixture: name.to_string(),
            mode: self.mode,
            frame_count: frames.len(),
            final_index,
            done,
            advances: frames.iter().filter(|frame| frame.advanced).count(),
            notes_played: player.played().len(),
            coach: session.coach().summary(),
        };
        log::info!(
            "[Fixtures] {} replayed: {} frames, {} advances, done={}",
            name,
            summary.frame_count,
            summary.advances,
            summary.done
        );

        ReplayOutcome { summary, frames }
    }
}
