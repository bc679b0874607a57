use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use guided_piano::audio::open_player;
use guided_piano::clock::ManualClock;
use guided_piano::config::AppConfig;
use guided_piano::fixtures::{ExpectationDiff, FixtureCatalog, FixtureReplayer, ReplayOutcome};
use guided_piano::input::fingers::DEFAULT_SUSTAIN_MS;
use guided_piano::input::{finger_chord_label, FingerChordPlayer, StubClassifier};
use guided_piano::lesson::presets;
use guided_piano::notes::{midi_or_fallback, notes_for, KNOWN_LABELS};
use guided_piano::session::ModeKind;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "guided_piano_cli",
    about = "Deterministic lesson replay harness for Guided Piano"
)]
struct Cli {
    /// Override directory containing fixture scripts (defaults to ./fixtures)
    #[arg(long)]
    fixtures_dir: Option<PathBuf>,
    /// JSON config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Comma separated lesson or preset name (default, d-major)
    #[arg(long)]
    lesson: Option<String>,
    /// Pin the coach to level 1 / 60 bpm before every frame
    #[arg(long)]
    lock_level: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Tutorial,
    FreePlay,
    Challenge,
}

impl From<ModeArg> for ModeKind {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Tutorial => ModeKind::Tutorial,
            ModeArg::FreePlay => ModeKind::FreePlay,
            ModeArg::Challenge => ModeKind::Challenge,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a fixture script and optionally compare against expectations
    Replay {
        #[arg(long)]
        fixture: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Tutorial)]
        mode: ModeArg,
        #[arg(long)]
        expect: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Append every frame to this NDJSON session log
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Stream frames produced by the stub classifier to stdout
    Stub {
        #[arg(long, default_value_t = 10)]
        frames: usize,
        #[arg(long, value_enum, default_value_t = ModeArg::Tutorial)]
        mode: ModeArg,
    },
    /// Map a raised-finger pattern (thumb..pinky, e.g. 01000) to its chord
    Fingers { pattern: String },
    /// Play chords for a sequence of raised-finger readings, one per frame
    FingerChords {
        #[arg(long, default_value_t = 100)]
        frame_ms: u64,
        #[arg(long, default_value_t = DEFAULT_SUSTAIN_MS)]
        sustain_ms: u64,
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// List every known label with its notes
    Labels,
    /// List available fixtures on disk
    DumpFixtures,
}

fn main() -> ExitCode {
    guided_piano::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let catalog = cli
        .fixtures_dir
        .clone()
        .map(FixtureCatalog::new)
        .unwrap_or_default();
    let config = build_config(&cli)?;

    match cli.command {
        Commands::Replay {
            fixture,
            mode,
            expect,
            output,
            log,
        } => run_replay(&catalog, config, &fixture, mode.into(), expect, output, log),
        Commands::Stub { frames, mode } => run_stub(config, frames, mode.into()),
        Commands::Fingers { pattern } => run_fingers(&pattern),
        Commands::FingerChords {
            frame_ms,
            sustain_ms,
            patterns,
        } => run_finger_chords(&config, frame_ms, sustain_ms, &patterns),
        Commands::Labels => run_labels(),
        Commands::DumpFixtures => run_dump(&catalog),
    }
}

fn build_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::default(),
    };
    if let Some(lesson) = &cli.lesson {
        config.tutorial.lesson = match presets::named_lesson(lesson) {
            Some(preset) => preset,
            None => presets::parse_lesson(lesson).context("parsing --lesson")?,
        };
    }
    if cli.lock_level {
        config.session.lock_level = true;
    }
    Ok(config)
}

fn run_replay(
    catalog: &FixtureCatalog,
    config: AppConfig,
    fixture: &str,
    mode: ModeKind,
    override_expect: Option<PathBuf>,
    output_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let data = catalog
        .load(fixture, override_expect)
        .with_context(|| format!("loading fixture {}", fixture))?;
    let outcome = FixtureReplayer::new(config, mode)
        .with_event_log(log_path)
        .run(&data);

    emit_report(&outcome, output_path)?;

    if let Some(expectations) = data.expectations {
        match expectations.verify(&outcome.summary) {
            Ok(()) => Ok(ExitCode::from(0)),
            Err(diff) => {
                emit_diff(&diff)?;
                Ok(ExitCode::from(2))
            }
        }
    } else {
        Ok(ExitCode::from(0))
    }
}

fn run_stub(config: AppConfig, frames: usize, mode: ModeKind) -> Result<ExitCode> {
    let mut stub = StubClassifier::default();
    let outcome = FixtureReplayer::new(config, mode).run_source("stub", &mut stub, Some(frames));

    for frame in &outcome.frames {
        println!("{}", serde_json::to_string(frame)?);
    }
    Ok(ExitCode::from(0))
}

fn parse_fingers(pattern: &str) -> Result<[bool; 5]> {
    let digits: Vec<char> = pattern.chars().collect();
    if digits.len() != 5 || digits.iter().any(|c| *c != '0' && *c != '1') {
        return Err(anyhow!(
            "finger pattern must be five 0/1 digits (thumb..pinky), got '{}'",
            pattern
        ));
    }
    let mut raised = [false; 5];
    for (slot, digit) in raised.iter_mut().zip(&digits) {
        *slot = *digit == '1';
    }
    Ok(raised)
}

fn run_fingers(pattern: &str) -> Result<ExitCode> {
    let raised = parse_fingers(pattern)?;
    let (label, confidence) = finger_chord_label(raised);
    let payload = serde_json::json!({
        "label": label,
        "confidence": confidence,
        "notes": notes_for(label),
    });
    println!("{}", serde_json::to_string(&payload)?);
    Ok(ExitCode::from(0))
}

fn run_finger_chords(
    config: &AppConfig,
    frame_ms: u64,
    sustain_ms: u64,
    patterns: &[String],
) -> Result<ExitCode> {
    let readings = patterns
        .iter()
        .map(|pattern| parse_fingers(pattern))
        .collect::<Result<Vec<_>>>()?;

    let clock = ManualClock::new(0);
    let player = open_player(&config.sound);
    let mut fingers = FingerChordPlayer::with_sustain(Box::new(clock.clone()), sustain_ms);
    for raised in readings {
        let frame = fingers.update(player.as_ref(), raised);
        println!("{}", serde_json::to_string(&frame)?);
        clock.advance(frame_ms);
    }
    Ok(ExitCode::from(0))
}

fn run_labels() -> Result<ExitCode> {
    for label in KNOWN_LABELS {
        let notes = notes_for(label);
        let midi: Vec<String> = notes
            .iter()
            .map(|note| midi_or_fallback(note).to_string())
            .collect();
        println!("{label}: {} (midi {})", notes.join(" "), midi.join(" "));
    }
    Ok(ExitCode::from(0))
}

fn run_dump(catalog: &FixtureCatalog) -> Result<ExitCode> {
    let fixtures = catalog.discover()?;
    if fixtures.is_empty() {
        println!("No fixtures found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in fixtures {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn emit_report(outcome: &ReplayOutcome, output_path: Option<PathBuf>) -> Result<()> {
    let report = ReplayReportPayload {
        summary: &outcome.summary,
        frames: &outcome.frames,
    };
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct ReplayReportPayload<'a> {
    #[serde(flatten)]
    summary: &'a guided_piano::fixtures::ReplaySummary,
    frames: &'a [guided_piano::session::FrameReport],
}
