//! Integration tests across the public API
//!
//! These tests drive whole sessions the way a front end would:
//! - Fixture replays checked against their stored expectations
//! - The finger-chord lesson fed from raised-finger readings
//! - Sound backends selected through configuration
//! - Config files loaded from disk

use std::sync::Arc;

use guided_piano::audio::{open_player, RecordingPlayer};
use guided_piano::clock::ManualClock;
use guided_piano::config::{AppConfig, SoundBackendKind, SoundConfig};
use guided_piano::fixtures::{FixtureCatalog, FixtureReplayer};
use guided_piano::input::{finger_chord_label, Observation};
use guided_piano::lesson::presets;
use guided_piano::session::{ModeFrame, ModeKind, TrainingSession};
use guided_piano::telemetry::{LessonEvent, TelemetryCollector};

fn raised(finger: usize) -> [bool; 5] {
    let mut fingers = [false; 5];
    fingers[finger] = true;
    fingers
}

#[test]
fn test_tutorial_fixtures_meet_expectations() {
    let catalog = FixtureCatalog::default();
    for name in ["default_lesson", "held_gesture"] {
        let data = catalog.load(name, None).expect("fixture loads");
        let outcome = FixtureReplayer::new(AppConfig::default(), ModeKind::Tutorial).run(&data);
        let expectations = data.expectations.expect("fixture has expectations");
        if let Err(diff) = expectations.verify(&outcome.summary) {
            panic!("{name} diverged: {}", diff.to_json());
        }
    }
}

#[test]
fn test_free_play_fixture_meets_expectations() {
    let data = FixtureCatalog::default()
        .load("free_play_chords", None)
        .expect("fixture loads");
    let outcome = FixtureReplayer::new(AppConfig::default(), ModeKind::FreePlay).run(&data);
    assert!(data
        .expectations
        .expect("fixture has expectations")
        .verify(&outcome.summary)
        .is_ok());
}

#[test]
fn test_finger_chord_lesson_end_to_end() {
    let mut config = AppConfig::default();
    config.tutorial.lesson = presets::d_major_finger_lesson();
    let clock = ManualClock::new(0);
    let player = RecordingPlayer::new();
    let telemetry = Arc::new(TelemetryCollector::new(32, 128));
    let mut session = TrainingSession::new(
        config,
        ModeKind::Tutorial,
        Box::new(player.clone()),
        Arc::new(clock.clone()),
    )
    .with_telemetry(Arc::clone(&telemetry));

    for finger in 0..5 {
        clock.advance(1_000);
        let (label, confidence) = finger_chord_label(raised(finger));
        let report = session.process(&Observation::new(label, confidence, 250));
        assert!(report.advanced, "finger {finger} should advance");

        for _ in 0..5 {
            let (label, confidence) = finger_chord_label([false; 5]);
            session.process(&Observation::new(label, confidence, 33));
        }
    }

    assert_eq!(session.target_label(), None);
    let played: Vec<Vec<String>> = player.played().into_iter().map(|p| p.notes).collect();
    assert_eq!(played.len(), 5);
    assert_eq!(played[0], vec!["D4", "F#4", "A4"]);
    assert_eq!(played[4], vec!["A4", "C#5", "E5"]);
    assert!(telemetry
        .snapshot()
        .recent
        .iter()
        .any(|event| matches!(event, LessonEvent::LessonComplete { steps: 5, .. })));

    let coach = session.coach().summary();
    assert_eq!(coach.accuracy, 1.0);
    assert_eq!(coach.level, 6);
    assert_eq!(coach.tempo_bpm, 85);
}

#[test]
fn test_challenge_session_wraps_patterns() {
    let mut config = AppConfig::default();
    config.challenge.seed = Some(11);
    let player = RecordingPlayer::new();
    let mut session = TrainingSession::new(
        config,
        ModeKind::Challenge,
        Box::new(player.clone()),
        Arc::new(ManualClock::new(0)),
    )
    .with_telemetry(Arc::new(TelemetryCollector::default()));

    // Always show whatever is asked for; two full patterns take at most six frames
    let mut targets = Vec::new();
    for _ in 0..6 {
        let target = session.target_label().map(str::to_string).expect("challenge target");
        let report = session.process(&Observation::new(target.clone(), 0.9, 100));
        assert!(report.advanced);
        match report.frame {
            ModeFrame::Challenge(frame) => assert_eq!(frame.target, target),
            other => panic!("expected challenge frame, got {other:?}"),
        }
        targets.push(target);
    }

    assert_eq!(player.played().len(), 6);
    assert!(player.played().iter().all(|p| p.duration_secs == 0.25));
    assert_eq!(session.coach().metrics().correct_attempts, 6);
}

#[test]
fn test_wav_backend_renders_accepted_steps() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        sound: SoundConfig {
            backend: SoundBackendKind::Wav,
            wav_dir: Some(dir.path().join("renders")),
            amplitude: 0.5,
        },
        ..AppConfig::default()
    };
    let player = open_player(&config.sound);
    assert_eq!(player.name(), "wav");

    let mut session = TrainingSession::new(
        config,
        ModeKind::FreePlay,
        player,
        Arc::new(ManualClock::new(0)),
    )
    .with_telemetry(Arc::new(TelemetryCollector::default()));
    session.process(&Observation::new("C_CHORD", 0.9, 100));
    session.process(&Observation::new("THUMBS_UP", 0.9, 100));
    session.process(&Observation::new("NOTE_E4", 0.9, 100));

    let mut files: Vec<_> = std::fs::read_dir(dir.path().join("renders"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with(".wav"));
}

#[test]
fn test_config_file_drives_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guided_piano.json");
    std::fs::write(
        &path,
        r#"{
            "tutorial": {"lesson": ["G_CHORD"], "release_frames": 2},
            "sound": {"backend": "silent"},
            "session": {"lock_level": true}
        }"#,
    )
    .unwrap();

    let config = AppConfig::load_from_file(&path);
    assert_eq!(config.sound.backend, SoundBackendKind::Silent);
    let mut session = TrainingSession::from_config(config, ModeKind::Tutorial)
        .with_telemetry(Arc::new(TelemetryCollector::default()));
    assert_eq!(session.player_name(), "silent");
    assert_eq!(session.target_label(), Some("G_CHORD"));

    let report = session.process(&Observation::new("G_CHORD", 0.9, 100));
    assert!(matches!(report.frame, ModeFrame::Tutorial(ref frame) if frame.done));
}
