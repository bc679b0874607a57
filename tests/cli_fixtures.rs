use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_guided_piano_cli"))
}

fn fixture_file(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout UTF-8");
    serde_json::from_str(stdout.trim()).expect("replay report JSON payload")
}

#[test]
fn replay_fixture_succeeds() {
    let output = cli()
        .args(["replay", "--fixture", "default_lesson"])
        .output()
        .expect("failed to run guided_piano_cli replay");
    assert!(
        output.status.success(),
        "CLI exited with {:?}: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let json = stdout_json(&output);
    assert_eq!(json["fixture"], "default_lesson");
    assert_eq!(json["mode"], "tutorial");
    assert_eq!(json["final_index"], 4);
    assert_eq!(json["done"], true);
    assert_eq!(json["frame_count"], 22);
    assert_eq!(json["frames"].as_array().map(Vec::len), Some(22));
    assert_eq!(json["frames"][0]["cue"]["cue"], "miss");
}

#[test]
fn replay_fixture_detects_mismatch() {
    let output = cli()
        .args([
            "replay",
            "--fixture",
            "default_lesson",
            "--expect",
            &fixture_file("default_lesson_incorrect.expect.json"),
        ])
        .output()
        .expect("failed to run mismatch replay");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(
        stderr.contains("\"failures\""),
        "expected diff JSON in stderr, got {stderr}"
    );
    assert!(stderr.contains("\"final_index\""), "{stderr}");
}

#[test]
fn held_gesture_fixture_advances_once() {
    let output = cli()
        .args(["replay", "--fixture", "held_gesture"])
        .output()
        .expect("failed to run held_gesture replay");
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["advances"], 1);
    assert_eq!(json["notes_played"], 1);
}

#[test]
fn free_play_fixture_plays_confident_chords() {
    let output = cli()
        .args(["replay", "--fixture", "free_play_chords", "--mode", "free-play"])
        .output()
        .expect("failed to run free play replay");
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["mode"], "free_play");
    assert_eq!(json["notes_played"], 3);
    assert_eq!(json["frames"][0]["frame"]["played"][2], "G4");
    assert_eq!(json["frames"][1]["frame"]["played"].as_array().map(Vec::len), Some(0));
}

#[test]
fn replay_writes_output_and_session_log() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("report.json");
    let log_path = dir.path().join("logs/session.jsonl");

    let output = cli()
        .args(["replay", "--fixture", "held_gesture", "--output"])
        .arg(&report_path)
        .arg("--log")
        .arg(&log_path)
        .output()
        .expect("failed to run replay with output");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["fixture"], "held_gesture");

    let log = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<Value> = log
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 10);
    assert!(lines.iter().all(|line| line["timestamp"].is_u64()));
}

#[test]
fn lesson_flag_overrides_steps() {
    let output = cli()
        .args(["--lesson", "NOTE_C4", "stub", "--frames", "2"])
        .output()
        .expect("failed to run stub with --lesson");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let first: Value = serde_json::from_str(stdout.lines().next().unwrap_or_default()).unwrap();
    assert_eq!(first["frame"]["done"], true);
    assert_eq!(first["progress_percent"], 100);

    // A custom lesson changes the outcome, so the stored expectation no longer holds
    let mismatch = cli()
        .args(["--lesson", "NOTE_C4", "replay", "--fixture", "held_gesture"])
        .output()
        .expect("failed to run replay with --lesson");
    assert_eq!(mismatch.status.code(), Some(2));
}

#[test]
fn missing_fixture_fails() {
    let output = cli()
        .args(["replay", "--fixture", "no_such_fixture"])
        .output()
        .expect("failed to run replay");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn stub_streams_requested_frames() {
    let output = cli()
        .args(["stub", "--frames", "3"])
        .output()
        .expect("failed to run stub");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let frames: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|f| f["frame"]["pred"] == "NOTE_C4"));
    assert_eq!(frames[0]["advanced"], true);
    assert_eq!(frames[1]["advanced"], false);
}

#[test]
fn labels_lists_note_table() {
    let output = cli().arg("labels").output().expect("failed to run labels");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    assert!(stdout.contains("C_CHORD: C4 E4 G4 (midi 60 64 67)"), "{stdout}");
    assert!(
        stdout.contains("CHORD_FSHARP_MINOR: F#4 A4 C#5 (midi 66 69 73)"),
        "{stdout}"
    );
}

#[test]
fn fingers_maps_lowest_raised_finger() {
    let output = cli()
        .args(["fingers", "00110"])
        .output()
        .expect("failed to run fingers");
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["label"], "CHORD_FSHARP_MINOR");
    assert_eq!(json["notes"][0], "F#4");

    let bad = cli().args(["fingers", "12"]).output().unwrap();
    assert_eq!(bad.status.code(), Some(1));
}

#[test]
fn dump_fixtures_lists_assets() {
    let output = cli()
        .arg("dump-fixtures")
        .output()
        .expect("failed to run dump-fixtures");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    assert!(
        stdout.contains("default_lesson ->"),
        "expected fixture listing, got {stdout}"
    );
    assert!(stdout.contains("held_gesture"), "{stdout}");
    assert!(!stdout.contains("incorrect"), "{stdout}");
}

#[test]
fn finger_chords_trigger_on_new_fingers() {
    let output = cli()
        .args([
            "finger-chords",
            "--frame-ms",
            "1000",
            "10000",
            "10100",
            "00000",
            "00000",
            "10000",
        ])
        .output()
        .expect("failed to run finger-chords");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let frames: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[0]["started"][0], "CHORD_D_MAJOR");
    assert_eq!(frames[1]["started"][0], "CHORD_FSHARP_MINOR");
    assert_eq!(frames[1]["started"].as_array().map(Vec::len), Some(1));
    // Thumb is down at 2 s, two seconds after it started
    assert_eq!(frames[2]["active"].as_array().map(Vec::len), Some(1));
    assert_eq!(frames[3]["active"].as_array().map(Vec::len), Some(0));
    assert_eq!(frames[4]["started"][0], "CHORD_D_MAJOR");
}
