// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
//! End-to-end tests for the `vnotify` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn vnotify() -> Command {
    Command::cargo_bin("vnotify").unwrap()
}

#[test]
fn run_prints_frames_as_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.json");
    fs::write(
        &script,
        r#"[
            {"at": 0, "op": "report", "text": "Saved", "severity": "WARNING"},
            {"at": 0.5, "op": "frame"},
            {"at": 6, "op": "frame"}
        ]"#,
    )
    .unwrap();

    let output = vnotify().arg("run").arg(&script).output().unwrap();
    assert!(output.status.success());
    let lines: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let events: Vec<&str> = lines.iter().map(|l| l["event"].as_str().unwrap()).collect();
    assert_eq!(events, vec!["console", "frame", "expired", "frame"]);
    assert_eq!(lines[1]["ops"][1]["text"], "Saved");
    assert!(lines[3]["ops"].as_array().unwrap().is_empty());
}

#[test]
fn run_uses_settings_file_with_legacy_keys() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.json");
    fs::write(
        &settings,
        r#"{
            "basic": {"module_name": "Core", "use_module_name": true, "show_notification_type": true},
            "notification_draw": {"notification_text_size": 20}
        }"#,
    )
    .unwrap();
    let script = dir.path().join("script.json");
    fs::write(
        &script,
        r#"[{"op": "report", "text": "Saved", "duration": 0}, {"op": "frame"}]"#,
    )
    .unwrap();

    vnotify()
        .arg("run")
        .arg(&script)
        .arg("--settings")
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""text":"(Core) INFO: Saved""#))
        .stdout(predicate::str::contains(r#""size":20"#));
}

#[test]
fn run_fails_on_non_string_text() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.json");
    fs::write(&script, r#"[{"op": "report", "text": 42}]"#).unwrap();

    vnotify()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a string"));
}

#[test]
fn settings_init_then_show_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    vnotify()
        .args(["settings", "init", "--path"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    vnotify()
        .args(["settings", "init", "--path"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    vnotify()
        .args(["settings", "show", "--path"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"module_name\": \"My Module\""))
        .stdout(predicate::str::contains("notification_draw"));
}

#[test]
fn settings_show_rejects_out_of_range_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"notification_draw": {"start_x": 0.9, "end_x": 0.2}}"#).unwrap();

    vnotify()
        .args(["settings", "show", "--path"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid settings"));
}
