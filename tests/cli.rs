use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn temp_workspace() -> TempDir {
    tempfile::tempdir().expect("create tempdir")
}

fn ibpe() -> Command {
    Command::cargo_bin("ibpe").expect("binary exists")
}

#[test]
fn train_then_status_round_trip() {
    let workspace = temp_workspace();
    let input_path = workspace.path().join("input.bin");
    fs::write(&input_path, b"abababab".repeat(8)).expect("write input");

    ibpe()
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "train",
            "demo",
            "260",
            "run.vocab",
            "input.bin",
            "--no-progress",
        ])
        .assert()
        .success();

    let stdout = ibpe()
        .current_dir(workspace.path())
        .args(["status", "run.vocab"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(stdout).expect("status output is UTF-8");
    assert!(text.ends_with('\n'), "status output is newline-terminated");
    assert_eq!(text.lines().count(), 1, "status output is a single line");

    let doc: Value = serde_json::from_str(text.trim_end()).expect("status output is valid JSON");
    assert_eq!(doc["complete"], Value::Bool(true));
    assert_eq!(doc["desired_size"], 260);
    let vocab = doc["vocab"].as_array().expect("vocab array");
    assert_eq!(vocab.len(), 4);
    assert_eq!(vocab[0]["b1"], 97);
    assert_eq!(vocab[0]["b2"], 98);
    assert_eq!(vocab[0]["rep"], 256);
    assert_eq!(vocab[3]["rep"], 259);
}

#[test]
fn mode_token_is_case_insensitive() {
    let workspace = temp_workspace();
    let input_path = workspace.path().join("input.bin");
    fs::write(&input_path, [7u8; 16]).expect("write input");

    ibpe()
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "TRAIN",
            "demo",
            "258",
            "caps.vocab",
            "input.bin",
            "--no-progress",
        ])
        .assert()
        .success();

    let stdout = ibpe()
        .current_dir(workspace.path())
        .args(["STATUS", "caps.vocab"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let doc: Value = serde_json::from_slice(&stdout).expect("status output is valid JSON");
    assert_eq!(doc["vocab"].as_array().expect("vocab array").len(), 2);
}

#[test]
fn missing_input_files_are_skipped() {
    let workspace = temp_workspace();
    let present = workspace.path().join("present.bin");
    fs::write(&present, b"xyxyxyxy").expect("write input");

    ibpe()
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "train",
            "demo",
            "257",
            "out.vocab",
            "missing.bin",
            "present.bin",
            "--no-progress",
        ])
        .assert()
        .success();

    let stdout = ibpe()
        .current_dir(workspace.path())
        .args(["status", "out.vocab"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let doc: Value = serde_json::from_slice(&stdout).expect("status output is valid JSON");
    assert_eq!(doc["complete"], Value::Bool(true));
    assert_eq!(doc["vocab"].as_array().expect("vocab array").len(), 1);
}

#[test]
fn train_rejects_vocab_size_at_byte_alphabet() {
    let workspace = temp_workspace();

    ibpe()
        .current_dir(workspace.path())
        .args([
            "--quiet",
            "train",
            "demo",
            "256",
            "run.vocab",
            "input.bin",
            "--no-progress",
        ])
        .assert()
        .failure()
        .code(3);
    assert!(!workspace.path().join("run.vocab").exists());
}

#[test]
fn train_rejects_unparsable_vocab_size() {
    ibpe()
        .args(["train", "demo", "lots", "run.vocab", "input.bin"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn status_rejects_corrupted_magic_without_output() {
    let workspace = temp_workspace();
    let vocab_path = workspace.path().join("bad.vocab");
    fs::write(&vocab_path, b"NOPE!\x00\x00\x00\x00\x00").expect("write corrupt file");

    ibpe()
        .current_dir(workspace.path())
        .args(["--quiet", "status", "bad.vocab"])
        .assert()
        .failure()
        .code(5)
        .stdout("");
}

#[test]
fn status_on_missing_file_is_an_io_failure() {
    let workspace = temp_workspace();

    ibpe()
        .current_dir(workspace.path())
        .args(["--quiet", "status", "absent.vocab"])
        .assert()
        .failure()
        .code(4)
        .stdout("");
}
