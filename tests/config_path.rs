use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    assert!(config_path.exists());

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("model ="));
    assert!(contents.contains("max_output_tokens ="));
    assert!(contents.contains("responder_label ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    fs::write(&config_path, "# existing config").unwrap();

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_model_creates_file_with_model() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .args(["config", "model", "gemini-2.0-flash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set model to gemini-2.0-flash"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("model = \"gemini-2.0-flash\""));
    // Template comments survive the edit
    assert!(contents.contains("# InsightPulse Configuration"));
}

#[test]
fn test_config_model_preserves_other_fields() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    fs::write(
        &config_path,
        "# my notes\nmodel = \"gemini-1.5-flash\"\nchat_sample_rows = 20\n",
    )
    .unwrap();

    cargo_bin_cmd!("insightpulse")
        .env("INSIGHTPULSE_HOME", dir.path())
        .args(["config", "model", "gemini-2.0-flash"])
        .assert()
        .success();

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("model = \"gemini-2.0-flash\""));
    assert!(contents.contains("chat_sample_rows = 20"));
    assert!(contents.contains("# my notes"));
}

#[test]
fn test_config_help_shows_subcommands() {
    cargo_bin_cmd!("insightpulse")
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("model"));
}
