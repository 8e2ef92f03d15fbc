//! Command-line behavior of the `models` and `convert` commands

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn schemabridge(registry_db: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("schemabridge").unwrap();
    cmd.arg("--config")
        .arg("/nonexistent/schemabridge.yaml")
        .arg("--registry-db")
        .arg(registry_db)
        .env_remove("SCHEMABRIDGE_REGISTRY_DB")
        .env_remove("SCHEMABRIDGE_PROVIDER");
    cmd
}

#[test]
fn test_models_add_activate_and_current() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("models.db");

    schemabridge(&db)
        .args(["models", "add", "models/gemini-pro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered models/gemini-pro"));

    schemabridge(&db)
        .args(["models", "current"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active model configured"));

    schemabridge(&db)
        .args(["models", "activate", "models/gemini-pro"])
        .assert()
        .success();

    schemabridge(&db)
        .args(["models", "current"])
        .assert()
        .success()
        .stdout(predicate::str::contains("models/gemini-pro"));
}

#[test]
fn test_models_list_json_is_parseable() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("models.db");

    schemabridge(&db)
        .args(["models", "add", "a", "--activate"])
        .assert()
        .success();

    let output = schemabridge(&db)
        .args(["models", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let models: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(models[0]["model_name"], "a");
    assert_eq!(models[0]["is_active"], true);
}

#[test]
fn test_activate_unknown_model_fails() {
    let dir = TempDir::new().unwrap();
    schemabridge(&dir.path().join("models.db"))
        .args(["models", "activate", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown model: ghost"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_temp_dir, config_path) = common::temp_config_file("provider:\n  type: copilot\n");
    let dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("schemabridge").unwrap();
    cmd.arg("--config")
        .arg(config_path)
        .arg("--registry-db")
        .arg(dir.path().join("models.db"))
        .env_remove("SCHEMABRIDGE_PROVIDER")
        .args(["models", "current"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid provider type"));
}

#[test]
fn test_convert_without_active_model_fails() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.json");
    let sink = dir.path().join("sink.json");
    std::fs::write(&source, r#"{"a": "secret"}"#).unwrap();
    std::fs::write(&sink, r#"{"b": ""}"#).unwrap();

    schemabridge(&dir.path().join("models.db"))
        .args(["--provider", "ollama", "convert", "--source"])
        .arg(&source)
        .arg("--sink")
        .arg(&sink)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active model configured"));
}

#[test]
fn test_convert_rejects_non_json_file() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.csv");
    let sink = dir.path().join("sink.json");
    std::fs::write(&source, "a\n1").unwrap();
    std::fs::write(&sink, "{}").unwrap();

    schemabridge(&dir.path().join("models.db"))
        .args(["convert", "--source"])
        .arg(&source)
        .arg("--sink")
        .arg(&sink)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only JSON files are supported"));
}
