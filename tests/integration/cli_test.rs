//! End-to-end tests of the smartwrite binary

use predicates::prelude::*;
use std::fs;

use super::helpers::Workspace;

const DRAFT: &str = "The cake was eaten by the dog. At the end of the day, it was fine.\n\nWe moved on.";

// ============================================================================
// analyze
// ============================================================================

#[test]
fn analyze_file_prints_report() {
    let ws = Workspace::new();
    let draft = ws.file("draft.md", DRAFT);

    ws.cmd()
        .args(["analyze", "--language", "en"])
        .arg(&draft)
        .assert()
        .success()
        .stdout(predicate::str::contains("(English (US)) =="))
        .stdout(predicate::str::contains("Readability:"))
        .stdout(predicate::str::contains("passive"));
}

#[test]
fn analyze_stdin_json() {
    let ws = Workspace::new();

    let output = ws
        .cmd()
        .args(["analyze", "--json"])
        .write_stdin("Eu acho que o livro foi escrito ontem.")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["file"], "stdin");
    assert_eq!(json["language"], "pt");
    assert!(json["stats"]["word_count"].as_u64().unwrap() > 0);
}

#[test]
fn analyze_several_files_prints_json_array() {
    let ws = Workspace::new();
    let a = ws.file("a.txt", "First file here.");
    let b = ws.file("b.txt", "Second file here.");

    let output = ws
        .cmd()
        .args(["analyze", "--json"])
        .arg(&a)
        .arg(&b)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(2));
}

#[test]
fn analyze_missing_file_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["analyze", "nope.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_path_honours_override() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_set_then_show() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "set", "llm.model", "llama3"])
        .assert()
        .success();
    ws.cmd()
        .args(["config", "set", "analysis.reading_speed", "250"])
        .assert()
        .success();

    let written = fs::read_to_string(ws.config_path()).unwrap();
    assert!(written.contains("model = \"llama3\""));

    ws.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("model = \"llama3\""))
        .stdout(predicate::str::contains("reading_speed = 250"));
}

#[test]
fn config_set_rejects_bad_values() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "set", "analysis.reading_speed", "0"])
        .assert()
        .failure();
    ws.cmd()
        .args(["config", "set", "llm.nonsense", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
    assert!(!ws.config_path().exists());
}

#[test]
fn config_init_refuses_to_overwrite() {
    let ws = Workspace::new();
    ws.cmd().args(["config", "init"]).assert().success();
    assert!(ws.config_path().exists());
    ws.cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    ws.cmd().args(["config", "init", "--force"]).assert().success();
}

// ============================================================================
// personas
// ============================================================================

#[test]
fn personas_list_shows_builtins() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["personas", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("critical-editor"))
        .stdout(predicate::str::contains("ghostwriter"));
}

#[test]
fn personas_add_disable_enable() {
    let ws = Workspace::new();
    ws.cmd()
        .args([
            "personas",
            "add",
            "haiku-coach",
            "--name",
            "Haiku Coach",
            "--prompt",
            "Answer in haiku.",
        ])
        .assert()
        .success();

    ws.cmd()
        .args(["personas", "show", "haiku-coach"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Answer in haiku."))
        .stdout(predicate::str::contains("Enabled: yes"));

    ws.cmd()
        .args(["personas", "disable", "haiku-coach"])
        .assert()
        .success();
    ws.cmd()
        .args(["personas", "list", "--enabled"])
        .assert()
        .success()
        .stdout(predicate::str::contains("haiku-coach").not());
}

#[test]
fn personas_add_rejects_builtin_id() {
    let ws = Workspace::new();
    ws.cmd()
        .args([
            "personas",
            "add",
            "critical-editor",
            "--name",
            "Mine",
            "--prompt",
            "Be nice.",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("built in"));
}

#[test]
fn personas_show_unknown_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["personas", "show", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// review / translate without a model
// ============================================================================

#[test]
fn review_requires_llm_enabled() {
    let ws = Workspace::new();
    let draft = ws.file("draft.md", DRAFT);
    ws.cmd()
        .arg("review")
        .arg(&draft)
        .assert()
        .failure()
        .stderr(predicate::str::contains("disabled"));
}

#[test]
fn translate_requires_llm_enabled() {
    let ws = Workspace::new();
    let draft = ws.file("draft.md", DRAFT);
    ws.cmd()
        .args(["translate", "--to", "pt"])
        .arg(&draft)
        .assert()
        .failure()
        .stderr(predicate::str::contains("disabled"));
}

/// Enabled, but nothing listens on the discard port.
const UNREACHABLE_CONFIG: &str = "[llm]\nenabled = true\nendpoint = \"http://127.0.0.1:9\"\n";

#[test]
fn review_checks_the_server_before_sending() {
    let ws = Workspace::new();
    ws.write_config(UNREACHABLE_CONFIG);
    let draft = ws.file("draft.md", DRAFT);
    ws.cmd()
        .arg("review")
        .arg(&draft)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot reach ollama at http://127.0.0.1:9"));
}

#[test]
fn translate_checks_the_server_before_sending() {
    let ws = Workspace::new();
    ws.write_config(UNREACHABLE_CONFIG);
    let draft = ws.file("draft.md", DRAFT);
    ws.cmd()
        .args(["translate", "--to", "pt"])
        .arg(&draft)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot reach ollama"));
}

// ============================================================================
// models
// ============================================================================

#[test]
fn models_reports_unreachable_server() {
    let ws = Workspace::new();
    ws.write_config(UNREACHABLE_CONFIG);
    ws.cmd()
        .arg("models")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot reach Ollama at http://127.0.0.1:9"));
}

// ============================================================================
// completions
// ============================================================================

#[test]
fn completions_bash() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("smartwrite"));
}
