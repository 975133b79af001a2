//! End-to-end tests for the `foco` binary.
//!
//! Every test points `FOCO_CONFIG` and `FOCO_DATA_DIR` at a temporary
//! directory so nothing touches the user's real settings or data.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

/// Creates a `foco` command isolated in `dir`.
fn foco(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("foco").unwrap();
    cmd.env("FOCO_CONFIG", dir.join("settings.json"))
        .env("FOCO_DATA_DIR", dir.join("data"))
        .env_remove("RUST_LOG");
    cmd
}

/// Runs the shortest possible breathing session.
fn run_short_breathing(dir: &Path) {
    foco(dir)
        .args([
            "breathe", "--inhale", "1", "--hold", "0", "--exhale", "1", "--cycles", "1",
            "--no-sound",
        ])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercício de respiração concluído"))
        .stdout(predicate::str::contains("Pontos Mágicos: 10"));
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Help and static output
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    foco(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pomodoro"))
        .stdout(predicate::str::contains("breathe"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_patterns_lists_builtins() {
    let dir = TempDir::new().unwrap();
    foco(dir.path())
        .arg("patterns")
        .assert()
        .success()
        .stdout(predicate::str::contains("* 4-7-8"))
        .stdout(predicate::str::contains("quadrada"))
        .stdout(predicate::str::contains("energizante"));
}

#[test]
fn test_patterns_marks_configured_default() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("settings.json"),
        r#"{ "breathingPattern": "quadrada" }"#,
    )
    .unwrap();

    foco(dir.path())
        .arg("patterns")
        .assert()
        .success()
        .stdout(predicate::str::contains("* quadrada"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    foco(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("foco"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_out_of_range_flag_rejected() {
    let dir = TempDir::new().unwrap();
    foco(dir.path())
        .args(["pomodoro", "--work", "0"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_pattern_fails_with_hint() {
    let dir = TempDir::new().unwrap();
    foco(dir.path())
        .args(["breathe", "--pattern", "zen", "--no-sound"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Erro:"))
        .stderr(predicate::str::contains("Dica:"));
}

#[test]
fn test_malformed_settings_fail() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("settings.json"), "{ not json").unwrap();

    foco(dir.path())
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("settings.json"));
}

// ============================================================================
// Stats
// ============================================================================

#[test]
fn test_stats_empty() {
    let dir = TempDir::new().unwrap();
    foco(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessões: 0"));
}

#[test]
fn test_stats_week_json() {
    let dir = TempDir::new().unwrap();
    let output = foco(dir.path())
        .args(["stats", "--week", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["days"].as_array().unwrap().len(), 7);
    assert_eq!(summary["goals"]["focusMinutes"], 600);
    assert_eq!(summary["level"], 1);
    assert_eq!(summary["streakDays"], 0);
    assert!(summary["bestDay"].is_null());
}

// ============================================================================
// Breathing and notifications
// ============================================================================

#[test]
fn test_breathe_completes_and_persists() {
    let dir = TempDir::new().unwrap();
    run_short_breathing(dir.path());

    let store = read_json(&dir.path().join("data").join("store.json"));
    assert_eq!(store["magicPoints"], 10);
    assert_eq!(store["breathingSessions"].as_array().unwrap().len(), 1);

    foco(dir.path())
        .args(["stats", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"breathingSessions\": 1"));
}

#[test]
fn test_notifications_lifecycle() {
    let dir = TempDir::new().unwrap();
    run_short_breathing(dir.path());

    foco(dir.path())
        .arg("notifications")
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 não lidas)"))
        .stdout(predicate::str::contains("Exercício de respiração concluído"));

    let list = read_json(&dir.path().join("data").join("notifications.json"));
    let id = list[0]["id"].as_str().unwrap().to_string();

    foco(dir.path())
        .args(["notifications", "--read", &id])
        .assert()
        .success();
    foco(dir.path())
        .arg("notifications")
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 não lidas)"));

    foco(dir.path())
        .args(["notifications", "--remove", "naoexiste"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("não encontrada"));

    foco(dir.path())
        .args(["notifications", "--clear"])
        .assert()
        .success();
    foco(dir.path())
        .arg("notifications")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhuma notificação"));
}

// ============================================================================
// Tasks
// ============================================================================

#[test]
fn test_tasks_lifecycle() {
    let dir = TempDir::new().unwrap();

    foco(dir.path())
        .arg("tasks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nenhuma tarefa"));

    foco(dir.path())
        .args(["tasks", "add", "Revisar PR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tarefa 1 adicionada"));
    foco(dir.path())
        .args(["tasks", "add", "Escrever testes"])
        .assert()
        .success();

    foco(dir.path())
        .args(["tasks", "done", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("concluída"));

    foco(dir.path())
        .arg("tasks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tarefas (1 pendentes)"))
        .stdout(predicate::str::contains("[x]   1  Revisar PR"))
        .stdout(predicate::str::contains("[ ]   2  Escrever testes"));

    foco(dir.path())
        .args(["tasks", "remove", "2"])
        .assert()
        .success();

    let store = read_json(&dir.path().join("data").join("store.json"));
    let tasks = store["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["completed"], true);
}

#[test]
fn test_unknown_task_id_fails_with_hint() {
    let dir = TempDir::new().unwrap();

    foco(dir.path())
        .args(["tasks", "toggle", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tarefa 7 não encontrada"))
        .stderr(predicate::str::contains("foco tasks"));

    foco(dir.path())
        .args(["pomodoro", "--task", "7", "--no-sound"])
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tarefa 7 não encontrada"));
}

#[test]
fn test_pomodoro_session_refers_to_task() {
    let dir = TempDir::new().unwrap();
    foco(dir.path())
        .args(["tasks", "add", "Planejar sprint"])
        .assert()
        .success();

    foco(dir.path())
        .args(["pomodoro", "--task", "1", "--no-sound"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tarefa: Planejar sprint"));

    let store = read_json(&dir.path().join("data").join("store.json"));
    let session = &store["sessions"][0];
    assert_eq!(session["task_id"], 1);
    assert_eq!(session["task"], "Planejar sprint");
    assert_eq!(session["was_completed"], false);
}
