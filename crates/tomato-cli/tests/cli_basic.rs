//! End-to-end tests for the `tomato` binary against a throwaway data directory.

mod common;

use common::{parse_json, run_cli_failure, run_cli_success};

#[test]
fn help_lists_subcommands() {
    let home = tempfile::tempdir().unwrap();
    let out = run_cli_success(home.path(), &["--help"]);
    for cmd in ["timer", "task", "settings", "stats", "sound"] {
        assert!(out.contains(cmd), "help is missing {cmd}: {out}");
    }
}

#[test]
fn first_run_writes_app_config() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["settings", "list"]);
    assert!(home.path().join("config.toml").exists());
    assert!(home.path().join("tomato.db").exists());
}

#[test]
fn default_timer_status() {
    let home = tempfile::tempdir().unwrap();
    let status = parse_json(&run_cli_success(home.path(), &["timer", "status"]));
    assert_eq!(status["type"], "StateSnapshot");
    assert_eq!(status["phase"], "work");
    assert_eq!(status["remaining_secs"], 1500);
    assert_eq!(status["running"], false);
    assert_eq!(status["completed_work_count"], 0);
}

#[test]
fn zero_work_duration_is_clamped_and_floored() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["settings", "set", "workDuration", "0"]);

    let stored: f64 = run_cli_success(home.path(), &["settings", "get", "workDuration"])
        .trim()
        .parse()
        .unwrap();
    assert!(stored > 0.0 && stored < 1.0, "stored {stored}");

    let status = parse_json(&run_cli_success(home.path(), &["timer", "status"]));
    assert_eq!(status["remaining_secs"], 5);
}

#[test]
fn out_of_range_volume_is_clamped() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["settings", "set", "soundVolume", "300"]);
    assert_eq!(
        run_cli_success(home.path(), &["settings", "get", "soundVolume"]).trim(),
        "100"
    );
}

#[test]
fn settings_reject_unknown_keys_and_bad_values() {
    let home = tempfile::tempdir().unwrap();
    let err = run_cli_failure(home.path(), &["settings", "set", "theme", "dark"]);
    assert!(err.contains("theme"), "{err}");
    run_cli_failure(home.path(), &["settings", "set", "cycleCount", "many"]);
    run_cli_failure(home.path(), &["settings", "get", "theme"]);
}

#[test]
fn settings_reset_restores_defaults() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["settings", "set", "cycleCount", "2"]);
    assert_eq!(
        run_cli_success(home.path(), &["settings", "get", "cycleCount"]).trim(),
        "2"
    );
    run_cli_success(home.path(), &["settings", "reset"]);
    assert_eq!(
        run_cli_success(home.path(), &["settings", "get", "cycleCount"]).trim(),
        "4"
    );
}

#[test]
fn task_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    let out = run_cli_success(home.path(), &["task", "add", "  write report  "]);
    let id = out
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Task created: "))
        .unwrap()
        .to_string();

    run_cli_success(home.path(), &["task", "edit", &id, "--duration", "500"]);
    run_cli_success(home.path(), &["task", "toggle", &id]);

    let list = parse_json(&run_cli_success(home.path(), &["task", "list", "--json"]));
    let tasks = list.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["content"], "write report");
    assert_eq!(tasks[0]["duration"], 120.0);
    assert_eq!(tasks[0]["completed"], true);

    run_cli_success(home.path(), &["task", "remove", &id]);
    let list = parse_json(&run_cli_success(home.path(), &["task", "list", "--json"]));
    assert!(list.as_array().unwrap().is_empty());
}

#[test]
fn task_validation_errors_exit_nonzero() {
    let home = tempfile::tempdir().unwrap();
    run_cli_failure(home.path(), &["task", "add", "   "]);
    run_cli_failure(home.path(), &["task", "add", &"x".repeat(201)]);
    run_cli_failure(home.path(), &["task", "remove", "missing"]);
    run_cli_failure(home.path(), &["timer", "run", "--task", "missing"]);
}

#[test]
fn stats_cover_new_tasks() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["task", "add", "one"]);
    run_cli_success(home.path(), &["task", "add", "two"]);

    let day = parse_json(&run_cli_success(home.path(), &["stats", "day"]));
    let day = day.as_array().unwrap();
    assert_eq!(day.len(), 24);
    let total: u64 = day.iter().map(|b| b["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 2);

    let week = parse_json(&run_cli_success(home.path(), &["stats", "week"]));
    assert_eq!(week.as_array().unwrap().len(), 7);

    let today = parse_json(&run_cli_success(home.path(), &["stats", "today"]));
    let shares = today.as_array().unwrap();
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0]["minutes"], 25.0);
    assert_eq!(shares[0]["percentage"], 50.0);
}

#[test]
fn sound_list_reports_missing_files() {
    let home = tempfile::tempdir().unwrap();
    let out = run_cli_success(home.path(), &["sound", "list"]);
    assert!(out.contains("bell"));
    assert!(out.contains("missing"));
    run_cli_failure(home.path(), &["sound", "test", "../etc/passwd"]);
}
