//! Basic CLI E2E tests.
//!
//! Each test points `HUNT_TIMER_HOME` at its own temp dir so config and
//! timer records never leak between tests.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_hunt-timer"))
        .args(args)
        .env("HUNT_TIMER_HOME", home)
        .env_remove("HUNT_TIMER_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (code, stdout, stderr) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

#[test]
fn test_estimate_scroll_scenario_json() {
    let home = tempfile::tempdir().unwrap();
    let plan = run_json(
        home.path(),
        &["estimate", "--drop-rate", "0.006", "--kills", "50", "--json"],
    );
    assert_eq!(plan["estimate"]["expected_kills"], 16_667);
    assert_eq!(plan["estimate"]["seconds_to_expected"], 20_000);
    assert_eq!(plan["kill_rate"]["kills_per_window"], 50);
}

#[test]
fn test_estimate_text_output() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["estimate", "--drop-rate", "0.006%", "--kills", "50"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("16667"));
    assert!(stdout.contains("5시간 33분 20초"));
}

#[test]
fn test_estimate_from_experience() {
    let home = tempfile::tempdir().unwrap();
    let plan = run_json(
        home.path(),
        &[
            "estimate",
            "--drop-rate",
            "0.006",
            "--xp-before",
            "10000",
            "--xp-after",
            "15799",
            "--xp-per-kill",
            "115",
            "--json",
        ],
    );
    assert_eq!(plan["kill_rate"]["kills_per_window"], 50);
    assert_eq!(plan["estimate"]["seconds_to_expected"], 20_000);
}

#[test]
fn test_estimate_insufficient_data() {
    let home = tempfile::tempdir().unwrap();
    let body = run_json(home.path(), &["estimate", "--kills", "50", "--json"]);
    assert_eq!(body["status"], "insufficient_data");

    let (code, stdout, _) = run_cli(home.path(), &["estimate", "--drop-rate", "0.006"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("정보를 입력해 주세요"));
}

#[test]
fn test_config_list_get_set() {
    let home = tempfile::tempdir().unwrap();
    let config = run_json(home.path(), &["config", "list"]);
    assert_eq!(config["estimator"]["sampling_window_minutes"], 1);

    let (code, _, stderr) = run_cli(
        home.path(),
        &["config", "set", "estimator.sampling_window_minutes", "5"],
    );
    assert_eq!(code, 0, "config set failed: {stderr}");
    let (_, stdout, _) = run_cli(
        home.path(),
        &["config", "get", "estimator.sampling_window_minutes"],
    );
    assert_eq!(stdout.trim(), "5");

    // 250 kills per 5 minutes is the same 50/min as the scroll scenario
    let plan = run_json(
        home.path(),
        &["estimate", "--drop-rate", "0.006", "--kills", "250", "--json"],
    );
    assert_eq!(plan["estimate"]["seconds_to_expected"], 20_000);
}

#[test]
fn test_config_rejects_bad_values() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        home.path(),
        &["config", "set", "estimator.sampling_window_minutes", "3"],
    );
    assert_ne!(code, 0);
    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "nope.nothing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_timer_show_seeds_from_estimate() {
    let home = tempfile::tempdir().unwrap();
    let body = run_json(
        home.path(),
        &[
            "timer",
            "show",
            "--label",
            "투구 민첩 주문서 60%",
            "--drop-rate",
            "0.006",
            "--kills",
            "50",
            "--json",
        ],
    );
    assert_eq!(body["key"], "hunt_timer_투구_민첩_주문서_60");
    assert_eq!(body["timer"]["total_secs"], 20_000);
    assert_eq!(body["timer"]["remaining_secs"], 20_000);
}

#[test]
fn test_timer_edit_persists_across_invocations() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(
        home.path(),
        &["timer", "edit", "--label", "Orb", "--seconds", "600", "--hours", "1", "--minutes", "30"],
    );
    assert_eq!(code, 0, "timer edit failed: {stderr}");
    assert!(stdout.contains("1시간 30분 00초"));

    // a different seed does not override the saved record
    let body = run_json(
        home.path(),
        &["timer", "show", "--label", "Orb", "--seconds", "10", "--json"],
    );
    assert_eq!(body["timer"]["total_secs"], 5_400);

    let (code, _, _) = run_cli(home.path(), &["timer", "reset", "--label", "Orb", "--seconds", "600"]);
    assert_eq!(code, 0);
    let body = run_json(home.path(), &["timer", "show", "--label", "Orb", "--json"]);
    assert_eq!(body["timer"]["total_secs"], 600);
}

#[test]
fn test_timer_clear_forgets_record() {
    let home = tempfile::tempdir().unwrap();
    let _ = run_cli(home.path(), &["timer", "show", "--label", "Orb", "--seconds", "77"]);
    let (code, stdout, _) = run_cli(home.path(), &["timer", "clear", "--label", "Orb"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("hunt_timer_Orb"));

    let body = run_json(
        home.path(),
        &["timer", "show", "--label", "Orb", "--seconds", "12", "--json"],
    );
    assert_eq!(body["timer"]["total_secs"], 12);
}

#[test]
fn test_timer_show_without_seed_is_read_only() {
    let home = tempfile::tempdir().unwrap();
    for _ in 0..2 {
        let body = run_json(home.path(), &["timer", "show", "--label", "Orb", "--json"]);
        assert!(body["timer"].is_null());
    }

    // nothing was saved, so the estimate seeds the timer
    let body = run_json(
        home.path(),
        &["timer", "show", "--label", "Orb", "--drop-rate", "0.006", "--kills", "50", "--json"],
    );
    assert_eq!(body["timer"]["total_secs"], 20_000);

    let body = run_json(home.path(), &["timer", "show", "--label", "Orb", "--json"]);
    assert_eq!(body["timer"]["total_secs"], 20_000);
    assert_eq!(body["timer"]["state"], "seeded");
}

#[test]
fn test_timer_reset_and_run_require_a_seed() {
    let home = tempfile::tempdir().unwrap();
    let _ = run_cli(home.path(), &["timer", "show", "--label", "Orb", "--seconds", "600"]);

    for action in ["reset", "run"] {
        let (code, _, stderr) = run_cli(home.path(), &["timer", action, "--label", "Orb"]);
        assert_ne!(code, 0, "timer {action} without a seed should fail");
        assert!(stderr.contains("--seconds or --drop-rate"));
    }

    let body = run_json(home.path(), &["timer", "show", "--label", "Orb", "--json"]);
    assert_eq!(body["timer"]["total_secs"], 600);
    assert_eq!(body["timer"]["remaining_secs"], 600);
}

#[test]
fn test_timer_run_reports_expired_state() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(
        home.path(),
        &["timer", "run", "--label", "Quick", "--seconds", "1"],
    );
    assert_eq!(code, 0, "timer run failed: {stderr}");
    assert!(stdout.contains("[Expired]"), "unexpected summary: {stdout}");

    let body = run_json(home.path(), &["timer", "show", "--label", "Quick", "--json"]);
    assert_eq!(body["timer"]["remaining_secs"], 0);
}
