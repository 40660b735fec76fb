//! End-to-end tests for the `ht` binary
//!
//! Each test points the CLI at a config file whose store lives in a temp dir.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
    config: PathBuf,
}

impl Env {
    fn new(seed: bool) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = dir.path().join("habitrack.yml");
        let yaml = format!(
            "storage:\n  store-dir: {}\nseed:\n  enabled: {}\n",
            dir.path().join("store").display(),
            seed
        );
        fs::write(&config, yaml).expect("Failed to write config");
        Self { dir, config }
    }

    fn ht(&self) -> Command {
        let mut cmd = Command::cargo_bin("ht").expect("ht binary");
        cmd.arg("--config").arg(&self.config).env("NO_COLOR", "1");
        cmd
    }
}

#[test]
fn test_first_run_seeds_default_habit() {
    let env = Env::new(true);

    env.ht()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Surfing"))
        .stdout(predicate::str::contains("count"));

    assert!(env.dir.path().join("store").join("logs").join("habitrack.log").exists());
}

#[test]
fn test_seed_can_be_disabled() {
    let env = Env::new(false);

    env.ht()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No habits yet"));
}

#[test]
fn test_track_a_day() {
    let env = Env::new(true);

    env.ht()
        .args(["add", "Read", "--kind", "check", "--required"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"))
        .stdout(predicate::str::contains("Read"));

    env.ht()
        .args(["check", "read", "--date", "2024-02-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("done on 2024-02-10"));

    env.ht()
        .args(["set", "surfing", "3", "--date", "2024-02-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 on 2024-02-10"));

    env.ht()
        .args(["day", "--date", "2024-02-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Required 100%"))
        .stdout(predicate::str::contains("Optional 100%"))
        .stdout(predicate::str::contains("Count total 3"));

    env.ht()
        .args(["calendar", "--month", "2024-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("February 2024"))
        .stdout(predicate::str::contains("2024-02-10"));
}

#[test]
fn test_stats_for_count_habit() {
    let env = Env::new(true);

    for (date, value) in [("2024-03-01", "2"), ("2024-03-02", "0"), ("2024-03-03", "5")] {
        env.ht().args(["set", "surf", value, "--date", date]).assert().success();
    }

    env.ht()
        .args([
            "stats", "surfing", "--range", "custom", "--start", "2024-03-01", "--end", "2024-03-03",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total    7"))
        .stdout(predicate::str::contains("Average  2.3/day"))
        .stdout(predicate::str::contains("Max      5"));
}

#[test]
fn test_negative_count_is_clamped() {
    let env = Env::new(true);

    env.ht()
        .args(["inc", "surfing", "--by", "-4", "--date", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 on 2024-03-01"));
}

#[test]
fn test_rejects_bad_input() {
    let env = Env::new(true);

    env.ht()
        .args(["check", "surfing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("count habit"));

    env.ht()
        .args(["check", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No habit matches"));

    env.ht()
        .args(["day", "--date", "2024-13-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));

    env.ht()
        .args(["add", "Blue", "--color", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid color"));
}

#[test]
fn test_move_and_delete() {
    let env = Env::new(true);

    env.ht().args(["add", "Floss"]).assert().success();
    env.ht()
        .args(["move", "floss", "up"])
        .assert()
        .success()
        .stdout(predicate::str::is_match("(?s)Floss.*Surfing").unwrap());

    env.ht()
        .args(["delete", "surfing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    env.ht()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Surfing").not());
}

#[test]
fn test_suggest_color() {
    let env = Env::new(true);

    // Seeded habit already uses the first palette color
    env.ht()
        .arg("suggest-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("#ff8c42"));
}
