// Runs the compiled binary in its non-interactive modes. HOME and the XDG
// directories point into a temp dir so the user's real files are untouched.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::tempdir;

fn luminate(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("luminate").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_STATE_HOME", home.join("state"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn summary_prints_todays_plan() {
    let home = tempdir().unwrap();
    let db = home.path().join("progress.db");

    let output = luminate(home.path())
        .args(["--summary", "--store"])
        .arg(&db)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Day 1, week 1, stage 1"), "{stdout}");
    assert!(stdout.contains("Progress: 0/"));
    assert!(db.exists());
}

#[test]
fn summary_uses_catalog_override() {
    let home = tempdir().unwrap();
    let catalog = home.path().join("catalog.json");
    let week = vec![r#"["Rest"]"#; 7].join(",");
    fs::write(
        &catalog,
        format!(r#"{{"warmUp": [{{"name": "Skips", "rounds": 2}}], "stages": [[{week}],[{week}],[{week}]]}}"#),
    )
    .unwrap();

    let output = luminate(home.path())
        .args(["--summary", "--store"])
        .arg(home.path().join("progress.db"))
        .arg("--catalog")
        .arg(&catalog)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Today: rest day"), "{stdout}");
}

#[test]
fn broken_catalog_fails_to_start() {
    let home = tempdir().unwrap();
    let catalog = home.path().join("catalog.json");
    fs::write(&catalog, "{ not json").unwrap();

    let output = luminate(home.path())
        .args(["--summary", "--catalog"])
        .arg(&catalog)
        .arg("--store")
        .arg(home.path().join("progress.db"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Json"));
}

#[cfg(target_os = "linux")]
#[test]
fn first_run_writes_a_default_config() {
    let home = tempdir().unwrap();

    luminate(home.path())
        .args(["--summary", "--store"])
        .arg(home.path().join("progress.db"))
        .output()
        .unwrap();

    let config = home.path().join("config/luminate/config.json");
    let body = fs::read_to_string(&config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["bell"], serde_json::Value::Bool(true));
}
