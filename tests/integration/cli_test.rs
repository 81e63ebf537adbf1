//! Integration tests for the wallpipe binary

use std::fs;
use std::process::Command;

use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;
use tempfile::TempDir;
use wallpipe::codec;

use crate::helpers::{fixtures_dir, load_fixture};

/// Run wallpipe with an isolated config directory and capture output.
fn run_wallpipe(config_home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_wallpipe"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute wallpipe");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn wallpipe(config_home: &TempDir) -> AssertCommand {
    let mut cmd = AssertCommand::cargo_bin("wallpipe").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).to_string_lossy().to_string()
}

fn names_in_table(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    let (stdout, _stderr, exit_code) = run_wallpipe(&home, &["--help"]);

    assert_eq!(exit_code, 0);
    for command in ["encode", "decode", "sort", "config"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

// ============================================================================
// encode / decode
// ============================================================================

#[test]
fn encode_reads_stdin() {
    let home = TempDir::new().unwrap();
    wallpipe(&home)
        .arg("encode")
        .write_stdin("hello")
        .assert()
        .success()
        .stdout("v1..3UwlCUq\n");
}

#[test]
fn decode_reads_a_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("payload.txt");
    fs::write(&path, "v1..3UwlCUq\n").unwrap();

    let (stdout, _stderr, exit_code) = run_wallpipe(&home, &["decode", path.to_str().unwrap()]);
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "hello\n");
}

#[test]
fn decode_parse_pretty_prints_json() {
    let home = TempDir::new().unwrap();
    wallpipe(&home)
        .args(["decode", "--parse", "-"])
        .write_stdin(codec::encode(r#"{"series":"desktop","count":3}"#))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"series\": \"desktop\""))
        .stdout(predicate::str::contains("\"count\": 3"));
}

#[test]
fn decode_rejects_untagged_input() {
    let home = TempDir::new().unwrap();
    wallpipe(&home)
        .arg("decode")
        .write_stdin("plain text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid data format"));
}

// ============================================================================
// sort
// ============================================================================

#[test]
fn sort_newest_by_default() {
    let home = TempDir::new().unwrap();
    let (stdout, _stderr, exit_code) = run_wallpipe(&home, &["sort", &fixture("catalog.json")]);

    assert_eq!(exit_code, 0);
    assert_eq!(
        names_in_table(&stdout),
        vec![
            "city-rain.jpg",
            "aurora-ridge.png",
            "dune-sunset.PNG",
            "harbor-lights.png",
            "forest-mist.jpg",
        ]
    );
    assert!(stdout.contains("Showing 5 of 5 matching wallpapers (5 total)"));
    assert!(stdout.contains("MiB"));
}

#[test]
fn sort_filters_and_limits() {
    let home = TempDir::new().unwrap();
    let (stdout, _stderr, exit_code) = run_wallpipe(
        &home,
        &[
            "sort",
            &fixture("catalog.json"),
            "--format",
            "png",
            "--method",
            "largest",
            "--limit",
            "2",
        ],
    );

    assert_eq!(exit_code, 0);
    assert_eq!(
        names_in_table(&stdout),
        vec!["dune-sunset.PNG", "aurora-ridge.png"]
    );
    assert!(stdout.contains("Showing 2 of 3 matching wallpapers (5 total)"));
}

#[test]
fn sort_by_popularity_json_output() {
    let home = TempDir::new().unwrap();
    let (stdout, _stderr, exit_code) = run_wallpipe(
        &home,
        &[
            "sort",
            &fixture("catalog.json"),
            "--method",
            "popular",
            "--popularity",
            &fixture("popularity.json"),
            "--json",
        ],
    );
    assert_eq!(exit_code, 0);

    let records: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    let names: Vec<&str> = records
        .iter()
        .map(|r| r["filename"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "city-rain.jpg",
            "harbor-lights.png",
            "aurora-ridge.png",
            "dune-sunset.PNG",
            "forest-mist.jpg",
        ]
    );
    // Unknown fields pass through untouched
    assert_eq!(records[2]["resolution"], "3840x2160");
}

#[test]
fn sort_accepts_encoded_catalogs() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("catalog.txt");
    fs::write(&path, codec::encode(&load_fixture("catalog.json"))).unwrap();

    let (stdout, _stderr, exit_code) = run_wallpipe(
        &home,
        &["sort", path.to_str().unwrap(), "--query", "NIGHT", "-m", "name-asc"],
    );
    assert_eq!(exit_code, 0);
    assert_eq!(
        names_in_table(&stdout),
        vec!["aurora-ridge.png", "harbor-lights.png"]
    );
}

#[test]
fn sort_unknown_method_keeps_catalog_order() {
    let home = TempDir::new().unwrap();
    let (stdout, _stderr, exit_code) = run_wallpipe(
        &home,
        &["sort", &fixture("catalog.json"), "--category", "nature", "-m", "shuffle"],
    );
    assert_eq!(exit_code, 0);
    assert_eq!(
        names_in_table(&stdout),
        vec!["aurora-ridge.png", "dune-sunset.PNG", "forest-mist.jpg"]
    );
}

#[test]
fn sort_missing_catalog_fails() {
    let home = TempDir::new().unwrap();
    wallpipe(&home)
        .args(["sort", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read does-not-exist.json"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_show_prints_defaults() {
    let home = TempDir::new().unwrap();
    let (stdout, _stderr, exit_code) = run_wallpipe(&home, &["config", "show"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("[executor]"));
    assert!(stdout.contains("timeout_ms = 10000"));
    assert!(stdout.contains("inline_threshold = 100"));
    assert!(stdout.contains("enabled = true"));
}

#[test]
fn config_path_points_into_wallpipe_dir() {
    let home = TempDir::new().unwrap();
    wallpipe(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[cfg(target_os = "linux")]
#[test]
fn disabled_executor_still_sorts() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("wallpipe");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), "[executor]\nenabled = false\n").unwrap();

    let (stdout, _stderr, exit_code) = run_wallpipe(&home, &["config", "show"]);
    assert_eq!(exit_code, 0);
    assert!(stdout.contains("enabled = false"));

    let (stdout, _stderr, exit_code) =
        run_wallpipe(&home, &["sort", &fixture("catalog.json"), "-m", "oldest", "-n", "1"]);
    assert_eq!(exit_code, 0);
    assert_eq!(names_in_table(&stdout), vec!["forest-mist.jpg"]);
}
