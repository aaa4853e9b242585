//! Integration tests for the `director` CLI.
//!
//! Each test points XDG_CONFIG_HOME at a temp directory, runs `director` as
//! a subprocess, and checks stdout, stderr and files on disk.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn director(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_director"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run director")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn init_writes_template_once() {
    let tmp = TempDir::new().unwrap();
    let out = director(tmp.path(), &["init"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let path = tmp.path().join("director").join("config.toml");
    assert!(path.exists());
    assert!(stdout(&out).contains("config.toml"));

    let again = director(tmp.path(), &["init"]);
    assert_eq!(again.status.code(), Some(1));
    assert!(stderr(&again).contains("already exists"));

    let forced = director(tmp.path(), &["init", "--force"]);
    assert!(forced.status.success());
}

#[test]
fn init_replaces_a_broken_config() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("director");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), "[timeline\n").unwrap();

    let broken = director(tmp.path(), &["config"]);
    assert_eq!(broken.status.code(), Some(1));
    assert!(stderr(&broken).starts_with("error: could not parse"));

    assert!(director(tmp.path(), &["init", "--force"]).status.success());
    assert!(director(tmp.path(), &["config"]).status.success());
}

#[test]
fn config_json_shows_defaults_and_overrides() {
    let tmp = TempDir::new().unwrap();
    let out = director(tmp.path(), &["config", "--json"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["timeline"]["max_frames"], 240);
    assert_eq!(value["timeline"]["tolerance"], 5);
    assert_eq!(value["engine"]["url"], "ws://127.0.0.1:8080/ws");

    let out = director(
        tmp.path(),
        &["--max-frames", "96", "--engine-url", "ws://engine:9000/ws", "config", "--json"],
    );
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["timeline"]["max_frames"], 96);
    assert_eq!(value["engine"]["url"], "ws://engine:9000/ws");
}

#[test]
fn config_prints_toml() {
    let tmp = TempDir::new().unwrap();
    let out = director(tmp.path(), &["config"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("[timeline]"));
    assert!(text.contains("max_frames = 240"));
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("director");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), "[timeline]\nmax_frames = 0\n").unwrap();
    let out = director(tmp.path(), &["config"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("max_frames must be at least 1"));
}

#[test]
fn secure_engine_url_is_refused() {
    let tmp = TempDir::new().unwrap();
    let out = director(tmp.path(), &["--engine-url", "wss://engine.example/ws", "config"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("wss:// is not supported"));
}

#[test]
fn explicit_config_must_exist() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.toml");
    let out = director(tmp.path(), &["-c", missing.to_str().unwrap(), "config"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("could not read"));
}

#[test]
fn enhance_refuses_an_empty_prompt() {
    let tmp = TempDir::new().unwrap();
    let out = director(tmp.path(), &["enhance", "   "]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("the prompt is empty"));
}

#[test]
fn play_validates_the_schedule_before_connecting() {
    let tmp = TempDir::new().unwrap();
    let show = tmp.path().join("show.toml");
    fs::write(&show, "[[prompt]]\nframe = 500\ntext = \"too late\"\n").unwrap();
    let out = director(tmp.path(), &["play", show.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("outside the timeline"));
}

#[test]
fn play_reports_an_unreachable_engine() {
    let tmp = TempDir::new().unwrap();
    let show = tmp.path().join("show.toml");
    fs::write(&show, "[[prompt]]\nframe = 0\ntext = \"temple\"\n").unwrap();
    // Port 9 (discard) is closed on test machines; the handshake fails fast.
    let out = director(
        tmp.path(),
        &[
            "--engine-url",
            "ws://127.0.0.1:9/ws",
            "play",
            show.to_str().unwrap(),
            "--connect-timeout",
            "5",
        ],
    );
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(
        err.contains("could not connect") || err.contains("not ready"),
        "{}",
        err
    );
}
