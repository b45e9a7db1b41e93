#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rtm() -> Command {
    cargo_bin_cmd!("rtaskmeter")
}

/// Unique DB path and data dir inside the system temp dir, wiped before use.
pub fn setup_test_paths(name: &str) -> (String, String) {
    let mut db: PathBuf = env::temp_dir();
    db.push(format!("{}_rtaskmeter.sqlite", name));
    let mut data: PathBuf = env::temp_dir();
    data.push(format!("{}_rtaskmeter_data", name));

    fs::remove_file(&db).ok();
    fs::remove_dir_all(&data).ok();

    (
        db.to_string_lossy().to_string(),
        data.to_string_lossy().to_string(),
    )
}

/// Run `init` in test mode (no config file written).
pub fn init(db: &str, data: &str) {
    rtm()
        .args(["--db", db, "--data-dir", data, "--test", "init"])
        .assert()
        .success();
}

/// Run a command against the given DB and data dir.
pub fn with_paths(db: &str, data: &str, args: &[&str]) -> Command {
    let mut cmd = rtm();
    cmd.args(["--db", db, "--data-dir", data]).args(args);
    cmd
}
