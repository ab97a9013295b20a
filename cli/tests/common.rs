//! Shared helpers for the `evtype` integration tests.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// `evtype` binary isolated from the developer's own configuration and environment.
pub fn evtype_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("evtype").expect("Failed to find evtype binary for testing");
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env_remove("EVTYPE_DATA")
        .env_remove("RUST_LOG");
    cmd
}

/// The ten-row fixture shipped in `cli/data`.
pub fn sample_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("sample_vehicles.csv")
}
