use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

pub const DEMO_SNAPSHOT: &str = "tests/fixtures/demo_snapshot.json";

#[allow(dead_code)]
pub fn fixture(rel_path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(rel_path)
}

#[allow(dead_code)]
pub fn read_fixture(rel_path: &str) -> String {
    fs::read_to_string(fixture(rel_path)).unwrap_or_else(|err| panic!("read fixture: {err}"))
}

// Both integration crates pull this module; the binary helper is only used by the CLI tests.
#[allow(dead_code)]
pub fn tasksynth_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tasksynth").unwrap_or_else(|err| panic!("binary: {err}"));
    cmd.env_remove("TASKSYNTH_LOG_FORMAT")
        .env_remove("TASKSYNTH_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}
