// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// The binary with no credentials from the environment or a config file.
pub fn mbsync() -> Command {
    let mut cmd = cargo_bin_cmd!("mbsync");
    cmd.env_remove("MB_SERVER")
        .env_remove("MB_USERNAME")
        .env_remove("MB_PASSWORD")
        .env_remove("RUST_LOG")
        .env("MB_CONFIG", "/nonexistent/mbsync/config.toml");
    cmd
}

/// The binary pointed at `server` with fixed test credentials.
pub fn mbsync_at(server: &str) -> Command {
    let mut cmd = mbsync();
    cmd.args(["-s", server, "-u", "ada@example.com", "--password", "secret"]);
    cmd
}
