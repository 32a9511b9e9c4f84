// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Reads a variable, treating blank values as unset.
pub fn non_blank(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Returns the value of `MB_SERVER` if set.
pub fn server() -> Option<String> {
    non_blank(vars::MB_SERVER)
}

/// Returns the value of `MB_USERNAME` if set.
pub fn username() -> Option<String> {
    non_blank(vars::MB_USERNAME)
}

/// Returns the value of `MB_PASSWORD` if set.
pub fn password() -> Option<String> {
    non_blank(vars::MB_PASSWORD)
}

/// Returns the value of `MB_CONFIG` if set.
pub fn config_file() -> Option<PathBuf> {
    non_blank(vars::MB_CONFIG).map(PathBuf::from)
}

/// Returns `true` if `RUST_LOG` is set to a non-blank value.
pub fn rust_log_set() -> bool {
    non_blank(vars::RUST_LOG).is_some()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
