// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Log output on stderr.
//!
//! Each `-v` lowers the threshold by one level starting from `error`.
//! `RUST_LOG`, when set, replaces the flag entirely.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::env;

/// Maps a `-v` count to a level: 0 → error, 1 → warn, ... 4+ → trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Builds the filter for a verbosity, deferring to `RUST_LOG` when set.
pub fn filter_for(verbosity: u8) -> EnvFilter {
    if env::rust_log_set() {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::default().add_directive(level_for(verbosity).into())
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
