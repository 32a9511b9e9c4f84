// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for mb-core operations.

use thiserror::Error;

/// All possible errors that can occur in mb-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown entity kind: '{0}'\n  hint: valid kinds are: collection, card, dashboard, pulse")]
    UnknownKind(String),

    #[error("invalid {kind} content: {reason}")]
    InvalidContent { kind: String, reason: String },

    #[error("the required archive path does not exist: {path}")]
    MissingArchiveTarget { path: String },

    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for mb-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
