// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::api::TransportError;

/// All possible errors that can occur in the mbsync library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing {field}\n  hint: pass {flag}, set {var}, or add '{field}' to the config file")]
    MissingCredential {
        field: &'static str,
        flag: &'static str,
        var: &'static str,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("unknown entity kind: '{0}'\n  hint: valid kinds are: collection, card, dashboard, pulse")]
    UnknownKind(String),

    #[error("invalid {kind} content: {reason}\n  hint: content must be a non-empty JSON object")]
    InvalidContent { kind: String, reason: String },

    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("the required archive path does not exist: {path}")]
    MissingArchiveTarget { path: String },

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("refusing to clear {0}\n  hint: pull into a dedicated directory")]
    UnsafeRoot(String),

    #[error("unexpected response from server: {0}")]
    UnexpectedResponse(String),

    #[error("{failed} of {} {phase} operations failed\n  first error: {first}", succeeded + failed)]
    PartialFailure {
        phase: &'static str,
        succeeded: usize,
        failed: usize,
        first: Box<Error>,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for mbsync operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<mb_core::Error> for Error {
    fn from(e: mb_core::Error) -> Self {
        match e {
            mb_core::Error::UnknownKind(s) => Error::UnknownKind(s),
            mb_core::Error::InvalidContent { kind, reason } => {
                Error::InvalidContent { kind, reason }
            }
            mb_core::Error::MissingArchiveTarget { path } => Error::MissingArchiveTarget { path },
            mb_core::Error::InvalidPattern(e) => Error::InvalidPattern(e),
            mb_core::Error::Json(e) => Error::Json(e),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
