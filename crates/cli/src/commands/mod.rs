// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod auth;
pub mod entity;
pub mod sync;

use std::future::Future;
use std::time::Instant;

use tracing::{error, info};

use crate::api::Session;
use crate::cli::ConnectionArgs;
use crate::config::{resolve_credentials, CredentialEnv, FileConfig};
use crate::error::Result;

/// Opens a session from flags, environment and config file.
///
/// No request is sent until the session is first used.
pub fn connect(connection: &ConnectionArgs) -> Result<Session> {
    let file = FileConfig::load_default()?;
    let credentials =
        resolve_credentials(&connection.flags(), &CredentialEnv::from_process(), &file)?;
    info!(server = %credentials.server, user = %credentials.username, "using server");
    Ok(Session::new(credentials))
}

/// Runs a command future with uniform start/finish/failure logging.
pub async fn execute<F, T>(name: &str, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    info!(command = name, "command started");
    let result = work.await;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => info!(command = name, elapsed_ms, "command finished"),
        Err(e) => error!(command = name, elapsed_ms, error = %e, "command failed"),
    }
    result
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
