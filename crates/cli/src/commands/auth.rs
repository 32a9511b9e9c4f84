// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::api::{Session, Transport};
use crate::cli::ConnectionArgs;
use crate::error::Result;

use super::connect;

pub async fn run(connection: &ConnectionArgs) -> Result<()> {
    let session = connect(connection)?;
    run_impl(&session, &mut std::io::stdout()).await
}

/// Internal implementation that accepts a session for testing.
pub(crate) async fn run_impl<T: Transport, W: Write>(
    session: &Session<T>,
    out: &mut W,
) -> Result<()> {
    let token = session.token().await?;
    writeln!(out, "{}", token)?;
    Ok(())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
