// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use mb_core::SyncFilter;

use crate::api::{Session, Transport};
use crate::cli::{ConnectionArgs, SyncArgs};
use crate::error::Result;
use crate::sync;

use super::connect;

pub async fn pull(connection: &ConnectionArgs, args: &SyncArgs) -> Result<()> {
    let filter = args.filter()?;
    let session = connect(connection)?;
    pull_impl(&session, args, &filter, &mut std::io::stdout()).await
}

pub async fn push(connection: &ConnectionArgs, args: &SyncArgs) -> Result<()> {
    let filter = args.filter()?;
    let session = connect(connection)?;
    push_impl(&session, args, &filter, &mut std::io::stdout()).await
}

pub(crate) async fn pull_impl<T: Transport, W: Write>(
    session: &Session<T>,
    args: &SyncArgs,
    filter: &SyncFilter,
    out: &mut W,
) -> Result<()> {
    let report = sync::pull(session, &args.path, filter).await?;
    writeln!(out, "Pulled {} into {}", report, args.path.display())?;
    Ok(())
}

pub(crate) async fn push_impl<T: Transport, W: Write>(
    session: &Session<T>,
    args: &SyncArgs,
    filter: &SyncFilter,
    out: &mut W,
) -> Result<()> {
    let report = sync::push(session, &args.path, filter).await?;
    if report.changes() == 0 {
        writeln!(out, "Nothing to push ({} unchanged)", report.entities_unchanged)?;
    } else {
        writeln!(out, "Pushed {}", report)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
