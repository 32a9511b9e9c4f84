// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! mbsync - Mirror Metabase collections to a local directory tree.
//!
//! This crate provides the `mbsync` CLI: per-entity commands against the
//! Metabase REST API, and `pull`/`push` synchronization between the server's
//! collection tree and local directories holding one JSON file per entity.
//!
//! # Main Components
//!
//! - [`api`] - Authenticated session, transport and per-kind repositories
//! - [`sync`] - Local tree scanning and the pull/push drivers
//! - [`config`] - Credential resolution from flags, environment and file
//! - [`Error`] - Error types for all operations
//!
//! # Pulling
//!
//! ```rust,ignore
//! use mbsync::api::Session;
//! use mbsync::sync::pull;
//!
//! let session = Session::new(credentials);
//! let report = pull(&session, Path::new("metabase"), &SyncFilter::default()).await?;
//! ```

mod cli;
mod commands;
mod env;
mod logging;

pub mod api;
pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, ConnectionArgs, ContentArgs, EntityCommand, SyncArgs};
pub use config::Credentials;
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;
use mb_core::EntityKind;

/// Runs a parsed command line to completion.
pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose);

    if let Command::Completion { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "mbsync", &mut std::io::stdout());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let name = cli.command.name();
    runtime.block_on(commands::execute(name, dispatch(cli.connection, cli.command)))
}

async fn dispatch(connection: ConnectionArgs, command: Command) -> Result<()> {
    use commands::entity;
    match command {
        Command::Auth => commands::auth::run(&connection).await,
        Command::Collection(cmd) => entity::run(&connection, EntityKind::Collection, cmd).await,
        Command::Card(cmd) => entity::run(&connection, EntityKind::Card, cmd).await,
        Command::Dashboard(cmd) => entity::run(&connection, EntityKind::Dashboard, cmd).await,
        Command::Pulse(cmd) => entity::run(&connection, EntityKind::Pulse, cmd).await,
        Command::Pull(args) => commands::sync::pull(&connection, &args).await,
        Command::Push(args) => commands::sync::push(&connection, &args).await,
        // Handled before the runtime starts.
        Command::Completion { .. } => Ok(()),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
