// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub use args::{ConnectionArgs, ContentArgs, SyncArgs};

#[derive(Parser)]
#[command(name = "mbsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mirror a Metabase collection tree to a local directory and back")]
#[command(
    long_about = "Mirror a Metabase collection tree to a local directory and back.\n\n\
    Collections become directories and cards, dashboards and pulses become JSON files,\n\
    so a whole instance can be versioned, reviewed and pushed back."
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Increase log verbosity (repeat for more)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and print the session token
    Auth,

    /// Manage collections
    #[command(subcommand)]
    Collection(EntityCommand),

    /// Manage cards (saved questions)
    #[command(subcommand)]
    Card(EntityCommand),

    /// Manage dashboards
    #[command(subcommand)]
    Dashboard(EntityCommand),

    /// Manage pulses
    #[command(subcommand)]
    Pulse(EntityCommand),

    /// Replace a local directory with the server's collection tree
    #[command(after_help = "\
Examples:
  mbsync pull ./metabase              Pull everything visible to you
  mbsync pull -a ./metabase           Include archived items
  mbsync pull -r 12 ./team            Pull only collection 12 and below
  mbsync pull -e '^/Scratch/' .       Skip the Scratch collection")]
    Pull(SyncArgs),

    /// Make the server match a local directory tree
    #[command(after_help = "\
Examples:
  mbsync push ./metabase              Create, update and archive to match
  mbsync push -r 12 ./team            Push only collection 12 and below

Files without an id are created, files with one are updated, and server
items with no local file are archived (never deleted).")]
    Push(SyncArgs),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    /// Short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Auth => "auth",
            Command::Collection(_) => "collection",
            Command::Card(_) => "card",
            Command::Dashboard(_) => "dashboard",
            Command::Pulse(_) => "pulse",
            Command::Pull(_) => "pull",
            Command::Push(_) => "push",
            Command::Completion { .. } => "completion",
        }
    }
}

/// Operations available on every entity kind.
#[derive(Subcommand, Clone, Debug)]
pub enum EntityCommand {
    /// Print one entity, or all of them when no id is given
    Get {
        /// Entity id
        id: Option<i64>,
    },

    /// Create an entity from a JSON object
    #[command(after_help = "\
Examples:
  mbsync card create -c '{\"name\": \"Revenue\", \"collection_id\": 4}'
  mbsync dashboard create ./dashboard.json")]
    Create {
        #[command(flatten)]
        content: ContentArgs,
    },

    /// Replace an entity's fields with a JSON object
    Update {
        /// Entity id
        id: i64,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// Delete an entity permanently
    Delete {
        /// Entity id
        id: i64,
    },

    /// Archive an entity
    Archive {
        /// Entity id
        id: i64,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
