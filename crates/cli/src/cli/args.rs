// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` to reduce duplication
//! across commands that share common option sets.

use std::path::PathBuf;

use clap::Args;
use mb_core::path_map::DEFAULT_EXCLUDE_PATTERN;
use mb_core::SyncFilter;
use regex::Regex;

use crate::config::CredentialFlags;
use crate::error::Result;

/// Connection options accepted by every command.
#[derive(Args, Clone, Debug, Default)]
pub struct ConnectionArgs {
    /// Server address, e.g. https://metabase.example.com
    #[arg(short = 's', long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Login user name
    #[arg(short = 'u', long = "user", global = true, value_name = "USER")]
    pub user: Option<String>,

    /// Login password
    #[arg(long, global = true, value_name = "PASSWORD")]
    pub password: Option<String>,
}

impl ConnectionArgs {
    pub fn flags(&self) -> CredentialFlags {
        CredentialFlags {
            server: self.server.clone(),
            username: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

/// Entity content, given inline or as a file.
#[derive(Args, Clone, Debug, Default)]
#[group(required = true, multiple = false)]
pub struct ContentArgs {
    /// JSON object given inline
    #[arg(short = 'c', long = "string-content", value_name = "JSON")]
    pub string_content: Option<String>,

    /// File holding a JSON object
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Scope options shared by pull and push.
#[derive(Args, Clone, Debug)]
pub struct SyncArgs {
    /// Include personal collections
    #[arg(short = 'p', long, conflicts_with = "custom_root")]
    pub include_personal: bool,

    /// Include archived collections and entities
    #[arg(short = 'a', long)]
    pub include_archived: bool,

    /// Only sync the subtree of this collection id
    #[arg(short = 'r', long, value_name = "ID")]
    pub custom_root: Option<i64>,

    /// Skip collections and entities whose relative path matches
    #[arg(
        short = 'e',
        long,
        value_name = "REGEX",
        default_value = DEFAULT_EXCLUDE_PATTERN,
        value_parser = valid_pattern
    )]
    pub exclude_pattern: String,

    /// Local directory to sync
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,
}

impl SyncArgs {
    pub fn filter(&self) -> Result<SyncFilter> {
        let filter = SyncFilter {
            custom_root: self.custom_root,
            include_personal: self.include_personal,
            include_archived: self.include_archived,
            exclude: None,
        };
        Ok(filter.with_exclude_pattern(&self.exclude_pattern)?)
    }
}

/// Rejects patterns that do not compile.
fn valid_pattern(s: &str) -> std::result::Result<String, String> {
    Regex::new(s)
        .map(|_| s.to_string())
        .map_err(|e| e.to_string())
}
