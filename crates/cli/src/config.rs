// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection settings.
//!
//! Each credential is taken from the first non-blank source:
//! - the command-line flag
//! - the environment (`MB_SERVER`, `MB_USERNAME`, `MB_PASSWORD`)
//! - the config file, `$MB_CONFIG` or `<config dir>/mbsync/config.toml`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::env;
use crate::error::{Error, Result};

const CONFIG_DIR_NAME: &str = "mbsync";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Server address and login, fixed for the life of a session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub server: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Optional settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl FileConfig {
    /// Reads a config file. A missing file yields the empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Reads the config file from its default location, if any.
    pub fn load_default() -> Result<Self> {
        match config_path() {
            Some(path) => FileConfig::load(&path),
            None => Ok(FileConfig::default()),
        }
    }
}

/// Location of the config file: `$MB_CONFIG`, else the user config directory.
pub fn config_path() -> Option<PathBuf> {
    env::config_file().or_else(|| {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    })
}

/// Credential values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CredentialFlags {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Credential values found in the environment.
#[derive(Debug, Clone, Default)]
pub struct CredentialEnv {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialEnv {
    pub fn from_process() -> Self {
        CredentialEnv {
            server: env::server(),
            username: env::username(),
            password: env::password(),
        }
    }
}

/// Merges the three sources into complete credentials.
pub fn resolve_credentials(
    flags: &CredentialFlags,
    environment: &CredentialEnv,
    file: &FileConfig,
) -> Result<Credentials> {
    let server = pick(&flags.server, &environment.server, &file.server).ok_or(
        Error::MissingCredential {
            field: "server",
            flag: "--server",
            var: env::vars::MB_SERVER,
        },
    )?;
    let username = pick(&flags.username, &environment.username, &file.username).ok_or(
        Error::MissingCredential {
            field: "username",
            flag: "--user",
            var: env::vars::MB_USERNAME,
        },
    )?;
    let password = pick(&flags.password, &environment.password, &file.password).ok_or(
        Error::MissingCredential {
            field: "password",
            flag: "--password",
            var: env::vars::MB_PASSWORD,
        },
    )?;
    Ok(Credentials {
        server,
        username,
        password,
    })
}

fn pick(flag: &Option<String>, var: &Option<String>, file: &Option<String>) -> Option<String> {
    [flag, var, file]
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .cloned()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
