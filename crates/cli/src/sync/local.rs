// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The local side of a sync: a directory tree of entity files.
//!
//! Relative paths use `/` separators regardless of platform. Directories are
//! written `/A/B/` and files `/A/B/3.Report.mbcard`, matching the paths held
//! in a [`PathMap`](mb_core::PathMap).

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use mb_core::escape::VCS_DIRS;
use mb_core::{Entity, EntityKind, LocalFile};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Directories and entity files found under a sync root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalTree {
    /// Every directory below the root, as `/A/B/`.
    pub dirs: BTreeSet<String>,
    /// Files with a recognized entity extension.
    pub files: Vec<LocalFile>,
}

/// Walks `root`, skipping version-control metadata.
pub fn scan(root: &Path) -> Result<LocalTree> {
    let mut tree = LocalTree::default();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_vcs_dir(e.file_name().to_str()));

    for entry in walker {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let Some(relative) = relative_path(root, entry.path()) else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 path");
            continue;
        };
        if entry.file_type().is_dir() {
            tree.dirs.insert(format!("{}/", relative));
        } else if let Some(file) = LocalFile::from_relative(&relative) {
            tree.files.push(file);
        } else {
            debug!(path = %relative, "ignoring file without an entity extension");
        }
    }
    Ok(tree)
}

/// `/`-separated path of `path` below `root`, starting with `/`.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in relative.components() {
        out.push('/');
        out.push_str(component.as_os_str().to_str()?);
    }
    Some(out)
}

fn is_vcs_dir(name: Option<&str>) -> bool {
    name.is_some_and(|name| VCS_DIRS.contains(&name))
}

/// Filesystem location of a relative sync path.
pub fn to_fs_path(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Empties `root` (creating it if needed) before a pull.
///
/// Version-control metadata is kept. Refuses filesystem roots.
pub fn reset_root(root: &Path) -> Result<()> {
    if root.components().all(|c| matches!(c, Component::RootDir | Component::Prefix(_))) {
        return Err(Error::UnsafeRoot(root.display().to_string()));
    }
    fs::create_dir_all(root)?;
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if is_vcs_dir(entry.file_name().to_str()) {
            debug!(name = ?entry.file_name(), "keeping version-control metadata");
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Creates the directory for a relative collection path.
pub fn create_dir(root: &Path, relative: &str) -> Result<()> {
    fs::create_dir_all(to_fs_path(root, relative))?;
    Ok(())
}

/// Writes an entity as pretty JSON, creating parent directories.
pub fn write_entity(root: &Path, relative: &str, entity: &Entity) -> Result<()> {
    let path = to_fs_path(root, relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, entity.to_pretty_json()?)?;
    Ok(())
}

/// Reads and parses a local entity file.
pub fn read_entity(root: &Path, file: &LocalFile) -> Result<Entity> {
    read_entity_at(&to_fs_path(root, &file.path), file.kind)
}

/// Reads and parses an entity file at an arbitrary location.
pub fn read_entity_at(path: &Path, kind: EntityKind) -> Result<Entity> {
    let text = fs::read_to_string(path)?;
    Entity::parse(kind, &text).map_err(|e| match e {
        mb_core::Error::InvalidContent { kind, reason } => Error::InvalidContent {
            kind,
            reason: format!("{}: {}", path.display(), reason),
        },
        other => other.into(),
    })
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
