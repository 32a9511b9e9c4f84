// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diffing of the remote collection tree against a local directory tree.
//!
//! These functions decide *what* a pull or push has to do. They perform no
//! I/O; the caller executes the resulting operations and feeds newly created
//! collection ids back into the [`PathMap`] between phases.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde_json::Value;

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::escape::{depth, last_segment, parent_path, unescape_segment};
use crate::kind::EntityKind;
use crate::path_map::{PathMap, SyncFilter};

/// Color assigned to collections created from local directories.
pub const NEW_COLLECTION_COLOR: &str = "#999999";

/// Directory an entity belongs in, relative to the sync root.
///
/// Entities without a collection live at `/` unless a custom root is set.
/// Returns `None` for entities outside the mapped collections.
pub fn entity_dir<'a>(
    kind: EntityKind,
    entity: &Entity,
    map: &'a PathMap,
    custom_root: Option<i64>,
) -> Option<&'a str> {
    match entity.parent_id(kind) {
        Some(parent) => map.path(parent),
        None if custom_root.is_none() => Some("/"),
        None => None,
    }
}

/// Relative file path an entity is pulled to, before filtering.
pub fn entity_path(
    kind: EntityKind,
    entity: &Entity,
    map: &PathMap,
    custom_root: Option<i64>,
) -> Option<String> {
    let dir = entity_dir(kind, entity, map, custom_root)?;
    let file_name = entity.file_name(kind)?;
    Some(format!("{}{}", dir, file_name))
}

/// Relative file path to write an entity to on pull, or `None` if the
/// entity is filtered out.
pub fn pull_target(
    kind: EntityKind,
    entity: &Entity,
    map: &PathMap,
    filter: &SyncFilter,
) -> Option<String> {
    if entity.archived() && !filter.include_archived {
        return None;
    }
    let path = entity_path(kind, entity, map, filter.custom_root)?;
    if filter.excludes(&path) {
        return None;
    }
    Some(path)
}

/// Local directories with no remote collection, grouped by depth.
///
/// Groups are ordered shallowest first so every parent exists before its
/// children are created. A directory that only exists as the ancestor of a
/// mapped path (above a custom root, or above a filtered-out collection) is
/// not a new collection.
pub fn collection_creates(local_dirs: &BTreeSet<String>, map: &PathMap) -> Vec<Vec<String>> {
    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for dir in local_dirs {
        if dir == "/" || map.contains_path(dir) || encloses_mapped(dir, map) {
            continue;
        }
        groups.entry(depth(dir)).or_default().push(dir.clone());
    }
    groups.into_values().collect()
}

fn encloses_mapped(dir: &str, map: &PathMap) -> bool {
    map.paths()
        .any(|path| path.len() > dir.len() && path.starts_with(dir))
}

/// Request body for creating the collection at `path`.
///
/// The parent is looked up in the live map; a missing parent is left out so
/// the collection lands at the root.
pub fn new_collection(path: &str, map: &PathMap) -> Entity {
    let kind = EntityKind::Collection;
    let name = last_segment(path).map(unescape_segment).unwrap_or_default();
    let parent = parent_path(path);
    let parent_id = map.first_id(&parent);
    if parent_id.is_none() && parent != "/" {
        tracing::warn!(
            path,
            parent = %parent,
            "parent directory is not a synced collection, creating at the root"
        );
    }
    let mut collection = Entity::default();
    collection.insert("name", Value::from(name));
    collection.set_parent(kind, parent_id);
    collection.insert("color", Value::from(NEW_COLLECTION_COLOR));
    collection.strip_empty_parent(kind);
    collection
}

/// Collection ids to archive.
///
/// Duplicates come first: every id after the first at a shared path. Then
/// every id at a remote path that no longer exists locally.
pub fn collection_archives(local_dirs: &BTreeSet<String>, map: &PathMap) -> Result<Vec<i64>> {
    let mut ids = Vec::new();
    let mut seen = HashSet::new();

    for (_, duplicates) in map.duplicates() {
        for id in &duplicates[1..] {
            if seen.insert(*id) {
                ids.push(*id);
            }
        }
    }

    for path in map.paths() {
        if local_dirs.contains(path) {
            continue;
        }
        let at_path = map.ids(path);
        if at_path.is_empty() {
            return Err(Error::MissingArchiveTarget {
                path: path.to_string(),
            });
        }
        for id in at_path {
            if seen.insert(*id) {
                ids.push(*id);
            }
        }
    }

    Ok(ids)
}

/// An entity file found in the local tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub kind: EntityKind,
    /// Path relative to the sync root, e.g. `/Team/3.Report.mbcard`.
    pub path: String,
    /// Containing directory, e.g. `/Team/`, or `/` at the root.
    pub dir: String,
}

impl LocalFile {
    /// Classifies a relative file path; unrecognized extensions yield `None`.
    pub fn from_relative(path: &str) -> Option<LocalFile> {
        let (dir, file_name) = match path.rfind('/') {
            Some(pos) => (&path[..=pos], &path[pos + 1..]),
            None => ("/", path),
        };
        let (_, ext) = file_name.rsplit_once('.')?;
        let kind = EntityKind::from_extension(ext)?;
        let dir = if dir.starts_with('/') {
            dir.to_string()
        } else {
            format!("/{}", dir)
        };
        Some(LocalFile {
            kind,
            path: format!("{}{}", dir, file_name),
            dir,
        })
    }
}

/// What to do with one local entity file.
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert {
    /// No `id` field: create a new remote entity.
    Create(Entity),
    /// Has an `id` and differs from the remote copy.
    Update { id: i64, entity: Entity },
    /// Has an `id` and matches the remote copy.
    Unchanged { id: i64 },
}

impl Upsert {
    /// Id already known before the request, if any.
    pub fn known_id(&self) -> Option<i64> {
        match self {
            Upsert::Create(_) => None,
            Upsert::Update { id, .. } | Upsert::Unchanged { id } => Some(*id),
        }
    }
}

/// Decides between create and update for a parsed local file.
///
/// `parent` is the collection resolved from the file's directory. `remote`
/// is the server's copy of the entity with the same id, if listed.
pub fn plan_upsert(
    kind: EntityKind,
    mut content: Entity,
    parent: Option<i64>,
    remote: Option<&Entity>,
) -> Upsert {
    content.set_parent(kind, parent);
    let Some(id) = content.id() else {
        return Upsert::Create(content);
    };
    if let Some(remote) = remote {
        let mut expected = remote.project(kind);
        expected.set_parent(kind, remote.parent_id(kind));
        if content.project(kind) == expected {
            return Upsert::Unchanged { id };
        }
    }
    Upsert::Update { id, entity: content }
}

/// Remote entities of one kind to archive after the upsert phase.
///
/// An entity is archived when it sits in a mapped collection (or equals the
/// custom root, which also covers root-level entities when no custom root is
/// set), was not touched by any local file, is not already archived and
/// would not have been excluded on pull.
pub fn entity_archives(
    kind: EntityKind,
    remote: &[Entity],
    map: &PathMap,
    filter: &SyncFilter,
    touched: &HashSet<i64>,
) -> Vec<i64> {
    remote
        .iter()
        .filter(|entity| !entity.archived())
        .filter_map(|entity| {
            let id = entity.id()?;
            let parent = entity.parent_id(kind);
            let in_scope =
                parent.is_some_and(|p| map.contains_id(p)) || parent == filter.custom_root;
            if !in_scope || touched.contains(&id) {
                return None;
            }
            if entity_path(kind, entity, map, filter.custom_root)
                .is_some_and(|path| filter.excludes(&path))
            {
                return None;
            }
            Some(id)
        })
        .collect()
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
