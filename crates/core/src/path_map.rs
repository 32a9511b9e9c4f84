// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resolution of a flat collection listing into filesystem paths.
//!
//! Every collection is mapped to `/` + the escaped names of its id chain +
//! `/`. The resulting [`PathMap`] indexes both directions: `id → path` for
//! pulls and `path → ids` for pushes. Several ids at one path means the
//! server holds duplicate-named siblings; that is kept visible rather than
//! collapsed.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::escape::encode_path;

/// Pattern used when no exclusion is requested. Never matches a real path.
pub const DEFAULT_EXCLUDE_PATTERN: &str = "^$";

/// Scope options shared by pull and push.
#[derive(Debug, Clone, Default)]
pub struct SyncFilter {
    /// Restricts the scope to the subtree of this collection id.
    pub custom_root: Option<i64>,
    /// Keeps personal collections. Ignored when a custom root is set.
    pub include_personal: bool,
    /// Keeps archived collections and entities.
    pub include_archived: bool,
    /// Drops any collection or entity whose relative path matches.
    pub exclude: Option<Regex>,
}

impl SyncFilter {
    /// Compiles an exclude pattern; the default pattern disables exclusion.
    pub fn with_exclude_pattern(mut self, pattern: &str) -> Result<Self> {
        self.exclude = if pattern.is_empty() || pattern == DEFAULT_EXCLUDE_PATTERN {
            None
        } else {
            Some(Regex::new(pattern)?)
        };
        Ok(self)
    }

    /// Returns true if `path` matches the exclude pattern.
    pub fn excludes(&self, path: &str) -> bool {
        self.exclude.as_ref().is_some_and(|re| re.is_match(path))
    }

    /// Returns true if a resolved collection survives every filter.
    ///
    /// Order: custom root, personal ownership, archived flag, exclude pattern.
    pub fn keeps(&self, collection: &ResolvedCollection) -> bool {
        let in_root = match self.custom_root {
            Some(root) => {
                collection.id == root || collection.location.contains(&format!("/{}/", root))
            }
            None => true,
        };
        let personal_ok =
            self.custom_root.is_some() || self.include_personal || !collection.personal;
        let archived_ok = self.include_archived || !collection.archived;
        in_root && personal_ok && archived_ok && !self.excludes(&collection.path)
    }
}

/// A collection with its computed path and ownership flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCollection {
    pub id: i64,
    /// Escaped name chain, e.g. `/Team/Reports/`.
    pub path: String,
    /// Id chain including the collection itself, e.g. `/1/4/`.
    pub location: String,
    /// True if the collection or any ancestor has a personal owner.
    pub personal: bool,
    pub archived: bool,
}

/// Computes paths for every collection whose ancestors are all known.
pub fn resolve_all(collections: &[Collection]) -> Vec<ResolvedCollection> {
    let index: HashMap<i64, &Collection> = collections.iter().map(|c| (c.id, c)).collect();

    let mut resolved = Vec::with_capacity(collections.len());
    for collection in index.values() {
        let chain = collection.chain();
        let members: Option<Vec<&Collection>> =
            chain.iter().map(|id| index.get(id).copied()).collect();
        let Some(members) = members else {
            tracing::warn!(
                id = collection.id,
                location = %collection.full_location(),
                "skipping collection with an unknown ancestor"
            );
            continue;
        };
        let names: Vec<&str> = members.iter().map(|c| c.name.as_str()).collect();
        resolved.push(ResolvedCollection {
            id: collection.id,
            path: encode_path(&names),
            location: collection.full_location(),
            personal: members.iter().any(|c| c.personal_owner_id.is_some()),
            archived: collection.archived,
        });
    }
    resolved.sort_by_key(|c| c.id);
    resolved
}

/// Applies the filter to already resolved collections.
pub fn apply_filter(resolved: &[ResolvedCollection], filter: &SyncFilter) -> Vec<ResolvedCollection> {
    resolved
        .iter()
        .filter(|c| filter.keeps(c))
        .cloned()
        .collect()
}

/// Bidirectional id ↔ path index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMap {
    by_id: BTreeMap<i64, String>,
    by_path: BTreeMap<String, Vec<i64>>,
}

impl PathMap {
    /// Resolves and filters a collection listing.
    pub fn build(collections: &[Collection], filter: &SyncFilter) -> PathMap {
        let resolved = resolve_all(collections);
        PathMap::from_resolved(apply_filter(&resolved, filter))
    }

    pub fn from_resolved<I>(resolved: I) -> PathMap
    where
        I: IntoIterator<Item = ResolvedCollection>,
    {
        let mut map = PathMap::default();
        for c in resolved {
            map.insert(c.path, c.id);
        }
        map
    }

    /// Registers `id` at `path`. Ids at one path stay in ascending order.
    pub fn insert(&mut self, path: String, id: i64) {
        if let Some(previous) = self.by_id.insert(id, path.clone()) {
            if let Some(ids) = self.by_path.get_mut(&previous) {
                ids.retain(|existing| *existing != id);
                if ids.is_empty() {
                    self.by_path.remove(&previous);
                }
            }
        }
        let ids = self.by_path.entry(path).or_default();
        if let Err(pos) = ids.binary_search(&id) {
            ids.insert(pos, id);
        }
    }

    pub fn path(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// All ids at `path`, smallest first.
    pub fn ids(&self, path: &str) -> &[i64] {
        self.by_path.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first id at `path`, used when attaching children.
    pub fn first_id(&self, path: &str) -> Option<i64> {
        self.ids(path).first().copied()
    }

    /// Distinct paths in lexical order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.by_path.keys().map(String::as_str)
    }

    /// Paths claimed by more than one id.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.by_path
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(path, ids)| (path.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
#[path = "path_map_tests.rs"]
mod tests;
