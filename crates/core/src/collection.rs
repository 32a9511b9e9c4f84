// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote collections as used for path resolution.

use crate::entity::{as_int, Entity};
use crate::kind::EntityKind;

/// The subset of a collection record needed to place it in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    /// Ancestor ids, outermost first, excluding the collection itself.
    pub ancestors: Vec<i64>,
    pub personal_owner_id: Option<i64>,
    pub archived: bool,
}

impl Collection {
    /// Reads a collection from a server record.
    ///
    /// Returns `None` when the record lacks an integer id; such records
    /// (for instance the synthetic `"root"` collection) are left out of the
    /// index instead of failing the listing.
    pub fn from_entity(entity: &Entity) -> Option<Collection> {
        let id = entity.id()?;
        let location = entity
            .get("location")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        Some(Collection {
            id,
            name: entity.name().to_string(),
            ancestors: parse_location(location),
            personal_owner_id: entity.get("personal_owner_id").and_then(as_int),
            archived: entity.archived(),
        })
    }

    /// Id chain from the outermost ancestor down to this collection.
    pub fn chain(&self) -> Vec<i64> {
        let mut chain = self.ancestors.clone();
        chain.push(self.id);
        chain
    }

    /// Location string including the collection itself (`/1/4/9/`).
    pub fn full_location(&self) -> String {
        let mut location = String::from("/");
        for id in self.chain() {
            location.push_str(&id.to_string());
            location.push('/');
        }
        location
    }

    /// Immediate parent id, derived from the location.
    pub fn parent_id(&self) -> Option<i64> {
        self.ancestors.last().copied()
    }
}

/// Parses a slash-delimited ancestor id chain such as `/1/4/`.
///
/// Segments that are not integers are skipped.
pub fn parse_location(location: &str) -> Vec<i64> {
    location
        .split('/')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}

/// Converts raw listing records into collections, dropping unparseable ones.
pub fn from_listing(entities: &[Entity]) -> Vec<Collection> {
    entities
        .iter()
        .filter_map(|entity| {
            let collection = Collection::from_entity(entity);
            if collection.is_none() {
                tracing::debug!(
                    kind = %EntityKind::Collection,
                    id = ?entity.get("id"),
                    "skipping collection without an integer id"
                );
            }
            collection
        })
        .collect()
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
