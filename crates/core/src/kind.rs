// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote entity kinds and their wire descriptions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// File extension prefix shared by every entity file (`.mbcard`, `.mbpulse`, ...).
pub const FILE_EXTENSION_PREFIX: &str = "mb";

/// A kind of remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Hierarchical container, mirrored as a directory.
    Collection,
    /// Saved question.
    Card,
    /// Dashboard with ordered card placements.
    Dashboard,
    /// Scheduled delivery of cards.
    Pulse,
}

impl EntityKind {
    /// Kinds stored as files inside collection directories.
    pub const LEAVES: [EntityKind; 3] = [EntityKind::Card, EntityKind::Dashboard, EntityKind::Pulse];

    /// Returns the API endpoint name, also used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Collection => "collection",
            EntityKind::Card => "card",
            EntityKind::Dashboard => "dashboard",
            EntityKind::Pulse => "pulse",
        }
    }

    /// Top-level fields kept when projecting a server response.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Collection => &["id", "location", "name", "personal_owner_id", "archived"],
            EntityKind::Card => &[
                "id",
                "name",
                "description",
                "collection_id",
                "dataset_query",
                "display",
                "visualization_settings",
                "archived",
            ],
            EntityKind::Dashboard => &[
                "id",
                "name",
                "description",
                "collection_id",
                "ordered_cards",
                "parameters",
                "archived",
            ],
            EntityKind::Pulse => &[
                "id",
                "collection_id",
                "name",
                "cards",
                "channels",
                "skip_if_empty",
                "archived",
            ],
        }
    }

    /// Fields kept on each element of array-valued sub-resources.
    pub fn internal_fields(&self) -> &'static [(&'static str, &'static [&'static str])] {
        match self {
            EntityKind::Collection | EntityKind::Card => &[],
            EntityKind::Dashboard => &[(
                "ordered_cards",
                &[
                    "card_id",
                    "parameter_mappings",
                    "visualization_settings",
                    "sizeX",
                    "sizeY",
                    "row",
                    "col",
                ],
            )],
            EntityKind::Pulse => &[
                ("cards", &["id", "include_csv", "include_xls"]),
                (
                    "channels",
                    &[
                        "id",
                        "schedule_type",
                        "schedule_hour",
                        "schedule_day",
                        "channel_type",
                        "schedule_frame",
                        "enabled",
                    ],
                ),
            ],
        }
    }

    /// Query string selecting archived items on the list endpoint.
    pub fn archived_query(&self) -> &'static str {
        match self {
            EntityKind::Collection => "archived=true",
            _ => "f=archived",
        }
    }

    /// Field holding the owning collection id.
    pub fn collection_field(&self) -> &'static str {
        match self {
            EntityKind::Collection => "parent_id",
            _ => "collection_id",
        }
    }

    /// Extension of local files holding this kind, without the dot.
    pub fn file_extension(&self) -> String {
        format!("{}{}", FILE_EXTENSION_PREFIX, self.as_str())
    }

    /// Recognizes a leaf kind from a file extension (`mbcard` → card).
    pub fn from_extension(ext: &str) -> Option<EntityKind> {
        let name = ext.strip_prefix(FILE_EXTENSION_PREFIX)?;
        EntityKind::LEAVES
            .into_iter()
            .find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "collection" => Ok(EntityKind::Collection),
            "card" => Ok(EntityKind::Card),
            "dashboard" => Ok(EntityKind::Dashboard),
            "pulse" => Ok(EntityKind::Pulse),
            _ => Err(Error::UnknownKind(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;
