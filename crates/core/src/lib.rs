// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! mb-core: Shared library for the mbsync collection synchronizer
//!
//! This crate provides the data model and the pure reconciliation logic:
//! name escaping, entity kinds and field projection, collection path
//! resolution, and the pull/push diffing used by the `mbsync` CLI.

pub mod collection;
pub mod entity;
pub mod error;
pub mod escape;
pub mod kind;
pub mod path_map;
pub mod reconcile;

pub use collection::Collection;
pub use entity::Entity;
pub use error::{Error, Result};
pub use kind::EntityKind;
pub use path_map::{PathMap, ResolvedCollection, SyncFilter};
pub use reconcile::{LocalFile, Upsert};
