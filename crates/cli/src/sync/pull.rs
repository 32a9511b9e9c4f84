// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server → local mirroring.

use std::fmt;
use std::path::Path;

use futures_util::future::join_all;
use mb_core::reconcile::pull_target;
use mb_core::{EntityKind, SyncFilter};
use tracing::{debug, info};

use super::local;
use super::{remote_structure, settle};
use crate::api::{Repository, Session, Transport};
use crate::error::{Error, Result};

/// What a pull wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullReport {
    pub directories: usize,
    pub files: usize,
}

impl fmt::Display for PullReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} directories, {} files",
            self.directories, self.files
        )
    }
}

/// Replaces the contents of `root` with the server's current state.
///
/// Collection directories are created first, then every kept entity is
/// written to `{dir}{id}.{name}.mb{kind}`. Leaf kinds are fetched
/// concurrently.
pub async fn pull<T: Transport>(
    session: &Session<T>,
    root: &Path,
    filter: &SyncFilter,
) -> Result<PullReport> {
    local::reset_root(root)?;
    let map = remote_structure(session, filter).await?;
    let mut report = PullReport::default();

    for path in map.paths() {
        local::create_dir(root, path)?;
        report.directories += 1;
    }
    debug!(directories = report.directories, "created collection directories");

    let listings = join_all(EntityKind::LEAVES.map(|kind| async move {
        let entities = Repository::new(session, kind)
            .list(filter.include_archived)
            .await?;
        Ok::<_, Error>((kind, entities))
    }))
    .await;

    for (kind, entities) in settle("entity listing", listings)? {
        for entity in &entities {
            let Some(target) = pull_target(kind, entity, &map, filter) else {
                continue;
            };
            local::write_entity(root, &target, entity)?;
            report.files += 1;
        }
        info!(%kind, listed = entities.len(), "pulled entities");
    }

    Ok(report)
}

#[cfg(test)]
#[path = "pull_tests.rs"]
mod tests;
