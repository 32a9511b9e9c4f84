// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local → server reconciliation.
//!
//! A push runs four phases in order, each fully concurrent inside:
//!
//! 1. archive collections whose directory is gone (and duplicate siblings)
//! 2. create collections for new directories, shallowest first
//! 3. create or update an entity for every local file
//! 4. archive in-scope entities no local file accounts for
//!
//! Collections created in phase 2 are added to the path map as each depth
//! group completes, so deeper directories and the files in phase 3 resolve
//! their parent to the new id.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::Path;

use futures_util::future::join_all;
use mb_core::reconcile::{
    collection_archives, collection_creates, entity_archives, new_collection, plan_upsert,
};
use mb_core::{Entity, EntityKind, LocalFile, PathMap, SyncFilter, Upsert};
use tracing::{debug, info};

use super::local;
use super::{remote_structure, settle};
use crate::api::{Repository, Session, Transport};
use crate::error::{Error, Result};

/// What a push changed on the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushReport {
    pub collections_archived: usize,
    pub collections_created: usize,
    pub entities_created: usize,
    pub entities_updated: usize,
    pub entities_unchanged: usize,
    pub entities_archived: usize,
}

impl PushReport {
    /// Total number of write requests issued.
    pub fn changes(&self) -> usize {
        self.collections_archived
            + self.collections_created
            + self.entities_created
            + self.entities_updated
            + self.entities_archived
    }
}

impl fmt::Display for PushReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "collections: {} created, {} archived; entities: {} created, {} updated, {} archived, {} unchanged",
            self.collections_created,
            self.collections_archived,
            self.entities_created,
            self.entities_updated,
            self.entities_archived,
            self.entities_unchanged
        )
    }
}

enum Applied {
    Created,
    Updated,
    Unchanged,
}

/// Makes the server match the tree under `root`.
pub async fn push<T: Transport>(
    session: &Session<T>,
    root: &Path,
    filter: &SyncFilter,
) -> Result<PushReport> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.display().to_string()));
    }

    let mut map = remote_structure(session, filter).await?;
    let tree = local::scan(root)?;
    let dirs: BTreeSet<String> = tree
        .dirs
        .into_iter()
        .filter(|dir| !filter.excludes(dir))
        .collect();
    let files: Vec<LocalFile> = tree
        .files
        .into_iter()
        .filter(|file| !filter.excludes(&file.path))
        .collect();
    debug!(dirs = dirs.len(), files = files.len(), "scanned local tree");

    let remote = list_leaves(session).await?;
    let mut report = PushReport::default();

    report.collections_archived = archive_collections(session, &dirs, &map).await?;
    report.collections_created = create_collections(session, &dirs, &mut map).await?;

    let touched = upsert_entities(session, root, &files, &remote, &map, &mut report).await?;

    let mut archives = Vec::new();
    for kind in EntityKind::LEAVES {
        let listed = remote.get(&kind).map(Vec::as_slice).unwrap_or_default();
        let kept = touched.get(&kind).cloned().unwrap_or_default();
        for id in entity_archives(kind, listed, &map, filter, &kept) {
            archives.push((kind, id));
        }
    }
    let results = join_all(archives.into_iter().map(|(kind, id)| async move {
        info!(%kind, id, "archiving entity");
        Repository::new(session, kind).archive(id).await
    }))
    .await;
    report.entities_archived = settle("entity archive", results)?.len();

    Ok(report)
}

/// Every leaf entity on the server, archived ones included.
async fn list_leaves<T: Transport>(
    session: &Session<T>,
) -> Result<HashMap<EntityKind, Vec<Entity>>> {
    let results = join_all(EntityKind::LEAVES.map(|kind| async move {
        let entities = Repository::new(session, kind).list(true).await?;
        Ok::<_, Error>((kind, entities))
    }))
    .await;
    Ok(settle("entity listing", results)?.into_iter().collect())
}

async fn archive_collections<T: Transport>(
    session: &Session<T>,
    dirs: &BTreeSet<String>,
    map: &PathMap,
) -> Result<usize> {
    let ids = collection_archives(dirs, map)?;
    let repo = Repository::new(session, EntityKind::Collection);
    let repo = &repo;
    let results = join_all(ids.into_iter().map(|id| async move {
        info!(id, path = map.path(id).unwrap_or_default(), "archiving collection");
        repo.archive(id).await
    }))
    .await;
    Ok(settle("collection archive", results)?.len())
}

async fn create_collections<T: Transport>(
    session: &Session<T>,
    dirs: &BTreeSet<String>,
    map: &mut PathMap,
) -> Result<usize> {
    let repo = Repository::new(session, EntityKind::Collection);
    let repo = &repo;
    let mut created = 0;

    for group in collection_creates(dirs, map) {
        let requests: Vec<(String, Entity)> = group
            .into_iter()
            .map(|path| {
                let body = new_collection(&path, map);
                (path, body)
            })
            .collect();
        let results = join_all(requests.into_iter().map(|(path, body)| async move {
            info!(path = %path, "creating collection");
            let id = repo.create(body).await?.id().ok_or_else(|| {
                Error::UnexpectedResponse(format!("created collection {} has no id", path))
            })?;
            Ok::<_, Error>((path, id))
        }))
        .await;

        for (path, id) in settle("collection create", results)? {
            map.insert(path, id);
            created += 1;
        }
    }
    Ok(created)
}

/// Creates or updates an entity per local file; returns the ids touched.
async fn upsert_entities<T: Transport>(
    session: &Session<T>,
    root: &Path,
    files: &[LocalFile],
    remote: &HashMap<EntityKind, Vec<Entity>>,
    map: &PathMap,
    report: &mut PushReport,
) -> Result<HashMap<EntityKind, HashSet<i64>>> {
    let index: HashMap<(EntityKind, i64), &Entity> = remote
        .iter()
        .flat_map(|(kind, entities)| {
            entities
                .iter()
                .filter_map(move |entity| Some(((*kind, entity.id()?), entity)))
        })
        .collect();

    let mut failed_reads = Vec::new();
    let mut plans = Vec::new();
    for file in files {
        match local::read_entity(root, file) {
            Ok(content) => {
                let listed = content
                    .id()
                    .and_then(|id| index.get(&(file.kind, id)).copied());
                let parent = map.first_id(&file.dir);
                plans.push((file, plan_upsert(file.kind, content, parent, listed)));
            }
            Err(e) => failed_reads.push(Err(e)),
        }
    }

    let mut results = join_all(
        plans
            .into_iter()
            .map(|(file, plan)| apply_upsert(session, file, plan)),
    )
    .await;
    results.extend(failed_reads);

    let mut touched: HashMap<EntityKind, HashSet<i64>> = HashMap::new();
    for (kind, id, applied) in settle("entity upsert", results)? {
        match applied {
            Applied::Created => report.entities_created += 1,
            Applied::Updated => report.entities_updated += 1,
            Applied::Unchanged => report.entities_unchanged += 1,
        }
        if let Some(id) = id {
            touched.entry(kind).or_default().insert(id);
        }
    }
    Ok(touched)
}

async fn apply_upsert<T: Transport>(
    session: &Session<T>,
    file: &LocalFile,
    plan: Upsert,
) -> Result<(EntityKind, Option<i64>, Applied)> {
    let repo = Repository::new(session, file.kind);
    match plan {
        Upsert::Create(entity) => {
            info!(path = %file.path, "creating {}", file.kind);
            let created = repo.create(entity).await?;
            Ok((file.kind, created.id(), Applied::Created))
        }
        Upsert::Update { id, entity } => {
            info!(path = %file.path, id, "updating {}", file.kind);
            repo.update(id, entity).await?;
            Ok((file.kind, Some(id), Applied::Updated))
        }
        Upsert::Unchanged { id } => {
            debug!(path = %file.path, id, "unchanged");
            Ok((file.kind, Some(id), Applied::Unchanged))
        }
    }
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
