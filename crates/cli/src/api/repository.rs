// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CRUD access to one entity kind.

use std::collections::HashSet;

use futures_util::future::join;
use mb_core::{Entity, EntityKind};
use serde_json::{json, Value};
use tracing::debug;

use super::hooks;
use super::session::Session;
use super::transport::Transport;
use crate::error::{Error, Result};

/// Typed endpoint for one [`EntityKind`], sharing the session's token.
pub struct Repository<'s, T: Transport> {
    session: &'s Session<T>,
    kind: EntityKind,
}

impl<'s, T: Transport> Repository<'s, T> {
    pub fn new(session: &'s Session<T>, kind: EntityKind) -> Self {
        Repository { session, kind }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub(crate) fn session(&self) -> &'s Session<T> {
        self.session
    }

    /// Lists entities, projected to the kind's fields.
    ///
    /// With `include_archived` the archived listing is fetched alongside the
    /// active one and merged; ids seen twice are kept once.
    pub async fn list(&self, include_archived: bool) -> Result<Vec<Entity>> {
        let kind = self.kind.as_str();
        let raw = if include_archived {
            let archived_path = format!("{}?{}", kind, self.kind.archived_query());
            let (active, archived) =
                join(self.session.get(kind), self.session.get(&archived_path)).await;
            let mut items = self.items(active?)?;
            items.extend(self.items(archived?)?);
            items
        } else {
            let active = self.session.get(kind).await?;
            self.items(active)?
        };

        let mut seen = HashSet::new();
        let entities: Vec<Entity> = raw
            .iter()
            .filter(|entity| entity.id().map_or(true, |id| seen.insert(id)))
            .map(|entity| entity.project(self.kind))
            .collect();
        debug!(kind, count = entities.len(), include_archived, "listed entities");
        Ok(entities)
    }

    /// Fetches one entity, projected to the kind's fields.
    pub async fn get(&self, id: i64) -> Result<Entity> {
        Ok(self.get_raw(id).await?.project(self.kind))
    }

    /// Fetches one entity with every field the server returns.
    pub async fn get_raw(&self, id: i64) -> Result<Entity> {
        let value = self.session.get(&self.item_path(id)).await?;
        Ok(Entity::from_value(self.kind, value)?)
    }

    /// Creates an entity and returns the server's final representation.
    pub async fn create(&self, entity: Entity) -> Result<Entity> {
        let response = self
            .session
            .post(self.kind.as_str(), entity.clone().into_value())
            .await?;
        let created = Entity::from_value(self.kind, response)?;
        hooks::after_create(self, &entity, created).await
    }

    /// Replaces an entity's fields and returns the final representation.
    pub async fn update(&self, id: i64, entity: Entity) -> Result<Entity> {
        let response = self
            .session
            .put(&self.item_path(id), entity.clone().into_value())
            .await?;
        let updated = Entity::from_value(self.kind, response)?;
        hooks::after_update(self, id, &entity, updated).await
    }

    /// Marks an entity archived.
    pub async fn archive(&self, id: i64) -> Result<Entity> {
        let response = self
            .session
            .put(&self.item_path(id), json!({ "archived": true }))
            .await?;
        match response {
            Value::Object(_) => Ok(Entity::from_value(self.kind, response)?.project(self.kind)),
            _ => self.get(id).await,
        }
    }

    /// Deletes an entity permanently.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.session.delete(&self.item_path(id)).await?;
        Ok(())
    }

    fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.kind.as_str(), id)
    }

    fn items(&self, value: Value) -> Result<Vec<Entity>> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| Entity::from_value(self.kind, item).map_err(Error::from))
                .collect(),
            other => Err(Error::UnexpectedResponse(format!(
                "expected a {} list, got {}",
                self.kind, other
            ))),
        }
    }
}
