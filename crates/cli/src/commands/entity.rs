// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::io::Write;

use mb_core::{Entity, EntityKind};
use serde_json::Value;

use crate::api::{Repository, Session, Transport};
use crate::cli::{ConnectionArgs, ContentArgs, EntityCommand};
use crate::error::{Error, Result};

use super::connect;

/// A validated entity command.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Get(Option<i64>),
    Create(Entity),
    Update(i64, Entity),
    Delete(i64),
    Archive(i64),
}

impl Action {
    /// Reads and validates any content before a session is opened.
    pub fn from_command(kind: EntityKind, command: EntityCommand) -> Result<Action> {
        Ok(match command {
            EntityCommand::Get { id } => Action::Get(id),
            EntityCommand::Create { content } => Action::Create(read_content(kind, &content)?),
            EntityCommand::Update { id, content } => {
                Action::Update(id, read_content(kind, &content)?)
            }
            EntityCommand::Delete { id } => Action::Delete(id),
            EntityCommand::Archive { id } => Action::Archive(id),
        })
    }
}

/// Parses inline or file content into a non-empty JSON object.
pub fn read_content(kind: EntityKind, content: &ContentArgs) -> Result<Entity> {
    let text = match (&content.string_content, &content.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => {
            return Err(Error::InvalidContent {
                kind: kind.to_string(),
                reason: "no content given".to_string(),
            })
        }
    };
    Ok(Entity::parse_content(kind, &text)?)
}

pub async fn run(
    connection: &ConnectionArgs,
    kind: EntityKind,
    command: EntityCommand,
) -> Result<()> {
    let action = Action::from_command(kind, command)?;
    let session = connect(connection)?;
    run_impl(&session, kind, action, &mut std::io::stdout()).await
}

/// Internal implementation that accepts a session for testing.
pub(crate) async fn run_impl<T: Transport, W: Write>(
    session: &Session<T>,
    kind: EntityKind,
    action: Action,
    out: &mut W,
) -> Result<()> {
    let repo = Repository::new(session, kind);
    let result: Value = match action {
        Action::Get(None) => Value::Array(
            repo.list(false)
                .await?
                .into_iter()
                .map(Entity::into_value)
                .collect(),
        ),
        Action::Get(Some(id)) => repo.get(id).await?.into_value(),
        Action::Create(entity) => repo.create(entity).await?.into_value(),
        Action::Update(id, entity) => repo.update(id, entity).await?.into_value(),
        Action::Archive(id) => repo.archive(id).await?.into_value(),
        Action::Delete(id) => {
            repo.delete(id).await?;
            return Ok(());
        }
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    Ok(())
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
