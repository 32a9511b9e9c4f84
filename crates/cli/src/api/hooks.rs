// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Follow-up requests after a create or update.
//!
//! Dashboards place cards through a separate `dashboard/{id}/cards`
//! sub-resource, so the `ordered_cards` of a request body are replayed there
//! one card at a time. Other kinds need no follow-up.

use mb_core::entity::as_int;
use mb_core::{Entity, EntityKind};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::repository::Repository;
use super::transport::Transport;
use crate::error::{Error, Result};

const ORDERED_CARDS: &str = "ordered_cards";

pub(crate) async fn after_create<T: Transport>(
    repo: &Repository<'_, T>,
    request: &Entity,
    created: Entity,
) -> Result<Entity> {
    if repo.kind() != EntityKind::Dashboard {
        return Ok(created.project(repo.kind()));
    }
    let id = created
        .id()
        .ok_or_else(|| Error::UnexpectedResponse("created dashboard has no id".into()))?;
    for card in requested_cards(request) {
        add_card(repo, id, card).await?;
    }
    repo.get(id).await
}

pub(crate) async fn after_update<T: Transport>(
    repo: &Repository<'_, T>,
    id: i64,
    request: &Entity,
    updated: Entity,
) -> Result<Entity> {
    if repo.kind() != EntityKind::Dashboard {
        return Ok(updated.project(repo.kind()));
    }
    if request.contains(ORDERED_CARDS) {
        for dashcard in placed_cards(repo, id).await? {
            remove_card(repo, id, dashcard).await?;
        }
        for card in requested_cards(request) {
            add_card(repo, id, card).await?;
        }
    }
    repo.get(id).await
}

fn requested_cards(request: &Entity) -> impl Iterator<Item = &Map<String, Value>> {
    request
        .get(ORDERED_CARDS)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Ids of the card placements currently on a dashboard.
async fn placed_cards<T: Transport>(repo: &Repository<'_, T>, id: i64) -> Result<Vec<i64>> {
    let dashboard = repo.get_raw(id).await?;
    Ok(dashboard
        .get(ORDERED_CARDS)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|card| card.get("id").and_then(as_int))
        .collect())
}

async fn add_card<T: Transport>(
    repo: &Repository<'_, T>,
    id: i64,
    card: &Map<String, Value>,
) -> Result<()> {
    let session = repo.session();
    let path = format!("dashboard/{}/cards", id);
    let card_id = card.get("card_id").cloned().unwrap_or(Value::Null);

    let placed = session.post(&path, json!({ "cardId": card_id })).await?;
    let dashcard_id = placed
        .get("id")
        .and_then(as_int)
        .ok_or_else(|| Error::UnexpectedResponse(format!("no dashcard id from POST {}", path)))?;

    let mut layout = card.clone();
    layout.insert("id".to_string(), Value::from(dashcard_id));
    session
        .put(&path, json!({ "cards": [Value::Object(layout)] }))
        .await?;
    debug!(dashboard = id, dashcard = dashcard_id, "placed card");
    Ok(())
}

async fn remove_card<T: Transport>(
    repo: &Repository<'_, T>,
    id: i64,
    dashcard_id: i64,
) -> Result<()> {
    repo.session()
        .delete(&format!("dashboard/{}/cards?dashcardId={}", id, dashcard_id))
        .await?;
    debug!(dashboard = id, dashcard = dashcard_id, "removed card");
    Ok(())
}
