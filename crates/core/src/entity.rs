// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-backed representation of remote resources.
//!
//! Entities keep the server's field map as-is so unknown fields survive a
//! round trip; [`Entity::project`] narrows it to the allow-listed fields of
//! the entity's kind before it is written locally or sent upstream.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::escape::escape_name;
use crate::kind::EntityKind;

/// Name used when the server omits one.
pub const UNTITLED: &str = "untitled";

/// A remote resource as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    fields: Map<String, Value>,
}

impl Entity {
    /// Converts a JSON value, which must be an object.
    pub fn from_value(kind: EntityKind, value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Entity { fields }),
            other => Err(Error::InvalidContent {
                kind: kind.to_string(),
                reason: format!("expected a JSON object, found {}", json_type(&other)),
            }),
        }
    }

    /// Parses JSON text into an entity.
    pub fn parse(kind: EntityKind, text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidContent {
            kind: kind.to_string(),
            reason: e.to_string(),
        })?;
        Entity::from_value(kind, value)
    }

    /// Parses user supplied content, which must be a non-empty object.
    pub fn parse_content(kind: EntityKind, text: &str) -> Result<Self> {
        let entity = Entity::parse(kind, text)?;
        if entity.is_empty() {
            return Err(Error::InvalidContent {
                kind: kind.to_string(),
                reason: "the object has no fields".to_string(),
            });
        }
        Ok(entity)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Server id, accepting numbers and numeric strings.
    ///
    /// Synthetic records such as the `"root"` collection have no integer id.
    pub fn id(&self) -> Option<i64> {
        self.fields.get("id").and_then(as_int)
    }

    pub fn name(&self) -> &str {
        self.fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(UNTITLED)
    }

    pub fn archived(&self) -> bool {
        self.fields
            .get("archived")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Id of the owning collection, read from the kind's collection field.
    pub fn parent_id(&self, kind: EntityKind) -> Option<i64> {
        self.fields.get(kind.collection_field()).and_then(as_int)
    }

    /// Places the entity inside a collection (or the root when `None`).
    pub fn set_parent(&mut self, kind: EntityKind, parent: Option<i64>) {
        let value = parent.map(Value::from).unwrap_or(Value::Null);
        self.fields.insert(kind.collection_field().to_string(), value);
    }

    /// Drops a null or zero parent so the server places the entity at the root.
    pub fn strip_empty_parent(&mut self, kind: EntityKind) {
        let field = kind.collection_field();
        let empty = match self.fields.get(field) {
            Some(Value::Null) => true,
            Some(value) => as_int(value) == Some(0),
            None => false,
        };
        if empty {
            self.fields.remove(field);
        }
    }

    /// Keeps only the allow-listed fields of `kind`.
    pub fn project(&self, kind: EntityKind) -> Entity {
        self.project_with(kind.fields(), kind.internal_fields())
    }

    /// Keeps only `fields`; array-valued fields listed in `internal` have
    /// each object element narrowed to its own allow-list.
    pub fn project_with(&self, fields: &[&str], internal: &[(&str, &[&str])]) -> Entity {
        let mut projected = Map::new();
        for (key, value) in &self.fields {
            if !fields.contains(&key.as_str()) {
                continue;
            }
            let nested = internal.iter().find(|(name, _)| *name == key.as_str());
            let value = match (nested, value) {
                (Some((_, allowed)), Value::Array(items)) => Value::Array(
                    items
                        .iter()
                        .map(|item| filter_object(item, allowed))
                        .collect(),
                ),
                _ => value.clone(),
            };
            projected.insert(key.clone(), value);
        }
        Entity { fields: projected }
    }

    /// Local file name: `{id}.{escapedName}.mb{kind}`.
    pub fn file_name(&self, kind: EntityKind) -> Option<String> {
        let id = self.id()?;
        Some(format!(
            "{}.{}.{}",
            id,
            escape_name(self.name()),
            kind.file_extension()
        ))
    }

    /// Pretty-printed JSON with a trailing newline, as stored on disk.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.fields)?;
        text.push('\n');
        Ok(text)
    }
}

impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        entity.into_value()
    }
}

fn filter_object(item: &Value, allowed: &[&str]) -> Value {
    match item {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| allowed.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Reads an integer from a JSON number or numeric string.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
