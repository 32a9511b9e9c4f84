// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory server for API and sync tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};

use mb_core::entity::as_int;
use mb_core::EntityKind;
use serde_json::{json, Map, Value};

use super::session::Session;
use super::transport::{Method, Request, Response, SendFuture, Transport, TransportResult};
use crate::config::Credentials;

pub const TOKEN: &str = "test-token";
pub const USERNAME: &str = "me@example.com";
pub const PASSWORD: &str = "secret";

pub fn credentials() -> Credentials {
    Credentials {
        server: "https://mb.example.com".to_string(),
        username: USERNAME.to_string(),
        password: PASSWORD.to_string(),
    }
}

/// A session talking to a fresh [`FakeServer`].
pub fn fake_session() -> Session<FakeServer> {
    Session::with_transport(credentials(), FakeServer::new())
}

/// A request as recorded by the fake server.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    tables: BTreeMap<EntityKind, BTreeMap<i64, Map<String, Value>>>,
    log: Vec<Recorded>,
    logins: usize,
    failures: HashSet<(Method, String)>,
}

/// Minimal stand-in for the REST API.
///
/// Collections get `location` computed from `parent_id`; dashboards keep
/// their card placements under `ordered_cards`.
pub struct FakeServer {
    state: Mutex<State>,
}

impl FakeServer {
    pub fn new() -> Self {
        FakeServer {
            state: Mutex::new(State {
                next_id: 100,
                ..Default::default()
            }),
        }
    }

    /// Stores an entity as-is. `id` must be present.
    pub fn seed(&self, kind: EntityKind, value: Value) {
        let mut fields = value.as_object().cloned().expect("seed expects an object");
        let id = fields.get("id").and_then(as_int).unwrap();
        fields.entry("archived").or_insert(Value::Bool(false));
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(id + 1);
        state.tables.entry(kind).or_default().insert(id, fields);
    }

    /// Seeds a collection with its location chain.
    pub fn seed_collection(&self, id: i64, name: &str, location: &str) {
        self.seed(
            EntityKind::Collection,
            json!({ "id": id, "name": name, "location": location }),
        );
    }

    /// Makes every request with this method and path fail with a 500.
    pub fn fail_on(&self, method: Method, path: &str) {
        let mut state = self.state.lock().unwrap();
        state.failures.insert((method, path.to_string()));
    }

    pub fn stored(&self, kind: EntityKind, id: i64) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state
            .tables
            .get(&kind)
            .and_then(|table| table.get(&id))
            .map(|fields| Value::Object(fields.clone()))
    }

    pub fn ids(&self, kind: EntityKind) -> Vec<i64> {
        let state = self.state.lock().unwrap();
        state
            .tables
            .get(&kind)
            .map(|table| table.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn logins(&self) -> usize {
        self.state.lock().unwrap().logins
    }

    /// Every request received, in arrival order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().log.clone()
    }

    /// Requests that change state, excluding the login.
    pub fn writes(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::Get && r.path != "session")
            .collect()
    }

    fn handle(&self, request: Request) -> Response {
        let mut state = self.state.lock().unwrap();
        state.log.push(Recorded {
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
        });

        if state
            .failures
            .contains(&(request.method, request.path.clone()))
        {
            return reply(500, json!("injected failure"));
        }

        if request.path == "session" {
            state.logins += 1;
            let body = request.body.unwrap_or(Value::Null);
            return if body["username"] == USERNAME && body["password"] == PASSWORD {
                reply(200, json!({ "id": TOKEN }))
            } else {
                reply(401, json!("invalid credentials"))
            };
        }
        if request.token.as_deref() != Some(TOKEN) {
            return reply(401, json!("unauthenticated"));
        }

        let (path, query) = match request.path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (request.path.as_str(), None),
        };
        let segments: Vec<&str> = path.split('/').collect();
        let body = request.body.unwrap_or(Value::Null);

        match (request.method, segments.as_slice()) {
            (Method::Get, [kind]) => list(&state, kind, query),
            (Method::Post, [kind]) => create(&mut state, kind, body),
            (Method::Get, [kind, id]) => match lookup(&state, kind, id) {
                Some(fields) => reply(200, Value::Object(fields.clone())),
                None => reply(404, json!("Not found.")),
            },
            (Method::Put, [kind, id]) => update(&mut state, kind, id, body),
            (Method::Delete, [kind, id]) => {
                let removed = table(kind)
                    .zip(id.parse::<i64>().ok())
                    .and_then(|(k, id)| state.tables.get_mut(&k)?.remove(&id));
                match removed {
                    Some(_) => reply(204, Value::Null),
                    None => reply(404, json!("Not found.")),
                }
            }
            (Method::Post, ["dashboard", id, "cards"]) => place_card(&mut state, id, body),
            (Method::Put, ["dashboard", id, "cards"]) => layout_cards(&mut state, id, body),
            (Method::Delete, ["dashboard", id, "cards"]) => remove_card(&mut state, id, query),
            _ => reply(404, json!("Not found.")),
        }
    }
}

impl Default for FakeServer {
    fn default() -> Self {
        FakeServer::new()
    }
}

impl Transport for FakeServer {
    fn send(&self, request: Request) -> SendFuture<'_> {
        Box::pin(async move {
            let login = request.path == "session";
            // Give concurrent callers a chance to pile up behind the login.
            if login {
                for _ in 0..5 {
                    tokio::task::yield_now().await;
                }
            }
            let response: TransportResult<Response> = Ok(self.handle(request));
            response
        })
    }
}

fn reply(status: u16, body: Value) -> Response {
    Response { status, body }
}

fn table(kind: &str) -> Option<EntityKind> {
    kind.parse().ok()
}

fn lookup<'a>(state: &'a State, kind: &str, id: &str) -> Option<&'a Map<String, Value>> {
    let kind = table(kind)?;
    let id: i64 = id.parse().ok()?;
    state.tables.get(&kind)?.get(&id)
}

fn list(state: &State, kind: &str, query: Option<&str>) -> Response {
    let Some(kind) = table(kind) else {
        return reply(404, json!("Not found."));
    };
    let archived = query == Some(kind.archived_query());
    let items: Vec<Value> = state
        .tables
        .get(&kind)
        .into_iter()
        .flat_map(|t| t.values())
        .filter(|fields| fields.get("archived").and_then(Value::as_bool) == Some(archived))
        .map(|fields| Value::Object(fields.clone()))
        .collect();
    reply(200, Value::Array(items))
}

fn location_for(state: &State, parent: Option<i64>) -> String {
    let parent = parent.and_then(|id| {
        let fields = state.tables.get(&EntityKind::Collection)?.get(&id)?;
        let location = fields.get("location")?.as_str()?.to_string();
        Some(format!("{}{}/", location, id))
    });
    parent.unwrap_or_else(|| "/".to_string())
}

fn create(state: &mut State, kind: &str, body: Value) -> Response {
    let Some(kind) = table(kind) else {
        return reply(404, json!("Not found."));
    };
    let Value::Object(mut fields) = body else {
        return reply(400, json!("expected an object"));
    };
    let id = state.next_id;
    state.next_id += 1;
    fields.insert("id".into(), json!(id));
    fields.entry("archived").or_insert(Value::Bool(false));
    if kind == EntityKind::Collection {
        let parent = fields.get("parent_id").and_then(as_int);
        fields.insert("location".into(), json!(location_for(state, parent)));
    }
    if kind == EntityKind::Dashboard {
        fields.insert("ordered_cards".into(), json!([]));
    }
    state.tables.entry(kind).or_default().insert(id, fields.clone());
    reply(200, Value::Object(fields))
}

fn update(state: &mut State, kind: &str, id: &str, body: Value) -> Response {
    let (Some(kind), Ok(id)) = (table(kind), id.parse::<i64>()) else {
        return reply(404, json!("Not found."));
    };
    let Value::Object(changes) = body else {
        return reply(400, json!("expected an object"));
    };
    let location = (kind == EntityKind::Collection && changes.contains_key("parent_id"))
        .then(|| location_for(state, changes.get("parent_id").and_then(as_int)));
    let Some(fields) = state.tables.get_mut(&kind).and_then(|t| t.get_mut(&id)) else {
        return reply(404, json!("Not found."));
    };
    for (key, value) in changes {
        // Placements only change through the cards sub-resource.
        if kind == EntityKind::Dashboard && key == "ordered_cards" {
            continue;
        }
        fields.insert(key, value);
    }
    if let Some(location) = location {
        fields.insert("location".into(), json!(location));
    }
    reply(200, Value::Object(fields.clone()))
}

fn dashboard_cards<'a>(state: &'a mut State, id: &str) -> Option<&'a mut Vec<Value>> {
    let id: i64 = id.parse().ok()?;
    let dashboard = state
        .tables
        .get_mut(&EntityKind::Dashboard)?
        .get_mut(&id)?;
    dashboard.get_mut("ordered_cards")?.as_array_mut()
}

fn place_card(state: &mut State, id: &str, body: Value) -> Response {
    let dashcard_id = state.next_id;
    state.next_id += 1;
    let card = json!({ "id": dashcard_id, "card_id": body["cardId"].clone() });
    match dashboard_cards(state, id) {
        Some(cards) => {
            cards.push(card.clone());
            reply(200, card)
        }
        None => reply(404, json!("Not found.")),
    }
}

fn layout_cards(state: &mut State, id: &str, body: Value) -> Response {
    let Some(cards) = dashboard_cards(state, id) else {
        return reply(404, json!("Not found."));
    };
    for change in body["cards"].as_array().cloned().unwrap_or_default() {
        let target = cards
            .iter_mut()
            .find(|card| card["id"] == change["id"])
            .and_then(Value::as_object_mut);
        if let (Some(target), Value::Object(change)) = (target, change) {
            target.extend(change);
        }
    }
    reply(200, json!({ "status": "ok" }))
}

fn remove_card(state: &mut State, id: &str, query: Option<&str>) -> Response {
    let dashcard_id = query
        .and_then(|q| q.strip_prefix("dashcardId="))
        .and_then(|v| v.parse::<i64>().ok());
    let Some(cards) = dashboard_cards(state, id) else {
        return reply(404, json!("Not found."));
    };
    let before = cards.len();
    cards.retain(|card| as_int(&card["id"]) != dashcard_id);
    if cards.len() == before {
        return reply(404, json!("Not found."));
    }
    reply(204, Value::Null)
}

/// Captures warnings logged on the current thread while it is alive.
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

impl LogCapture {
    pub fn start() -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || CaptureWriter(Arc::clone(&sink)))
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        LogCapture {
            buffer,
            _guard: guard,
        }
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
