// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated session over a [`Transport`].
//!
//! The first request of a session logs in with the configured credentials.
//! Concurrent requests that arrive before a token exists all wait on that
//! single login. The token is then reused for the life of the session; it is
//! never refreshed, so a 401 surfaces as an ordinary [`TransportError`].

use std::time::Instant;

use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, error, trace};
use uuid::Uuid;

use super::transport::{
    HttpTransport, Method, Request, Transport, TransportError, TransportResult,
};
use crate::config::Credentials;

/// Endpoint exchanging credentials for a session token.
const LOGIN_PATH: &str = "session";

/// An authenticated connection to one server.
pub struct Session<T: Transport = HttpTransport> {
    transport: T,
    credentials: Credentials,
    token: OnceCell<String>,
}

impl Session<HttpTransport> {
    /// Create a session with the default HTTPS transport.
    pub fn new(credentials: Credentials) -> Self {
        let transport = HttpTransport::new(&credentials.server);
        Session::with_transport(credentials, transport)
    }
}

impl<T: Transport> Session<T> {
    /// Create a session with a custom transport (for testing).
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Session {
            transport,
            credentials,
            token: OnceCell::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn server(&self) -> &str {
        &self.credentials.server
    }

    /// Returns true once a token has been obtained.
    pub fn is_authenticated(&self) -> bool {
        self.token.initialized()
    }

    /// Session token, logging in on first use.
    pub async fn token(&self) -> TransportResult<String> {
        let token = self.token.get_or_try_init(|| self.login()).await?;
        Ok(token.clone())
    }

    async fn login(&self) -> TransportResult<String> {
        let body = json!({
            "username": self.credentials.username,
            "password": self.credentials.password,
        });
        let response = self
            .exchange(Method::Post, LOGIN_PATH, Some(body), None, false)
            .await?;
        response
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                TransportError::AuthenticationFailed("login response has no session id".into())
            })
    }

    /// Send an authenticated request and return the decoded body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> TransportResult<Value> {
        let token = self.token().await?;
        self.exchange(method, path, body, Some(token), true).await
    }

    pub async fn get(&self, path: &str) -> TransportResult<Value> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TransportResult<Value> {
        self.request(Method::Post, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> TransportResult<Value> {
        self.request(Method::Put, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> TransportResult<Value> {
        self.request(Method::Delete, path, None).await
    }

    /// One logged round trip. Non-2xx statuses become errors.
    async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<String>,
        log_body: bool,
    ) -> TransportResult<Value> {
        let request_id = Uuid::new_v4().simple().to_string();
        let request_id = &request_id[..8];
        let start = Instant::now();

        if log_body {
            trace!(request_id, %method, path, body = ?body, "sending request");
        } else {
            trace!(request_id, %method, path, "sending request");
        }

        let result = self
            .transport
            .send(Request {
                method,
                path: path.to_string(),
                body,
                token,
            })
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) if response.is_success() => {
                debug!(request_id, %method, path, status = response.status, elapsed_ms, "request finished");
                Ok(response.body)
            }
            Ok(response) => {
                error!(request_id, %method, path, status = response.status, elapsed_ms, "request failed");
                Err(TransportError::Status {
                    method,
                    path: path.to_string(),
                    status: response.status,
                    body: response.body,
                })
            }
            Err(e) => {
                error!(request_id, %method, path, elapsed_ms, error = %e, "request failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
