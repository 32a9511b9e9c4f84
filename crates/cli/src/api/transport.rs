// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the REST API.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTPS requests for production
//! - In-memory fake servers for unit testing
//!
//! A transport only moves requests and responses; authentication and status
//! handling live in [`Session`](super::Session).

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

/// Header carrying the session token.
pub const SESSION_HEADER: &str = "X-Metabase-Session";

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request relative to the API root (`{server}/api/`).
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path below the API root, optionally with a query (`card?f=archived`).
    pub path: String,
    pub body: Option<Value>,
    /// Session token sent as [`SESSION_HEADER`].
    pub token: Option<String>,
}

/// Raw response: status code and decoded body (`Null` when empty).
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("{method} {path} failed with status {status}")]
    Status {
        method: Method,
        path: String,
        status: u16,
        body: Value,
    },

    /// The request never produced a response.
    #[error("{method} {path}: connection failed: {reason}")]
    ConnectionFailed {
        method: Method,
        path: String,
        reason: String,
    },

    /// The response body was not JSON.
    #[error("{method} {path}: invalid response body: {reason}")]
    InvalidBody {
        method: Method,
        path: String,
        reason: String,
    },

    /// The login response carried no session id.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
}

impl TransportError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Transport::send`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = TransportResult<Response>> + Send + 'a>>;

/// Transport trait for request/response exchanges with the API.
///
/// Takes `&self` so many requests can be in flight at once.
pub trait Transport: Send + Sync {
    /// Send a request and wait for the response, whatever its status.
    fn send(&self, request: Request) -> SendFuture<'_>;
}

/// HTTPS transport implementation using reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `server`; requests go to `{server}/api/`.
    pub fn new(server: &str) -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
            base_url: api_root(server),
        }
    }
}

/// Normalizes a server address into its API root.
pub fn api_root(server: &str) -> String {
    format!("{}/api/", server.trim().trim_end_matches('/'))
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> SendFuture<'_> {
        Box::pin(async move {
            let url = format!("{}{}", self.base_url, request.path.trim_start_matches('/'));
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.client.request(method, &url);
            if let Some(ref token) = request.token {
                builder = builder.header(SESSION_HEADER, token);
            }
            if let Some(ref body) = request.body {
                builder = builder.json(body);
            }

            let response =
                builder
                    .send()
                    .await
                    .map_err(|e| TransportError::ConnectionFailed {
                        method: request.method,
                        path: request.path.clone(),
                        reason: e.to_string(),
                    })?;
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| TransportError::ConnectionFailed {
                    method: request.method,
                    path: request.path.clone(),
                    reason: e.to_string(),
                })?;

            let body = if text.trim().is_empty() {
                Value::Null
            } else {
                match serde_json::from_str(&text) {
                    Ok(value) => value,
                    // Error pages are often plain text; keep them for the caller.
                    Err(_) if !(200..300).contains(&status) => Value::String(text),
                    Err(e) => {
                        return Err(TransportError::InvalidBody {
                            method: request.method,
                            path: request.path,
                            reason: e.to_string(),
                        })
                    }
                }
            };

            Ok(Response { status, body })
        })
    }
}
