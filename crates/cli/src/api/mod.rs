// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the server's REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Repository  │────►│   Session   │────►│  Transport  │────►│   Server    │
//! │ (per kind)   │◄────│ (token)     │◄────│   (trait)   │◄────│  /api/...   │
//! └──────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    hooks     │  (dashboard card placements)
//! └──────────────┘
//! ```
//!
//! - One login per session, shared by concurrent requests
//! - Injectable transport trait for testing

mod hooks;
mod repository;
mod session;
mod transport;

pub use repository::Repository;
pub use session::Session;
pub use transport::{
    api_root, HttpTransport, Method, Request, Response, SendFuture, Transport, TransportError,
    TransportResult, SESSION_HEADER,
};

#[cfg(test)]
pub(crate) mod test_helpers;
