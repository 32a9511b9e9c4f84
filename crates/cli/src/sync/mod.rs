// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mirroring of the server's collection tree into a local directory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   pull /    │────►│ mb_core     │     │   local     │
//! │   push      │     │ (planning)  │     │ (files)     │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       ▲
//!        ▼                                       │
//! ┌─────────────┐                                │
//! │ Repository  │  (concurrent requests)  ───────┘
//! └─────────────┘
//! ```
//!
//! Every phase fans its requests out concurrently, waits for all of them and
//! only then reports failures, so one bad request never cancels its
//! siblings. A failed phase stops the run before the next phase starts.

mod local;
mod pull;
mod push;

pub use local::{scan, LocalTree};
pub use pull::{pull, PullReport};
pub use push::{push, PushReport};

use mb_core::{collection, EntityKind, PathMap, SyncFilter};
use tracing::{debug, error, warn};

use crate::api::{Repository, Session, Transport};
use crate::error::{Error, Result};

/// Resolves the server's collections into a filtered path map.
///
/// Archived collections are always listed so their descendants resolve;
/// the filter decides whether they are kept.
pub(crate) async fn remote_structure<T: Transport>(
    session: &Session<T>,
    filter: &SyncFilter,
) -> Result<PathMap> {
    let listing = Repository::new(session, EntityKind::Collection)
        .list(true)
        .await?;
    let collections = collection::from_listing(&listing);
    let map = PathMap::build(&collections, filter);
    for (path, ids) in map.duplicates() {
        warn!(path, ?ids, "several collections share one path; only the first is kept");
    }
    debug!(
        listed = listing.len(),
        mapped = map.len(),
        "resolved collection paths"
    );
    Ok(map)
}

/// Collects the outcome of a phase of concurrent operations.
///
/// All results are inspected; failures are logged individually and the
/// first one is carried in [`Error::PartialFailure`].
pub(crate) fn settle<T>(phase: &'static str, results: Vec<Result<T>>) -> Result<Vec<T>> {
    let total = results.len();
    let mut succeeded = Vec::with_capacity(total);
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(value) => succeeded.push(value),
            Err(e) => {
                error!(phase, error = %e, "operation failed");
                failures.push(e);
            }
        }
    }

    let failed = failures.len();
    let mut failures = failures.into_iter();
    match failures.next() {
        None => Ok(succeeded),
        Some(first) if total == 1 => Err(first),
        Some(first) => Err(Error::PartialFailure {
            phase,
            succeeded: succeeded.len(),
            failed,
            first: Box::new(first),
        }),
    }
}


#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
