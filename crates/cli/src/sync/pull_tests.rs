// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::api::test_helpers::{fake_session, FakeServer};
use crate::api::Method;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn seed_tree(server: &FakeServer) {
    server.seed_collection(1, "Team", "/");
    server.seed_collection(4, "Q1/Q2", "/1/");
    server.seed(
        EntityKind::Collection,
        json!({ "id": 6, "name": "Mine", "location": "/", "personal_owner_id": 2 }),
    );
    server.seed(
        EntityKind::Card,
        json!({ "id": 3, "name": "Revenue", "collection_id": 4, "creator_id": 9 }),
    );
    server.seed(
        EntityKind::Card,
        json!({ "id": 8, "name": "Stale", "collection_id": 1, "archived": true }),
    );
    server.seed(
        EntityKind::Dashboard,
        json!({ "id": 2, "name": "Home", "collection_id": null, "ordered_cards": [] }),
    );
    server.seed(
        EntityKind::Pulse,
        json!({ "id": 5, "name": "Private", "collection_id": 6 }),
    );
}

fn read(root: &Path, relative: &str) -> Value {
    let text = fs::read_to_string(local::to_fs_path(root, relative)).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn test_pull_writes_tree() {
    let session = fake_session();
    seed_tree(session.transport());
    let temp = TempDir::new().unwrap();

    let report = pull(&session, temp.path(), &SyncFilter::default())
        .await
        .unwrap();

    assert_eq!(report.directories, 2);
    assert_eq!(report.files, 2);
    assert!(temp.path().join("Team").join("Q1_\\_Q2").is_dir());
    assert!(!temp.path().join("Mine").exists());

    let card = read(temp.path(), "/Team/Q1_\\_Q2/3.Revenue.mbcard");
    assert_eq!(card["collection_id"], 4);
    assert!(card.get("creator_id").is_none());
    assert!(temp.path().join("2.Home.mbdashboard").is_file());
}

#[tokio::test]
async fn test_pull_clears_stale_content() {
    let session = fake_session();
    seed_tree(session.transport());
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("Old")).unwrap();
    fs::write(temp.path().join("Old").join("1.x.mbcard"), "{}").unwrap();

    pull(&session, temp.path(), &SyncFilter::default())
        .await
        .unwrap();

    assert!(!temp.path().join("Old").exists());
}

#[tokio::test]
async fn test_pull_include_archived_and_personal() {
    let session = fake_session();
    seed_tree(session.transport());
    let temp = TempDir::new().unwrap();
    let filter = SyncFilter {
        include_archived: true,
        include_personal: true,
        ..Default::default()
    };

    let report = pull(&session, temp.path(), &filter).await.unwrap();

    assert_eq!(report.files, 4);
    assert!(temp.path().join("Team").join("8.Stale.mbcard").is_file());
    assert!(temp.path().join("Mine").join("5.Private.mbpulse").is_file());
}

#[tokio::test]
async fn test_pull_custom_root() {
    let session = fake_session();
    seed_tree(session.transport());
    let temp = TempDir::new().unwrap();
    let filter = SyncFilter {
        custom_root: Some(4),
        ..Default::default()
    };

    let report = pull(&session, temp.path(), &filter).await.unwrap();

    assert_eq!(report.directories, 1);
    assert_eq!(report.files, 1);
    // Root-level entities are outside a custom root.
    assert!(!temp.path().join("2.Home.mbdashboard").exists());
}

#[tokio::test]
async fn test_pull_exclude_pattern() {
    let session = fake_session();
    seed_tree(session.transport());
    let temp = TempDir::new().unwrap();
    let filter = SyncFilter::default()
        .with_exclude_pattern("mbdashboard$")
        .unwrap();

    let report = pull(&session, temp.path(), &filter).await.unwrap();

    assert_eq!(report.files, 1);
    assert!(!temp.path().join("2.Home.mbdashboard").exists());
}

#[tokio::test]
async fn test_pull_reports_failed_listing() {
    let session = fake_session();
    seed_tree(session.transport());
    session.transport().fail_on(Method::Get, "pulse");
    let temp = TempDir::new().unwrap();

    let err = pull(&session, temp.path(), &SyncFilter::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::PartialFailure { failed: 1, succeeded: 2, .. }));
}

#[test]
fn test_report_display() {
    let report = PullReport {
        directories: 3,
        files: 7,
    };
    assert_eq!(report.to_string(), "3 directories, 7 files");
}
