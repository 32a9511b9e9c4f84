// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use clap::error::ErrorKind;
use std::path::PathBuf;

fn sync_args(args: &[&str]) -> SyncArgs {
    match Cli::try_parse_from(args).unwrap().command {
        Command::Pull(args) | Command::Push(args) => args,
        _ => panic!("Expected pull or push command"),
    }
}

#[test]
fn test_defaults() {
    let args = sync_args(&["mbsync", "pull"]);
    assert!(!args.include_personal);
    assert!(!args.include_archived);
    assert_eq!(args.custom_root, None);
    assert_eq!(args.exclude_pattern, "^$");
    assert_eq!(args.path, PathBuf::from("."));

    let filter = args.filter().unwrap();
    assert!(filter.exclude.is_none());
}

#[test]
fn test_all_options() {
    let args = sync_args(&["mbsync", "push", "-a", "-r", "12", "-e", "^/Tmp/", "out"]);
    assert!(args.include_archived);
    assert_eq!(args.custom_root, Some(12));
    assert_eq!(args.path, PathBuf::from("out"));

    let filter = args.filter().unwrap();
    assert!(filter.excludes("/Tmp/"));
    assert!(!filter.excludes("/Team/"));
}

#[test]
fn test_personal_conflicts_with_custom_root() {
    let err = Cli::try_parse_from(["mbsync", "pull", "-p", "-r", "3"])
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    let msg = err.to_string();
    assert!(msg.contains("--include-personal"));
    assert!(msg.contains("--custom-root"));
}

#[test]
fn test_invalid_exclude_pattern() {
    let err = Cli::try_parse_from(["mbsync", "push", "-e", "(unclosed"])
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}
