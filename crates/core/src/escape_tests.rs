// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    plain = { "Sales", "Sales" },
    slash = { "Q1/Q2", "Q1_\\_Q2" },
    leading_slash = { "/root", "_\\_root" },
    backslash = { "a\\b", "a\\\\b" },
    empty = { "", "\\~" },
    dot = { ".", "\\~." },
    dot_dot = { "..", "\\~.." },
    git = { ".git", "\\~.git" },
    three_dots = { "...", "..." },
)]
fn test_escape_name(name: &str, expected: &str) {
    assert_eq!(escape_name(name), expected);
}

#[parameterized(
    plain = { "Sales" },
    slash = { "Q1/Q2" },
    only_slashes = { "//" },
    sentinel_text = { "a_\\_b" },
    backslash_then_slash = { "\\/" },
    trailing_underscore_backslash = { "x_\\" },
    dots = { "v1.2.final" },
    unicode = { "Résumé/Ü" },
    empty = { "" },
    dot = { "." },
    dot_dot = { ".." },
    hg = { ".hg" },
    prefix_text = { "\\~.." },
    tilde = { "~" },
)]
fn test_escape_round_trip(name: &str) {
    let segment = escape_name(name);
    assert!(!segment.contains('/'), "segment '{}' contains a slash", segment);
    assert_eq!(unescape_segment(&segment), name);
}

#[test]
fn test_encode_decode_path() {
    let names = vec!["Team/Ops".to_string(), "Reports".to_string()];
    let path = encode_path(&names);
    assert_eq!(path, "/Team_\\_Ops/Reports/");
    assert_eq!(decode_path(&path), names);
}

#[test]
fn test_reserved_names_stay_single_segments() {
    let names = vec!["..".to_string(), "".to_string(), ".svn".to_string()];
    let path = encode_path(&names);
    assert_eq!(path, "/\\~../\\~/\\~.svn/");
    assert_eq!(depth(&path), 4);
    assert_eq!(decode_path(&path), names);
}

#[test]
fn test_encode_empty_path_is_root() {
    let names: Vec<String> = Vec::new();
    assert_eq!(encode_path(&names), "/");
}

#[parameterized(
    root = { "/", 1 },
    one = { "/A/", 2 },
    two = { "/A/B/", 3 },
)]
fn test_depth(path: &str, expected: usize) {
    assert_eq!(depth(path), expected);
}

#[parameterized(
    top_level = { "/A/", "/" },
    nested = { "/A/B/", "/A/" },
    deep = { "/A/B/C/", "/A/B/" },
    root = { "/", "/" },
)]
fn test_parent_path(path: &str, expected: &str) {
    assert_eq!(parent_path(path), expected);
}

#[test]
fn test_last_segment() {
    assert_eq!(last_segment("/A/B_\\_C/"), Some("B_\\_C"));
    assert_eq!(last_segment("/"), None);
}
