// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reversible mapping between remote names and filesystem path segments.
//!
//! A `/` inside a name becomes the sentinel `_\_`. Backslashes are doubled
//! first so a name that already contains the sentinel text still decodes to
//! itself. Names that cannot stand alone as a directory entry (empty, `.`,
//! `..`) or that a scan skips (version-control metadata) get a `\~` prefix,
//! which no other escaped name can start with.

/// Sentinel written in place of `/`.
pub const SLASH_SENTINEL: &str = "_\\_";

/// Prefix written before a reserved name.
pub const RESERVED_PREFIX: &str = "\\~";

/// Version-control metadata directories, skipped when scanning a tree.
pub const VCS_DIRS: [&str; 3] = [".git", ".hg", ".svn"];

/// True for names that never appear unprefixed as a path segment.
pub fn is_reserved(name: &str) -> bool {
    matches!(name, "" | "." | "..") || VCS_DIRS.contains(&name)
}

/// Escapes a remote name into a single path segment.
pub fn escape_name(name: &str) -> String {
    if is_reserved(name) {
        return format!("{}{}", RESERVED_PREFIX, name);
    }
    name.replace('\\', "\\\\").replace('/', SLASH_SENTINEL)
}

/// Reverses [`escape_name`].
pub fn unescape_segment(segment: &str) -> String {
    if let Some(name) = segment.strip_prefix(RESERVED_PREFIX) {
        if is_reserved(name) {
            return name.to_string();
        }
    }
    let chars: Vec<char> = segment.chars().collect();
    let mut out = String::with_capacity(segment.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '_' if chars.get(i + 1) == Some(&'\\') && chars.get(i + 2) == Some(&'_') => {
                out.push('/');
                i += 3;
            }
            '\\' if chars.get(i + 1) == Some(&'\\') => {
                out.push('\\');
                i += 2;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Splits a `/A/B/` style path into its decoded names.
pub fn decode_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(unescape_segment)
        .collect()
}

/// Builds a `/A/B/` style path from raw names.
pub fn encode_path<S: AsRef<str>>(names: &[S]) -> String {
    let mut path = String::from("/");
    for name in names {
        path.push_str(&escape_name(name.as_ref()));
        path.push('/');
    }
    path
}

/// Number of `/` separators in a path, used to order creation by depth.
pub fn depth(path: &str) -> usize {
    path.matches('/').count()
}

/// Path of the parent directory of a `/A/B/` style path (`/A/`), or `/`.
pub fn parent_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.split_last() {
        Some((_, parents)) if !parents.is_empty() => format!("/{}/", parents.join("/")),
        _ => "/".to_string(),
    }
}

/// Last segment of a `/A/B/` style path, still escaped.
pub fn last_segment(path: &str) -> Option<&str> {
    path.split('/').filter(|s| !s.is_empty()).next_back()
}

#[cfg(test)]
#[path = "escape_tests.rs"]
mod tests;
