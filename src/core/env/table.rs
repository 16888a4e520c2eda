// ctxenv: Context-scoped environment overrides
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Immutable environment table.
//!
//! # Architecture
//!
//! ```text
//! EnvTable (shared, never mutated)
//! entries: Arc<[String]>   raw "NAME=value" assignments, original order
//! find(key): first entry with prefix "key=" wins
//! edits build a new Vec, then freeze it into a new table
//! ```

use std::sync::Arc;

/// An ordered, immutable sequence of `NAME=value` assignments.
///
/// Entries are kept verbatim: duplicates are allowed and entries without an
/// `=` are kept, they simply never match a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct EnvTable {
    entries: Arc<[String]>,
}

impl EnvTable {
    /// Creates a table from a copy of the given entries.
    pub(crate) fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_vec(entries: Vec<String>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    pub(crate) fn entries(&self) -> &[String] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns an independently owned copy of the entries.
    pub(crate) fn to_vec(&self) -> Vec<String> {
        self.entries.to_vec()
    }

    /// Returns the index and value of the first assignment of `key`.
    pub(crate) fn find(&self, key: &str) -> Option<(usize, &str)> {
        self.entries
            .iter()
            .enumerate()
            .find_map(|(idx, entry)| match_assignment(entry, key).map(|value| (idx, value)))
    }

    /// Returns a copy with `entry` appended.
    pub(crate) fn with_appended(&self, entry: String) -> Self {
        let mut entries = Vec::with_capacity(self.len() + 1);
        entries.extend_from_slice(&self.entries);
        entries.push(entry);
        Self::from_vec(entries)
    }

    /// Returns a copy with the entry at `idx` replaced.
    pub(crate) fn with_replaced(&self, idx: usize, entry: String) -> Self {
        let mut entries = self.to_vec();
        entries[idx] = entry;
        Self::from_vec(entries)
    }

    /// Returns a copy without the entry at `idx`.
    pub(crate) fn with_removed(&self, idx: usize) -> Self {
        let mut entries = self.to_vec();
        entries.remove(idx);
        Self::from_vec(entries)
    }
}

/// Returns the value of `entry` if it assigns `key`.
///
/// An entry assigns `key` when it starts with `key` immediately followed by `=`.
pub(crate) fn match_assignment<'a>(entry: &'a str, key: &str) -> Option<&'a str> {
    entry.strip_prefix(key)?.strip_prefix('=')
}

/// Formats a `NAME=value` assignment.
pub(crate) fn assignment(key: &str, value: &str) -> String {
    let mut entry = String::with_capacity(key.len() + value.len() + 1);
    entry.push_str(key);
    entry.push('=');
    entry.push_str(value);
    entry
}
