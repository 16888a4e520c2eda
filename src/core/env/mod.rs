// ctxenv: Context-scoped environment overrides
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Context-scoped environment variables.
//!
//! # Architecture
//!
//! ```text
//! Context --value::<LocalEnv>()--> Option<EnvTable>
//!    Some(table)  local override (possibly empty), never falls back
//!    None         real process environment, read at call time
//!
//! Reads:  environ / getenv        (copy out)
//! Derive: with_environ / setenv / clearenv   (copy in, new Context)
//! ```
//!
//! - **Immutable**: attached tables are never edited, every change builds a new one
//! - **Copy on attach and on read**: callers never share storage with a context
//! - **Process environment is read-only**: nothing here calls `set_var`
//!
//! # Example
//!
//! ```
//! use ctxenv::{Context, clearenv, getenv, setenv};
//!
//! let base = clearenv(&Context::background());
//! let ctx = setenv(&base, "GREETING", "hello");
//!
//! assert_eq!(getenv(&ctx, "GREETING"), "hello");
//! assert_eq!(getenv(&base, "GREETING"), "");
//! ```

pub mod command;
pub(crate) mod table;

#[cfg(test)]
mod tests;

use tracing::trace;

use super::context::{Context, ContextKey};
use table::{EnvTable, assignment};

/// Sentinel key for the local environment table.
enum LocalEnv {}

impl ContextKey for LocalEnv {
    type Value = EnvTable;
}

/// Returns the effective environment of `ctx`.
///
/// This is the local environment if `ctx` or one of its ancestors carries
/// one, otherwise the real process environment. The result is always a fresh
/// copy; changing it has no effect on `ctx`. An empty environment is returned
/// as an empty `Vec`.
#[must_use]
pub fn environ(ctx: &Context) -> Vec<String> {
    match local(ctx) {
        Some(table) => table.to_vec(),
        None => process_environ(),
    }
}

/// Returns the value of the environment variable `key` as seen by `ctx`.
///
/// The first assignment of `key` wins. A missing variable yields an empty
/// string, so an unset variable cannot be told apart from one set to `""`.
#[must_use]
pub fn getenv(ctx: &Context, key: &str) -> String {
    match local(ctx) {
        Some(table) => table
            .find(key)
            .map(|(_, value)| value.to_owned())
            .unwrap_or_default(),
        None => process_getenv(key),
    }
}

/// Returns true if `ctx` carries a local environment, even an empty one.
#[must_use]
pub fn has_local(ctx: &Context) -> bool {
    local(ctx).is_some()
}

/// Derives a context whose local environment is exactly `entries`.
///
/// Any local environment of an ancestor is ignored rather than merged. The
/// entries are copied, so the caller may reuse its collection afterwards.
#[must_use]
pub fn with_environ<I, S>(ctx: &Context, entries: I) -> Context
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let table = EnvTable::new(entries);
    trace!(entries = table.len(), "attaching local environment");
    attach(ctx, table)
}

/// Derives a context whose environment equals that of `ctx` with `key` set
/// to `value`.
///
/// An empty `value` removes the variable instead of storing an empty
/// assignment. An existing assignment keeps its position; a new one is
/// appended.
///
/// Each call copies the whole parent table. It is meant for a handful of
/// calls while setting up a context, not for use in a tight loop.
#[must_use]
pub fn setenv(ctx: &Context, key: &str, value: &str) -> Context {
    let table = effective(ctx);

    match (table.find(key).map(|(idx, _)| idx), value.is_empty()) {
        (None, true) => {
            trace!(key, "unset of absent variable");
            attach(ctx, table)
        }
        (None, false) => {
            trace!(key, "appending variable");
            attach(ctx, table.with_appended(assignment(key, value)))
        }
        (Some(_), true) if table.len() == 1 => {
            trace!(key, "unset of last variable");
            clearenv(ctx)
        }
        (Some(idx), true) => {
            trace!(key, idx, "removing variable");
            attach(ctx, table.with_removed(idx))
        }
        (Some(idx), false) => {
            trace!(key, idx, "overwriting variable");
            attach(ctx, table.with_replaced(idx, assignment(key, value)))
        }
    }
}

/// Derives a context whose local environment is empty.
///
/// Lookups through the returned context never reach the real process
/// environment.
#[must_use]
pub fn clearenv(ctx: &Context) -> Context {
    trace!("clearing local environment");
    attach(ctx, EnvTable::empty())
}

fn local(ctx: &Context) -> Option<&EnvTable> {
    ctx.value::<LocalEnv>()
}

fn attach(ctx: &Context, table: EnvTable) -> Context {
    ctx.with_value::<LocalEnv>(table)
}

fn effective(ctx: &Context) -> EnvTable {
    local(ctx)
        .cloned()
        .unwrap_or_else(|| EnvTable::from_vec(process_environ()))
}

/// Captures the real process environment.
fn process_environ() -> Vec<String> {
    trace!("reading process environment");
    std::env::vars_os()
        .map(|(key, value)| assignment(&key.to_string_lossy(), &value.to_string_lossy()))
        .collect()
}

/// Reads one variable from the real process environment.
fn process_getenv(key: &str) -> String {
    // Names the platform cannot look up are treated as unset.
    if key.is_empty() || key.contains(['=', '\0']) {
        return String::new();
    }
    std::env::var_os(key)
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_default()
}
