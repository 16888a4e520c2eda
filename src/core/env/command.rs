// ctxenv: Context-scoped environment overrides
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Passing a context's environment on to child processes.
//!
//! ```text
//! apply_to_command(ctx, cmd)
//!   local present -> cmd.clear_env() + set_env(name, value) per first assignment
//!   no local      -> cmd untouched (child inherits the process environment)
//! ```

use std::collections::HashSet;

use tracing::debug;

use super::local;
use crate::core::context::Context;

/// A process builder whose child environment can be configured.
pub trait CommandEnv {
    /// Stops the child from inheriting the parent's environment.
    fn clear_env(&mut self);

    /// Sets one variable in the child's environment.
    fn set_env(&mut self, key: &str, value: &str);
}

impl CommandEnv for std::process::Command {
    fn clear_env(&mut self) {
        self.env_clear();
    }

    fn set_env(&mut self, key: &str, value: &str) {
        self.env(key, value);
    }
}

impl CommandEnv for tokio::process::Command {
    fn clear_env(&mut self) {
        self.env_clear();
    }

    fn set_env(&mut self, key: &str, value: &str) {
        self.env(key, value);
    }
}

/// Gives `command` the environment that `ctx` would report.
///
/// With a local environment the child starts from an empty environment and
/// receives the first assignment of every name. Entries without an `=` or
/// with an empty name are skipped. Without a local environment the command is
/// left as it is.
///
/// Returns true if the command was changed.
pub fn apply_to_command<C>(ctx: &Context, command: &mut C) -> bool
where
    C: CommandEnv + ?Sized,
{
    let Some(table) = local(ctx) else {
        return false;
    };

    command.clear_env();
    let mut seen = HashSet::with_capacity(table.len());
    for entry in table.entries() {
        let Some((key, value)) = entry.split_once('=') else {
            continue;
        };
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        command.set_env(key, value);
    }

    debug!(vars = seen.len(), "applied local environment to command");
    true
}
