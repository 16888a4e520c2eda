// ctxenv: Context-scoped environment overrides
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Declarative environment profiles.
//!
//! A profile describes a local environment in TOML and turns it into a
//! derived [`Context`] using only the public environment operations.
//!
//! # Profile Format
//!
//! ```toml
//! clear = true                     # start from an empty environment
//! environ = ["HOME=/tmp/home"]     # or start from exactly this table
//! set = ["LANG=C", "TZ=UTC"]       # upserts, applied in order
//! unset = ["DISPLAY"]              # removals, applied after `set`
//! ```
//!
//! # Source Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults (inherit everything)
//! 2. TOML files / strings, in the order added
//! 3. PREFIX_* env vars (PREFIX_CLEAR=true, PREFIX_SET="A=1;B=2")
//! 4. loader edits (with_clear / with_set / with_unset)
//! ```

pub mod loader;


use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::core::context::Context;
use crate::core::env::{clearenv, setenv, with_environ};
use crate::error::{ConfigError, CtxEnvResult};

use loader::ProfileLoader;

/// Declarative description of a local environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvProfile {
    /// Start from an empty local environment instead of the inherited one.
    pub clear: bool,
    /// Start from exactly this table. Takes precedence over `clear`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environ: Option<Vec<String>>,
    /// `NAME=value` assignments applied in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub set: Vec<String>,
    /// Variable names removed after `set` has been applied.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unset: Vec<String>,
}

impl EnvProfile {
    /// Create a new profile loader.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ctxenv::config::EnvProfile;
    ///
    /// let profile = EnvProfile::builder()
    ///     .add_toml_file("env/base.toml")
    ///     .add_toml_file_optional("env/local.toml")
    ///     .with_env_prefix("CTXENV_PROFILE")
    ///     .with_set("LANG=C")
    ///     .build()?;
    /// # Ok::<(), ctxenv::error::CtxEnvError>(())
    /// ```
    #[must_use]
    pub fn builder() -> ProfileLoader {
        ProfileLoader::new()
    }

    /// Load a profile from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or does
    /// not describe a valid profile.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CtxEnvResult<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load a profile from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not describe
    /// a valid profile.
    pub fn parse(content: &str) -> CtxEnvResult<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check that every `set` entry is an assignment and every `unset` entry
    /// is a usable name.
    ///
    /// Entries of `environ` are taken verbatim and not checked.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEntry` for the first offending entry.
    pub fn validate(&self) -> CtxEnvResult<()> {
        for entry in &self.set {
            match entry.split_once('=') {
                None => return Err(invalid_entry("set", entry, "expected NAME=value").into()),
                Some(("", _)) => {
                    return Err(invalid_entry("set", entry, "variable name is empty").into());
                }
                Some(_) => {}
            }
        }
        for name in &self.unset {
            if name.is_empty() {
                return Err(invalid_entry("unset", name, "variable name is empty").into());
            }
            if name.contains('=') {
                return Err(invalid_entry("unset", name, "variable name contains '='").into());
            }
        }
        Ok(())
    }

    /// Derive a context from `ctx` that carries this profile's environment.
    ///
    /// A profile with nothing to do returns a clone of `ctx`, so it keeps
    /// reading the environment `ctx` would.
    ///
    /// The profile must pass [`validate`](Self::validate). Profiles from
    /// [`ProfileLoader::build`] always do; one assembled by hand that does not
    /// panics in debug builds, and in release builds its `set` entries without
    /// an `=` are skipped.
    #[must_use]
    pub fn apply(&self, ctx: &Context) -> Context {
        debug_assert!(
            self.validate().is_ok(),
            "apply called on an invalid profile: {:?}",
            self.validate().err()
        );

        let mut derived = match (&self.environ, self.clear) {
            (Some(entries), _) => with_environ(ctx, entries),
            (None, true) => clearenv(ctx),
            (None, false) => ctx.clone(),
        };

        for (key, value) in self.set.iter().filter_map(|entry| entry.split_once('=')) {
            derived = setenv(&derived, key, value);
        }
        for name in &self.unset {
            derived = setenv(&derived, name, "");
        }

        debug!(
            clear = self.clear,
            replaced = self.environ.is_some(),
            set = self.set.len(),
            unset = self.unset.len(),
            "applied environment profile"
        );
        derived
    }
}

fn invalid_entry(field: &str, entry: &str, message: &str) -> ConfigError {
    ConfigError::InvalidEntry {
        field: field.to_string(),
        entry: entry.to_string(),
        message: message.to_string(),
    }
}
