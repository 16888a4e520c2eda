// ctxenv: Context-scoped environment overrides
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Profile loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ProfileLoader::new()
//!   .add_toml_file(req) / .add_toml_file_optional(opt) / .add_toml_str()
//!   .with_env_prefix("P")      P_CLEAR=true, P_SET="A=1;B=2", P_UNSET="X;Y"
//!        |
//!        v
//!   merged by `config` --> EnvProfile
//!        |
//!        v
//!   with_clear / with_set / with_unset   (applied last, in call order)
//!        |
//!        v
//!   validate() --> EnvProfile
//! ```

use std::path::Path;

use config::{Environment, File, FileFormat};
use tracing::debug;

use super::EnvProfile;
use crate::error::{ConfigError, CtxEnvResult};

/// Separator between list items in `PREFIX_ENVIRON`, `PREFIX_SET` and
/// `PREFIX_UNSET`.
pub const ENV_LIST_SEPARATOR: &str = ";";

const LIST_FIELDS: [&str; 3] = ["environ", "set", "unset"];

/// Builder for loading an [`EnvProfile`] from multiple sources.
///
/// Later sources win for `clear` and replace whole lists. Edits made with
/// [`with_set`](Self::with_set) and [`with_unset`](Self::with_unset) are
/// appended to whatever the sources produced.
pub struct ProfileLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    sources: Vec<String>,
    clear: Option<bool>,
    set: Vec<String>,
    unset: Vec<String>,
}

impl ProfileLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            sources: Vec::new(),
            clear: None,
            set: Vec::new(),
            unset: Vec::new(),
        }
    }

    /// Adds a TOML profile file that must exist when `build()` is called.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_file(path.as_ref(), true)
    }

    /// Adds a TOML profile file that is skipped if it does not exist.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_file(path.as_ref(), false)
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources.push("<string>".to_string());
        self
    }

    /// Reads profile fields from `PREFIX_*` process variables.
    ///
    /// List fields are split on [`ENV_LIST_SEPARATOR`].
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Forces `clear` regardless of what the sources say.
    #[must_use]
    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = Some(clear);
        self
    }

    /// Appends a `NAME=value` entry to `set`.
    #[must_use]
    pub fn with_set(mut self, entry: impl Into<String>) -> Self {
        self.set.push(entry.into());
        self
    }

    /// Appends a variable name to `unset`.
    #[must_use]
    pub fn with_unset(mut self, name: impl Into<String>) -> Self {
        self.unset.push(name.into());
        self
    }

    /// Builds and validates the profile from all added sources.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a required file is missing, a source is
    /// not valid TOML, or the merged sources do not describe a profile.
    /// Returns `ConfigError::InvalidEntry` if the result has unusable `set`
    /// or `unset` entries.
    pub fn build(mut self) -> CtxEnvResult<EnvProfile> {
        if let Some(prefix) = &self.env_prefix {
            let env = LIST_FIELDS.iter().fold(
                Environment::with_prefix(prefix)
                    .separator("_")
                    .try_parsing(true)
                    .list_separator(ENV_LIST_SEPARATOR),
                |env, field| env.with_list_parse_key(field),
            );
            self.builder = self.builder.add_source(env);
            self.sources.push(format!("{prefix}_*"));
        }

        let mut profile: EnvProfile = self
            .builder
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ConfigError::Load {
                sources: self.sources.join(", "),
                message: e.to_string(),
            })?;

        if let Some(clear) = self.clear {
            profile.clear = clear;
        }
        profile.set.append(&mut self.set);
        profile.unset.append(&mut self.unset);
        profile.validate()?;

        debug!(
            sources = %self.sources.join(", "),
            replaced = profile.environ.is_some(),
            clear = profile.clear,
            "loaded environment profile"
        );
        Ok(profile)
    }

    fn add_file(mut self, path: &Path, required: bool) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(required));
        if required || path.exists() {
            self.sources.push(path.display().to_string());
        }
        self
    }
}

impl Default for ProfileLoader {
    fn default() -> Self {
        Self::new()
    }
}
