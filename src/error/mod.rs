// ctxenv: Context-scoped environment overrides
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!       CtxEnvError (~24 bytes)
//!              |
//!        +-----+------+
//!        v            v
//!      Config      Logging
//!       Box         Box<str>
//!
//! Sub-errors:
//!   Config  InvalidValue, Load, InvalidEntry
//! ```
//!
//! Environment lookups and derivations never fail; only the surrounding
//! plumbing (profiles, logging setup) reports errors.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`CtxEnvError`].
pub type CtxEnvResult<T> = std::result::Result<T, CtxEnvError>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum CtxEnvError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Logging could not be set up.
    #[error("logging error: {0}")]
    Logging(Box<str>),
}

impl From<ConfigError> for CtxEnvError {
    fn from(err: ConfigError) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Profile sources could not be read or merged.
    #[error("failed to load profile from [{sources}]: {message}")]
    Load { sources: String, message: String },

    /// An environment entry that cannot be used as given.
    #[error("invalid entry '{entry}' in '{field}': {message}")]
    InvalidEntry {
        field: String,
        entry: String,
        message: String,
    },
}
