// ctxenv: Context-scoped environment overrides
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Context-scoped overrides of process environment variables.
//!
//! Code that would normally call [`std::env::var`] asks a [`Context`]
//! instead. When the caller attached a local environment to the context,
//! that is what the callee sees; otherwise the lookup falls through to the
//! real process environment. The process environment itself is never
//! modified, so tests that need different environments can run in parallel.
//!
//! This only works when caller and callee both agree to pass a [`Context`],
//! which suits closely coupled code such as a unit test and the function it
//! exercises.
//!
//! # Crate Architecture
//!
//! ```text
//!   +------------------------------------------+
//!   |  config    EnvProfile (TOML) -> Context  |
//!   +------------------------------------------+
//!   |  core      context: Context, ContextKey  |
//!   |            env: environ/getenv/setenv.. |
//!   |                 CommandEnv               |
//!   +------------------------------------------+
//!   |  foundation   error, logging             |
//!   +------------------------------------------+
//! ```
//!
//! # Example
//!
//! ```
//! use ctxenv::{Context, clearenv, environ, getenv, setenv, with_environ};
//!
//! let root = with_environ(&Context::background(), ["CTXENV_EXAMPLE=real environment"]);
//!
//! let overridden = setenv(&root, "CTXENV_EXAMPLE", "locally overridden");
//! assert_eq!(getenv(&overridden, "CTXENV_EXAMPLE"), "locally overridden");
//! assert_eq!(getenv(&root, "CTXENV_EXAMPLE"), "real environment");
//!
//! let cleared = clearenv(&overridden);
//! assert_eq!(getenv(&cleared, "CTXENV_EXAMPLE"), "");
//! assert!(environ(&cleared).is_empty());
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use crate::core::context::{Context, ContextKey};
pub use crate::core::env::command::{CommandEnv, apply_to_command};
pub use crate::core::env::{clearenv, environ, getenv, has_local, setenv, with_environ};
