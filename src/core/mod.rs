// ctxenv: Context-scoped environment overrides
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for context propagation and environment lookup.
//!
//! ```text
//!        core
//!         |
//!    +----+----+
//!    |         |
//!    v         v
//! context     env
//!    |         |
//! Context   environ/getenv
//! ContextKey  with_environ/setenv/clearenv
//!           CommandEnv
//! ```

pub mod context;
pub mod env;
