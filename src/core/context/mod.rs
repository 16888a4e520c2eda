// ctxenv: Context-scoped environment overrides
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Immutable, hierarchical call context.
//!
//! # Architecture
//!
//! ```text
//! Context { head: Option<Arc<Frame>> }
//!
//!   background()  ->  None
//!   with_value::<K>(v)
//!        |
//!        v
//!   Frame { key: TypeId(K), value, parent } --> Frame --> ... --> None
//!
//! value::<K>() walks head -> root, first frame keyed by K wins
//! ```
//!
//! - **Immutable**: frames are never modified once linked
//! - **Cheap clones**: a clone shares the whole chain through `Arc`
//! - **Type-keyed**: keys are types, so a private key type cannot be forged

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;


/// A key under which a value can be stored in a [`Context`].
///
/// The implementing type itself is the key. Keeping the type private to a
/// module keeps its values out of reach of every other module.
pub trait ContextKey: 'static {
    /// Type of the value stored under this key.
    type Value: Send + Sync + 'static;
}

struct Frame {
    key: TypeId,
    value: Box<dyn Any + Send + Sync>,
    parent: Option<Arc<Frame>>,
}

impl Drop for Frame {
    // Unlink iteratively so that dropping a deep chain does not recurse.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(frame) = next {
            match Arc::try_unwrap(frame) {
                Ok(mut frame) => next = frame.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// An immutable carrier of key-scoped values.
///
/// Deriving a child with [`Context::with_value`] never changes the parent;
/// both remain usable and can be shared freely across threads.
///
/// # Thread Safety
/// `Context` is `Send` and `Sync` due to its use of `Arc`.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Frame>>,
}

impl Context {
    /// Returns the empty root context.
    #[must_use]
    pub const fn background() -> Self {
        Self { head: None }
    }

    /// Derives a child context carrying `value` under the key `K`.
    ///
    /// A value stored under the same key by an ancestor is shadowed for the
    /// child and its descendants only.
    #[must_use]
    pub fn with_value<K: ContextKey>(&self, value: K::Value) -> Self {
        Self {
            head: Some(Arc::new(Frame {
                key: TypeId::of::<K>(),
                value: Box::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Returns the nearest value stored under the key `K`, if any.
    #[must_use]
    pub fn value<K: ContextKey>(&self) -> Option<&K::Value> {
        let wanted = TypeId::of::<K>();
        let mut cursor = self.head.as_deref();
        while let Some(frame) = cursor {
            if frame.key == wanted {
                return frame.value.downcast_ref::<K::Value>();
            }
            cursor = frame.parent.as_deref();
        }
        None
    }

    /// Number of derivations between this context and the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.head.as_deref();
        while let Some(frame) = cursor {
            depth += 1;
            cursor = frame.parent.as_deref();
        }
        depth
    }

    /// Returns true if both handles refer to the same derivation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}
