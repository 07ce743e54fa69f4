// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cardstack Activity: the records a navigation stack is made of.
//!
//! An [`Activity`] is one entry of a navigation stack. Its identity is the
//! [`ActivityId`]; its `name` selects which view renders it; its `params` are an
//! opaque key/value payload that the visual layer never inspects.
//!
//! The stack itself is just an ordered slice of activities, last element on
//! top. Layers further up (windowing policy, order diffing, the card
//! controller) only look at order and identity, which is what
//! [`StackEntry`] exposes. Implementations are provided for [`Activity`],
//! [`ActivityId`], and plain integers so tests and hosts can use whichever key
//! type is convenient.
//!
//! ## Minimal example
//!
//! ```rust
//! use cardstack_activity::{Activity, StackEntry};
//!
//! let stack = [
//!     Activity::new("home-1", "Home"),
//!     Activity::new("detail-7", "Detail").with_param("item", "7"),
//! ];
//!
//! let top = stack.last().unwrap();
//! assert_eq!(top.entry_id().as_str(), "detail-7");
//! assert_eq!(top.params.get("item").map(String::as_str), Some("7"));
//! ```
//!
//! [`TransitionDescriptor`] describes an in-flight transition between the
//! previous top and the new top, as reported by the stack owner.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;

/// Opaque activity parameters.
pub type Params = BTreeMap<String, String>;

/// Identity of an [`Activity`].
///
/// Cloning is cheap; the string is shared.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivityId(Arc<str>);

impl ActivityId {
    /// Creates an id from any string-like value.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ActivityId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl Borrow<str> for ActivityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One entry in a navigation stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    /// Unique identity within the stack.
    pub id: ActivityId,
    /// View type key.
    pub name: String,
    /// Opaque parameters handed to the view.
    pub params: Params,
}

impl Activity {
    /// Creates an activity with empty parameters.
    #[must_use]
    pub fn new(id: impl Into<ActivityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            params: Params::new(),
        }
    }

    /// Replaces the parameters.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Adds a single parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Anything that can sit in a stack order and be identified.
///
/// The windowing and diffing layers are generic over this trait so they work
/// on full [`Activity`] records as well as bare ids.
pub trait StackEntry {
    /// Identity type; equality on it decides "same card".
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// Returns the identity of this entry.
    fn entry_id(&self) -> &Self::Id;
}

impl StackEntry for Activity {
    type Id = ActivityId;

    fn entry_id(&self) -> &ActivityId {
        &self.id
    }
}

impl StackEntry for ActivityId {
    type Id = Self;

    fn entry_id(&self) -> &Self {
        self
    }
}

macro_rules! impl_stack_entry_for_int {
    ($($t:ty),*) => {
        $(
            impl StackEntry for $t {
                type Id = $t;

                fn entry_id(&self) -> &$t {
                    self
                }
            }
        )*
    };
}

impl_stack_entry_for_int!(u32, u64, usize);

/// Collects the ids of a stack order, bottom to top.
#[must_use]
pub fn order_ids<T: StackEntry>(order: &[T]) -> Vec<T::Id> {
    order.iter().map(|e| e.entry_id().clone()).collect()
}

/// Direction of an in-flight transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// A new activity is coming in on top.
    Forward,
    /// The top activity is leaving.
    Back,
}

/// An in-flight animated or gesture-driven transition between the previous
/// top and the new top.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransitionDescriptor {
    direction: Direction,
    progress: f64,
}

impl TransitionDescriptor {
    /// Creates a descriptor, clamping `progress` into `[0, 1]`.
    ///
    /// A NaN progress is treated as `0`.
    #[must_use]
    pub fn new(direction: Direction, progress: f64) -> Self {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        Self {
            direction,
            progress,
        }
    }

    /// Direction of the transition.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }
}
