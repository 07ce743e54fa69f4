// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cardstack Order: classify a stack change by comparing orders.
//!
//! Stack owners do not always say which way a change went. This crate infers
//! it structurally from the previous and current order:
//!
//! - [`TransitionKind::Push`]: the previous order is an exact prefix of the
//!   current one, which is exactly one entry longer.
//! - [`TransitionKind::Replace`]: same non-zero length, everything below the
//!   top is unchanged, and the top differs.
//! - [`TransitionKind::Unrelated`]: anything else, including pops, reorders,
//!   resets, multi-step jumps, and no change at all.
//!
//! Only push and replace warrant an entrance animation. Anything ambiguous
//! (for example a replace followed by a push in the same update) is
//! deliberately reported as unrelated.
//!
//! ## Minimal example
//!
//! ```rust
//! use cardstack_order::{OrderTracker, TransitionKind};
//!
//! let mut tracker = OrderTracker::<u32>::new();
//! tracker.update(&[1_u32]);
//!
//! let t = tracker.update(&[1_u32, 2]);
//! assert_eq!(t.kind, TransitionKind::Push);
//! assert_eq!(t.entering(), Some(&2));
//!
//! let t = tracker.update(&[1_u32, 3]);
//! assert_eq!(t.kind, TransitionKind::Replace);
//! assert_eq!(t.previous_top, Some(2));
//!
//! // Popping is not an entrance.
//! let t = tracker.update(&[1_u32]);
//! assert_eq!(t.kind, TransitionKind::Unrelated);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use cardstack_activity::{StackEntry, order_ids};

/// How the current order relates to the previous one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// One entry appended on top.
    Push,
    /// The top entry swapped for a different one.
    Replace,
    /// Anything else.
    Unrelated,
}

/// Classification of one order change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<K> {
    /// What kind of change this was.
    pub kind: TransitionKind,
    /// Top of the current order, if any.
    pub new_top: Option<K>,
    /// Top of the previous order, if any.
    pub previous_top: Option<K>,
}

impl<K> Transition<K> {
    /// Returns `true` for push and replace.
    #[must_use]
    pub fn is_entrance(&self) -> bool {
        matches!(self.kind, TransitionKind::Push | TransitionKind::Replace)
    }

    /// The entry that should play an entrance, if any.
    #[must_use]
    pub fn entering(&self) -> Option<&K> {
        if self.is_entrance() {
            self.new_top.as_ref()
        } else {
            None
        }
    }
}

/// Length of the shared prefix of two orders.
fn shared_prefix<P, C>(previous: &[P], current: &[C]) -> usize
where
    C: StackEntry,
    P: StackEntry<Id = C::Id>,
{
    previous
        .iter()
        .zip(current)
        .take_while(|(p, c)| p.entry_id() == c.entry_id())
        .count()
}

/// Classifies the change from `previous` to `current`.
///
/// Both slices are bottom to top. Entries are compared by id, so the previous
/// order may be stored as bare ids while the current one is full records.
pub fn classify<P, C>(previous: &[P], current: &[C]) -> Transition<C::Id>
where
    C: StackEntry,
    P: StackEntry<Id = C::Id>,
{
    let new_top = current.last().map(|e| e.entry_id().clone());
    let previous_top = previous.last().map(|e| e.entry_id().clone());
    let prefix = shared_prefix(previous, current);

    let kind = if current.len() == previous.len() + 1 && prefix == previous.len() {
        TransitionKind::Push
    } else if !current.is_empty()
        && current.len() == previous.len()
        && prefix == current.len() - 1
    {
        // `prefix` stops short of the last slot only when the tops differ.
        TransitionKind::Replace
    } else {
        TransitionKind::Unrelated
    };

    Transition {
        kind,
        new_top,
        previous_top,
    }
}

/// Remembers the last seen order and classifies each new one against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderTracker<K> {
    previous: Vec<K>,
}

impl<K> Default for OrderTracker<K> {
    fn default() -> Self {
        Self {
            previous: Vec::new(),
        }
    }
}

impl<K: StackEntry<Id = K>> OrderTracker<K> {
    /// Creates a tracker with an empty previous order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last recorded order.
    #[must_use]
    pub fn previous(&self) -> &[K] {
        &self.previous
    }

    /// Classifies `current` against the recorded order, then records it.
    pub fn update<C: StackEntry<Id = K>>(&mut self, current: &[C]) -> Transition<K> {
        let transition = classify(self.previous.as_slice(), current);
        self.previous = order_ids(current);
        transition
    }

    /// Forgets the recorded order.
    pub fn reset(&mut self) {
        self.previous.clear();
    }
}
