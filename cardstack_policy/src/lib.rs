// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cardstack Policy: which stack entries are mounted, and which are awake.
//!
//! Given a stack order (bottom to top) and a [`RetainWindow`] `N`, this crate
//! answers two questions:
//!
//! - **Residency**: which entries belong in the render tree at all
//!   ([`compute_render_list`]).
//! - **Wakefulness**: which entries are interactive and opaque
//!   ([`compute_awake_set`]). These are always the trailing `N` ids.
//!
//! The two [`RenderMode`]s differ only in what residency means. In
//! [`RenderMode::Sleep`] every entry stays resident and only the trailing window
//! is awake; the rest are suppressed visually. In [`RenderMode::Unmount`] only
//! the trailing window (optionally plus the pinned root) is resident at all.
//! Both go through one windowing function, [`compute_window`], parameterized by
//! [`Residency`].
//!
//! Like a virtualized list, this crate does not mount anything itself. Hosts
//! diff the returned list against what they currently have on screen.
//!
//! ## Minimal example
//!
//! ```rust
//! use cardstack_policy::{RenderMode, RetainWindow, compute_awake_set, compute_render_list};
//!
//! // Home, A, B with a window of two, unmounting older entries.
//! let order = [1_u32, 2, 3];
//! let window = RetainWindow::new(2).unwrap();
//!
//! let rendered = compute_render_list(&order, window, RenderMode::Unmount, false);
//! assert_eq!(rendered, [&2, &3]);
//!
//! // Pinning the root keeps it resident below the window.
//! let rendered = compute_render_list(&order, window, RenderMode::Unmount, true);
//! assert_eq!(rendered, [&1, &2, &3]);
//!
//! let awake = compute_awake_set(&order, window);
//! assert!(awake.contains(&3) && awake.contains(&2) && !awake.contains(&1));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::num::NonZeroUsize;

use cardstack_activity::StackEntry;
use hashbrown::HashSet;

/// How non-recent entries are treated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Everything stays mounted; entries outside the window are suppressed.
    #[default]
    Sleep,
    /// Only the trailing window is mounted; older entries are discarded.
    Unmount,
}

impl RenderMode {
    /// The residency rule this mode applies.
    #[must_use]
    pub const fn residency(self) -> Residency {
        match self {
            Self::Sleep => Residency::Visual,
            Self::Unmount => Residency::Structural,
        }
    }
}

/// What leaving the retain window means for an entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Residency {
    /// Entries outside the window stay resident; only their visuals change.
    Visual,
    /// Entries outside the window are removed from the render tree.
    Structural,
}

/// Errors raised when validating windowing configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A retain window of zero would leave nothing awake.
    #[error("retain window must be at least 1")]
    ZeroRetainWindow,
}

/// Number of most-recent entries kept awake (and, in unmount mode, mounted).
///
/// Always at least one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RetainWindow(NonZeroUsize);

impl RetainWindow {
    /// A window of two: the top plus the card revealed by a back gesture.
    pub const DEFAULT: Self = Self(NonZeroUsize::MIN.saturating_add(1));

    /// Creates a retain window, rejecting zero.
    pub fn new(len: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(len)
            .map(Self)
            .ok_or(ConfigError::ZeroRetainWindow)
    }

    /// Returns the window length.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for RetainWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Result of applying a retain window to a stack order.
#[derive(Clone, Debug)]
pub struct Window<'a, T: StackEntry> {
    /// Entries that belong in the render tree, bottom to top.
    pub resident: Vec<&'a T>,
    /// Ids of the trailing window.
    pub awake: HashSet<T::Id>,
}

impl<T: StackEntry> Window<'_, T> {
    /// Returns `true` if `id` is awake.
    #[must_use]
    pub fn is_awake(&self, id: &T::Id) -> bool {
        self.awake.contains(id)
    }
}

/// Index of the first entry inside the trailing window.
fn window_start(len: usize, retain: RetainWindow) -> usize {
    len.saturating_sub(retain.get())
}

/// Applies a retain window to `order`.
///
/// With [`Residency::Structural`] only the trailing window is resident; if
/// `pin_root` is set and the order is longer than the window, `order[0]` is
/// kept as the first resident entry. With [`Residency::Visual`] the whole order
/// is resident and `pin_root` has no effect.
#[must_use]
pub fn compute_window<T: StackEntry>(
    order: &[T],
    retain: RetainWindow,
    residency: Residency,
    pin_root: bool,
) -> Window<'_, T> {
    let start = window_start(order.len(), retain);
    let trailing = &order[start..];
    let awake = trailing.iter().map(|e| e.entry_id().clone()).collect();

    let resident = match residency {
        Residency::Visual => order.iter().collect(),
        Residency::Structural => {
            let mut resident = Vec::with_capacity(trailing.len() + 1);
            match order.first() {
                Some(root) if pin_root && start > 0 => {
                    resident.push(root);
                    resident.extend(
                        trailing
                            .iter()
                            .filter(|e| e.entry_id() != root.entry_id()),
                    );
                }
                _ => resident.extend(trailing.iter()),
            }
            resident
        }
    };

    Window { resident, awake }
}

/// Entries that should be mounted for `mode`, bottom to top.
///
/// - [`RenderMode::Unmount`]: the trailing `retain` entries, plus `order[0]`
///   first when `pin_root` is set and the order is longer than the window.
/// - [`RenderMode::Sleep`]: the whole order.
#[must_use]
pub fn compute_render_list<T: StackEntry>(
    order: &[T],
    retain: RetainWindow,
    mode: RenderMode,
    pin_root: bool,
) -> Vec<&T> {
    compute_window(order, retain, mode.residency(), pin_root).resident
}

/// Ids of the trailing `retain` entries.
///
/// Used in every mode to decide awake versus asleep. In unmount mode all
/// mounted window entries are awake since nothing else is mounted.
#[must_use]
pub fn compute_awake_set<T: StackEntry>(order: &[T], retain: RetainWindow) -> HashSet<T::Id> {
    let start = window_start(order.len(), retain);
    order[start..]
        .iter()
        .map(|e| e.entry_id().clone())
        .collect()
}
