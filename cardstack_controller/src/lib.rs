// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cardstack Controller: derive and apply per-card visual state.
//!
//! A [`CardController`] sits between a stack owner and a [`CardBackend`]. On
//! every [`sync`](CardController::sync) it:
//!
//! - windows the order (see `cardstack_policy`) and mounts or unmounts cards,
//! - classifies the change (see `cardstack_order`) and starts an entrance on
//!   push or replace,
//! - computes a [`CardVisual`] for every mounted card and hands the ones that
//!   changed to the backend.
//!
//! Cards stack by position: `base_z + index` in the full order, so the top card
//! always has the highest z-index. Cards outside the retain window are asleep
//! in sleep mode and unmounted in unmount mode.
//!
//! Entrances are two-phase. The sync that sees a push places the new top
//! off-screen with transitions disabled; the next [`on_frame`](CardController::on_frame)
//! releases it to rest with transitions enabled so the backend animates it in.
//!
//! While a swipe is in progress, [`set_gesture_progress`](CardController::set_gesture_progress)
//! pins the top and the card below it just under the gesture hotzone and
//! drives their transforms directly.
//!
//! ## Minimal example
//!
//! ```rust
//! use cardstack_activity::{Activity, ActivityId};
//! use cardstack_controller::{
//!     ApplyError, CardBackend, CardController, CardFlags, CardVisual, StackConfig,
//! };
//!
//! #[derive(Default)]
//! struct Noop;
//!
//! impl CardBackend for Noop {
//!     type Surface = ();
//!     fn mount(&mut self, _: &Activity) {}
//!     fn unmount(&mut self, _: &ActivityId, _: ()) {}
//!     fn apply(&mut self, _: &ActivityId, _: &mut (), _: &CardVisual) -> Result<(), ApplyError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut cards = CardController::new(StackConfig::default(), Noop).unwrap();
//! let home = Activity::new("home", "Home");
//! let detail = Activity::new("detail", "Detail");
//!
//! cards.sync(&[home.clone()]);
//! cards.sync(&[home, detail.clone()]);
//!
//! let v = cards.visual(&detail.id).unwrap();
//! assert!(v.flags.contains(CardFlags::ENTER | CardFlags::NO_TRANSITION));
//!
//! cards.on_frame();
//! let v = cards.visual(&detail.id).unwrap();
//! assert!(v.transition().is_some());
//! ```

mod backend;
mod config;
mod controller;
mod visual;

pub use backend::{ApplyError, CardBackend};
pub use config::{ConfigError, StackConfig};
pub use controller::{CardController, SyncReport};
pub use visual::{
    ATTR_ACTIVITY_ID, ATTR_ENTER, ATTR_NO_TRANSITION, ATTR_SLEEP, CardFlags, CardTransform,
    CardVisual, Easing, Timing,
};

pub use cardstack_order::{Transition, TransitionKind};
pub use cardstack_policy::{RenderMode, RetainWindow};
