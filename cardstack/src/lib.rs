// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cardstack: headless card-stack navigation with swipe-back.
//!
//! This crate wires the building blocks together:
//!
//! - [`StackStore`]: an in-memory stack owner with push, replace, and pop
//!   (the root is never popped) that notifies listeners on every change.
//! - [`ViewRegistry`] and [`View`]: view types resolved by activity name. An
//!   unknown name mounts an empty card instead of failing.
//! - [`StackRenderer`]: subscribes to a store, keeps cards mounted and styled
//!   through a `CardController`, and turns edge swipes into pops.
//!
//! Views may snapshot their state when their card is unmounted; the snapshot
//! is handed back when the same activity is mounted again.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use cardstack::{Params, RendererConfig, StackRenderer, StackStore, View, ViewRegistry};
//!
//! struct Page;
//! impl View for Page {}
//!
//! let mut views = ViewRegistry::new();
//! views.register("Home", |_| Box::new(Page));
//! views.register("Detail", |_| Box::new(Page));
//!
//! let store = Rc::new(RefCell::new(StackStore::new("Home", Params::new())));
//! let mut renderer =
//!     StackRenderer::attach(store.clone(), views, RendererConfig::default()).unwrap();
//!
//! let detail = store.borrow_mut().push("Detail", Params::new());
//! renderer.pump();
//! assert!(renderer.card(&detail).is_some());
//!
//! store.borrow_mut().pop();
//! renderer.pump();
//! assert!(renderer.card(&detail).is_none());
//! ```

mod renderer;
mod store;
mod views;

pub use renderer::{CardSurface, RendererConfig, StackRenderer, ViewBackend};
pub use store::{ListenerId, StackStore};
pub use views::{View, ViewFactory, ViewRegistry};

pub use cardstack_activity::{Activity, ActivityId, Direction, Params, TransitionDescriptor};
pub use cardstack_bridge::{ActionBridge, Delivery, StackActions, UnboundPolicy};
pub use cardstack_controller::{
    ApplyError, CardFlags, CardTransform, CardVisual, RenderMode, StackConfig,
};
pub use cardstack_gesture::{PointerId, Resolution, SwipeConfig, SwipeEdge};

/// Errors raised while setting up a [`StackRenderer`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid stack configuration.
    #[error("invalid stack configuration: {0}")]
    Stack(#[from] cardstack_controller::ConfigError),
    /// Invalid swipe configuration.
    #[error("invalid swipe configuration: {0}")]
    Swipe(#[from] cardstack_gesture::ConfigError),
    /// The store was mutably borrowed elsewhere.
    #[error("stack store is already borrowed")]
    StoreBusy,
}
