// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cardstack Bridge: drive a card stack from code that does not own it.
//!
//! An [`ActionBridge`] forwards [`push`](ActionBridge::push),
//! [`replace`](ActionBridge::replace), and [`pop`](ActionBridge::pop) to
//! whoever is listening, in priority order:
//!
//! 1. The bound owner, if one is bound and not already busy.
//! 2. Subscribed observers, each receiving the [`Command`].
//! 3. The [`UnboundPolicy`]: drop with a warning, or queue until the next
//!    [`bind`](ActionBridge::bind).
//!
//! Every call reports what happened as a [`Delivery`].
//!
//! The bridge is an ordinary value; share it the way the rest of the
//! application shares state (typically `Rc<RefCell<ActionBridge>>`).
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use cardstack_activity::Params;
//! use cardstack_bridge::{ActionBridge, Delivery, StackActions};
//!
//! #[derive(Default)]
//! struct Names(Vec<String>);
//!
//! impl StackActions for Names {
//!     fn push(&mut self, name: &str, _: Params) {
//!         self.0.push(name.to_owned());
//!     }
//!     fn replace(&mut self, name: &str, _: Params) {
//!         self.0.pop();
//!         self.0.push(name.to_owned());
//!     }
//!     fn pop(&mut self) {
//!         self.0.pop();
//!     }
//! }
//!
//! let mut bridge = ActionBridge::new();
//! assert_eq!(bridge.pop(), Delivery::Dropped);
//!
//! let names = Rc::new(RefCell::new(Names::default()));
//! bridge.bind(names.clone());
//! assert_eq!(bridge.push("Detail", Params::new()), Delivery::Direct);
//! assert_eq!(names.borrow().0, ["Detail"]);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use cardstack_activity::Params;
use tracing::{debug, warn};

/// Navigation requests a stack owner accepts.
///
/// These are requests, not guarantees: an owner may refuse (for example a pop
/// that would empty the stack).
pub trait StackActions {
    /// Push a new activity of view type `name`.
    fn push(&mut self, name: &str, params: Params);
    /// Swap the top activity for a new one of view type `name`.
    fn replace(&mut self, name: &str, params: Params);
    /// Remove the top activity.
    fn pop(&mut self);
}

/// A navigation request in transit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// See [`StackActions::push`].
    Push {
        /// View type.
        name: String,
        /// View parameters.
        params: Params,
    },
    /// See [`StackActions::replace`].
    Replace {
        /// View type.
        name: String,
        /// View parameters.
        params: Params,
    },
    /// See [`StackActions::pop`].
    Pop,
}

impl Command {
    /// Short name for logs.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Push { .. } => "push",
            Self::Replace { .. } => "replace",
            Self::Pop => "pop",
        }
    }

    /// Invokes the matching method on `actions`.
    pub fn apply_to<A: StackActions + ?Sized>(self, actions: &mut A) {
        match self {
            Self::Push { name, params } => actions.push(&name, params),
            Self::Replace { name, params } => actions.replace(&name, params),
            Self::Pop => actions.pop(),
        }
    }
}

/// What the bridge does with a request nobody can take.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnboundPolicy {
    /// Log a warning and discard it.
    #[default]
    Drop,
    /// Hold it and replay it on the next bind.
    Queue,
}

/// Outcome of one bridge call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Delivery {
    /// Handled by the bound owner.
    Direct,
    /// Handed to this many observers.
    Broadcast(usize),
    /// Held for the next bind.
    Queued,
    /// Discarded.
    Dropped,
}

/// Handle for a bound owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

/// Handle for a subscribed observer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&Command)>;

/// Routes navigation requests to a stack owner. See the crate docs.
pub struct ActionBridge {
    policy: UnboundPolicy,
    binding: Option<(BindingId, Rc<RefCell<dyn StackActions>>)>,
    observers: Vec<(ObserverId, Observer)>,
    queue: VecDeque<Command>,
    next_id: u64,
}

impl fmt::Debug for ActionBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBridge")
            .field("policy", &self.policy)
            .field("binding", &self.binding.as_ref().map(|(id, _)| id))
            .field("observers", &self.observers.len())
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

impl Default for ActionBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionBridge {
    /// Creates a bridge that drops requests while unbound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(UnboundPolicy::Drop)
    }

    /// Creates a bridge with the given unbound policy.
    #[must_use]
    pub fn with_policy(policy: UnboundPolicy) -> Self {
        Self {
            policy,
            binding: None,
            observers: Vec::new(),
            queue: VecDeque::new(),
            next_id: 0,
        }
    }

    /// The unbound policy.
    #[must_use]
    pub fn policy(&self) -> UnboundPolicy {
        self.policy
    }

    /// Changes the unbound policy. Switching to [`UnboundPolicy::Drop`]
    /// discards anything queued.
    pub fn set_policy(&mut self, policy: UnboundPolicy) {
        self.policy = policy;
        if policy == UnboundPolicy::Drop && !self.queue.is_empty() {
            warn!(dropped = self.queue.len(), "discarding queued stack requests");
            self.queue.clear();
        }
    }

    /// Returns `true` while an owner is bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Number of requests waiting for a bind.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Binds `owner` as the direct target, replacing any previous binding,
    /// then replays queued requests to it in order.
    pub fn bind(&mut self, owner: Rc<RefCell<dyn StackActions>>) -> BindingId {
        let id = BindingId(self.fresh_id());
        if let Some((old, _)) = &self.binding {
            debug!(old = old.0, new = id.0, "replacing stack owner binding");
        }
        self.binding = Some((id, owner.clone()));
        if !self.queue.is_empty() {
            match owner.try_borrow_mut() {
                Ok(mut owner) => {
                    debug!(count = self.queue.len(), "replaying queued stack requests");
                    for command in self.queue.drain(..) {
                        command.apply_to(&mut *owner);
                    }
                }
                Err(_) => debug!("stack owner busy; keeping queued requests"),
            }
        }
        id
    }

    /// Clears the binding if `id` is still the live one.
    ///
    /// Returns `false` if a later bind already replaced it.
    pub fn unbind(&mut self, id: BindingId) -> bool {
        match &self.binding {
            Some((live, _)) if *live == id => {
                self.binding = None;
                true
            }
            _ => false,
        }
    }

    /// Adds an observer that receives requests while no owner is bound.
    pub fn subscribe(&mut self, observer: impl FnMut(&Command) + 'static) -> ObserverId {
        let id = ObserverId(self.fresh_id());
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(o, _)| *o != id);
        self.observers.len() != before
    }

    /// Requests a push.
    pub fn push(&mut self, name: &str, params: Params) -> Delivery {
        self.send(Command::Push {
            name: name.to_owned(),
            params,
        })
    }

    /// Requests a replace.
    pub fn replace(&mut self, name: &str, params: Params) -> Delivery {
        self.send(Command::Replace {
            name: name.to_owned(),
            params,
        })
    }

    /// Requests a pop.
    pub fn pop(&mut self) -> Delivery {
        self.send(Command::Pop)
    }

    /// Routes an arbitrary command.
    pub fn send(&mut self, command: Command) -> Delivery {
        if let Some((_, owner)) = &self.binding {
            match owner.try_borrow_mut() {
                Ok(mut owner) => {
                    if !self.queue.is_empty() {
                        debug!(count = self.queue.len(), "replaying queued stack requests");
                        for queued in self.queue.drain(..) {
                            queued.apply_to(&mut *owner);
                        }
                    }
                    command.apply_to(&mut *owner);
                    return Delivery::Direct;
                }
                Err(_) => {
                    debug!(verb = command.verb(), "stack owner busy; falling back");
                }
            }
        }

        if !self.observers.is_empty() {
            for (_, observer) in &mut self.observers {
                observer(&command);
            }
            return Delivery::Broadcast(self.observers.len());
        }

        match self.policy {
            UnboundPolicy::Drop => {
                warn!(verb = command.verb(), "stack owner not ready; dropping request");
                Delivery::Dropped
            }
            UnboundPolicy::Queue => {
                debug!(verb = command.verb(), "stack owner not ready; queueing request");
                self.queue.push_back(command);
                Delivery::Queued
            }
        }
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}
