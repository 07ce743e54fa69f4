// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory stack owner.

use std::fmt;

use cardstack_activity::{Activity, ActivityId, Params, TransitionDescriptor};
use cardstack_bridge::StackActions;
use tracing::debug;
use uuid::Uuid;

/// Handle for a store listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&[Activity], Option<TransitionDescriptor>)>;

/// Owns a navigation stack and tells listeners about every change.
///
/// The stack is never empty: it starts with one root activity and refuses to
/// pop it. Each mutation notifies listeners once with the new order and the
/// current transition descriptor.
pub struct StackStore {
    activities: Vec<Activity>,
    transition: Option<TransitionDescriptor>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl fmt::Debug for StackStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackStore")
            .field("activities", &self.activities)
            .field("transition", &self.transition)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl StackStore {
    /// Creates a stack holding a single root activity of view type `name`.
    #[must_use]
    pub fn new(name: &str, params: Params) -> Self {
        Self::with_root(Activity::new(fresh_id(), name).with_params(params))
    }

    /// Creates a stack holding `root`.
    #[must_use]
    pub fn with_root(root: Activity) -> Self {
        Self {
            activities: vec![root],
            transition: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// The order, bottom to top.
    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// The top activity.
    #[must_use]
    pub fn top(&self) -> Option<&Activity> {
        self.activities.last()
    }

    /// The transition descriptor last set by [`Self::set_transition`].
    #[must_use]
    pub fn transition(&self) -> Option<TransitionDescriptor> {
        self.transition
    }

    /// Registers `listener`. It is not called for the current state.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&[Activity], Option<TransitionDescriptor>) + 'static,
    ) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Pushes a new activity and returns its id.
    pub fn push(&mut self, name: &str, params: Params) -> ActivityId {
        let activity = Activity::new(fresh_id(), name).with_params(params);
        let id = activity.id.clone();
        debug!(%id, name, "push");
        self.activities.push(activity);
        self.notify();
        id
    }

    /// Swaps the top activity for a new one and returns the new id.
    pub fn replace(&mut self, name: &str, params: Params) -> ActivityId {
        let activity = Activity::new(fresh_id(), name).with_params(params);
        let id = activity.id.clone();
        debug!(%id, name, "replace");
        match self.activities.last_mut() {
            Some(top) => *top = activity,
            None => self.activities.push(activity),
        }
        self.notify();
        id
    }

    /// Pops the top activity. The root is never popped.
    pub fn pop(&mut self) -> Option<Activity> {
        if self.activities.len() <= 1 {
            debug!("pop ignored: only the root activity remains");
            return None;
        }
        let popped = self.activities.pop();
        if let Some(a) = &popped {
            debug!(id = %a.id, "pop");
        }
        self.notify();
        popped
    }

    /// Reports an in-flight transition to listeners.
    pub fn set_transition(&mut self, transition: TransitionDescriptor) {
        self.transition = Some(transition);
        self.notify();
    }

    /// Ends any in-flight transition.
    pub fn clear_transition(&mut self) {
        self.transition = None;
        self.notify();
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.activities, self.transition);
        }
    }
}

impl StackActions for StackStore {
    fn push(&mut self, name: &str, params: Params) {
        Self::push(self, name, params);
    }

    fn replace(&mut self, name: &str, params: Params) {
        Self::replace(self, name, params);
    }

    fn pop(&mut self) {
        Self::pop(self);
    }
}

fn fresh_id() -> ActivityId {
    ActivityId::new(Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use cardstack_activity::Direction;

    fn names(store: &StackStore) -> Vec<&str> {
        store.activities().iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn root_is_never_popped() {
        let mut store = StackStore::new("Home", Params::new());
        assert!(store.pop().is_none());
        assert_eq!(names(&store), ["Home"]);
    }

    #[test]
    fn ids_are_unique() {
        let mut store = StackStore::new("Home", Params::new());
        let a = store.push("Detail", Params::new());
        let b = store.push("Detail", Params::new());
        assert_ne!(a, b);
        assert_ne!(store.activities()[0].id, a);
    }

    #[test]
    fn replace_swaps_top() {
        let mut store = StackStore::new("Home", Params::new());
        let old = store.push("A", Params::new());
        let new = store.replace("B", Params::new());
        assert_ne!(old, new);
        assert_eq!(names(&store), ["Home", "B"]);
    }

    #[test]
    fn listeners_see_each_mutation_once() {
        let mut store = StackStore::new("Home", Params::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(move |order, t| sink.borrow_mut().push((order.len(), t)));

        store.push("A", Params::new());
        store.set_transition(TransitionDescriptor::new(Direction::Back, 0.5));
        store.clear_transition();
        store.pop();
        store.pop();
        assert_eq!(
            *seen.borrow(),
            [
                (2, None),
                (2, Some(TransitionDescriptor::new(Direction::Back, 0.5))),
                (2, None),
                (1, None),
            ]
        );

        assert!(store.unsubscribe(id));
        store.push("B", Params::new());
        assert_eq!(seen.borrow().len(), 4);
    }
}
