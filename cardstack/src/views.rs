// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View types and the registry that resolves them by name.

use std::fmt;

use cardstack_activity::{Activity, Params};
use cardstack_controller::{ApplyError, CardVisual};
use hashbrown::HashMap;

/// Content shown inside one card.
///
/// Every method has a default so simple views only implement what they need.
pub trait View {
    /// Presents the card's current visual state.
    fn apply_visual(&mut self, visual: &CardVisual) -> Result<(), ApplyError> {
        let _ = visual;
        Ok(())
    }

    /// Captures state to hand back if this activity is mounted again.
    fn snapshot(&self) -> Option<Params> {
        None
    }

    /// Receives the snapshot taken when this activity was last unmounted.
    fn restore(&mut self, snapshot: Params) {
        let _ = snapshot;
    }

    /// Releases resources. Called once, right before the view is dropped.
    fn destroy(&mut self) {}
}

/// Builds the view for an activity.
pub type ViewFactory = Box<dyn Fn(&Activity) -> Box<dyn View>>;

/// Maps view type names to factories.
#[derive(Default)]
pub struct ViewRegistry {
    factories: HashMap<String, ViewFactory>,
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ViewRegistry")
            .field("names", &names)
            .finish()
    }
}

impl ViewRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`. Returns `true` if it replaced one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&Activity) -> Box<dyn View> + 'static,
    ) -> bool {
        self.factories
            .insert(name.into(), Box::new(factory))
            .is_some()
    }

    /// Returns `true` if `name` has a factory.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Builds the view for `activity`, or `None` if its name is unknown.
    #[must_use]
    pub fn create(&self, activity: &Activity) -> Option<Box<dyn View>> {
        self.factories.get(activity.name.as_str()).map(|f| f(activity))
    }
}
