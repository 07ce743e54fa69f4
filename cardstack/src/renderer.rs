// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glue between a [`StackStore`], its views, the card controller, and swipe input.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use cardstack_activity::{Activity, ActivityId, Params, TransitionDescriptor};
use cardstack_bridge::{ActionBridge, BindingId};
use cardstack_controller::{
    ApplyError, CardBackend, CardController, CardVisual, StackConfig, SyncReport,
};
use cardstack_gesture::{EdgeSwipe, PointerId, Resolution, SwipeConfig, SwipeEnd};
use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Size};
use tracing::{debug, warn};

use crate::Error;
use crate::store::{ListenerId, StackStore};
use crate::views::{View, ViewRegistry};

/// One owner emission waiting to be synced.
#[derive(Clone, Debug, PartialEq)]
struct StackEvent {
    activities: Vec<Activity>,
    transition: Option<TransitionDescriptor>,
}

type Mailbox = Rc<RefCell<VecDeque<StackEvent>>>;

/// A mounted card: its view, or nothing if the view type is unknown.
pub struct CardSurface {
    name: String,
    view: Option<Box<dyn View>>,
    visual: Option<CardVisual>,
}

impl fmt::Debug for CardSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardSurface")
            .field("name", &self.name)
            .field("has_view", &self.view.is_some())
            .field("visual", &self.visual)
            .finish()
    }
}

impl CardSurface {
    /// View type name of the activity.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if no view was registered for the name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_none()
    }

    /// The visual most recently presented on this card.
    #[must_use]
    pub fn visual(&self) -> Option<&CardVisual> {
        self.visual.as_ref()
    }
}

/// [`CardBackend`] that instantiates views from a [`ViewRegistry`] and keeps
/// their snapshots across unmounts.
#[derive(Debug)]
pub struct ViewBackend {
    registry: ViewRegistry,
    snapshots: HashMap<ActivityId, Params>,
}

impl ViewBackend {
    /// Creates a backend over `registry`.
    #[must_use]
    pub fn new(registry: ViewRegistry) -> Self {
        Self {
            registry,
            snapshots: HashMap::new(),
        }
    }

    /// The registry.
    #[must_use]
    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// The snapshot held for `id`, if any.
    #[must_use]
    pub fn snapshot(&self, id: &ActivityId) -> Option<&Params> {
        self.snapshots.get(id)
    }

    /// Forgets snapshots of activities that left the stack for good.
    pub fn retain_snapshots(&mut self, order: &[Activity]) {
        if self.snapshots.is_empty() {
            return;
        }
        let live: HashSet<&ActivityId> = order.iter().map(|a| &a.id).collect();
        self.snapshots.retain(|id, _| live.contains(id));
    }
}

impl CardBackend for ViewBackend {
    type Surface = CardSurface;

    fn mount(&mut self, activity: &Activity) -> CardSurface {
        let mut view = self.registry.create(activity);
        match &mut view {
            Some(view) => {
                if let Some(snapshot) = self.snapshots.remove(&activity.id) {
                    debug!(id = %activity.id, "restoring view snapshot");
                    view.restore(snapshot);
                }
            }
            None => {
                debug!(id = %activity.id, name = %activity.name, "no view registered; mounting empty card");
            }
        }
        CardSurface {
            name: activity.name.clone(),
            view,
            visual: None,
        }
    }

    fn unmount(&mut self, id: &ActivityId, surface: CardSurface) {
        if let Some(mut view) = surface.view {
            if let Some(snapshot) = view.snapshot() {
                self.snapshots.insert(id.clone(), snapshot);
            }
            view.destroy();
        }
    }

    fn apply(
        &mut self,
        _id: &ActivityId,
        surface: &mut CardSurface,
        visual: &CardVisual,
    ) -> Result<(), ApplyError> {
        if let Some(view) = &mut surface.view {
            view.apply_visual(visual)?;
        }
        surface.visual = Some(*visual);
        Ok(())
    }
}

/// Renderer settings.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RendererConfig {
    /// Windowing and stacking.
    pub stack: StackConfig,
    /// Edge swipe geometry.
    pub swipe: SwipeConfig,
    /// Initial viewport in logical pixels.
    pub viewport: Size,
}

/// Renders a [`StackStore`] through registered views.
///
/// Dropping the renderer unmounts every card and unsubscribes from the store.
///
/// Store emissions land in a mailbox and are synced in order by
/// [`pump`](Self::pump), so a sync never starts while another is running even
/// when a view or gesture asks the store to change from inside one.
pub struct StackRenderer {
    store: Rc<RefCell<StackStore>>,
    listener: ListenerId,
    mailbox: Mailbox,
    controller: CardController<ViewBackend>,
    swipe: EdgeSwipe,
}

impl fmt::Debug for StackRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackRenderer")
            .field("controller", &self.controller)
            .field("swipe", &self.swipe)
            .field("pending", &self.mailbox.borrow().len())
            .finish_non_exhaustive()
    }
}

impl StackRenderer {
    /// Subscribes to `store` and renders its current state.
    pub fn attach(
        store: Rc<RefCell<StackStore>>,
        registry: ViewRegistry,
        config: RendererConfig,
    ) -> Result<Self, Error> {
        let controller = CardController::new(config.stack, ViewBackend::new(registry))?;
        let mut swipe = EdgeSwipe::new(config.swipe)?;
        swipe.set_viewport(config.viewport);

        let mailbox: Mailbox = Rc::default();
        let listener = {
            let mut owner = store.try_borrow_mut().map_err(|_| Error::StoreBusy)?;
            mailbox.borrow_mut().push_back(StackEvent {
                activities: owner.activities().to_vec(),
                transition: owner.transition(),
            });
            let sink = Rc::clone(&mailbox);
            owner.subscribe(move |activities, transition| {
                sink.borrow_mut().push_back(StackEvent {
                    activities: activities.to_vec(),
                    transition,
                });
            })
        };

        let mut renderer = Self {
            store,
            listener,
            mailbox,
            controller,
            swipe,
        };
        renderer.pump();
        Ok(renderer)
    }

    /// The store being rendered.
    #[must_use]
    pub fn store(&self) -> &Rc<RefCell<StackStore>> {
        &self.store
    }

    /// The card controller.
    #[must_use]
    pub fn controller(&self) -> &CardController<ViewBackend> {
        &self.controller
    }

    /// The card controller, mutably (for mode and window changes).
    pub fn controller_mut(&mut self) -> &mut CardController<ViewBackend> {
        &mut self.controller
    }

    /// The mounted surface of `id`.
    #[must_use]
    pub fn card(&self, id: &ActivityId) -> Option<&CardSurface> {
        self.controller.surface(id)
    }

    /// Syncs every queued store emission in order. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let mut synced = 0;
        loop {
            let Some(event) = self.mailbox.borrow_mut().pop_front() else {
                break;
            };
            let SyncReport {
                gesture_abandoned, ..
            } = self.controller.sync(&event.activities);
            if gesture_abandoned && let Some(pointer) = self.swipe.abandon() {
                debug!(pointer = pointer.0, "swipe abandoned: its card left the top");
            }
            self.controller.set_transition(event.transition);
            self.controller
                .backend_mut()
                .retain_snapshots(&event.activities);
            synced += 1;
        }
        synced
    }

    /// Advances frame-deferred entrances, then syncs queued store emissions.
    /// Call once per animation frame.
    ///
    /// Only entrances started before this frame are released, so a card pushed
    /// since the last frame is painted off-screen once before it animates in.
    /// Returns the number of cards released.
    pub fn on_frame(&mut self) -> usize {
        let released = self.controller.on_frame();
        self.pump();
        released
    }

    /// Updates the viewport used for swipe distances.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.swipe.set_viewport(viewport);
    }

    /// Swipe hotzone in viewport coordinates.
    #[must_use]
    pub fn hotzone(&self) -> Rect {
        self.swipe.hotzone()
    }

    /// Layer of the hotzone, above every card.
    #[must_use]
    pub fn hotzone_z(&self) -> i32 {
        self.controller.config().edge_z
    }

    /// Starts a back swipe if `pos` is in the hotzone and there is a card to
    /// go back to. Returns `true` if the pointer was captured.
    pub fn pointer_down(&mut self, pointer: PointerId, pos: Point) -> bool {
        if self.controller.activities().len() < 2 {
            return false;
        }
        self.swipe.pointer_down(pointer, pos)
    }

    /// Feeds a move from the captured pointer. Returns the new progress.
    pub fn pointer_move(&mut self, pointer: PointerId, pos: Point) -> Option<f64> {
        let progress = self.swipe.pointer_move(pointer, pos)?;
        self.controller.set_gesture_progress(Some(progress));
        Some(progress)
    }

    /// Releases the captured pointer and resolves the swipe.
    pub fn pointer_up(&mut self, pointer: PointerId, pos: Point) -> Option<Resolution> {
        let end = self.swipe.pointer_up(pointer, pos)?;
        Some(self.finish_swipe(end))
    }

    /// Resolves the swipe after the platform cancelled the pointer.
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Option<Resolution> {
        let end = self.swipe.pointer_cancel(pointer)?;
        Some(self.finish_swipe(end))
    }

    /// Binds the store as the direct target of `bridge`.
    pub fn bind_bridge(&self, bridge: &mut ActionBridge) -> BindingId {
        bridge.bind(self.store.clone())
    }

    fn finish_swipe(&mut self, end: SwipeEnd) -> Resolution {
        debug!(resolution = ?end.resolution, travel = end.travel, "swipe released");
        if end.resolution == Resolution::Commit {
            match self.store.try_borrow_mut() {
                Ok(mut store) => {
                    store.pop();
                }
                Err(_) => warn!("stack store busy; swipe commit not applied"),
            }
            self.pump();
        }
        // No-op when the pop already moved the top.
        self.controller.set_gesture_progress(None);
        end.resolution
    }

    fn teardown(&mut self) {
        if let Ok(mut store) = self.store.try_borrow_mut() {
            store.unsubscribe(self.listener);
        }
        self.mailbox.borrow_mut().clear();
        self.controller.clear();
    }
}

impl Drop for StackRenderer {
    fn drop(&mut self) {
        self.teardown();
    }
}
