// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The card controller: turns stack orders into per-card visuals.

use std::fmt;

use cardstack_activity::{Activity, ActivityId, Direction, TransitionDescriptor};
use cardstack_order::{OrderTracker, Transition};
use cardstack_policy::{RenderMode, RetainWindow, compute_window};
use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace, warn};

use crate::backend::{ApplyError, CardBackend};
use crate::config::{ConfigError, StackConfig};
use crate::visual::{CardFlags, CardTransform, CardVisual};

/// Scale of the card revealed underneath at the start of a back swipe.
const REVEAL_SCALE: f64 = 0.98;

/// What a [`CardController::sync`] did.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncReport {
    /// Classification of the order change.
    pub transition: Transition<ActivityId>,
    /// Cards mounted by this sync, bottom to top.
    pub mounted: Vec<ActivityId>,
    /// Cards unmounted by this sync.
    pub unmounted: Vec<ActivityId>,
    /// A gesture override was dropped because its card is no longer on top.
    pub gesture_abandoned: bool,
}

/// One entry of the handle table.
struct Card<S> {
    surface: S,
    applied: Option<CardVisual>,
}

/// A mounted card's place in the full order.
#[derive(Clone, Debug)]
struct Slot {
    id: ActivityId,
    position: usize,
    awake: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct GestureOverride {
    top: ActivityId,
    progress: f64,
}

/// Applies windowing, order classification, and gesture input to mounted cards.
///
/// The controller owns an exclusive handle table mapping each mounted activity
/// id to its backend surface. An id is in the table exactly while its card is
/// in the mounted set; the table is never a cache.
pub struct CardController<B: CardBackend> {
    config: StackConfig,
    backend: B,
    cards: HashMap<ActivityId, Card<B::Surface>>,
    slots: Vec<Slot>,
    order: OrderTracker<ActivityId>,
    activities: Vec<Activity>,
    entering: Option<ActivityId>,
    pending_frame: Vec<ActivityId>,
    gesture: Option<GestureOverride>,
    transition: Option<TransitionDescriptor>,
}

impl<B: CardBackend> fmt::Debug for CardController<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardController")
            .field("config", &self.config)
            .field("mounted", &self.slots)
            .field("entering", &self.entering)
            .field("pending_frame", &self.pending_frame)
            .field("gesture", &self.gesture)
            .field("transition", &self.transition)
            .finish_non_exhaustive()
    }
}

impl<B: CardBackend> CardController<B> {
    /// Creates a controller with nothing mounted.
    pub fn new(config: StackConfig, backend: B) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            backend,
            cards: HashMap::new(),
            slots: Vec::new(),
            order: OrderTracker::new(),
            activities: Vec::new(),
            entering: None,
            pending_frame: Vec::new(),
            gesture: None,
            transition: None,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// The backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Brings mounted cards and their visuals in line with `order`.
    ///
    /// `order` is bottom to top. Push and replace (relative to the previous
    /// sync) start an entrance on the new top; the first sync never does, as
    /// there is nothing to enter over.
    pub fn sync(&mut self, order: &[Activity]) -> SyncReport {
        let had_previous = !self.order.previous().is_empty();
        let transition = self.order.update(order);
        self.activities.clear();
        self.activities.extend_from_slice(order);

        let (mounted, unmounted) = self.reconcile();

        let top = order.last().map(|a| &a.id);
        match transition.entering() {
            Some(id) if had_previous => {
                self.pending_frame.retain(|p| p != id);
                self.pending_frame.push(id.clone());
                self.entering = Some(id.clone());
            }
            _ => {
                if self.entering.as_ref() != top {
                    self.entering = None;
                }
            }
        }

        self.pending_frame.retain(|id| self.cards.contains_key(id));

        let gesture_abandoned = self.gesture.as_ref().is_some_and(|g| top != Some(&g.top));
        if gesture_abandoned && let Some(g) = self.gesture.take() {
            debug!(card = %g.top, "gesture card left the top; dropping override");
        }

        let applied = self.refresh();
        debug!(
            kind = ?transition.kind,
            top = ?top.map(ActivityId::as_str),
            mounted = self.cards.len(),
            applied,
            "synced card stack"
        );

        SyncReport {
            transition,
            mounted,
            unmounted,
            gesture_abandoned,
        }
    }

    /// Runs the frame-deferred half of pending entrances: the entering card
    /// moves from off-screen to rest with transitions enabled.
    ///
    /// Cards unmounted since the entrance started are skipped. Returns the
    /// number of cards whose visuals changed.
    pub fn on_frame(&mut self) -> usize {
        if self.pending_frame.is_empty() {
            return 0;
        }
        self.pending_frame.clear();
        self.refresh()
    }

    /// Returns `true` while an entrance is waiting for [`Self::on_frame`].
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        !self.pending_frame.is_empty()
    }

    /// Drives the top and second-from-top cards from a swipe.
    ///
    /// `Some(progress)` starts or updates the override; `None` ends it and
    /// lets both cards transition back to rest. Returns `true` while an
    /// override is active.
    pub fn set_gesture_progress(&mut self, progress: Option<f64>) -> bool {
        match progress {
            Some(p) => {
                let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
                if let Some(g) = &mut self.gesture {
                    g.progress = p;
                } else if let Some(top) = self.activities.last() {
                    self.gesture = Some(GestureOverride {
                        top: top.id.clone(),
                        progress: p,
                    });
                }
            }
            None => self.gesture = None,
        }
        self.refresh();
        self.gesture.is_some()
    }

    /// Current gesture progress, if an override is active.
    #[must_use]
    pub fn gesture_progress(&self) -> Option<f64> {
        self.gesture.as_ref().map(|g| g.progress)
    }

    /// Drives the top and previous cards from an owner-reported transition.
    ///
    /// Ignored for cards under an active gesture override.
    pub fn set_transition(&mut self, transition: Option<TransitionDescriptor>) {
        if self.transition == transition {
            return;
        }
        self.transition = transition;
        self.refresh();
    }

    /// Switches between sleep and unmount and resyncs.
    pub fn set_mode(&mut self, mode: RenderMode) {
        if self.config.mode != mode {
            self.config.mode = mode;
            self.resync();
        }
    }

    /// Changes the retain window and resyncs.
    pub fn set_retain_window(&mut self, retain: RetainWindow) {
        if self.config.retain_window != retain {
            self.config.retain_window = retain;
            self.resync();
        }
    }

    /// Toggles root pinning and resyncs.
    pub fn set_pin_root(&mut self, pin_root: bool) {
        if self.config.pin_root != pin_root {
            self.config.pin_root = pin_root;
            self.resync();
        }
    }

    /// Unmounts every card and forgets the recorded order.
    pub fn clear(&mut self) {
        for (id, card) in self.cards.drain() {
            self.backend.unmount(&id, card.surface);
        }
        self.slots.clear();
        self.activities.clear();
        self.order.reset();
        self.entering = None;
        self.pending_frame.clear();
        self.gesture = None;
        self.transition = None;
    }

    /// Returns `true` if `id` currently has a surface.
    #[must_use]
    pub fn is_mounted(&self, id: &ActivityId) -> bool {
        self.cards.contains_key(id)
    }

    /// Mounted ids, bottom to top.
    pub fn mounted_ids(&self) -> impl Iterator<Item = &ActivityId> + '_ {
        self.slots.iter().map(|s| &s.id)
    }

    /// The backend surface of `id`, if mounted.
    #[must_use]
    pub fn surface(&self, id: &ActivityId) -> Option<&B::Surface> {
        self.cards.get(id).map(|c| &c.surface)
    }

    /// The order seen by the last sync, bottom to top.
    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// The last visual successfully applied to `id`.
    #[must_use]
    pub fn visual(&self, id: &ActivityId) -> Option<&CardVisual> {
        self.cards.get(id).and_then(|c| c.applied.as_ref())
    }

    /// The card currently playing an entrance, if any.
    #[must_use]
    pub fn entering(&self) -> Option<&ActivityId> {
        self.entering.as_ref()
    }

    fn resync(&mut self) {
        let order = std::mem::take(&mut self.activities);
        self.sync(&order);
    }

    /// Mounts and unmounts so the handle table matches the resident window.
    fn reconcile(&mut self) -> (Vec<ActivityId>, Vec<ActivityId>) {
        let window = compute_window(
            &self.activities,
            self.config.retain_window,
            self.config.mode.residency(),
            self.config.pin_root,
        );
        let resident: HashSet<&ActivityId> = window.resident.iter().map(|a| &a.id).collect();

        let unmounted: Vec<ActivityId> = self
            .cards
            .keys()
            .filter(|id| !resident.contains(id))
            .cloned()
            .collect();
        for id in &unmounted {
            if let Some(card) = self.cards.remove(id) {
                self.backend.unmount(id, card.surface);
            }
        }

        let sleeps = self.config.mode == RenderMode::Sleep;
        let mut mounted = Vec::new();
        self.slots.clear();
        for (position, activity) in self.activities.iter().enumerate() {
            if !resident.contains(&activity.id) {
                continue;
            }
            if !self.cards.contains_key(&activity.id) {
                let surface = self.backend.mount(activity);
                self.cards.insert(
                    activity.id.clone(),
                    Card {
                        surface,
                        applied: None,
                    },
                );
                mounted.push(activity.id.clone());
            }
            self.slots.push(Slot {
                id: activity.id.clone(),
                position,
                awake: !sleeps || window.is_awake(&activity.id),
            });
        }

        (mounted, unmounted)
    }

    /// Recomputes every mounted card's visual and applies the ones that
    /// changed. Returns how many were applied.
    fn refresh(&mut self) -> usize {
        let len = self.activities.len();
        let top = self.activities.last().map(|a| &a.id);
        let previous = len.checked_sub(2).map(|i| &self.activities[i].id);

        let visuals: Vec<(ActivityId, CardVisual)> = self
            .slots
            .iter()
            .map(|slot| (slot.id.clone(), self.visual_for(slot, top, previous)))
            .collect();

        let mut applied = 0;
        for (id, visual) in visuals {
            let Some(card) = self.cards.get_mut(&id) else {
                continue;
            };
            if card.applied == Some(visual) {
                continue;
            }
            match self.backend.apply(&id, &mut card.surface, &visual) {
                Ok(()) => {
                    trace!(card = %id, z = visual.z_index, flags = ?visual.flags, "applied card visual");
                    card.applied = Some(visual);
                    applied += 1;
                }
                Err(ApplyError::Detached) => {
                    trace!(card = %id, "card surface detached; skipping");
                }
                Err(err) => {
                    warn!(card = %id, %err, "failed to apply card visual");
                }
            }
        }
        applied
    }

    fn visual_for(
        &self,
        slot: &Slot,
        top: Option<&ActivityId>,
        previous: Option<&ActivityId>,
    ) -> CardVisual {
        let cfg = &self.config;
        let mut visual = CardVisual::resting(z_at(cfg.base_z, slot.position), cfg.timing);

        if !slot.awake {
            visual.flags |= CardFlags::SLEEP;
            visual.opacity = 0.0;
        }

        if self.entering.as_ref() == Some(&slot.id) {
            visual.flags |= CardFlags::ENTER;
            if self.pending_frame.contains(&slot.id) {
                visual.transform = CardTransform::OFFSCREEN;
                visual.flags |= CardFlags::NO_TRANSITION;
            }
        }

        if let Some(g) = &self.gesture {
            let p = g.progress;
            if slot.id == g.top {
                visual.transform = CardTransform::translate(p);
                visual.z_index = cfg.edge_z.saturating_sub(1);
                visual.flags |= CardFlags::NO_TRANSITION;
            } else if previous == Some(&slot.id) {
                visual.transform = CardTransform::scaled(REVEAL_SCALE + p * (1.0 - REVEAL_SCALE));
                visual.z_index = cfg.edge_z.saturating_sub(2);
                visual.flags |= CardFlags::NO_TRANSITION;
            }
        } else if let Some(t) = self.transition {
            let p = t.progress();
            let driven = if top == Some(&slot.id) {
                Some(match t.direction() {
                    Direction::Forward => CardTransform::translate(1.0 - p),
                    Direction::Back => CardTransform::translate(p),
                })
            } else if previous == Some(&slot.id) {
                Some(match t.direction() {
                    Direction::Forward => {
                        CardTransform::scaled(1.0 - (1.0 - p) * (1.0 - REVEAL_SCALE))
                    }
                    Direction::Back => {
                        CardTransform::scaled(REVEAL_SCALE + p * (1.0 - REVEAL_SCALE))
                    }
                })
            } else {
                None
            };
            if let Some(transform) = driven {
                visual.transform = transform;
                visual.flags |= CardFlags::NO_TRANSITION;
            }
        }

        visual
    }
}

fn z_at(base: i32, position: usize) -> i32 {
    base.saturating_add(i32::try_from(position).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::Timing;
    use cardstack_order::TransitionKind;

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Mount(ActivityId),
        Unmount(ActivityId),
        Apply(ActivityId, CardVisual),
    }

    #[derive(Debug, Default)]
    struct Recording {
        events: Vec<Event>,
        failing: HashSet<ActivityId>,
        detached: HashSet<ActivityId>,
        next: u32,
    }

    impl Recording {
        fn applies(&self) -> usize {
            self.events
                .iter()
                .filter(|e| matches!(e, Event::Apply(..)))
                .count()
        }

        fn mounts(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Mount(id) => Some(id.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn last_apply(&self, id: &ActivityId) -> Option<&CardVisual> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Apply(applied, visual) if applied == id => Some(visual),
                _ => None,
            })
        }

        fn unmounts(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Unmount(id) => Some(id.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl CardBackend for Recording {
        type Surface = u32;

        fn mount(&mut self, activity: &Activity) -> u32 {
            self.events.push(Event::Mount(activity.id.clone()));
            self.next += 1;
            self.next
        }

        fn unmount(&mut self, id: &ActivityId, _surface: u32) {
            self.events.push(Event::Unmount(id.clone()));
        }

        fn apply(
            &mut self,
            id: &ActivityId,
            _surface: &mut u32,
            visual: &CardVisual,
        ) -> Result<(), ApplyError> {
            if self.detached.contains(id) {
                return Err(ApplyError::Detached);
            }
            if self.failing.contains(id) {
                return Err(ApplyError::Backend(String::from("boom")));
            }
            self.events.push(Event::Apply(id.clone(), *visual));
            Ok(())
        }
    }

    fn acts(ids: &[&str]) -> Vec<Activity> {
        ids.iter().map(|id| Activity::new(*id, "Card")).collect()
    }

    fn controller(config: StackConfig) -> CardController<Recording> {
        CardController::new(config, Recording::default()).unwrap()
    }

    fn id(s: &str) -> ActivityId {
        ActivityId::new(s)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn push_enters_from_offscreen_then_rests() {
        let mut c = controller(StackConfig::default());
        let report = c.sync(&acts(&["home"]));
        assert_eq!(report.transition.kind, TransitionKind::Push);
        assert_eq!(c.entering(), None, "first sync never animates");

        let report = c.sync(&acts(&["home", "detail"]));
        assert_eq!(report.transition.kind, TransitionKind::Push);
        assert_eq!(report.mounted, vec![id("detail")]);

        let detail = *c.visual(&id("detail")).unwrap();
        let home = *c.visual(&id("home")).unwrap();
        assert!(detail.z_index > home.z_index);
        assert_eq!(detail.transform, CardTransform::OFFSCREEN);
        assert!(detail.flags.contains(CardFlags::ENTER | CardFlags::NO_TRANSITION));
        assert!(c.has_pending_frame());
        assert_eq!(c.backend().last_apply(&id("detail")), Some(&detail));

        assert_eq!(c.on_frame(), 1);
        let detail = *c.visual(&id("detail")).unwrap();
        assert_eq!(detail.transform, CardTransform::RESTING);
        assert!(detail.flags.contains(CardFlags::ENTER));
        assert!(!detail.flags.contains(CardFlags::NO_TRANSITION));
        assert_eq!(detail.transition(), Some(Timing::default()));
        assert_eq!(c.on_frame(), 0);
    }

    #[test]
    fn z_follows_full_order() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a", "b", "c"]));
        assert_eq!(c.visual(&id("a")).unwrap().z_index, 1000);
        assert_eq!(c.visual(&id("b")).unwrap().z_index, 1001);
        assert_eq!(c.visual(&id("c")).unwrap().z_index, 1002);
    }

    #[test]
    fn resync_is_idempotent() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a", "b"]));
        let applied = c.backend().applies();
        let before: Vec<_> = ["a", "b"].iter().map(|s| *c.visual(&id(s)).unwrap()).collect();

        let report = c.sync(&acts(&["a", "b"]));
        assert_eq!(report.transition.kind, TransitionKind::Unrelated);
        assert!(report.mounted.is_empty() && report.unmounted.is_empty());
        assert_eq!(c.backend().applies(), applied, "nothing changed");
        let after: Vec<_> = ["a", "b"].iter().map(|s| *c.visual(&id(s)).unwrap()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn sleep_mode_keeps_everything_mounted() {
        let mut c = controller(StackConfig::default().with_retain(1).unwrap());
        c.sync(&acts(&["a", "b", "c"]));
        assert_eq!(c.mounted_ids().count(), 3);
        for s in ["a", "b"] {
            let v = c.visual(&id(s)).unwrap();
            assert!(v.flags.contains(CardFlags::SLEEP));
            assert_eq!(v.opacity, 0.0);
            assert!(!v.is_interactive());
        }
        let top = c.visual(&id("c")).unwrap();
        assert!(top.is_interactive());
        assert_eq!(top.opacity, 1.0);
    }

    #[test]
    fn unmount_mode_mounts_only_the_window() {
        let config = StackConfig {
            mode: RenderMode::Unmount,
            ..StackConfig::default()
        };
        let mut c = controller(config);
        c.sync(&acts(&["home", "a", "b"]));
        assert_eq!(c.backend().mounts(), ["a", "b"]);
        assert!(!c.is_mounted(&id("home")));

        let report = c.sync(&acts(&["home", "a", "b", "d"]));
        assert_eq!(report.unmounted, vec![id("a")]);
        assert_eq!(report.mounted, vec![id("d")]);
        assert_eq!(c.backend().unmounts(), ["a"]);
        // z still reflects the full order.
        assert_eq!(c.visual(&id("d")).unwrap().z_index, 1003);
    }

    #[test]
    fn pinned_root_stays_mounted() {
        let config = StackConfig {
            mode: RenderMode::Unmount,
            pin_root: true,
            ..StackConfig::default()
        };
        let mut c = controller(config.with_retain(1).unwrap());
        c.sync(&acts(&["home", "a", "b"]));
        let mounted: Vec<_> = c.mounted_ids().map(ActivityId::as_str).collect();
        assert_eq!(mounted, ["home", "b"]);
        assert_eq!(c.visual(&id("home")).unwrap().z_index, 1000);
    }

    #[test]
    fn mode_switch_unmounts_sleepers() {
        let mut c = controller(StackConfig::default().with_retain(1).unwrap());
        c.sync(&acts(&["a", "b"]));
        c.set_mode(RenderMode::Unmount);
        assert_eq!(c.backend().unmounts(), ["a"]);
        c.set_mode(RenderMode::Sleep);
        assert!(c.is_mounted(&id("a")));
        assert!(c.visual(&id("a")).unwrap().flags.contains(CardFlags::SLEEP));
    }

    #[test]
    fn replace_enters_new_top_and_drops_old() {
        let config = StackConfig {
            mode: RenderMode::Unmount,
            ..StackConfig::default()
        };
        let mut c = controller(config);
        c.sync(&acts(&["home", "a"]));
        let report = c.sync(&acts(&["home", "b"]));
        assert_eq!(report.transition.kind, TransitionKind::Replace);
        assert_eq!(report.unmounted, vec![id("a")]);
        assert_eq!(c.entering(), Some(&id("b")));
    }

    #[test]
    fn pop_is_not_an_entrance() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a"]));
        c.sync(&acts(&["a", "b"]));
        c.on_frame();
        let report = c.sync(&acts(&["a"]));
        assert_eq!(report.transition.kind, TransitionKind::Unrelated);
        assert_eq!(c.entering(), None);
        assert!(!c.visual(&id("a")).unwrap().flags.contains(CardFlags::ENTER));
    }

    #[test]
    fn frame_after_unmount_is_noop() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a"]));
        c.sync(&acts(&["a", "b"]));
        c.sync(&acts(&["a"]));
        assert!(!c.has_pending_frame());
        assert_eq!(c.on_frame(), 0);
    }

    #[test]
    fn gesture_drives_top_and_previous() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a", "b", "c"]));
        assert!(c.set_gesture_progress(Some(0.5)));

        let top = c.visual(&id("c")).unwrap();
        assert_eq!(top.z_index, 99_999);
        assert!(close(top.transform.translate_x, 0.5));
        assert!(top.flags.contains(CardFlags::NO_TRANSITION));

        let prev = c.visual(&id("b")).unwrap();
        assert_eq!(prev.z_index, 99_998);
        assert!(close(prev.transform.scale, 0.99));

        let untouched = c.visual(&id("a")).unwrap();
        assert_eq!(untouched.z_index, 1000);
        assert_eq!(untouched.transform, CardTransform::RESTING);

        assert!(!c.set_gesture_progress(None));
        let top = c.visual(&id("c")).unwrap();
        assert_eq!(top.z_index, 1002);
        assert_eq!(top.transform, CardTransform::RESTING);
        assert!(top.transition().is_some());
    }

    #[test]
    fn gesture_follows_new_card_under_the_top() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a", "b", "c"]));
        c.set_gesture_progress(Some(0.5));

        let report = c.sync(&acts(&["a", "x", "c"]));
        assert!(!report.gesture_abandoned);
        let under = c.visual(&id("x")).unwrap();
        assert_eq!(under.z_index, 99_998);
        assert!(close(under.transform.scale, 0.99));
        assert_eq!(c.visual(&id("c")).unwrap().z_index, 99_999);
        assert_eq!(c.visual(&id("a")).unwrap().z_index, 1000);
    }

    #[test]
    fn unmounted_entrance_leaves_nothing_pending() {
        let config = StackConfig {
            mode: RenderMode::Unmount,
            ..StackConfig::default()
        };
        let mut c = controller(config.with_retain(1).unwrap());
        c.sync(&acts(&["a"]));
        c.sync(&acts(&["a", "b"]));
        assert!(c.has_pending_frame());
        c.sync(&acts(&["a", "c"]));
        // Only the latest entrance is still waiting.
        assert!(c.has_pending_frame());
        assert_eq!(c.entering(), Some(&id("c")));
        c.sync(&acts(&["a"]));
        assert!(!c.has_pending_frame());
    }

    #[test]
    fn gesture_progress_is_clamped() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a", "b"]));
        c.set_gesture_progress(Some(3.0));
        assert_eq!(c.gesture_progress(), Some(1.0));
        c.set_gesture_progress(Some(f64::NAN));
        assert_eq!(c.gesture_progress(), Some(0.0));
    }

    #[test]
    fn gesture_with_single_card_has_no_previous() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a"]));
        assert!(c.set_gesture_progress(Some(0.25)));
        assert!(close(c.visual(&id("a")).unwrap().transform.translate_x, 0.25));
    }

    #[test]
    fn gesture_is_abandoned_when_top_changes() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a", "b"]));
        c.set_gesture_progress(Some(0.3));
        let report = c.sync(&acts(&["a"]));
        assert!(report.gesture_abandoned);
        assert_eq!(c.gesture_progress(), None);
        assert_eq!(c.visual(&id("a")).unwrap().z_index, 1000);
    }

    #[test]
    fn transition_descriptor_drives_cards() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a", "b"]));

        c.set_transition(Some(TransitionDescriptor::new(Direction::Back, 0.5)));
        assert!(close(c.visual(&id("b")).unwrap().transform.translate_x, 0.5));
        assert!(close(c.visual(&id("a")).unwrap().transform.scale, 0.99));

        c.set_transition(Some(TransitionDescriptor::new(Direction::Forward, 0.25)));
        assert!(close(c.visual(&id("b")).unwrap().transform.translate_x, 0.75));
        assert!(close(c.visual(&id("a")).unwrap().transform.scale, 0.985));

        c.set_transition(None);
        assert_eq!(
            c.visual(&id("b")).unwrap().transform,
            CardTransform::RESTING
        );
    }

    #[test]
    fn detached_surface_is_skipped() {
        let mut c = controller(StackConfig::default());
        c.backend_mut().detached.insert(id("b"));
        c.sync(&acts(&["a", "b"]));
        assert!(c.visual(&id("b")).is_none());
        assert!(c.visual(&id("a")).is_some());
    }

    #[test]
    fn backend_failure_is_isolated() {
        let mut c = controller(StackConfig::default());
        c.backend_mut().failing.insert(id("a"));
        c.sync(&acts(&["a", "b", "c"]));
        assert!(c.visual(&id("a")).is_none());
        assert!(c.visual(&id("b")).is_some());
        assert!(c.visual(&id("c")).is_some());

        // Retried once the backend recovers.
        c.backend_mut().failing.clear();
        c.sync(&acts(&["a", "b", "c"]));
        assert!(c.visual(&id("a")).is_some());
    }

    #[test]
    fn clear_unmounts_everything() {
        let mut c = controller(StackConfig::default());
        c.sync(&acts(&["a", "b"]));
        c.clear();
        assert_eq!(c.mounted_ids().count(), 0);
        assert_eq!(c.backend().unmounts().len(), 2);
        // A fresh first sync does not animate.
        c.sync(&acts(&["a", "b"]));
        assert_eq!(c.entering(), None);
    }

    #[test]
    fn rejects_bad_config() {
        let config = StackConfig {
            edge_z: 0,
            ..StackConfig::default()
        };
        assert!(CardController::new(config, Recording::default()).is_err());
    }
}
