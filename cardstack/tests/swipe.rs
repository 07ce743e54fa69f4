// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for swipe-back through `StackRenderer`.
//!
//! The viewport is 1000 logical pixels wide, so with default settings a
//! 200 px drag is half way and anything past 200 px on release commits.

use std::cell::RefCell;
use std::rc::Rc;

use cardstack::{
    ActivityId, CardTransform, Params, PointerId, RendererConfig, Resolution, StackRenderer,
    StackStore, View, ViewRegistry,
};
use kurbo::{Point, Size};

struct Page;
impl View for Page {}

const FINGER: PointerId = PointerId(1);

fn setup(depth: usize) -> (Rc<RefCell<StackStore>>, StackRenderer, Vec<ActivityId>) {
    let mut views = ViewRegistry::new();
    views.register("Page", |_| Box::new(Page));
    let store = Rc::new(RefCell::new(StackStore::new("Page", Params::new())));
    let config = RendererConfig {
        viewport: Size::new(1000.0, 800.0),
        ..RendererConfig::default()
    };
    let mut renderer = StackRenderer::attach(store.clone(), views, config).unwrap();
    for _ in 1..depth {
        store.borrow_mut().push("Page", Params::new());
    }
    renderer.pump();
    renderer.on_frame();
    let ids = store
        .borrow()
        .activities()
        .iter()
        .map(|a| a.id.clone())
        .collect();
    (store, renderer, ids)
}

fn at(x: f64) -> Point {
    Point::new(x, 300.0)
}

#[test]
fn drag_drives_top_and_previous() {
    let (_, mut renderer, ids) = setup(2);
    assert!(renderer.pointer_down(FINGER, at(10.0)));
    assert_eq!(renderer.pointer_move(FINGER, at(210.0)), Some(0.5));

    let top = renderer.card(&ids[1]).unwrap().visual().unwrap();
    assert_eq!(top.z_index, renderer.hotzone_z() - 1);
    assert!((top.transform.translate_x - 0.5).abs() < 1e-9);
    assert!(top.transition().is_none());

    let prev = renderer.card(&ids[0]).unwrap().visual().unwrap();
    assert_eq!(prev.z_index, renderer.hotzone_z() - 2);
    assert!((prev.transform.scale - 0.99).abs() < 1e-9);

    assert_eq!(renderer.pointer_move(FINGER, at(900.0)), Some(1.0));
}

#[test]
fn release_past_threshold_pops() {
    let (store, mut renderer, ids) = setup(2);
    renderer.pointer_down(FINGER, at(10.0));
    renderer.pointer_move(FINGER, at(200.0));
    assert_eq!(
        renderer.pointer_up(FINGER, at(260.0)),
        Some(Resolution::Commit)
    );

    assert_eq!(store.borrow().activities().len(), 1);
    assert!(renderer.card(&ids[1]).is_none());
    let root = renderer.card(&ids[0]).unwrap().visual().unwrap();
    assert_eq!(root.z_index, 1000);
    assert_eq!(root.transform, CardTransform::RESTING);
    assert_eq!(renderer.controller().gesture_progress(), None);
}

#[test]
fn short_release_snaps_back() {
    let (store, mut renderer, ids) = setup(2);
    renderer.pointer_down(FINGER, at(10.0));
    renderer.pointer_move(FINGER, at(100.0));
    assert_eq!(
        renderer.pointer_up(FINGER, at(160.0)),
        Some(Resolution::Cancel)
    );

    assert_eq!(store.borrow().activities().len(), 2);
    let top = renderer.card(&ids[1]).unwrap().visual().unwrap();
    assert_eq!(top.z_index, 1001);
    assert_eq!(top.transform, CardTransform::RESTING);
    assert!(top.transition().is_some(), "animates back to rest");
}

#[test]
fn platform_cancel_resolves_from_last_position() {
    let (store, mut renderer, _) = setup(3);
    renderer.pointer_down(FINGER, at(5.0));
    renderer.pointer_move(FINGER, at(400.0));
    assert_eq!(renderer.pointer_cancel(FINGER), Some(Resolution::Commit));
    assert_eq!(store.borrow().activities().len(), 2);
}

#[test]
fn nothing_to_go_back_to() {
    let (_, mut renderer, _) = setup(1);
    assert!(!renderer.pointer_down(FINGER, at(10.0)));
    assert_eq!(renderer.pointer_up(FINGER, at(500.0)), None);
}

#[test]
fn stray_and_outside_pointers_are_ignored() {
    let (store, mut renderer, _) = setup(2);
    assert_eq!(renderer.pointer_move(FINGER, at(300.0)), None);
    assert!(!renderer.pointer_down(FINGER, at(500.0)), "outside hotzone");

    assert!(renderer.pointer_down(FINGER, at(10.0)));
    assert!(!renderer.pointer_down(PointerId(2), at(12.0)));
    assert_eq!(renderer.pointer_move(PointerId(2), at(600.0)), None);
    assert_eq!(renderer.pointer_up(PointerId(2), at(600.0)), None);
    assert_eq!(store.borrow().activities().len(), 2);
}

#[test]
fn hotzone_sits_on_the_leading_edge_above_cards() {
    let (_, renderer, _) = setup(1);
    let zone = renderer.hotzone();
    assert_eq!(zone.x0, 0.0);
    assert_eq!(zone.width(), 32.0);
    assert_eq!(zone.height(), 800.0);
    assert_eq!(renderer.hotzone_z(), 100_000);
}

#[test]
fn external_pop_mid_swipe_abandons_it() {
    let (store, mut renderer, _) = setup(2);
    renderer.pointer_down(FINGER, at(10.0));
    renderer.pointer_move(FINGER, at(110.0));
    store.borrow_mut().pop();
    renderer.pump();

    assert_eq!(renderer.controller().gesture_progress(), None);
    assert_eq!(renderer.pointer_up(FINGER, at(500.0)), None);
    assert_eq!(store.borrow().activities().len(), 1);
}
