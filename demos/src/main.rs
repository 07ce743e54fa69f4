// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card stack walkthrough.
//!
//! Drives a `StackStore` through push, replace, pop, and a swipe-back, and
//! prints the mounted cards after every step.
//!
//! Run:
//! - `cargo run -p cardstack_demos -- --retain 2 --mode unmount --pin-root`
//! - `RUST_LOG=cardstack=debug cargo run -p cardstack_demos`

use std::cell::RefCell;
use std::rc::Rc;

use cardstack::{
    ActionBridge, CardFlags, Params, PointerId, RenderMode, RendererConfig, StackConfig,
    StackRenderer, StackStore, View, ViewRegistry,
};
use clap::{Parser, ValueEnum};
use kurbo::{Point, Size, Vec2};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Sleep,
    Unmount,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sleep => Self::Sleep,
            Mode::Unmount => Self::Unmount,
        }
    }
}

/// Scripted card stack walkthrough.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Number of most recent cards kept awake (and mounted in unmount mode).
    #[arg(long, default_value_t = 2)]
    retain: usize,
    /// What happens to cards outside the retain window.
    #[arg(long, value_enum, default_value_t = Mode::Sleep)]
    mode: Mode,
    /// Keep the root card mounted in unmount mode.
    #[arg(long)]
    pin_root: bool,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// A page that only reports its lifecycle.
struct Page {
    title: String,
}

impl View for Page {
    fn destroy(&mut self) {
        info!(title = %self.title, "page destroyed");
    }
}

fn registry() -> ViewRegistry {
    let mut views = ViewRegistry::new();
    views.register("Home", |_| {
        Box::new(Page {
            title: String::from("Home"),
        })
    });
    views.register("Detail", |activity| {
        let ts = activity.params.get("ts").map_or("?", String::as_str);
        Box::new(Page {
            title: format!("Detail {ts}"),
        })
    });
    views
}

fn dump(step: &str, renderer: &StackRenderer) {
    println!("== {step}");
    let controller = renderer.controller();
    for activity in controller.activities() {
        let Some(card) = renderer.card(&activity.id) else {
            println!("  {:<8} (unmounted)", activity.name);
            continue;
        };
        let Some(visual) = card.visual() else {
            println!("  {:<8} (no visual)", activity.name);
            continue;
        };
        let mut state = Vec::new();
        for (flag, label) in [
            (CardFlags::SLEEP, "sleep"),
            (CardFlags::ENTER, "enter"),
            (CardFlags::NO_TRANSITION, "notrans"),
        ] {
            if visual.flags.contains(flag) {
                state.push(label);
            }
        }
        println!(
            "  {:<8} z={:<6} transform={} [{}]{}",
            activity.name,
            visual.z_index,
            visual.transform.to_css(),
            state.join(","),
            if card.is_empty() { " (empty)" } else { "" },
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let stack = StackConfig {
        mode: args.mode.into(),
        pin_root: args.pin_root,
        ..StackConfig::default()
    }
    .with_retain(args.retain)?;
    let config = RendererConfig {
        stack,
        viewport: Size::new(390.0, 844.0),
        ..RendererConfig::default()
    };

    let store = Rc::new(RefCell::new(StackStore::new("Home", Params::new())));
    let mut renderer = StackRenderer::attach(store.clone(), registry(), config)?;
    let mut bridge = ActionBridge::new();
    renderer.bind_bridge(&mut bridge);
    dump("start", &renderer);

    for ts in ["1", "2"] {
        let params = Params::from([(String::from("ts"), String::from(ts))]);
        bridge.push("Detail", params);
        renderer.pump();
        dump(&format!("push Detail {ts}"), &renderer);
        renderer.on_frame();
        dump("next frame", &renderer);
    }

    bridge.replace("Detail", Params::from([(String::from("ts"), String::from("r"))]));
    renderer.pump();
    dump("replace top", &renderer);
    renderer.on_frame();

    bridge.push("Missing", Params::new());
    renderer.pump();
    dump("push unregistered view", &renderer);
    renderer.on_frame();

    bridge.pop();
    renderer.pump();
    dump("pop", &renderer);

    let finger = PointerId(1);
    let zone = renderer.hotzone();
    let start = Point::new(zone.x0 + 4.0, zone.center().y);
    if renderer.pointer_down(finger, start) {
        for dx in [20.0, 40.0, 60.0] {
            renderer.pointer_move(finger, start + Vec2::new(dx, 0.0));
        }
        dump("swipe in progress", &renderer);
        let resolution = renderer.pointer_up(finger, start + Vec2::new(60.0, 0.0));
        info!(?resolution, "short swipe released");
        dump("after short swipe", &renderer);
    }

    if renderer.pointer_down(finger, start) {
        renderer.pointer_move(finger, start + Vec2::new(200.0, 0.0));
        let resolution = renderer.pointer_up(finger, start + Vec2::new(200.0, 0.0));
        info!(?resolution, "long swipe released");
        dump("after long swipe", &renderer);
    }

    Ok(())
}
