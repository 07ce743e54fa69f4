// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge swipe state machine.

use kurbo::{Point, Rect, Size};

use crate::capture::{PointerCapture, PointerId};
use crate::{ConfigError, SwipeConfig, SwipeEdge};

/// Whether a swipe is in progress.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SwipePhase {
    /// No pointer captured.
    Idle,
    /// A pointer is captured and driving progress.
    Tracking,
}

/// How a released swipe resolves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Far enough: dismiss the top card.
    Commit,
    /// Not far enough: return the cards to rest.
    Cancel,
}

/// Outcome of a released swipe.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwipeEnd {
    /// Commit or cancel.
    pub resolution: Resolution,
    /// Pointer whose capture should now be released by the host.
    pub pointer: PointerId,
    /// Final signed travel toward the trailing edge, in logical pixels.
    pub travel: f64,
}

/// Tracks one edge swipe at a time.
#[derive(Clone, Debug)]
pub struct EdgeSwipe {
    config: SwipeConfig,
    viewport: Size,
    capture: Option<PointerCapture>,
    progress: f64,
}

impl EdgeSwipe {
    /// Creates an idle tracker with a zero viewport.
    ///
    /// Call [`EdgeSwipe::set_viewport`] before feeding events; nothing is
    /// tracked while the viewport has no width.
    pub fn new(config: SwipeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            viewport: Size::ZERO,
            capture: None,
            progress: 0.0,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Sets the viewport size in logical pixels.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// The current viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The strip along the leading edge where a swipe may start.
    #[must_use]
    pub fn hotzone(&self) -> Rect {
        let width = self.config.edge_width.min(self.viewport.width).max(0.0);
        match self.config.edge {
            SwipeEdge::Left => Rect::new(0.0, 0.0, width, self.viewport.height),
            SwipeEdge::Right => Rect::new(
                self.viewport.width - width,
                0.0,
                self.viewport.width,
                self.viewport.height,
            ),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SwipePhase {
        if self.capture.is_some() {
            SwipePhase::Tracking
        } else {
            SwipePhase::Idle
        }
    }

    /// Returns `true` while a pointer is captured.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.capture.is_some()
    }

    /// Normalized progress in `[0, 1]`; zero when idle.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// The pointer currently captured, if any.
    #[must_use]
    pub fn captured_pointer(&self) -> Option<PointerId> {
        self.capture.map(|c| c.pointer())
    }

    /// Handles pointer-down. Returns `true` if a swipe started and `pointer`
    /// should be captured by the host.
    ///
    /// Ignored while already tracking, outside the hotzone, or with a
    /// zero-width viewport.
    pub fn pointer_down(&mut self, pointer: PointerId, pos: Point) -> bool {
        if self.capture.is_some() || self.viewport.width <= 0.0 {
            return false;
        }
        if !self.hotzone().contains(pos) {
            return false;
        }
        self.capture = Some(PointerCapture::new(pointer, pos));
        self.progress = 0.0;
        true
    }

    /// Handles pointer-move. Returns the new progress if the event belongs to
    /// the tracked swipe.
    pub fn pointer_move(&mut self, pointer: PointerId, pos: Point) -> Option<f64> {
        let capture = self.capture.as_mut().filter(|c| c.owns(pointer))?;
        capture.track(pos);
        let travel = travel_toward_trailing(self.config.edge, capture);
        self.progress = progress_for(&self.config, self.viewport, travel);
        Some(self.progress)
    }

    /// Handles pointer-up. Resolves the swipe if the event belongs to it.
    pub fn pointer_up(&mut self, pointer: PointerId, pos: Point) -> Option<SwipeEnd> {
        let capture = self.capture.as_mut().filter(|c| c.owns(pointer))?;
        capture.track(pos);
        self.release()
    }

    /// Handles pointer-cancel. Resolves the swipe from the last known position.
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Option<SwipeEnd> {
        self.capture.filter(|c| c.owns(pointer))?;
        self.release()
    }

    /// Drops the swipe without resolving it, for example because the card it
    /// was dragging went away. Returns the pointer to release, if any.
    pub fn abandon(&mut self) -> Option<PointerId> {
        self.progress = 0.0;
        self.capture.take().map(|c| c.pointer())
    }

    fn release(&mut self) -> Option<SwipeEnd> {
        let capture = self.capture.take()?;
        let travel = travel_toward_trailing(self.config.edge, &capture);
        let threshold = self.viewport.width * self.config.commit_fraction;
        let resolution = if self.viewport.width > 0.0 && travel > threshold {
            Resolution::Commit
        } else {
            Resolution::Cancel
        };
        // A commit hands off to the pop; a cancel snaps back to rest.
        self.progress = 0.0;
        Some(SwipeEnd {
            resolution,
            pointer: capture.pointer(),
            travel,
        })
    }
}

/// Signed horizontal travel toward the trailing edge.
fn travel_toward_trailing(edge: SwipeEdge, capture: &PointerCapture) -> f64 {
    let dx = capture.offset().x;
    match edge {
        SwipeEdge::Left => dx,
        SwipeEdge::Right => -dx,
    }
}

fn progress_for(config: &SwipeConfig, viewport: Size, travel: f64) -> f64 {
    let full = viewport.width * config.distance_fraction;
    if full <= 0.0 {
        return 0.0;
    }
    (travel.max(0.0) / full).min(1.0)
}
