// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer capture: one pointer, its start position, and its latest position.
//!
//! A [`PointerCapture`] is created on pointer-down and owns that pointer until
//! it is released. Events from any other pointer are not its business.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use cardstack_gesture::{PointerCapture, PointerId};
//!
//! let mut capture = PointerCapture::new(PointerId(7), Point::new(10.0, 20.0));
//! assert!(capture.owns(PointerId(7)));
//! assert!(!capture.owns(PointerId(8)));
//!
//! capture.track(Point::new(15.0, 25.0));
//! assert_eq!(capture.offset(), Vec2::new(5.0, 5.0));
//! ```

use kurbo::{Point, Vec2};

/// Host-assigned identifier of a pointer (finger, pen, mouse).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// A captured pointer and the positions it has reported.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerCapture {
    pointer: PointerId,
    start: Point,
    last: Point,
}

impl PointerCapture {
    /// Captures `pointer` at `start`.
    #[must_use]
    pub fn new(pointer: PointerId, start: Point) -> Self {
        Self {
            pointer,
            start,
            last: start,
        }
    }

    /// The captured pointer.
    #[must_use]
    pub fn pointer(&self) -> PointerId {
        self.pointer
    }

    /// Returns `true` if events from `pointer` belong to this capture.
    #[must_use]
    pub fn owns(&self, pointer: PointerId) -> bool {
        self.pointer == pointer
    }

    /// Position at capture time.
    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Most recent position.
    #[must_use]
    pub fn last(&self) -> Point {
        self.last
    }

    /// Records a new position and returns the movement since the previous one.
    pub fn track(&mut self, pos: Point) -> Vec2 {
        let delta = pos - self.last;
        self.last = pos;
        delta
    }

    /// Total movement from the start position to the most recent one.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.last - self.start
    }
}
