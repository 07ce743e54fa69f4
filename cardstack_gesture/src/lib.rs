// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cardstack Gesture: the edge swipe that dismisses the top card.
//!
//! [`EdgeSwipe`] is a small state machine turning raw pointer input on a
//! screen edge into a normalized progress value and, on release, a
//! [`Resolution`]:
//!
//! - **Idle → tracking** on pointer-down inside the [hotzone](EdgeSwipe::hotzone),
//!   a thin strip along the leading edge. The pointer is captured so later
//!   moves and the release are delivered even outside the strip.
//! - **Tracking**: each move from the captured pointer updates
//!   `progress = clamp(0, 1, max(0, dx) / (viewport_width * distance_fraction))`.
//! - **Release** (up or cancel): commit if `dx > viewport_width * commit_fraction`,
//!   otherwise cancel. Capture is released and the tracker is idle again.
//!
//! There is no separate settling state to drive: the resolution is decided
//! synchronously, and the card's return to rest is left to the renderer's own
//! transition once progress drops back to zero.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use cardstack_gesture::{EdgeSwipe, PointerId, Resolution, SwipeConfig};
//!
//! let mut swipe = EdgeSwipe::new(SwipeConfig::default()).unwrap();
//! swipe.set_viewport(Size::new(1000.0, 800.0));
//!
//! let finger = PointerId(1);
//! assert!(swipe.pointer_down(finger, Point::new(10.0, 400.0)));
//!
//! // 40% of the width is a full swipe: 200px is halfway.
//! assert_eq!(swipe.pointer_move(finger, Point::new(210.0, 400.0)), Some(0.5));
//!
//! // Past 20% of the width on release: commit.
//! let end = swipe.pointer_up(finger, Point::new(260.0, 400.0)).unwrap();
//! assert_eq!(end.resolution, Resolution::Commit);
//! assert!(!swipe.is_tracking());
//! ```
//!
//! Stray events (moves or releases without a preceding down, or from a pointer
//! other than the captured one) are ignored, as is a second pointer-down while
//! a swipe is already tracking.
//!
//! This crate is `no_std` compatible.

#![no_std]

mod capture;
mod swipe;

pub use capture::{PointerCapture, PointerId};
pub use swipe::{EdgeSwipe, Resolution, SwipeEnd, SwipePhase};

/// Which screen edge back navigation originates from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SwipeEdge {
    /// Left edge; swipes travel rightward. Left-to-right layouts.
    #[default]
    Left,
    /// Right edge; swipes travel leftward. Right-to-left layouts.
    Right,
}

/// Geometry and thresholds of an [`EdgeSwipe`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwipeConfig {
    /// Edge the hotzone sits on.
    pub edge: SwipeEdge,
    /// Width of the hotzone strip in logical pixels.
    pub edge_width: f64,
    /// Fraction of the viewport width that counts as a full swipe.
    pub distance_fraction: f64,
    /// Fraction of the viewport width past which a release commits.
    pub commit_fraction: f64,
}

impl SwipeConfig {
    /// Default hotzone width.
    pub const DEFAULT_EDGE_WIDTH: f64 = 32.0;
    /// Default full-swipe distance as a fraction of viewport width.
    pub const DEFAULT_DISTANCE_FRACTION: f64 = 0.4;
    /// Default commit threshold as a fraction of viewport width.
    pub const DEFAULT_COMMIT_FRACTION: f64 = 0.2;

    /// Checks that every length and fraction is positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.edge_width) {
            return Err(ConfigError::EdgeWidth(self.edge_width));
        }
        if !is_positive(self.distance_fraction) {
            return Err(ConfigError::DistanceFraction(self.distance_fraction));
        }
        if !is_positive(self.commit_fraction) {
            return Err(ConfigError::CommitFraction(self.commit_fraction));
        }
        Ok(())
    }
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            edge: SwipeEdge::Left,
            edge_width: Self::DEFAULT_EDGE_WIDTH,
            distance_fraction: Self::DEFAULT_DISTANCE_FRACTION,
            commit_fraction: Self::DEFAULT_COMMIT_FRACTION,
        }
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Invalid [`SwipeConfig`] values.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The hotzone width is not a positive finite length.
    #[error("edge width must be positive and finite, got {0}")]
    EdgeWidth(f64),
    /// The full-swipe distance fraction is not positive and finite.
    #[error("distance fraction must be positive and finite, got {0}")]
    DistanceFraction(f64),
    /// The commit fraction is not positive and finite.
    #[error("commit fraction must be positive and finite, got {0}")]
    CommitFraction(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SwipeConfig::default().validate(), Ok(()));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cfg = SwipeConfig {
            edge_width: 0.0,
            ..SwipeConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EdgeWidth(0.0)));

        let cfg = SwipeConfig {
            distance_fraction: f64::INFINITY,
            ..SwipeConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DistanceFraction(_))
        ));

        let cfg = SwipeConfig {
            commit_fraction: -0.1,
            ..SwipeConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::CommitFraction(-0.1)));
    }
}
