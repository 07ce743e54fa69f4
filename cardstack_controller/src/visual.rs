// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived visual state of a single card.

use std::fmt;
use std::time::Duration;

use kurbo::{Affine, Size};

bitflags::bitflags! {
    /// Per-card state flags exposed to styling.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CardFlags: u8 {
        /// Mounted but suppressed: invisible, non-interactive, render-deferred.
        const SLEEP         = 0b0000_0001;
        /// This card is the most recent push/replace entrance.
        const ENTER         = 0b0000_0010;
        /// Style changes apply immediately instead of animating.
        const NO_TRANSITION = 0b0000_0100;
    }
}

/// Card transform relative to its resting position.
///
/// `translate_x` is a fraction of the card width toward the trailing edge;
/// `scale` is uniform about the card center.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CardTransform {
    /// Horizontal offset as a fraction of card width.
    pub translate_x: f64,
    /// Uniform scale.
    pub scale: f64,
}

impl CardTransform {
    /// At rest.
    pub const RESTING: Self = Self {
        translate_x: 0.0,
        scale: 1.0,
    };

    /// Fully off-screen past the trailing edge.
    pub const OFFSCREEN: Self = Self {
        translate_x: 1.0,
        scale: 1.0,
    };

    /// Translated by `fraction` of the card width.
    #[must_use]
    pub const fn translate(fraction: f64) -> Self {
        Self {
            translate_x: fraction,
            scale: 1.0,
        }
    }

    /// Scaled about the card center.
    #[must_use]
    pub const fn scaled(scale: f64) -> Self {
        Self {
            translate_x: 0.0,
            scale,
        }
    }

    /// Resolves to an affine transform for a card of `size`.
    #[must_use]
    pub fn to_affine(self, size: Size) -> Affine {
        let center = (size.width * 0.5, size.height * 0.5);
        Affine::translate((self.translate_x * size.width, 0.0)) * Affine::scale_about(self.scale, center)
    }

    /// CSS `transform` value, e.g. `translate3d(100%,0,0)`.
    #[must_use]
    pub fn to_css(self) -> String {
        let translate = format!("translate3d({}%,0,0)", self.translate_x * 100.0);
        if self.scale == 1.0 {
            translate
        } else if self.translate_x == 0.0 {
            format!("scale({})", self.scale)
        } else {
            format!("{translate} scale({})", self.scale)
        }
    }
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::RESTING
    }
}

/// Cubic Bézier timing curve with fixed end points `(0,0)` and `(1,1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Easing {
    /// First control point.
    pub p1: (f64, f64),
    /// Second control point.
    pub p2: (f64, f64),
}

impl Easing {
    /// Ease-out curve used for card entrances.
    pub const EASE_OUT: Self = Self {
        p1: (0.22, 0.61),
        p2: (0.36, 1.0),
    };
}

impl Default for Easing {
    fn default() -> Self {
        Self::EASE_OUT
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cubic-bezier({},{},{},{})",
            self.p1.0, self.p1.1, self.p2.0, self.p2.1
        )
    }
}

/// How style changes on a card animate when transitions are enabled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Timing {
    /// Transition duration.
    pub duration: Duration,
    /// Timing curve.
    pub easing: Easing,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(260),
            easing: Easing::EASE_OUT,
        }
    }
}

/// Everything a backend needs to present one card.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CardVisual {
    /// Stacking order; higher is on top.
    pub z_index: i32,
    /// Transform relative to rest.
    pub transform: CardTransform,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// State flags.
    pub flags: CardFlags,
    /// Transition timing used unless [`CardFlags::NO_TRANSITION`] is set.
    pub timing: Timing,
}

impl CardVisual {
    /// Resting, opaque, awake card at `z_index`.
    #[must_use]
    pub fn resting(z_index: i32, timing: Timing) -> Self {
        Self {
            z_index,
            transform: CardTransform::RESTING,
            opacity: 1.0,
            flags: CardFlags::empty(),
            timing,
        }
    }

    /// Returns `true` unless the card is asleep.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !self.flags.contains(CardFlags::SLEEP)
    }

    /// The timing to animate with, or `None` when changes apply immediately.
    #[must_use]
    pub fn transition(&self) -> Option<Timing> {
        (!self.flags.contains(CardFlags::NO_TRANSITION)).then_some(self.timing)
    }

    /// Stable attribute hooks for styling tools, keyed by card id and state.
    #[must_use]
    pub fn style_hooks(&self, id: &str) -> [(&'static str, String); 4] {
        let flag = |f: CardFlags| String::from(if self.flags.contains(f) { "true" } else { "false" });
        [
            (ATTR_ACTIVITY_ID, id.to_owned()),
            (ATTR_SLEEP, flag(CardFlags::SLEEP)),
            (ATTR_ENTER, flag(CardFlags::ENTER)),
            (ATTR_NO_TRANSITION, flag(CardFlags::NO_TRANSITION)),
        ]
    }
}

/// Attribute carrying the owning activity id.
pub const ATTR_ACTIVITY_ID: &str = "data-sf-activity-id";
/// Attribute reflecting [`CardFlags::SLEEP`].
pub const ATTR_SLEEP: &str = "data-sleep";
/// Attribute reflecting [`CardFlags::ENTER`].
pub const ATTR_ENTER: &str = "data-enter";
/// Attribute reflecting [`CardFlags::NO_TRANSITION`].
pub const ATTR_NO_TRANSITION: &str = "data-notrans";

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn css_formats() {
        assert_eq!(CardTransform::OFFSCREEN.to_css(), "translate3d(100%,0,0)");
        assert_eq!(CardTransform::RESTING.to_css(), "translate3d(0%,0,0)");
        assert_eq!(CardTransform::scaled(0.5).to_css(), "scale(0.5)");
        assert_eq!(
            Easing::EASE_OUT.to_string(),
            "cubic-bezier(0.22,0.61,0.36,1)"
        );
    }

    #[test]
    fn affine_moves_by_card_width() {
        let size = Size::new(400.0, 800.0);
        let a = CardTransform::translate(0.5).to_affine(size);
        assert_eq!(a * Point::new(0.0, 0.0), Point::new(200.0, 0.0));

        let s = CardTransform::scaled(0.5).to_affine(size);
        assert_eq!(s * Point::new(200.0, 400.0), Point::new(200.0, 400.0));
    }

    #[test]
    fn style_hooks_reflect_flags() {
        let mut v = CardVisual::resting(1000, Timing::default());
        v.flags = CardFlags::SLEEP | CardFlags::NO_TRANSITION;
        let hooks = v.style_hooks("abc");
        assert_eq!(hooks[0], (ATTR_ACTIVITY_ID, String::from("abc")));
        assert_eq!(hooks[1].1, "true");
        assert_eq!(hooks[2].1, "false");
        assert_eq!(hooks[3].1, "true");
        assert!(!v.is_interactive());
        assert_eq!(v.transition(), None);
    }
}
