// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the controller and whatever actually draws cards.

use cardstack_activity::{Activity, ActivityId};

use crate::CardVisual;

/// Why a backend could not apply a visual.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// The surface is already gone (for example removed mid-frame). Treated as
    /// a no-op by the controller.
    #[error("card surface is detached")]
    Detached,
    /// Any other backend failure. Isolated to the card it happened on.
    #[error("backend failed to apply card visual: {0}")]
    Backend(String),
}

/// Creates, updates, and destroys card surfaces.
///
/// The controller calls [`mount`](Self::mount) exactly once when an activity
/// enters the mounted set and [`unmount`](Self::unmount) exactly once when it
/// leaves; the returned surface is owned by the controller's handle table in
/// between.
pub trait CardBackend {
    /// Opaque per-card handle.
    type Surface;

    /// Creates a surface for `activity`.
    fn mount(&mut self, activity: &Activity) -> Self::Surface;

    /// Destroys the surface of `id`.
    fn unmount(&mut self, id: &ActivityId, surface: Self::Surface);

    /// Presents `visual` on `surface`.
    fn apply(
        &mut self,
        id: &ActivityId,
        surface: &mut Self::Surface,
        visual: &CardVisual,
    ) -> Result<(), ApplyError>;
}
