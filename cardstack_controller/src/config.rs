// Copyright 2025 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller configuration.

use cardstack_policy::{RenderMode, RetainWindow};

use crate::Timing;

/// Invalid [`StackConfig`] values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Windowing configuration was rejected.
    #[error(transparent)]
    Policy(#[from] cardstack_policy::ConfigError),
    /// The gesture hotzone would not sit above the cards.
    #[error("edge z-index {edge_z} must be above base z-index {base_z}")]
    EdgeBelowCards {
        /// Configured card base.
        base_z: i32,
        /// Configured hotzone layer.
        edge_z: i32,
    },
}

/// How the controller windows and stacks cards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StackConfig {
    /// Number of most-recent activities kept awake (and mounted in unmount mode).
    pub retain_window: RetainWindow,
    /// Sleep or unmount.
    pub mode: RenderMode,
    /// Keep the root mounted below the window in unmount mode.
    pub pin_root: bool,
    /// z-index of the bottom card; each card above adds one.
    pub base_z: i32,
    /// z-index of the gesture hotzone; gesture-driven cards sit just below it.
    pub edge_z: i32,
    /// Transition timing for entrances and returns to rest.
    pub timing: Timing,
}

impl StackConfig {
    /// Default card base layer.
    pub const DEFAULT_BASE_Z: i32 = 1000;
    /// Default hotzone layer.
    pub const DEFAULT_EDGE_Z: i32 = 100_000;

    /// Checks layer ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.edge_z <= self.base_z {
            return Err(ConfigError::EdgeBelowCards {
                base_z: self.base_z,
                edge_z: self.edge_z,
            });
        }
        Ok(())
    }

    /// Convenience for building a config from a raw window length.
    pub fn with_retain(mut self, retain: usize) -> Result<Self, ConfigError> {
        self.retain_window = RetainWindow::new(retain)?;
        Ok(self)
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            retain_window: RetainWindow::DEFAULT,
            mode: RenderMode::Sleep,
            pin_root: false,
            base_z: Self::DEFAULT_BASE_Z,
            edge_z: Self::DEFAULT_EDGE_Z,
            timing: Timing::default(),
        }
    }
}
