//! Configuration loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controls::{DEFAULT_DRAG, DEFAULT_FIST_LABEL};
use crate::layout::ControlSpec;
use crate::signal::ExtrapolationPolicy;
use crate::tracker::TrackerConfig;
use crate::viewport::Viewport;

/// Largest per-hand history worth keeping; prediction uses at most three.
pub const MAX_CAPACITY: usize = 16;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings shared by every control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Per-evaluation interpolation factor toward the hand-driven target.
    pub drag: f64,
    /// Keep one hand from holding two controls.
    pub exclusive_hands: bool,
    /// Gesture label that grabs.
    pub fist_label: String,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            drag: DEFAULT_DRAG,
            exclusive_hands: false,
            fist_label: DEFAULT_FIST_LABEL.to_string(),
        }
    }
}

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandmixConfig {
    pub tracker: TrackerConfig,
    pub controls: ControlSettings,
    pub viewport: Viewport,
    /// Controls to build; empty means the default mixer layout.
    pub layout: Vec<ControlSpec>,
}

impl HandmixConfig {
    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject values the tracker or controls cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        let tracker = &self.tracker;
        if !(1..=MAX_CAPACITY).contains(&tracker.capacity) {
            return Err(ConfigError::Invalid(format!(
                "tracker.capacity must be in 1..={}, got {}",
                MAX_CAPACITY, tracker.capacity
            )));
        }
        let extrapolation = &tracker.extrapolation;
        if extrapolation.policy == ExtrapolationPolicy::Ema
            && !(extrapolation.ema_alpha > 0.0 && extrapolation.ema_alpha <= 1.0)
        {
            return Err(ConfigError::Invalid(format!(
                "tracker.ema_alpha must be in (0, 1], got {}",
                extrapolation.ema_alpha
            )));
        }
        if !(extrapolation.max_acceleration >= 0.0 && extrapolation.max_acceleration.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "tracker.max_acceleration must be finite and non-negative, got {}",
                extrapolation.max_acceleration
            )));
        }
        if !(self.controls.drag > 0.0 && self.controls.drag <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "controls.drag must be in (0, 1], got {}",
                self.controls.drag
            )));
        }
        if self.controls.fist_label.is_empty() {
            return Err(ConfigError::Invalid("controls.fist_label must not be empty".to_string()));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport must have a positive size, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        Ok(())
    }

    /// The configured layout, or the default mixer when none is given.
    pub fn layout_or_default(&self) -> Vec<ControlSpec> {
        if self.layout.is_empty() {
            crate::layout::default_mixer_layout(&self.viewport)
        } else {
            self.layout.clone()
        }
    }
}
