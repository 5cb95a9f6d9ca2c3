//! Per-hand signal history and position prediction.
//!
//! Perception results arrive late and irregularly. A [`HandBuffer`] keeps the
//! last few observations of one hand and predicts where the hand is *now*,
//! so controls react to the hand rather than to a frame that is already
//! tens of milliseconds old.

mod buffer;
mod extrapolation;

pub use buffer::{HandBuffer, DEFAULT_CAPACITY};
pub use extrapolation::{
    EmaState, extrapolate_linear, extrapolate_quadratic, DEFAULT_EMA_ALPHA,
    DEFAULT_MAX_ACCELERATION,
};

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// One perception sample for one hand.
///
/// Immutable once created. `position` is in normalized image space
/// (each axis in [0, 1]); `gesture` is the opaque top-ranked label, empty
/// when the recognizer produced none.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    position: Option<Point>,
    gesture: String,
    timestamp: f64,
}

impl Observation {
    /// Create an observation stamped at `timestamp` (monotonic ms).
    pub fn new(position: Option<Point>, gesture: impl Into<String>, timestamp: f64) -> Self {
        Self {
            position,
            gesture: gesture.into(),
            timestamp,
        }
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn gesture(&self) -> &str {
        &self.gesture
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// How a buffer turns its history into a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationPolicy {
    /// Linear from two samples, clamped quadratic from three or more.
    Kinematic,
    /// Linear from an exponentially smoothed position and velocity.
    #[default]
    Ema,
}

/// Tuning shared by every buffer of a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrapolationParams {
    pub policy: ExtrapolationPolicy,
    /// Smoothing factor for the EMA policy (weight of the newest sample).
    pub ema_alpha: f64,
    /// Acceleration ceiling for the kinematic policy, normalized units / ms².
    pub max_acceleration: f64,
}

impl Default for ExtrapolationParams {
    fn default() -> Self {
        Self {
            policy: ExtrapolationPolicy::default(),
            ema_alpha: DEFAULT_EMA_ALPHA,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
        }
    }
}

impl ExtrapolationParams {
    /// Params for the kinematic policy with default tuning.
    pub fn kinematic() -> Self {
        Self {
            policy: ExtrapolationPolicy::Kinematic,
            ..Self::default()
        }
    }

    /// Params for the EMA policy with default tuning.
    pub fn ema() -> Self {
        Self {
            policy: ExtrapolationPolicy::Ema,
            ..Self::default()
        }
    }
}
