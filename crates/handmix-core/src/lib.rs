//! Handmix Core Library
//!
//! Turns an intermittent two-hand landmark stream into predicted hand
//! positions, and drives gesture-controlled sliders, dials, buttons and
//! draggable points from them.
//!
//! Data flows one way:
//! perception frame → [`DualHandTracker::ingest`] → per-hand [`HandBuffer`]s
//! → [`DualHandTracker::two_hands_state`] on each render tick
//! → [`ControlPanel::evaluate`] → value callbacks and [`Primitive`]s.

pub mod clock;
pub mod config;
pub mod controls;
pub mod layout;
pub mod panel;
pub mod pointer;
pub mod signal;
pub mod tracker;
pub mod viewport;

pub use clock::MonotonicClock;
pub use config::{ConfigError, ConfigResult, ControlSettings, HandmixConfig};
pub use controls::{
    Button, Control, ControlId, ControlValue, DraggablePoint, GrabEvent, GrabState, HotZone,
    OnRelease, Primitive, PrimitiveShape, Slider, Wheel,
};
pub use layout::{ControlSpec, default_mixer_layout};
pub use panel::ControlPanel;
pub use pointer::{PointerEvent, PointerInput};
pub use signal::{ExtrapolationParams, ExtrapolationPolicy, HandBuffer, Observation};
pub use tracker::{
    DualHandTracker, FrameError, FrameResult, Hand, HandReading, TrackerConfig, TwoHandsState,
};
pub use viewport::Viewport;
