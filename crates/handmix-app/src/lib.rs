//! Handmix host application.
//!
//! Stands in for the camera, audio and render sides: perception frames come
//! in as JSON lines, control values go out through the log.

pub mod app;
pub mod source;

pub use app::{App, AppError, AppResult, TICK, run};
pub use source::{DEFAULT_FRAME_INTERVAL_MS, FrameSource, Pacing, StampedFrame};
