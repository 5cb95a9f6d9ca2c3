//! Monotonic millisecond clock shared by perception ingest and rendering.

use std::sync::Arc;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Milliseconds elapsed since a shared origin.
///
/// Observation timestamps and the `now` passed to extrapolation must come
/// from the same clock. Clones share the origin, so a clone handed to the
/// perception thread stamps frames on the render loop's timeline.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Arc<Instant>,
}

impl MonotonicClock {
    /// Start a new clock at zero.
    pub fn new() -> Self {
        Self {
            origin: Arc::new(Instant::now()),
        }
    }

    /// Milliseconds since the clock was created.
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn test_clones_share_origin() {
        let clock = MonotonicClock::new();
        let other = clock.clone();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let a = clock.now_ms();
        let b = other.now_ms();
        assert!(a >= 5.0);
        assert!(b >= a);
    }
}
