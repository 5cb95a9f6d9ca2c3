//! Extrapolation math: predict the hand position at "now".
//!
//! Times are milliseconds, positions are normalized image coordinates.

use kurbo::{Point, Vec2};

/// Acceleration ceiling (normalized units per ms²).
///
/// Over a 30 ms horizon the quadratic term contributes at most
/// `0.5 * 3e-6 * 30²` ≈ 0.0014 of the frame.
pub const DEFAULT_MAX_ACCELERATION: f64 = 0.000003;

/// Weight of the newest sample in the EMA policy.
pub const DEFAULT_EMA_ALPHA: f64 = 0.3;

/// Predict from two samples assuming constant velocity.
///
/// Returns the newer position unchanged when `t1 <= t0`.
pub fn extrapolate_linear(p0: Point, t0: f64, p1: Point, t1: f64, now: f64) -> Point {
    let dt = t1 - t0;
    if dt <= 0.0 {
        return p1;
    }
    let velocity = (p1 - p0) / dt;
    p1 + velocity * horizon(t1, now)
}

/// Predict from three samples with velocity and clamped acceleration.
///
/// Returns the newest position unchanged when either interval is
/// non-positive.
pub fn extrapolate_quadratic(
    samples: [(Point, f64); 3],
    now: f64,
    max_acceleration: f64,
) -> Point {
    let [(p0, t0), (p1, t1), (p2, t2)] = samples;
    let dt1 = t1 - t0;
    let dt2 = t2 - t1;
    if dt1 <= 0.0 || dt2 <= 0.0 {
        return p2;
    }

    let v1 = (p1 - p0) / dt1;
    let v2 = (p2 - p1) / dt2;
    let accel = clamp_magnitude((v2 - v1) / ((dt1 + dt2) / 2.0), max_acceleration);

    let dt = horizon(t2, now);
    p2 + v2 * dt + accel * (0.5 * dt * dt)
}

/// Running exponential average of position and velocity.
///
/// Each update first carries the smoothed position forward by the smoothed
/// velocity, then blends toward the measurement. Constant-velocity motion is
/// therefore followed without lag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaState {
    /// Smoothed position.
    position: Point,
    /// Smoothed velocity (units per ms), unset until two samples are seen.
    velocity: Option<Vec2>,
    /// Last raw measurement.
    last_raw: Point,
    /// Timestamp of the last raw measurement.
    last_time: f64,
}

impl EmaState {
    /// Seed the state from a first sample.
    pub fn seed(position: Point, time: f64) -> Self {
        Self {
            position,
            velocity: None,
            last_raw: position,
            last_time: time,
        }
    }

    /// Fold in a new measurement with smoothing factor `alpha`.
    pub fn update(&mut self, position: Point, time: f64, alpha: f64) {
        let dt = time - self.last_time;
        if dt <= 0.0 {
            // Out-of-order or duplicate stamp: restart from this sample.
            *self = Self::seed(position, time);
            return;
        }

        let instantaneous = (position - self.last_raw) / dt;
        let velocity = match self.velocity {
            Some(v) => v.lerp(instantaneous, alpha),
            None => instantaneous,
        };
        let predicted = self.position + velocity * dt;

        self.position = predicted.lerp(position, alpha);
        self.velocity = Some(velocity);
        self.last_raw = position;
        self.last_time = time;
    }

    /// Predict the position at `now`.
    pub fn predict(&self, now: f64) -> Point {
        let velocity = self.velocity.unwrap_or(Vec2::ZERO);
        self.position + velocity * horizon(self.last_time, now)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity.unwrap_or(Vec2::ZERO)
    }
}

/// Prediction horizon; never extrapolate backwards in time.
fn horizon(last: f64, now: f64) -> f64 {
    (now - last).max(0.0)
}

fn clamp_magnitude(v: Vec2, max: f64) -> Vec2 {
    let mag = v.hypot();
    if mag > max && mag > 0.0 {
        v * (max / mag)
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn test_linear_two_samples() {
        let p = extrapolate_linear(
            Point::new(0.4, 0.4),
            0.0,
            Point::new(0.5, 0.5),
            100.0,
            150.0,
        );
        assert!(close(p, Point::new(0.55, 0.55)));
    }

    #[test]
    fn test_linear_degenerate_interval() {
        let p = extrapolate_linear(
            Point::new(0.4, 0.4),
            100.0,
            Point::new(0.5, 0.5),
            100.0,
            150.0,
        );
        assert!(close(p, Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_linear_no_backward_prediction() {
        let p = extrapolate_linear(
            Point::new(0.4, 0.4),
            0.0,
            Point::new(0.5, 0.5),
            100.0,
            50.0,
        );
        assert!(close(p, Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_quadratic_constant_velocity_matches_linear() {
        let samples = [
            (Point::new(0.3, 0.3), 0.0),
            (Point::new(0.4, 0.4), 100.0),
            (Point::new(0.5, 0.5), 200.0),
        ];
        let p = extrapolate_quadratic(samples, 250.0, DEFAULT_MAX_ACCELERATION);
        assert!(close(p, Point::new(0.55, 0.55)));
    }

    #[test]
    fn test_quadratic_small_acceleration_unclamped() {
        // v1 = 0.001/ms, v2 = 0.0011/ms, a = 1e-6/ms² (below ceiling).
        let samples = [
            (Point::new(0.0, 0.5), 0.0),
            (Point::new(0.1, 0.5), 100.0),
            (Point::new(0.21, 0.5), 200.0),
        ];
        let p = extrapolate_quadratic(samples, 230.0, DEFAULT_MAX_ACCELERATION);
        let expected = 0.21 + 0.0011 * 30.0 + 0.5 * 1e-6 * 900.0;
        assert!((p.x - expected).abs() < EPS);
        assert!((p.y - 0.5).abs() < EPS);
    }

    #[test]
    fn test_quadratic_clamps_acceleration_spike() {
        // A jittery reversal: huge acceleration that must be capped.
        let samples = [
            (Point::new(0.5, 0.5), 0.0),
            (Point::new(0.6, 0.5), 10.0),
            (Point::new(0.5, 0.5), 20.0),
        ];
        let now = 50.0;
        let p = extrapolate_quadratic(samples, now, DEFAULT_MAX_ACCELERATION);

        let v2 = -0.01;
        let linear_only = 0.5 + v2 * 30.0;
        let max_quad = 0.5 * DEFAULT_MAX_ACCELERATION * 30.0 * 30.0;
        assert!((p.x - linear_only).abs() <= max_quad + EPS);
    }

    #[test]
    fn test_quadratic_degenerate_interval() {
        let samples = [
            (Point::new(0.1, 0.1), 0.0),
            (Point::new(0.2, 0.2), 0.0),
            (Point::new(0.3, 0.3), 10.0),
        ];
        let p = extrapolate_quadratic(samples, 40.0, DEFAULT_MAX_ACCELERATION);
        assert!(close(p, Point::new(0.3, 0.3)));
    }

    #[test]
    fn test_ema_seed_predicts_in_place() {
        let state = EmaState::seed(Point::new(0.5, 0.5), 0.0);
        assert!(close(state.predict(500.0), Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_ema_tracks_constant_velocity_without_lag() {
        let mut state = EmaState::seed(Point::new(0.4, 0.4), 0.0);
        state.update(Point::new(0.5, 0.5), 100.0, DEFAULT_EMA_ALPHA);
        assert!(close(state.predict(150.0), Point::new(0.55, 0.55)));

        state.update(Point::new(0.6, 0.6), 200.0, DEFAULT_EMA_ALPHA);
        assert!(close(state.position(), Point::new(0.6, 0.6)));
        assert!(close(state.predict(250.0), Point::new(0.65, 0.65)));
    }

    #[test]
    fn test_ema_damps_single_spike() {
        let mut state = EmaState::seed(Point::new(0.5, 0.5), 0.0);
        state.update(Point::new(0.5, 0.5), 33.0, DEFAULT_EMA_ALPHA);
        state.update(Point::new(0.5, 0.5), 66.0, DEFAULT_EMA_ALPHA);
        state.update(Point::new(0.6, 0.5), 99.0, DEFAULT_EMA_ALPHA);
        // Smoothed position moves only part of the way toward the spike.
        assert!(state.position().x > 0.5);
        assert!(state.position().x < 0.6);
    }

    #[test]
    fn test_ema_reseeds_on_non_monotonic_time() {
        let mut state = EmaState::seed(Point::new(0.1, 0.1), 100.0);
        state.update(Point::new(0.2, 0.2), 200.0, DEFAULT_EMA_ALPHA);
        state.update(Point::new(0.9, 0.9), 150.0, DEFAULT_EMA_ALPHA);
        assert!(close(state.position(), Point::new(0.9, 0.9)));
        assert_eq!(state.velocity(), Vec2::ZERO);
    }
}
