//! Rotary dial with multi-revolution tracking.

use std::f64::consts::{PI, TAU};

use kurbo::{Circle, Point, Vec2};
use uuid::Uuid;

use crate::tracker::TwoHandsState;

use super::{
    Control, ControlId, ControlValue, DEFAULT_DRAG, GrabEvent, GrabState, HotZone, OnRelease,
    Primitive, PrimitiveShape, ValueCallback, lerp, outline_width, palette,
};

/// Hands closer than this to the center have no usable angle.
const MIN_ANGLE_RADIUS: f64 = 1e-6;

/// Angular ranges narrower than this cannot be mapped to a fill.
const MIN_RANGE: f64 = 1e-9;

/// Signed difference `to - from`, wrapped to (-π, π].
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(TAU);
    if delta > PI { delta - TAU } else { delta }
}

/// A ring the owning hand turns around its center.
///
/// Angles are measured clockwise from straight up, in [0, 2π). Rotation is
/// accumulated frame by frame along the shortest path, so turning past the
/// top of the dial or through several revolutions never jumps. A full turn
/// of `end_angle - start_angle` sweeps the fill from 0 to 1.
pub struct Wheel {
    id: ControlId,
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    fill: f64,
    start_angle: f64,
    end_angle: f64,
    drag: f64,
    grab: GrabState,
    last_angle: Option<f64>,
    grab_start_fill: f64,
    accumulated_rotation: f64,
    release: OnRelease<f64>,
    on_change: Option<ValueCallback<f64>>,
}

impl Wheel {
    pub fn new(center: Point, inner_radius: f64, outer_radius: f64, fill: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            inner_radius,
            outer_radius,
            fill: fill.clamp(0.0, 1.0),
            start_angle: 0.0,
            end_angle: TAU,
            drag: DEFAULT_DRAG,
            grab: GrabState::default(),
            last_angle: None,
            grab_start_fill: 0.0,
            accumulated_rotation: 0.0,
            release: OnRelease::Hold,
            on_change: None,
        }
    }

    /// Called with the fill on every evaluation.
    pub fn with_callback(mut self, callback: impl FnMut(f64) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Angular span that maps to fill 0..1.
    pub fn with_range(mut self, start_angle: f64, end_angle: f64) -> Self {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self
    }

    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_release(mut self, release: OnRelease<f64>) -> Self {
        self.release = release;
        self
    }

    pub fn fill(&self) -> f64 {
        self.fill
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Rotation since the current grab began, in radians.
    pub fn accumulated_rotation(&self) -> f64 {
        self.accumulated_rotation
    }

    /// Angle of `point` around the center, or `None` at the center itself.
    pub fn angle_of(&self, point: Point) -> Option<f64> {
        let d = point - self.center;
        if d.hypot() < MIN_ANGLE_RADIUS {
            return None;
        }
        let angle = d.x.atan2(-d.y);
        Some(if angle < 0.0 { angle + TAU } else { angle })
    }

    fn mid_radius(&self) -> f64 {
        (self.inner_radius + self.outer_radius) / 2.0
    }

    /// Where the indicator knob sits for the current fill.
    pub fn knob_position(&self) -> Point {
        let angle = self.start_angle + self.fill * (self.end_angle - self.start_angle);
        self.center + Vec2::new(angle.sin(), -angle.cos()) * self.mid_radius()
    }

    fn turn(&mut self, hand: Point) {
        let Some(angle) = self.angle_of(hand) else {
            return;
        };
        if let Some(last) = self.last_angle {
            self.accumulated_rotation += shortest_angle_delta(last, angle);
        }
        self.last_angle = Some(angle);

        let range = self.end_angle - self.start_angle;
        if range.abs() < MIN_RANGE {
            return;
        }
        let target = (self.grab_start_fill + self.accumulated_rotation / range).clamp(0.0, 1.0);
        self.fill = lerp(self.fill, target, self.drag).clamp(0.0, 1.0);
    }
}

impl Control for Wheel {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "wheel"
    }

    fn evaluate(&mut self, hands: &TwoHandsState) {
        let zone = self.hot_zone();
        let event = self.grab.update(hands, |p| zone.contains(p));

        match event {
            GrabEvent::Grabbed(_, hand) => {
                self.last_angle = self.angle_of(hand);
                self.grab_start_fill = self.fill;
                self.accumulated_rotation = 0.0;
                self.turn(hand);
            }
            GrabEvent::Held(_, hand) => self.turn(hand),
            GrabEvent::Released(_) => {
                self.last_angle = None;
                if let OnRelease::Snap(rest) = self.release {
                    self.fill = rest.clamp(0.0, 1.0);
                }
            }
            GrabEvent::Idle => {}
        }

        if let Some(callback) = self.on_change.as_mut() {
            callback(self.fill);
        }
    }

    fn draw(&self) -> Vec<Primitive> {
        let band = self.outer_radius - self.inner_radius;
        let width = outline_width(self.grab.hovering(), self.grab.is_grabbed());
        let knob_color = if self.grab.is_grabbed() {
            palette::knob_grabbed()
        } else {
            palette::knob()
        };
        vec![
            Primitive::stroked(
                PrimitiveShape::Circle(Circle::new(self.center, self.mid_radius())),
                palette::track(),
                band,
            ),
            Primitive::filled(
                PrimitiveShape::Circle(Circle::new(self.knob_position(), band / 2.0)),
                knob_color,
            )
            .with_stroke(palette::outline(), width),
        ]
    }

    /// The ring between the two radii; a solid disc when there is no hole.
    fn hot_zone(&self) -> HotZone {
        if self.inner_radius > 0.0 {
            HotZone::Ring {
                center: self.center,
                inner_radius: self.inner_radius,
                outer_radius: self.outer_radius,
            }
        } else {
            HotZone::circle(self.center, self.outer_radius)
        }
    }

    fn grab_state(&self) -> &GrabState {
        &self.grab
    }

    fn grab_state_mut(&mut self) -> &mut GrabState {
        &mut self.grab
    }

    fn value(&self) -> ControlValue {
        ControlValue::Fill(self.fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::DEFAULT_FIST_LABEL;
    use crate::tracker::{Hand, HandReading};

    const EPSILON: f64 = 1e-9;

    fn wheel() -> Wheel {
        Wheel::new(Point::new(400.0, 300.0), 60.0, 100.0, 0.5)
    }

    /// Left fist on the middle of the ring at `angle`.
    fn fist_at(wheel: &Wheel, angle: f64) -> TwoHandsState {
        let p = wheel.center() + Vec2::new(angle.sin(), -angle.cos()) * 80.0;
        TwoHandsState::single(Hand::Left, HandReading::new(Some(p), DEFAULT_FIST_LABEL))
    }

    #[test]
    fn test_shortest_angle_delta() {
        assert!((shortest_angle_delta(0.1, 6.2) - (6.1 - TAU)).abs() < EPSILON);
        assert!((shortest_angle_delta(6.2, 0.1) - (TAU - 6.1)).abs() < EPSILON);
        assert!((shortest_angle_delta(1.0, 2.0) - 1.0).abs() < EPSILON);
        assert!((shortest_angle_delta(0.0, PI) - PI).abs() < EPSILON);
        assert!((shortest_angle_delta(PI, 0.0) - PI).abs() < EPSILON);
    }

    #[test]
    fn test_angle_clockwise_from_up() {
        let w = wheel();
        let c = w.center();
        assert!((w.angle_of(c + Vec2::new(0.0, -80.0)).unwrap()).abs() < EPSILON);
        assert!((w.angle_of(c + Vec2::new(80.0, 0.0)).unwrap() - PI / 2.0).abs() < EPSILON);
        assert!((w.angle_of(c + Vec2::new(0.0, 80.0)).unwrap() - PI).abs() < EPSILON);
        assert!((w.angle_of(c + Vec2::new(-80.0, 0.0)).unwrap() - 3.0 * PI / 2.0).abs() < EPSILON);
        assert_eq!(w.angle_of(c), None);
    }

    #[test]
    fn test_wraparound_is_small_negative_turn() {
        let mut w = wheel();
        w.evaluate(&fist_at(&w, 0.1));
        assert!(w.grabbed());
        assert!(w.accumulated_rotation().abs() < EPSILON);

        w.evaluate(&fist_at(&w, 6.2));
        let rotation = w.accumulated_rotation();
        assert!((rotation - (6.2 - 0.1 - TAU)).abs() < 1e-6);
        assert!((rotation + 0.183).abs() < 1e-3);
        // Fill moved slightly down, not to an extreme.
        assert!(w.fill() < 0.5 && w.fill() > 0.49);
    }

    #[test]
    fn test_multi_revolution_accumulates() {
        let mut w = Wheel::new(Point::new(0.0, 0.0), 0.0, 100.0, 0.0).with_range(0.0, 4.0 * TAU);
        w.evaluate(&fist_at(&w, 0.0));
        // Two full clockwise turns in steps of 0.5 rad.
        let steps = (2.0 * TAU / 0.5).round() as usize;
        for i in 1..=steps {
            let angle = (i as f64 * 0.5).rem_euclid(TAU);
            w.evaluate(&fist_at(&w, angle));
        }
        assert!((w.accumulated_rotation() - steps as f64 * 0.5).abs() < 1e-6);
        for _ in 0..400 {
            w.evaluate(&fist_at(&w, (steps as f64 * 0.5).rem_euclid(TAU)));
        }
        // About half of the four-turn range.
        assert!((w.fill() - steps as f64 * 0.5 / (4.0 * TAU)).abs() < 1e-3);
    }

    #[test]
    fn test_fill_clamps_at_full() {
        let mut w = wheel();
        w.evaluate(&fist_at(&w, 0.0));
        for i in 1..200 {
            w.evaluate(&fist_at(&w, (i as f64 * 0.3).rem_euclid(TAU)));
            assert!(w.fill() <= 1.0);
        }
        assert!((w.fill() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_hole_is_not_hot() {
        let mut w = wheel();
        let hole = TwoHandsState::single(
            Hand::Left,
            HandReading::new(Some(Point::new(410.0, 300.0)), DEFAULT_FIST_LABEL),
        );
        w.evaluate(&hole);
        assert!(!w.hovering());
        assert!(!w.grabbed());
    }

    #[test]
    fn test_regrab_restarts_accumulation() {
        let mut w = wheel();
        w.evaluate(&fist_at(&w, 0.0));
        w.evaluate(&fist_at(&w, 1.0));
        assert!(w.accumulated_rotation() > 0.9);

        w.evaluate(&TwoHandsState::default());
        assert!(!w.grabbed());
        let before = w.fill();

        w.evaluate(&fist_at(&w, 3.0));
        assert!(w.accumulated_rotation().abs() < EPSILON);
        assert!((w.fill() - before).abs() < EPSILON);
    }

    #[test]
    fn test_zero_range_holds_value() {
        let mut w = wheel().with_range(1.0, 1.0);
        w.evaluate(&fist_at(&w, 0.0));
        w.evaluate(&fist_at(&w, 1.0));
        assert!((w.fill() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_snap_on_release() {
        let mut w = wheel().with_release(OnRelease::Snap(0.0));
        w.evaluate(&fist_at(&w, 0.0));
        w.evaluate(&TwoHandsState::default());
        assert_eq!(w.value(), ControlValue::Fill(0.0));
    }

    #[test]
    fn test_knob_position_tracks_fill() {
        let w = wheel();
        // Half fill on a full-turn range points straight down.
        let knob = w.knob_position();
        assert!((knob.x - 400.0).abs() < 1e-9);
        assert!((knob.y - 380.0).abs() < 1e-9);
    }
}
