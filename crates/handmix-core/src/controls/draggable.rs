//! Freely draggable circle.

use kurbo::{Circle, Point};
use uuid::Uuid;

use crate::tracker::TwoHandsState;

use super::{
    Control, ControlId, ControlValue, DEFAULT_DRAG, GrabEvent, GrabState, HotZone, OnRelease,
    Primitive, PrimitiveShape, ValueCallback, outline_width, palette,
};

/// A circle the owning hand drags around.
///
/// The position eases toward the hand each evaluation, which filters jitter
/// at the cost of a small lag.
pub struct DraggablePoint {
    id: ControlId,
    position: Point,
    radius: f64,
    drag: f64,
    grab: GrabState,
    release: OnRelease<Point>,
    on_change: Option<ValueCallback<Point>>,
}

impl DraggablePoint {
    pub fn new(position: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            radius,
            drag: DEFAULT_DRAG,
            grab: GrabState::default(),
            release: OnRelease::Hold,
            on_change: None,
        }
    }

    /// Called with the position on every evaluation.
    pub fn with_callback(mut self, callback: impl FnMut(Point) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_release(mut self, release: OnRelease<Point>) -> Self {
        self.release = release;
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Control for DraggablePoint {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "point"
    }

    fn evaluate(&mut self, hands: &TwoHandsState) {
        let zone = self.hot_zone();
        let event = self.grab.update(hands, |p| zone.contains(p));

        if let Some(hand) = event.driving_position() {
            self.position = self.position.lerp(hand, self.drag);
        } else if let (GrabEvent::Released(_), OnRelease::Snap(home)) = (event, self.release) {
            self.position = home;
        }

        if let Some(callback) = self.on_change.as_mut() {
            callback(self.position);
        }
    }

    fn draw(&self) -> Vec<Primitive> {
        let width = outline_width(self.grab.hovering(), self.grab.is_grabbed());
        vec![
            Primitive::filled(
                PrimitiveShape::Circle(Circle::new(self.position, self.radius)),
                palette::knob(),
            )
            .with_stroke(palette::outline(), width),
        ]
    }

    fn hot_zone(&self) -> HotZone {
        HotZone::circle(self.position, self.radius)
    }

    fn grab_state(&self) -> &GrabState {
        &self.grab
    }

    fn grab_state_mut(&mut self) -> &mut GrabState {
        &mut self.grab
    }

    fn value(&self) -> ControlValue {
        ControlValue::Position(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::DEFAULT_FIST_LABEL;
    use crate::tracker::{Hand, HandReading};
    use std::sync::{Arc, Mutex};

    fn hand_at(x: f64, y: f64, gesture: &str) -> TwoHandsState {
        TwoHandsState::single(Hand::Left, HandReading::new(Some(Point::new(x, y)), gesture))
    }

    #[test]
    fn test_follows_owning_hand_with_lag() {
        let mut point = DraggablePoint::new(Point::new(100.0, 100.0), 50.0);
        point.evaluate(&hand_at(120.0, 100.0, DEFAULT_FIST_LABEL));
        assert!(point.grabbed());
        assert!((point.position().x - 102.0).abs() < 1e-9);

        for _ in 0..200 {
            point.evaluate(&hand_at(300.0, 200.0, DEFAULT_FIST_LABEL));
        }
        assert!((point.position().x - 300.0).abs() < 1e-3);
        assert!((point.position().y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_ignores_open_hand() {
        let mut point = DraggablePoint::new(Point::new(100.0, 100.0), 50.0);
        point.evaluate(&hand_at(110.0, 100.0, "Open_Palm"));
        assert!(point.hovering());
        assert!(!point.grabbed());
        assert_eq!(point.position(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_hold_keeps_position_on_release() {
        let mut point = DraggablePoint::new(Point::new(100.0, 100.0), 50.0);
        point.evaluate(&hand_at(140.0, 100.0, DEFAULT_FIST_LABEL));
        let moved = point.position();
        point.evaluate(&hand_at(140.0, 100.0, ""));
        assert!(!point.grabbed());
        assert_eq!(point.position(), moved);
    }

    #[test]
    fn test_snap_home_on_release() {
        let home = Point::new(100.0, 100.0);
        let mut point = DraggablePoint::new(home, 50.0).with_release(OnRelease::Snap(home));
        point.evaluate(&hand_at(140.0, 100.0, DEFAULT_FIST_LABEL));
        assert_ne!(point.position(), home);
        point.evaluate(&TwoHandsState::default());
        assert_eq!(point.position(), home);
        assert_eq!(point.active_hand(), None);
    }

    #[test]
    fn test_callback_every_evaluation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut point = DraggablePoint::new(Point::new(0.0, 0.0), 10.0)
            .with_callback(move |p| sink.lock().unwrap().push(p));
        for _ in 0..3 {
            point.evaluate(&TwoHandsState::default());
        }
        assert_eq!(seen.lock().unwrap().len(), 3);
        assert_eq!(point.value(), ControlValue::Position(Point::ZERO));
    }
}
