//! Linear slider between two endpoints.

use kurbo::{Circle, Line, Point, Vec2};
use uuid::Uuid;

use crate::tracker::TwoHandsState;

use super::{
    Control, ControlId, ControlValue, DEFAULT_DRAG, GrabState, HotZone, Primitive, PrimitiveShape,
    ValueCallback, lerp, outline_width, palette,
};

/// Knob radius in pixels.
pub const DEFAULT_KNOB_RADIUS: f64 = 20.0;

/// Segments shorter than this (squared length) cannot be projected onto.
const MIN_LENGTH_SQ: f64 = 1e-12;

/// A knob on the segment `start`→`end`; fill 0 sits at `start`.
pub struct Slider {
    id: ControlId,
    start: Point,
    end: Point,
    fill: f64,
    knob_radius: f64,
    drag: f64,
    grab: GrabState,
    on_change: Option<ValueCallback<f64>>,
}

impl Slider {
    /// Create a slider; `fill` is clamped to [0, 1].
    pub fn new(start: Point, end: Point, fill: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            fill: fill.clamp(0.0, 1.0),
            knob_radius: DEFAULT_KNOB_RADIUS,
            drag: DEFAULT_DRAG,
            grab: GrabState::default(),
            on_change: None,
        }
    }

    /// Called with the fill on every evaluation.
    pub fn with_callback(mut self, callback: impl FnMut(f64) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn with_knob_radius(mut self, radius: f64) -> Self {
        self.knob_radius = radius;
        self
    }

    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    pub fn fill(&self) -> f64 {
        self.fill
    }

    pub fn knob_position(&self) -> Point {
        self.start.lerp(self.end, self.fill)
    }

    /// Parameter of the projection of `point` onto the track, unclamped.
    ///
    /// `None` for a zero-length track.
    pub fn project(&self, point: Point) -> Option<f64> {
        let track = self.end - self.start;
        let length_sq = track.hypot2();
        if length_sq < MIN_LENGTH_SQ {
            return None;
        }
        Some((point - self.start).dot(track) / length_sq)
    }

    fn track_direction(&self) -> Vec2 {
        let track = self.end - self.start;
        if track.hypot2() < MIN_LENGTH_SQ {
            Vec2::ZERO
        } else {
            track.normalize()
        }
    }
}

impl Control for Slider {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "slider"
    }

    fn evaluate(&mut self, hands: &TwoHandsState) {
        let zone = self.hot_zone();
        let event = self.grab.update(hands, |p| zone.contains(p));

        if let Some(t) = event.driving_position().and_then(|hand| self.project(hand)) {
            self.fill = lerp(self.fill, t.clamp(0.0, 1.0), self.drag).clamp(0.0, 1.0);
        }

        if let Some(callback) = self.on_change.as_mut() {
            callback(self.fill);
        }
    }

    fn draw(&self) -> Vec<Primitive> {
        let width = outline_width(self.grab.hovering(), self.grab.is_grabbed());
        let knob_color = if self.grab.is_grabbed() {
            palette::knob_grabbed()
        } else {
            palette::knob()
        };
        vec![
            Primitive::stroked(
                PrimitiveShape::Line(Line::new(self.start, self.end)),
                palette::track(),
                2.0,
            ),
            Primitive::filled(
                PrimitiveShape::Circle(Circle::new(self.knob_position(), self.knob_radius)),
                knob_color,
            )
            .with_stroke(palette::outline(), width),
        ]
    }

    /// Capsule around the knob, stretched one knob radius each way along
    /// the track.
    fn hot_zone(&self) -> HotZone {
        let knob = self.knob_position();
        let reach = self.track_direction() * self.knob_radius;
        HotZone::Capsule {
            axis: Line::new(knob - reach, knob + reach),
            radius: self.knob_radius,
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
