//! Toggle button.

use kurbo::{Circle, Point};
use uuid::Uuid;

use crate::tracker::TwoHandsState;

use super::{
    Control, ControlId, ControlValue, GrabEvent, GrabState, HotZone, Primitive, PrimitiveShape,
    ValueCallback, outline_width, palette,
};

/// Round button that flips its toggle once per grab.
///
/// Holding the fist does not re-fire; the latch only resets when the
/// owning hand lets go.
pub struct Button {
    id: ControlId,
    center: Point,
    radius: f64,
    toggled: bool,
    latched: bool,
    grab: GrabState,
    on_press: Option<ValueCallback<bool>>,
}

impl Button {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius,
            toggled: false,
            latched: false,
            grab: GrabState::default(),
            on_press: None,
        }
    }

    /// Called with the new toggle state on each press.
    pub fn with_callback(mut self, callback: impl FnMut(bool) + Send + 'static) -> Self {
        self.on_press = Some(Box::new(callback));
        self
    }

    pub fn with_toggled(mut self, toggled: bool) -> Self {
        self.toggled = toggled;
        self
    }

    pub fn toggled(&self) -> bool {
        self.toggled
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Control for Button {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> &'static str {
        "button"
    }

    fn evaluate(&mut self, hands: &TwoHandsState) {
        let zone = self.hot_zone();
        match self.grab.update(hands, |p| zone.contains(p)) {
            GrabEvent::Grabbed(hand, _) if !self.latched => {
                self.latched = true;
                self.toggled = !self.toggled;
                log::debug!("Button pressed by {} hand, toggled={}", hand, self.toggled);
                if let Some(callback) = self.on_press.as_mut() {
                    callback(self.toggled);
                }
            }
            GrabEvent::Released(_) => self.latched = false,
            _ => {}
        }
    }

    fn draw(&self) -> Vec<Primitive> {
        let fill = if self.toggled {
            palette::toggled_on()
        } else {
            palette::toggled_off()
        };
        let width = outline_width(self.grab.hovering(), self.grab.is_grabbed());
        vec![
            Primitive::filled(PrimitiveShape::Circle(Circle::new(self.center, self.radius)), fill)
                .with_stroke(palette::outline(), width),
        ]
    }

    fn hot_zone(&self) -> HotZone {
        HotZone::circle(self.center, self.radius)
    }

    fn grab_state(&self) -> &GrabState {
        &self.grab
    }

    fn grab_state_mut(&mut self) -> &mut GrabState {
        &mut self.grab
    }

    fn value(&self) -> ControlValue {
        ControlValue::Toggled(self.toggled)
    }
}
