//! Gesture-driven controls.
//!
//! Every control runs the same grab protocol ([`GrabState`]) and adds its
//! own value update on top:
//! - [`DraggablePoint`] follows the owning hand.
//! - [`Slider`] projects the hand onto its track.
//! - [`Button`] toggles once per grab.
//! - [`Wheel`] accumulates rotation around its center.
//!
//! Controls know nothing about audio or rendering. Values leave through an
//! optional callback supplied at construction; drawing returns primitives.

mod button;
mod draggable;
mod draw;
mod grab;
mod hotzone;
mod slider;
mod wheel;

pub use button::Button;
pub use draggable::DraggablePoint;
pub use draw::{Primitive, PrimitiveShape, Stroke, outline_width, palette};
pub use grab::{GrabEvent, GrabState};
pub use hotzone::HotZone;
pub use slider::{DEFAULT_KNOB_RADIUS, Slider};
pub use wheel::{Wheel, shortest_angle_delta};

use kurbo::Point;
use uuid::Uuid;

use crate::tracker::{Hand, TwoHandsState};

/// Gesture label that grabs controls.
pub const DEFAULT_FIST_LABEL: &str = "Closed_Fist";

/// Per-evaluation interpolation factor toward the hand-driven target.
pub const DEFAULT_DRAG: f64 = 0.1;

/// Unique identifier for a control.
pub type ControlId = Uuid;

/// Value callback installed at construction.
pub type ValueCallback<T> = Box<dyn FnMut(T) + Send>;

/// Externally observable state of a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    /// Continuous value in [0, 1].
    Fill(f64),
    Toggled(bool),
    /// Free position in screen space.
    Position(Point),
}

/// What a control does when its owner lets go.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OnRelease<T> {
    /// Keep the value where the hand left it.
    #[default]
    Hold,
    /// Jump back to a rest value.
    Snap(T),
}

/// Shared capability set of all controls.
pub trait Control: Send {
    fn id(&self) -> ControlId;

    /// Short name of the variant, for logs.
    fn kind(&self) -> &'static str;

    /// Advance hover/grab state and the value for one frame of hand input.
    ///
    /// Positions in `hands` must be in the same space as the control's
    /// geometry.
    fn evaluate(&mut self, hands: &TwoHandsState);

    /// Primitives to paint for the current state.
    fn draw(&self) -> Vec<Primitive>;

    /// Region used for the overlap test.
    fn hot_zone(&self) -> HotZone;

    fn grab_state(&self) -> &GrabState;

    fn grab_state_mut(&mut self) -> &mut GrabState;

    fn value(&self) -> ControlValue;

    fn hovering(&self) -> bool {
        self.grab_state().hovering()
    }

    fn grabbed(&self) -> bool {
        self.grab_state().is_grabbed()
    }

    fn active_hand(&self) -> Option<Hand> {
        self.grab_state().owner()
    }
}

/// Move `from` a fraction `t` of the way to `to`.
pub(crate) fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
