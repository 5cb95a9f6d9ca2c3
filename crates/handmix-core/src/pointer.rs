//! Mouse/touch fallback that drives controls like a hand.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::tracker::{Hand, HandReading, TwoHandsState};

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Primary button pressed (or touch start).
    Down { position: Point },
    /// Primary button released (or touch end).
    Up { position: Point },
    Move { position: Point },
    /// Pointer left the surface.
    Leave,
}

/// Tracks the pointer across frames and presents it as one hand.
///
/// Positions are in screen space, so readings go to
/// [`ControlPanel::evaluate_screen`](crate::panel::ControlPanel::evaluate_screen).
/// Holding the primary button counts as a fist.
#[derive(Debug, Clone)]
pub struct PointerInput {
    hand: Hand,
    position: Option<Point>,
    pressed: bool,
}

impl Default for PointerInput {
    fn default() -> Self {
        Self::new(Hand::Right)
    }
}

impl PointerInput {
    /// A pointer that stands in for `hand`.
    pub fn new(hand: Hand) -> Self {
        Self {
            hand,
            position: None,
            pressed: false,
        }
    }

    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => {
                self.position = Some(position);
                self.pressed = true;
            }
            PointerEvent::Up { position } => {
                self.position = Some(position);
                self.pressed = false;
            }
            PointerEvent::Move { position } => {
                self.position = Some(position);
            }
            PointerEvent::Leave => {
                self.position = None;
                self.pressed = false;
            }
        }
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// The pointer as a hand reading; pressed reports `fist_label`.
    pub fn reading(&self, fist_label: &str) -> HandReading {
        let gesture = if self.pressed { fist_label } else { "" };
        HandReading::new(self.position, gesture)
    }

    /// Screen-space input with the pointer in its hand's slot.
    pub fn hands(&self, fist_label: &str) -> TwoHandsState {
        TwoHandsState::single(self.hand, self.reading(fist_label))
    }
}
