//! Control panel: owns the controls and feeds them hand input.

use kurbo::{Circle, Line, Point, Vec2};

use crate::controls::{
    Control, ControlId, DEFAULT_FIST_LABEL, Primitive, PrimitiveShape, palette,
};
use crate::tracker::{Hand, TwoHandsState};
use crate::viewport::Viewport;

/// Half-length of the crosshair arms drawn at each hand.
const CROSSHAIR_SIZE: f64 = 12.0;

/// Every control on screen, evaluated in insertion order.
///
/// The panel maps normalized hand positions to screen space and optionally
/// keeps one hand from holding two controls at once. Each control still
/// arbitrates its own ownership; the panel only filters what it sees.
pub struct ControlPanel {
    controls: Vec<Box<dyn Control>>,
    viewport: Viewport,
    exclusive_hands: bool,
    fist_label: String,
    /// Screen-space input of the last evaluation, for cursors.
    last_hands: TwoHandsState,
}

impl ControlPanel {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            controls: Vec::new(),
            viewport,
            exclusive_hands: false,
            fist_label: DEFAULT_FIST_LABEL.to_string(),
            last_hands: TwoHandsState::default(),
        }
    }

    /// A hand holding one control looks open to all others.
    pub fn with_exclusive_hands(mut self, exclusive: bool) -> Self {
        self.exclusive_hands = exclusive;
        self
    }

    /// Gesture label that grabs, for current and future controls.
    pub fn with_fist_label(mut self, label: impl Into<String>) -> Self {
        self.fist_label = label.into();
        for control in &mut self.controls {
            control.grab_state_mut().set_fist_label(self.fist_label.clone());
        }
        self
    }

    /// Add a control and return its id.
    pub fn add(&mut self, mut control: Box<dyn Control>) -> ControlId {
        control.grab_state_mut().set_fist_label(self.fist_label.clone());
        let id = control.id();
        log::debug!("Added {} control {}", control.kind(), id);
        self.controls.push(control);
        id
    }

    /// Evaluate every control with hands in normalized perception space.
    pub fn evaluate(&mut self, hands: &TwoHandsState) {
        let viewport = self.viewport;
        let screen = hands.map_positions(|p| viewport.to_screen(p));
        self.evaluate_screen(&screen);
    }

    /// Evaluate every control with hands already in screen space.
    pub fn evaluate_screen(&mut self, hands: &TwoHandsState) {
        for index in 0..self.controls.len() {
            if self.exclusive_hands {
                let masked = self.mask_busy_hands(index, hands);
                self.controls[index].evaluate(&masked);
            } else {
                self.controls[index].evaluate(hands);
            }
        }
        self.last_hands = hands.clone();
    }

    /// `hands` with the gesture cleared for any hand owning a control
    /// other than `index`.
    fn mask_busy_hands(&self, index: usize, hands: &TwoHandsState) -> TwoHandsState {
        let mut masked = hands.clone();
        for hand in Hand::BOTH {
            let busy = self
                .controls
                .iter()
                .enumerate()
                .any(|(i, control)| i != index && control.active_hand() == Some(hand));
            if busy {
                masked.get_mut(hand).gesture.clear();
            }
        }
        masked
    }

    /// Control primitives followed by a crosshair per tracked hand.
    pub fn draw(&self) -> Vec<Primitive> {
        let mut primitives: Vec<Primitive> =
            self.controls.iter().flat_map(|control| control.draw()).collect();
        for hand in Hand::BOTH {
            if let Some(position) = self.last_hands.get(hand).position {
                primitives.extend(crosshair(position));
            }
        }
        primitives
    }

    /// The control `hand` currently owns.
    pub fn owner_of(&self, hand: Hand) -> Option<ControlId> {
        self.controls
            .iter()
            .find(|control| control.active_hand() == Some(hand))
            .map(|control| control.id())
    }

    pub fn get(&self, id: ControlId) -> Option<&dyn Control> {
        self.controls
            .iter()
            .find(|control| control.id() == id)
            .map(|control| &**control)
    }

    pub fn controls(&self) -> &[Box<dyn Control>] {
        &self.controls
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn exclusive_hands(&self) -> bool {
        self.exclusive_hands
    }

    pub fn fist_label(&self) -> &str {
        &self.fist_label
    }
}

fn crosshair(center: Point) -> [Primitive; 3] {
    let h = Vec2::new(CROSSHAIR_SIZE, 0.0);
    let v = Vec2::new(0.0, CROSSHAIR_SIZE);
    [
        Primitive::stroked(
            PrimitiveShape::Line(Line::new(center - h, center + h)),
            palette::cursor(),
            2.0,
        ),
        Primitive::stroked(
            PrimitiveShape::Line(Line::new(center - v, center + v)),
            palette::cursor(),
            2.0,
        ),
        Primitive::stroked(
            PrimitiveShape::Circle(Circle::new(center, CROSSHAIR_SIZE / 2.0)),
            palette::cursor(),
            1.0,
        ),
    ]
}
