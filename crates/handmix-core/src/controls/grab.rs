//! Grab ownership shared by every control.

use kurbo::Point;

use crate::tracker::{Hand, TwoHandsState};

use super::DEFAULT_FIST_LABEL;

/// What happened to grab ownership during one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabEvent {
    /// Not grabbed before, not grabbed now.
    Idle,
    /// `hand` took ownership this evaluation, at `position`.
    Grabbed(Hand, Point),
    /// `hand` still owns the control and is at `position`.
    Held(Hand, Point),
    /// `hand` let go (opened its fist or lost tracking).
    Released(Hand),
}

impl GrabEvent {
    /// Position of the owning hand when it drives the value this evaluation.
    pub fn driving_position(&self) -> Option<Point> {
        match *self {
            GrabEvent::Grabbed(_, position) | GrabEvent::Held(_, position) => Some(position),
            GrabEvent::Idle | GrabEvent::Released(_) => None,
        }
    }
}

/// Hover flag and owning hand of one control.
///
/// At most one hand owns a grabbed control. The owner keeps it until its
/// fist opens or it stops being tracked; the other hand can never take it
/// over in the meantime. When both hands qualify on the same evaluation the
/// left hand wins.
#[derive(Debug, Clone, PartialEq)]
pub struct GrabState {
    owner: Option<Hand>,
    hovering: bool,
    fist_label: String,
}

impl GrabState {
    pub fn new(fist_label: impl Into<String>) -> Self {
        Self {
            owner: None,
            hovering: false,
            fist_label: fist_label.into(),
        }
    }

    /// Run the ownership protocol for one evaluation.
    ///
    /// `overlaps` is the control's hot-zone test, evaluated in the same
    /// coordinate space as the hand positions.
    pub fn update(&mut self, hands: &TwoHandsState, overlaps: impl Fn(Point) -> bool) -> GrabEvent {
        let overlapping = Hand::BOTH.map(|hand| hands.get(hand).position.is_some_and(&overlaps));
        self.hovering = overlapping.iter().any(|&o| o);

        if let Some(owner) = self.owner {
            let reading = hands.get(owner);
            return match reading.position {
                Some(position) if reading.is_fist(&self.fist_label) => {
                    GrabEvent::Held(owner, position)
                }
                _ => {
                    self.owner = None;
                    log::debug!("Control released by {} hand", owner);
                    GrabEvent::Released(owner)
                }
            };
        }

        for hand in Hand::BOTH {
            let reading = hands.get(hand);
            if let (Some(position), true) = (reading.position, overlapping[hand.index()]) {
                if reading.is_fist(&self.fist_label) {
                    self.owner = Some(hand);
                    log::debug!("Control grabbed by {} hand", hand);
                    return GrabEvent::Grabbed(hand, position);
                }
            }
        }
        GrabEvent::Idle
    }

    pub fn owner(&self) -> Option<Hand> {
        self.owner
    }

    pub fn is_grabbed(&self) -> bool {
        self.owner.is_some()
    }

    pub fn hovering(&self) -> bool {
        self.hovering
    }

    pub fn fist_label(&self) -> &str {
        &self.fist_label
    }

    pub fn set_fist_label(&mut self, label: impl Into<String>) {
        self.fist_label = label.into();
    }
}

impl Default for GrabState {
    fn default() -> Self {
        Self::new(DEFAULT_FIST_LABEL)
    }
}
