//! Dual-hand tracker: one perception stream in, two hand signals out.

mod frame;

pub use frame::{
    CENTROID_LANDMARKS, FrameError, FrameResult, GestureCategory, Hand, HandDetection, Landmark,
};

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::signal::{DEFAULT_CAPACITY, ExtrapolationParams, HandBuffer, Observation};

/// Tracker tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Observations kept per hand.
    pub capacity: usize,
    #[serde(flatten)]
    pub extrapolation: ExtrapolationParams,
    /// Relabel left as right and vice versa (mirrored camera input).
    pub swap_handedness: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            extrapolation: ExtrapolationParams::default(),
            swap_handedness: false,
        }
    }
}

/// Predicted position and current gesture of one hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandReading {
    /// `None` when the hand is not tracked.
    pub position: Option<Point>,
    /// Empty when there is no classified gesture.
    pub gesture: String,
}

impl HandReading {
    pub fn new(position: Option<Point>, gesture: impl Into<String>) -> Self {
        Self {
            position,
            gesture: gesture.into(),
        }
    }

    /// A reading for a hand that is not tracked.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Tracked and showing `fist_label`.
    pub fn is_fist(&self, fist_label: &str) -> bool {
        self.position.is_some() && self.gesture == fist_label
    }
}

/// Both hands at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TwoHandsState {
    pub left: HandReading,
    pub right: HandReading,
}

impl TwoHandsState {
    pub fn new(left: HandReading, right: HandReading) -> Self {
        Self { left, right }
    }

    /// Single-hand input: the other side is always absent.
    pub fn single(hand: Hand, reading: HandReading) -> Self {
        let mut state = Self::default();
        *state.get_mut(hand) = reading;
        state
    }

    pub fn get(&self, hand: Hand) -> &HandReading {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, hand: Hand) -> &mut HandReading {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    /// Apply `f` to every tracked position.
    pub fn map_positions(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            left: HandReading::new(self.left.position.map(&f), self.left.gesture.clone()),
            right: HandReading::new(self.right.position.map(&f), self.right.gesture.clone()),
        }
    }
}

/// Splits per-frame perception results into a left and a right hand buffer.
///
/// `ingest` fully updates both buffers before returning; readers on the same
/// thread never see a half-applied frame.
#[derive(Debug, Clone)]
pub struct DualHandTracker {
    buffers: [HandBuffer; 2],
    swap_handedness: bool,
}

impl DualHandTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            buffers: [
                HandBuffer::new(config.capacity, config.extrapolation),
                HandBuffer::new(config.capacity, config.extrapolation),
            ],
            swap_handedness: config.swap_handedness,
        }
    }

    /// Fold one perception result, stamped at `timestamp` (monotonic ms).
    ///
    /// The first detection per label wins; later duplicates are ignored. A
    /// label with no usable detection clears that hand's buffer.
    pub fn ingest(&mut self, frame: &FrameResult, timestamp: f64) {
        let mut chosen: [Option<&HandDetection>; 2] = [None, None];
        for detection in &frame.hands {
            let hand = if self.swap_handedness {
                detection.handedness.other()
            } else {
                detection.handedness
            };
            let slot = &mut chosen[hand.index()];
            if slot.is_some() {
                log::debug!("Ignoring duplicate {} hand detection", hand);
                continue;
            }
            *slot = Some(detection);
        }

        for hand in Hand::BOTH {
            let buffer = &mut self.buffers[hand.index()];
            let observation = chosen[hand.index()].and_then(|detection| {
                detection.centroid().map(|position| {
                    Observation::new(Some(position), detection.gesture(), timestamp)
                })
            });
            match observation {
                Some(observation) => {
                    log::trace!(
                        "{} hand at {:?} ({:?})",
                        hand,
                        observation.position(),
                        observation.gesture()
                    );
                    buffer.append(observation);
                }
                None => {
                    if !buffer.is_empty() {
                        log::debug!("{} hand lost", hand);
                    }
                    buffer.clear();
                }
            }
        }
    }

    /// Predicted positions and latest gestures at `now`.
    pub fn two_hands_state(&self, now: f64) -> TwoHandsState {
        TwoHandsState::new(self.reading(Hand::Left, now), self.reading(Hand::Right, now))
    }

    /// Predicted reading for one hand at `now`.
    pub fn reading(&self, hand: Hand, now: f64) -> HandReading {
        let buffer = self.buffer(hand);
        HandReading::new(
            buffer.extrapolate(now),
            buffer.latest().map(|o| o.gesture()).unwrap_or(""),
        )
    }

    /// Latest unextrapolated position of a hand.
    pub fn raw_position(&self, hand: Hand) -> Option<Point> {
        self.buffer(hand).latest().and_then(Observation::position)
    }

    pub fn buffer(&self, hand: Hand) -> &HandBuffer {
        &self.buffers[hand.index()]
    }

    /// Forget both hands.
    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }
}

impl Default for DualHandTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn detection(hand: Hand, x: f64, y: f64, gesture: &str) -> HandDetection {
        HandDetection {
            handedness: hand,
            landmarks: vec![Landmark { x, y, z: 0.0 }; 21],
            gestures: if gesture.is_empty() {
                vec![]
            } else {
                vec![GestureCategory {
                    category_name: gesture.to_string(),
                    score: 1.0,
                }]
            },
        }
    }

    fn frame(hands: Vec<HandDetection>) -> FrameResult {
        FrameResult { hands, timestamp_ms: None }
    }

    #[test]
    fn test_demultiplexes_left_and_right() {
        let mut tracker = DualHandTracker::default();
        tracker.ingest(
            &frame(vec![
                detection(Hand::Right, 0.8, 0.5, "Open_Palm"),
                detection(Hand::Left, 0.2, 0.5, "Closed_Fist"),
            ]),
            0.0,
        );

        let state = tracker.two_hands_state(10.0);
        let left = state.left.position.unwrap();
        let right = state.right.position.unwrap();
        assert!((left.x - 0.2).abs() < EPS);
        assert!((right.x - 0.8).abs() < EPS);
        assert_eq!(state.left.gesture, "Closed_Fist");
        assert_eq!(state.right.gesture, "Open_Palm");
    }

    #[test]
    fn test_missing_hand_clears_buffer() {
        let mut tracker = DualHandTracker::default();
        tracker.ingest(&frame(vec![detection(Hand::Left, 0.3, 0.3, "Closed_Fist")]), 0.0);
        tracker.ingest(&frame(vec![detection(Hand::Left, 0.35, 0.3, "Closed_Fist")]), 33.0);
        assert!(tracker.two_hands_state(40.0).left.position.is_some());

        tracker.ingest(&frame(vec![]), 66.0);
        let state = tracker.two_hands_state(70.0);
        assert!(state.left.position.is_none());
        assert_eq!(state.left.gesture, "");
        assert!(tracker.buffer(Hand::Left).is_empty());
    }

    #[test]
    fn test_only_first_detection_per_label() {
        let mut tracker = DualHandTracker::default();
        tracker.ingest(
            &frame(vec![
                detection(Hand::Left, 0.1, 0.1, "Closed_Fist"),
                detection(Hand::Left, 0.9, 0.9, "Open_Palm"),
            ]),
            0.0,
        );
        let state = tracker.two_hands_state(0.0);
        let left = state.left.position.unwrap();
        assert!((left.x - 0.1).abs() < EPS);
        assert_eq!(state.left.gesture, "Closed_Fist");
        assert!(state.right.position.is_none());
        assert_eq!(tracker.buffer(Hand::Left).len(), 1);
    }

    #[test]
    fn test_malformed_detection_counts_as_missing() {
        let mut tracker = DualHandTracker::default();
        tracker.ingest(&frame(vec![detection(Hand::Right, 0.5, 0.5, "")]), 0.0);
        assert!(tracker.raw_position(Hand::Right).is_some());

        let mut broken = detection(Hand::Right, 0.5, 0.5, "Closed_Fist");
        broken.landmarks.truncate(3);
        tracker.ingest(&frame(vec![broken]), 33.0);
        assert!(tracker.raw_position(Hand::Right).is_none());
        assert!(tracker.two_hands_state(40.0).right.position.is_none());
    }

    #[test]
    fn test_unparsable_detection_clears_only_that_hand() {
        let mut tracker = DualHandTracker::default();
        tracker.ingest(
            &frame(vec![
                detection(Hand::Left, 0.4, 0.5, ""),
                detection(Hand::Right, 0.6, 0.5, ""),
            ]),
            0.0,
        );

        let json = r#"{"hands":[
            {"handedness":"Left","landmarks":[{"x":0.1}]},
            {"handedness":"Right","landmarks":[]}]}"#;
        let mut next = FrameResult::from_json(json).unwrap();
        next.hands[0] = detection(Hand::Right, 0.62, 0.5, "");
        tracker.ingest(&next, 33.0);

        assert!(tracker.raw_position(Hand::Left).is_none());
        let right = tracker.raw_position(Hand::Right).unwrap();
        assert!((right.x - 0.62).abs() < EPS);
    }

    #[test]
    fn test_swap_handedness() {
        let mut tracker = DualHandTracker::new(TrackerConfig {
            swap_handedness: true,
            ..TrackerConfig::default()
        });
        tracker.ingest(&frame(vec![detection(Hand::Left, 0.2, 0.5, "")]), 0.0);
        assert!(tracker.raw_position(Hand::Left).is_none());
        assert!(tracker.raw_position(Hand::Right).is_some());
    }

    #[test]
    fn test_state_is_extrapolated() {
        let mut tracker = DualHandTracker::new(TrackerConfig {
            extrapolation: ExtrapolationParams::kinematic(),
            ..TrackerConfig::default()
        });
        tracker.ingest(&frame(vec![detection(Hand::Left, 0.4, 0.4, "")]), 0.0);
        tracker.ingest(&frame(vec![detection(Hand::Left, 0.5, 0.5, "")]), 100.0);

        let predicted = tracker.two_hands_state(150.0).left.position.unwrap();
        assert!((predicted.x - 0.55).abs() < EPS);
        assert!((predicted.y - 0.55).abs() < EPS);
        let raw = tracker.raw_position(Hand::Left).unwrap();
        assert!((raw.x - 0.5).abs() < EPS);
    }

    #[test]
    fn test_reset_forgets_both_hands() {
        let mut tracker = DualHandTracker::default();
        tracker.ingest(
            &frame(vec![
                detection(Hand::Left, 0.2, 0.5, ""),
                detection(Hand::Right, 0.8, 0.5, ""),
            ]),
            0.0,
        );
        tracker.reset();
        assert_eq!(tracker.two_hands_state(1.0), TwoHandsState::default());
    }

    #[test]
    fn test_reading_fist_requires_tracking() {
        let tracked = HandReading::new(Some(Point::new(0.5, 0.5)), "Closed_Fist");
        assert!(tracked.is_fist("Closed_Fist"));
        assert!(!tracked.is_fist("Pointing_Up"));
        let lost = HandReading::new(None, "Closed_Fist");
        assert!(!lost.is_fist("Closed_Fist"));
    }

    #[test]
    fn test_single_hand_state() {
        let state = TwoHandsState::single(Hand::Right, HandReading::new(Some(Point::ZERO), "x"));
        assert!(state.left.position.is_none());
        assert_eq!(state.get(Hand::Right).gesture, "x");
    }
}
