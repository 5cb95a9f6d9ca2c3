//! Perception frame types, as delivered by the hand landmark recognizer.

use std::fmt;
use std::str::FromStr;

use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const INDEX_MCP: usize = 5;
pub const MIDDLE_MCP: usize = 9;
pub const RING_MCP: usize = 13;
pub const PINKY_MCP: usize = 17;

/// Palm base and finger bases. Fingertips move with the gesture itself,
/// these points move with the hand.
pub const CENTROID_LANDMARKS: [usize; 6] =
    [WRIST, THUMB_CMC, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// Perception frame errors.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Invalid perception frame: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which hand a detection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Both hands, in tie-break order.
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    /// The other hand.
    pub fn other(self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::Left => write!(f, "left"),
            Hand::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Hand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("left") {
            Ok(Hand::Left)
        } else if s.eq_ignore_ascii_case("right") {
            Ok(Hand::Right)
        } else {
            Err(format!("unknown handedness: {}", s))
        }
    }
}

impl TryFrom<String> for Hand {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A tracked point on a hand in normalized image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// One ranked gesture classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureCategory {
    #[serde(rename = "categoryName", alias = "category_name")]
    pub category_name: String,
    #[serde(default)]
    pub score: f32,
}

/// A single detected hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandDetection {
    pub handedness: Hand,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    /// Ranked best-first.
    #[serde(default)]
    pub gestures: Vec<GestureCategory>,
}

impl HandDetection {
    /// Mean of the palm landmarks, or `None` if the list is too short.
    pub fn centroid(&self) -> Option<Point> {
        let mut x = 0.0;
        let mut y = 0.0;
        for &index in &CENTROID_LANDMARKS {
            let landmark = self.landmarks.get(index)?;
            x += landmark.x;
            y += landmark.y;
        }
        let n = CENTROID_LANDMARKS.len() as f64;
        Some(Point::new(x / n, y / n))
    }

    /// Top-ranked gesture label, empty when there is none.
    pub fn gesture(&self) -> &str {
        self.gestures
            .first()
            .map(|g| g.category_name.as_str())
            .unwrap_or("")
    }
}

/// Everything the recognizer reported for one video frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    /// Detections that parsed; a malformed entry is dropped, which reads
    /// as that hand missing from the frame.
    #[serde(default, deserialize_with = "lenient_detections")]
    pub hands: Vec<HandDetection>,
    /// Capture time of the video frame in milliseconds, on the
    /// recognizer's own clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<f64>,
}

fn lenient_detections<'de, D>(deserializer: D) -> Result<Vec<HandDetection>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<HandDetection>(entry) {
            Ok(detection) => Some(detection),
            Err(e) => {
                log::warn!("Dropping malformed hand detection: {}", e);
                None
            }
        })
        .collect())
}

impl FrameResult {
    /// Parse a frame from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, FrameError> {
        Ok(serde_json::from_str(json)?)
    }
}
