//! Mapping between normalized perception space and screen pixels.

use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};

/// Screen the controls live on.
///
/// Perception reports hands in normalized image coordinates ([0, 1] on both
/// axes, y down). The viewport scales them to pixels and, for a selfie
/// camera, flips x so moving the hand right moves the cursor right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Flip x (the camera image is mirrored).
    pub mirror: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            mirror: true,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, mirror: bool) -> Self {
        Self {
            width,
            height,
            mirror,
        }
    }

    /// Normalized-to-screen transform.
    pub fn transform(&self) -> Affine {
        if self.mirror {
            Affine::translate((self.width, 0.0))
                * Affine::scale_non_uniform(-self.width, self.height)
        } else {
            Affine::scale_non_uniform(self.width, self.height)
        }
    }

    /// Screen-to-normalized transform.
    pub fn inverse_transform(&self) -> Affine {
        self.transform().inverse()
    }

    pub fn to_screen(&self, normalized: Point) -> Point {
        self.transform() * normalized
    }

    pub fn to_normalized(&self, screen: Point) -> Point {
        self.inverse_transform() * screen
    }

    /// Point at fractions `(fx, fy)` of the screen size, unmirrored.
    ///
    /// Used to place controls relative to the screen.
    pub fn at(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.width * fx, self.height * fy)
    }
}
