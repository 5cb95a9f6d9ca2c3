//! Overlap regions for controls.

use kurbo::{Circle, Line, ParamCurveNearest, Point};

/// Region a hand (or pointer) must be inside to hover or grab a control.
///
/// Boundaries are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HotZone {
    Circle(Circle),
    /// Annulus between two radii around a center.
    Ring {
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
    },
    /// Every point within `radius` of a segment.
    Capsule { axis: Line, radius: f64 },
}

impl HotZone {
    pub fn circle(center: Point, radius: f64) -> Self {
        HotZone::Circle(Circle::new(center, radius))
    }

    pub fn contains(&self, point: Point) -> bool {
        match *self {
            HotZone::Circle(circle) => point.distance(circle.center) <= circle.radius,
            HotZone::Ring {
                center,
                inner_radius,
                outer_radius,
            } => {
                let d = point.distance(center);
                d >= inner_radius && d <= outer_radius
            }
            HotZone::Capsule { axis, radius } => {
                if axis.p0 == axis.p1 {
                    return point.distance(axis.p0) <= radius;
                }
                axis.nearest(point, 1e-9).distance_sq <= radius * radius
            }
        }
    }

    /// Center of the region.
    pub fn center(&self) -> Point {
        match *self {
            HotZone::Circle(circle) => circle.center,
            HotZone::Ring { center, .. } => center,
            HotZone::Capsule { axis, .. } => axis.p0.midpoint(axis.p1),
        }
    }
}
