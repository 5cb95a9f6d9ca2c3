//! Render-agnostic drawing output of controls.
//!
//! Controls describe what to paint; the renderer decides how.

use kurbo::{Circle, Line};
use peniko::Color;

/// Geometry of one primitive, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveShape {
    Circle(Circle),
    Line(Line),
}

/// Stroke settings.
#[derive(Debug, Clone, Copy)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// A shape with its paint.
#[derive(Debug, Clone, Copy)]
pub struct Primitive {
    pub shape: PrimitiveShape,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl Primitive {
    pub fn filled(shape: PrimitiveShape, color: Color) -> Self {
        Self {
            shape,
            fill: Some(color),
            stroke: None,
        }
    }

    pub fn stroked(shape: PrimitiveShape, color: Color, width: f64) -> Self {
        Self {
            shape,
            fill: None,
            stroke: Some(Stroke { color, width }),
        }
    }

    /// Add an outline to a primitive.
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some(Stroke { color, width });
        self
    }
}

/// Colors shared by all controls.
pub mod palette {
    use peniko::Color;

    pub fn outline() -> Color {
        Color::from_rgba8(30, 30, 30, 255)
    }

    pub fn track() -> Color {
        Color::from_rgba8(120, 120, 120, 255)
    }

    pub fn knob() -> Color {
        Color::from_rgba8(150, 150, 150, 255)
    }

    pub fn knob_grabbed() -> Color {
        Color::from_rgba8(230, 230, 230, 255)
    }

    pub fn toggled_on() -> Color {
        Color::from_rgba8(100, 200, 100, 255)
    }

    pub fn toggled_off() -> Color {
        Color::from_rgba8(200, 100, 100, 255)
    }

    pub fn cursor() -> Color {
        Color::from_rgba8(255, 0, 0, 255)
    }
}

/// Outline width for a control in the given interaction state.
pub fn outline_width(hovering: bool, grabbed: bool) -> f64 {
    if grabbed {
        4.0
    } else if hovering {
        3.0
    } else {
        1.0
    }
}
