//! Declarative control descriptions.

use std::f64::consts::TAU;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::config::ControlSettings;
use crate::controls::{
    Button, Control, ControlValue, DEFAULT_KNOB_RADIUS, DraggablePoint, OnRelease, Slider, Wheel,
};
use crate::viewport::Viewport;

/// Margin around the default mixer areas, in pixels.
const MIXER_PADDING: f64 = 120.0;

fn default_knob_radius() -> f64 {
    DEFAULT_KNOB_RADIUS
}

fn default_end_angle() -> f64 {
    TAU
}

/// One control in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlSpec {
    Slider {
        #[serde(default)]
        name: String,
        start: Point,
        end: Point,
        #[serde(default)]
        fill: f64,
        #[serde(default = "default_knob_radius")]
        knob_radius: f64,
    },
    Button {
        #[serde(default)]
        name: String,
        center: Point,
        radius: f64,
        #[serde(default)]
        toggled: bool,
    },
    Wheel {
        #[serde(default)]
        name: String,
        center: Point,
        #[serde(default)]
        inner_radius: f64,
        outer_radius: f64,
        #[serde(default)]
        fill: f64,
        #[serde(default)]
        start_angle: f64,
        #[serde(default = "default_end_angle")]
        end_angle: f64,
        /// Fill to return to on release; held when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest: Option<f64>,
    },
    Point {
        #[serde(default)]
        name: String,
        position: Point,
        radius: f64,
        /// Jump back to `position` on release.
        #[serde(default)]
        snap_home: bool,
    },
}

impl ControlSpec {
    pub fn name(&self) -> &str {
        match self {
            ControlSpec::Slider { name, .. }
            | ControlSpec::Button { name, .. }
            | ControlSpec::Wheel { name, .. }
            | ControlSpec::Point { name, .. } => name,
        }
    }

    /// Build the control without a value callback.
    pub fn build(&self, settings: &ControlSettings) -> Box<dyn Control> {
        self.build_inner(settings, None)
    }

    /// Build the control, reporting its value to `observer`.
    ///
    /// The observer is called whenever the control's own callback would be:
    /// every evaluation for continuous controls, each press for buttons.
    pub fn build_observed(
        &self,
        settings: &ControlSettings,
        observer: impl FnMut(ControlValue) + Send + 'static,
    ) -> Box<dyn Control> {
        self.build_inner(settings, Some(Box::new(observer)))
    }

    fn build_inner(
        &self,
        settings: &ControlSettings,
        observer: Option<Box<dyn FnMut(ControlValue) + Send>>,
    ) -> Box<dyn Control> {
        let mut control: Box<dyn Control> = match *self {
            ControlSpec::Slider {
                start,
                end,
                fill,
                knob_radius,
                ..
            } => {
                let mut slider = Slider::new(start, end, fill)
                    .with_knob_radius(knob_radius)
                    .with_drag(settings.drag);
                if let Some(mut observer) = observer {
                    slider = slider.with_callback(move |v| observer(ControlValue::Fill(v)));
                }
                Box::new(slider)
            }
            ControlSpec::Button {
                center,
                radius,
                toggled,
                ..
            } => {
                let mut button = Button::new(center, radius).with_toggled(toggled);
                if let Some(mut observer) = observer {
                    button = button.with_callback(move |on| observer(ControlValue::Toggled(on)));
                }
                Box::new(button)
            }
            ControlSpec::Wheel {
                center,
                inner_radius,
                outer_radius,
                fill,
                start_angle,
                end_angle,
                rest,
                ..
            } => {
                let mut wheel = Wheel::new(center, inner_radius, outer_radius, fill)
                    .with_range(start_angle, end_angle)
                    .with_drag(settings.drag);
                if let Some(rest) = rest {
                    wheel = wheel.with_release(OnRelease::Snap(rest));
                }
                if let Some(mut observer) = observer {
                    wheel = wheel.with_callback(move |v| observer(ControlValue::Fill(v)));
                }
                Box::new(wheel)
            }
            ControlSpec::Point {
                position,
                radius,
                snap_home,
                ..
            } => {
                let mut point = DraggablePoint::new(position, radius).with_drag(settings.drag);
                if snap_home {
                    point = point.with_release(OnRelease::Snap(position));
                }
                if let Some(mut observer) = observer {
                    point = point.with_callback(move |p| observer(ControlValue::Position(p)));
                }
                Box::new(point)
            }
        };
        control
            .grab_state_mut()
            .set_fist_label(settings.fist_label.clone());
        control
    }
}

/// Four loop faders, five sample pads and three effect dials.
///
/// Faders fill the top-left area, pads the bottom-left, dials stack on the
/// right.
pub fn default_mixer_layout(viewport: &Viewport) -> Vec<ControlSpec> {
    let (w, h) = (viewport.width, viewport.height);
    let split_x = w * 0.68;
    let split_y = h * 0.56;
    let left = MIXER_PADDING;
    let top = MIXER_PADDING;
    let right = w - MIXER_PADDING;
    let bottom = h - MIXER_PADDING;

    let mut layout = Vec::new();

    let loops = 4;
    for i in 0..loops {
        let x = left + (i + 1) as f64 * (split_x - left) / (loops + 1) as f64;
        layout.push(ControlSpec::Slider {
            name: format!("loop {}", i + 1),
            start: Point::new(x, split_y),
            end: Point::new(x, top),
            fill: if i == 1 { 0.5 } else { 0.0 },
            knob_radius: DEFAULT_KNOB_RADIUS,
        });
    }

    for i in 0..5 {
        layout.push(ControlSpec::Button {
            name: format!("sample {}", i + 1),
            center: Point::new(
                left + (i + 1) as f64 * (split_x - left) / 6.0,
                split_y + (bottom - split_y) / 2.0,
            ),
            radius: 50.0,
            toggled: false,
        });
    }

    for (i, effect) in ["reverb", "delay", "filter"].into_iter().enumerate() {
        layout.push(ControlSpec::Wheel {
            name: effect.to_string(),
            center: Point::new(
                split_x + (right - split_x) / 2.0,
                top + (i + 1) as f64 * (bottom - top) / 4.0,
            ),
            inner_radius: 60.0,
            outer_radius: 100.0,
            fill: 0.0,
            start_angle: 0.0,
            end_angle: TAU,
            rest: None,
        });
    }

    layout
}
