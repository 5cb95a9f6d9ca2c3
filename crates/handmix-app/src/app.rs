//! Main application: ingest frames, evaluate controls at a fixed tick.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::Duration;

use handmix_core::{
    ConfigError, ControlPanel, ControlValue, DualHandTracker, FrameResult, HandmixConfig,
    MonotonicClock,
};
use thiserror::Error;

use crate::source::{FrameSource, Pacing};

/// Render/evaluate cadence (~60 Hz).
pub const TICK: Duration = Duration::from_millis(16);

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Tracker and controls driven by one frame stream.
pub struct App {
    tracker: DualHandTracker,
    panel: ControlPanel,
    clock: MonotonicClock,
    names: Vec<String>,
    frames_ingested: usize,
}

impl App {
    /// Build the tracker and control panel described by `config`.
    pub fn new(config: &HandmixConfig, clock: MonotonicClock) -> Self {
        let mut panel = ControlPanel::new(config.viewport)
            .with_exclusive_hands(config.controls.exclusive_hands)
            .with_fist_label(config.controls.fist_label.clone());

        let mut names = Vec::new();
        for (index, spec) in config.layout_or_default().iter().enumerate() {
            let name = if spec.name().is_empty() {
                format!("control {}", index + 1)
            } else {
                spec.name().to_string()
            };
            panel.add(spec.build_observed(&config.controls, value_logger(name.clone())));
            names.push(name);
        }
        log::info!("Built {} controls", panel.len());

        Self {
            tracker: DualHandTracker::new(config.tracker),
            panel,
            clock,
            names,
            frames_ingested: 0,
        }
    }

    /// Fold one perception frame stamped at `timestamp`.
    pub fn ingest(&mut self, frame: &FrameResult, timestamp: f64) {
        self.tracker.ingest(frame, timestamp);
        self.frames_ingested += 1;
    }

    /// Evaluate every control with hands predicted at `now`.
    pub fn evaluate(&mut self, now: f64) {
        let hands = self.tracker.two_hands_state(now);
        self.panel.evaluate(&hands);
    }

    /// One render tick: ingest pending frames in arrival order, then evaluate.
    pub fn tick(&mut self, source: &mut FrameSource) {
        for stamped in source.poll_frames() {
            self.ingest(&stamped.frame, stamped.timestamp);
        }
        self.evaluate(self.clock.now_ms());
    }

    /// Tick until the source is exhausted.
    pub fn run(&mut self, mut source: FrameSource) {
        while !source.is_closed() {
            let started = self.clock.now_ms();
            self.tick(&mut source);
            let spent_ms = (self.clock.now_ms() - started).max(0.0);
            let spent = Duration::from_secs_f64(spent_ms / 1000.0);
            if let Some(remaining) = TICK.checked_sub(spent) {
                thread::sleep(remaining);
            }
        }
        log::info!("Frame stream ended after {} frames", self.frames_ingested);
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn tracker(&self) -> &DualHandTracker {
        &self.tracker
    }

    pub fn frames_ingested(&self) -> usize {
        self.frames_ingested
    }

    /// Final value of every control as one JSON object per line.
    pub fn summary(&self) -> Vec<String> {
        self.names
            .iter()
            .zip(self.panel.controls())
            .map(|(name, control)| {
                let value = match control.value() {
                    ControlValue::Fill(fill) => serde_json::json!(fill),
                    ControlValue::Toggled(on) => serde_json::json!(on),
                    ControlValue::Position(p) => serde_json::json!({ "x": p.x, "y": p.y }),
                };
                serde_json::json!({ "name": name, "kind": control.kind(), "value": value })
                    .to_string()
            })
            .collect()
    }
}

/// Logs a control's value when it changes.
fn value_logger(name: String) -> impl FnMut(ControlValue) + Send + 'static {
    let mut last: Option<ControlValue> = None;
    move |value| {
        if last != Some(value) {
            log::info!("{}: {:?}", name, value);
            last = Some(value);
        } else {
            log::trace!("{}: {:?}", name, value);
        }
    }
}

/// Load `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> AppResult<HandmixConfig> {
    match path {
        Some(path) => Ok(HandmixConfig::load(path)?),
        None => {
            log::info!("No configuration given, using defaults");
            Ok(HandmixConfig::default())
        }
    }
}

/// Frames from `path`, or stdin when no path is given.
pub fn open_frames(path: Option<&Path>) -> AppResult<Box<dyn BufRead + Send>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| AppError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(std::io::stdin()))),
    }
}

/// Run the host with optional config and frame paths.
///
/// `pacing` places frames that carry no `timestamp_ms` on the clock.
pub fn run(
    config_path: Option<&Path>,
    frames_path: Option<&Path>,
    pacing: Pacing,
) -> AppResult<()> {
    let config = load_config(config_path)?;
    let clock = MonotonicClock::new();
    let reader = open_frames(frames_path)?;

    let mut app = App::new(&config, clock.clone());
    let source = FrameSource::spawn(reader, clock, pacing);
    app.run(source);

    for line in app.summary() {
        println!("{}", line);
    }
    Ok(())
}
