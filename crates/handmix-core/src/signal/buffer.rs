//! Bounded per-hand observation history.

use std::collections::VecDeque;

use kurbo::Point;

use super::extrapolation::{EmaState, extrapolate_linear, extrapolate_quadratic};
use super::{ExtrapolationParams, ExtrapolationPolicy, Observation};

/// Default number of observations kept per hand.
pub const DEFAULT_CAPACITY: usize = 3;

/// FIFO of the most recent observations of one hand, oldest first.
///
/// The buffer is appended to or cleared on every perception result and
/// never otherwise mutated. A cleared buffer predicts nothing, so a hand
/// leaving the frame shows up as "no data" instead of a frozen position.
#[derive(Debug, Clone)]
pub struct HandBuffer {
    samples: VecDeque<Observation>,
    capacity: usize,
    params: ExtrapolationParams,
    /// Smoothed state for the EMA policy, reset together with `samples`.
    ema: Option<EmaState>,
}

impl HandBuffer {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize, params: ExtrapolationParams) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
            params,
            ema: None,
        }
    }

    /// Push an observation, evicting the oldest past capacity.
    pub fn append(&mut self, observation: Observation) {
        match observation.position() {
            Some(position) => {
                let time = observation.timestamp();
                match self.ema.as_mut() {
                    Some(state) => state.update(position, time, self.params.ema_alpha),
                    None => self.ema = Some(EmaState::seed(position, time)),
                }
            }
            None => self.ema = None,
        }

        self.samples.push_back(observation);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.ema = None;
    }

    /// Most recent observation, if any.
    pub fn latest(&self) -> Option<&Observation> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn params(&self) -> &ExtrapolationParams {
        &self.params
    }

    /// Observations oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.samples.iter()
    }

    /// Predict the hand position at `now` (same clock as the timestamps).
    ///
    /// Empty buffer: `None`. One sample: that sample's position. Any
    /// non-positive interval in the samples the policy reads: the latest
    /// position, unextrapolated.
    pub fn extrapolate(&self, now: f64) -> Option<Point> {
        let latest = self.samples.back()?;
        let position = latest.position()?;
        if self.samples.len() == 1 {
            return Some(position);
        }

        let predicted = match self.params.policy {
            ExtrapolationPolicy::Kinematic => self.extrapolate_kinematic(now),
            ExtrapolationPolicy::Ema => {
                if self.has_degenerate_interval(self.samples.len()) {
                    None
                } else {
                    self.ema.map(|state| state.predict(now))
                }
            }
        };
        Some(predicted.unwrap_or(position))
    }

    fn extrapolate_kinematic(&self, now: f64) -> Option<Point> {
        let window = self.samples.len().min(3);
        if self.has_degenerate_interval(window) {
            return None;
        }

        let mut recent = self.samples.iter().rev().take(window);
        let (p2, t2) = sample(recent.next()?)?;
        let (p1, t1) = sample(recent.next()?)?;

        match recent.next() {
            Some(oldest) => {
                let (p0, t0) = sample(oldest)?;
                Some(extrapolate_quadratic(
                    [(p0, t0), (p1, t1), (p2, t2)],
                    now,
                    self.params.max_acceleration,
                ))
            }
            None => Some(extrapolate_linear(p1, t1, p2, t2, now)),
        }
    }

    /// True if any consecutive pair among the last `window` samples is not
    /// strictly increasing in time.
    fn has_degenerate_interval(&self, window: usize) -> bool {
        let skip = self.samples.len().saturating_sub(window);
        let recent = self.samples.iter().skip(skip);
        recent
            .clone()
            .zip(recent.skip(1))
            .any(|(a, b)| b.timestamp() - a.timestamp() <= 0.0)
    }
}

impl Default for HandBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, ExtrapolationParams::default())
    }
}

fn sample(observation: &Observation) -> Option<(Point, f64)> {
    observation
        .position()
        .map(|position| (position, observation.timestamp()))
}
