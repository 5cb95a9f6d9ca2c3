//! Perception frames read from a JSON-lines stream on a background thread.

use std::io::BufRead;
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use handmix_core::{FrameResult, MonotonicClock};

/// Capture cadence assumed for recordings without timestamps (30 fps).
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 30.0;

/// A parsed frame and its capture time on the shared clock.
#[derive(Debug, Clone)]
pub struct StampedFrame {
    pub frame: FrameResult,
    pub timestamp: f64,
}

/// How frames without a capture timestamp are placed on the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pacing {
    /// The recognizer writes frames as it captures them; stamp on arrival.
    Live,
    /// A recording read faster than it was captured; release one frame
    /// every `frame_interval_ms`.
    Replay { frame_interval_ms: f64 },
}

/// Assigns each frame its time on the shared clock.
///
/// Frames carrying `timestamp_ms` keep their recorded spacing, anchored at
/// the arrival of the first such frame.
#[derive(Debug, Clone)]
struct Schedule {
    pacing: Pacing,
    /// (recognizer time, clock time) of the first timestamped frame.
    anchor: Option<(f64, f64)>,
    next_replay: Option<f64>,
}

impl Schedule {
    fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            anchor: None,
            next_replay: None,
        }
    }

    fn due(&mut self, capture_ms: Option<f64>, now: f64) -> f64 {
        if let Some(capture) = capture_ms {
            let (capture0, clock0) = *self.anchor.get_or_insert((capture, now));
            return clock0 + (capture - capture0);
        }
        match self.pacing {
            Pacing::Live => now,
            Pacing::Replay { frame_interval_ms } => {
                let due = self.next_replay.unwrap_or(now);
                self.next_replay = Some(due + frame_interval_ms);
                due
            }
        }
    }
}

/// Reads one frame per line and hands them to the render loop.
///
/// Each frame is released when the shared clock reaches its capture time,
/// so the render loop sees recordings at their real cadence. A line that
/// fails to parse is delivered as an empty frame, which clears both hands.
pub struct FrameSource {
    frame_rx: Receiver<StampedFrame>,
    closed: bool,
    _thread: Option<JoinHandle<()>>,
}

impl FrameSource {
    /// Start reading `reader` on a new thread.
    pub fn spawn(
        reader: impl BufRead + Send + 'static,
        clock: MonotonicClock,
        pacing: Pacing,
    ) -> Self {
        let (frame_tx, frame_rx) = channel::<StampedFrame>();

        let handle = thread::spawn(move || {
            log::info!("Frame reader started ({:?})", pacing);
            let mut schedule = Schedule::new(pacing);
            let mut received = 0usize;
            for (number, line) in reader.lines().enumerate() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::error!("Frame read error: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                let frame = FrameResult::from_json(&line).unwrap_or_else(|e| {
                    log::warn!("Malformed line {}, clearing hands: {}", number + 1, e);
                    FrameResult::default()
                });

                let timestamp = schedule.due(frame.timestamp_ms, clock.now_ms());
                let wait = timestamp - clock.now_ms();
                if wait > 0.0 && wait.is_finite() {
                    thread::sleep(Duration::from_secs_f64(wait / 1000.0));
                }

                received += 1;
                if frame_tx.send(StampedFrame { frame, timestamp }).is_err() {
                    log::debug!("Frame receiver dropped");
                    break;
                }
            }
            log::info!("Frame reader exiting after {} frames", received);
        });

        Self {
            frame_rx,
            closed: false,
            _thread: Some(handle),
        }
    }

    /// Drain frames received so far, oldest first (non-blocking).
    pub fn poll_frames(&mut self) -> Vec<StampedFrame> {
        let mut frames = Vec::new();
        loop {
            match self.frame_rx.try_recv() {
                Ok(frame) => frames.push(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
        frames
    }

    /// The reader is gone and every frame it sent has been polled.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Instant;

    const EPSILON: f64 = 1e-9;

    fn drain(source: &mut FrameSource) -> Vec<StampedFrame> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut frames = Vec::new();
        while !source.is_closed() && Instant::now() < deadline {
            frames.extend(source.poll_frames());
            thread::sleep(Duration::from_millis(1));
        }
        frames
    }

    fn read_all(input: &str, pacing: Pacing) -> Vec<StampedFrame> {
        let reader = Cursor::new(input.to_string());
        let mut source = FrameSource::spawn(reader, MonotonicClock::new(), pacing);
        let frames = drain(&mut source);
        assert!(source.is_closed());
        frames
    }

    #[test]
    fn test_reads_frames_in_order() {
        let input = concat!(
            "{\"hands\": []}\n",
            "\n",
            "{\"hands\": [{\"handedness\": \"Left\", \"landmarks\": []}]}\n",
        );
        let frames = read_all(input, Pacing::Live);
        assert_eq!(frames.len(), 2);
        assert!(frames[0].frame.hands.is_empty());
        assert_eq!(frames[1].frame.hands.len(), 1);
        assert!(frames[0].timestamp <= frames[1].timestamp);
    }

    #[test]
    fn test_malformed_lines_become_empty_frames() {
        let input = "{\"hands\": [{\"handedness\": \"Left\"}]}\nnot json\n{\"hands\": 3}\n";
        let frames = read_all(input, Pacing::Live);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].frame.hands.len(), 1);
        assert!(frames[1].frame.hands.is_empty());
        assert!(frames[2].frame.hands.is_empty());
    }

    #[test]
    fn test_replay_releases_at_frame_interval() {
        let input = "{}\n{}\n{}\n";
        let started = Instant::now();
        let frames = read_all(input, Pacing::Replay { frame_interval_ms: 20.0 });
        assert_eq!(frames.len(), 3);
        assert!((frames[1].timestamp - frames[0].timestamp - 20.0).abs() < EPSILON);
        assert!((frames[2].timestamp - frames[1].timestamp - 20.0).abs() < EPSILON);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_capture_timestamps_keep_spacing() {
        let input = concat!(
            "{\"timestamp_ms\": 5000}\n",
            "{\"timestamp_ms\": 5020}\n",
            "{\"timestamp_ms\": 5050}\n",
        );
        let frames = read_all(input, Pacing::Replay { frame_interval_ms: 1.0 });
        assert!((frames[1].timestamp - frames[0].timestamp - 20.0).abs() < EPSILON);
        assert!((frames[2].timestamp - frames[1].timestamp - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_schedule_live_stamps_now() {
        let mut schedule = Schedule::new(Pacing::Live);
        assert_eq!(schedule.due(None, 12.0), 12.0);
        assert_eq!(schedule.due(None, 13.5), 13.5);
    }
}
