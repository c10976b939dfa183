//! Time management for the frame loop.

use std::time::{Duration, Instant};

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time when the loop started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        self.advance_to(Instant::now());
    }

    fn advance_to(&mut self, now: Instant) {
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.elapsed = now - self.start_time;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get total elapsed time as Duration.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// A frame-rate sample taken over one measurement window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsSample {
    pub fps: f32,
    /// Mean frame time in milliseconds.
    pub frame_ms: f32,
}

/// Counts frames and reports the rate once per window.
#[derive(Debug)]
pub struct FpsMeter {
    window: Duration,
    frames: u32,
    accumulated: Duration,
    latest: Option<FpsSample>,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FpsMeter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            frames: 0,
            accumulated: Duration::ZERO,
            latest: None,
        }
    }

    /// Record one frame. Returns a fresh sample when the window fills up.
    pub fn record(&mut self, frame_time: Duration) -> Option<FpsSample> {
        self.frames += 1;
        self.accumulated += frame_time;
        if self.accumulated < self.window {
            return None;
        }

        let seconds = self.accumulated.as_secs_f32();
        let sample = FpsSample {
            fps: self.frames as f32 / seconds,
            frame_ms: seconds * 1000.0 / self.frames as f32,
        };
        self.frames = 0;
        self.accumulated = Duration::ZERO;
        self.latest = Some(sample);
        Some(sample)
    }

    /// Most recent completed sample.
    pub fn latest(&self) -> Option<FpsSample> {
        self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_tracks_delta_and_elapsed() {
        let mut time = Time::new();
        let start = time.start_time;
        time.advance_to(start + Duration::from_millis(16));
        time.advance_to(start + Duration::from_millis(50));
        assert_eq!(time.frame_count(), 2);
        assert_eq!(time.delta(), Duration::from_millis(34));
        assert_eq!(time.elapsed(), Duration::from_millis(50));
    }

    #[test]
    fn fps_meter_reports_once_per_window() {
        let mut meter = FpsMeter::new(Duration::from_secs(1));
        let frame = Duration::from_millis(20);
        for _ in 0..49 {
            assert!(meter.record(frame).is_none());
        }
        let sample = meter.record(frame).expect("window full after 50 frames");
        assert!((sample.fps - 50.0).abs() < 1e-3);
        assert!((sample.frame_ms - 20.0).abs() < 1e-3);
        assert_eq!(meter.latest(), Some(sample));
        assert!(meter.record(frame).is_none());
    }
}
