//! Running clock behind the grass shader's `time` uniform.

use crate::time::Time;
use serde::{Deserialize, Serialize};

/// What gets added to the shader clock on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeAccumulation {
    /// Add the total time since start on every frame.
    ///
    /// The clock then grows quadratically with wall time and sway speeds up
    /// the longer the viewer runs. This looks like a defect in the frame
    /// loop the grass animation was tuned on; it stays the default so the
    /// animation keeps its look, use `FrameDelta` for a wall-clock uniform.
    #[default]
    SinceStart,
    /// Add the duration of the last frame. The clock tracks wall time.
    FrameDelta,
}

impl TimeAccumulation {
    /// Seconds to add for a frame with the given delta and total elapsed time.
    pub fn step(self, delta: f32, elapsed: f32) -> f32 {
        match self {
            TimeAccumulation::SinceStart => elapsed,
            TimeAccumulation::FrameDelta => delta,
        }
    }
}

/// Monotonic accumulator written into the time uniform each frame.
#[derive(Debug, Clone, Default)]
pub struct ShaderClock {
    strategy: TimeAccumulation,
    value: f32,
    ticks: u64,
}

impl ShaderClock {
    pub fn new(strategy: TimeAccumulation) -> Self {
        Self {
            strategy,
            value: 0.0,
            ticks: 0,
        }
    }

    /// Add `seconds` to the clock and return the new value.
    /// Negative inputs count as zero so the clock never runs backwards.
    pub fn tick(&mut self, seconds: f32) -> f32 {
        self.value += seconds.max(0.0);
        self.ticks += 1;
        self.value
    }

    /// Advance by one frame of `time` according to the configured strategy.
    pub fn advance(&mut self, time: &Time) -> f32 {
        let step = self.strategy.step(time.delta_seconds(), time.elapsed_seconds());
        self.tick(step)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn strategy(&self) -> TimeAccumulation {
        self.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_equals_sum_of_ticks() {
        let mut clock = ShaderClock::new(TimeAccumulation::FrameDelta);
        let ticks = [0.016_f32, 0.017, 0.5, 0.0, 1.25];
        for t in ticks {
            clock.tick(t);
        }
        let sum: f32 = ticks.iter().sum();
        assert!((clock.value() - sum).abs() < 1e-6);
        assert_eq!(clock.ticks(), 5);
    }

    #[test]
    fn clock_never_decreases() {
        let mut clock = ShaderClock::default();
        clock.tick(1.0);
        let after = clock.tick(-0.5);
        assert_eq!(after, 1.0);
    }

    #[test]
    fn since_start_strategy_grows_superlinearly() {
        // Four frames at 0.1 s each: elapsed is 0.1, 0.2, 0.3, 0.4.
        let mut since_start = ShaderClock::new(TimeAccumulation::SinceStart);
        let mut delta = ShaderClock::new(TimeAccumulation::FrameDelta);
        for frame in 1..=4 {
            let elapsed = frame as f32 * 0.1;
            since_start.tick(since_start.strategy().step(0.1, elapsed));
            delta.tick(delta.strategy().step(0.1, elapsed));
        }
        assert!((since_start.value() - 1.0).abs() < 1e-5);
        assert!((delta.value() - 0.4).abs() < 1e-5);
    }

    #[test]
    fn default_strategy_is_since_start() {
        assert_eq!(ShaderClock::default().strategy(), TimeAccumulation::SinceStart);
    }
}
