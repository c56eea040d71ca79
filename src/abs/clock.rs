//! Resettable monotonic clock used to drive animation.

use std::time::Instant;

/// Seconds elapsed since creation (or since the last reset), plus a base value.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    origin: Instant,
    base: f32,
}

impl FrameClock {
    /// Starts a clock that reads `0.0` now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            base: 0.0,
        }
    }

    /// Returns the current time in seconds.
    pub fn time(&self) -> f32 {
        self.base + self.origin.elapsed().as_secs_f32()
    }

    /// Makes the clock read `value` now and keep counting from there.
    pub fn reset(&mut self, value: f32) {
        self.origin = Instant::now();
        self.base = value;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
