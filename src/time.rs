//! Time facilities for driving the simulation loop.
//!
//! Provides a single source of truth for elapsed time, per-tick delta, and
//! tick counting. Uses `std::time` for high-precision timing with no
//! external dependencies.
//!
//! A fixed delta turns the clock synthetic: every update reports exactly
//! the configured step regardless of wall time, which is how the spawn
//! cadence is tested deterministically.

use std::time::Instant;

/// Wall-clock or fixed-step time tracking for the simulation loop.
#[derive(Debug)]
pub struct Time {
    /// When the clock was created.
    start: Instant,
    /// When the last tick occurred.
    last_tick: Instant,
    /// Total elapsed time in seconds (cached for fast access).
    elapsed_secs: f32,
    /// Time since last tick in seconds.
    delta_secs: f32,
    /// Total ticks since start.
    tick_count: u64,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
}

impl Time {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            tick_count: 0,
            fixed_delta: None,
        }
    }

    /// Advance the clock. Call once per tick.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_tick).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta);
        self.last_tick = now;

        self.elapsed_secs = match self.fixed_delta {
            Some(_) => self.elapsed_secs + self.delta_secs,
            None => now.duration_since(self.start).as_secs_f32(),
        };
        self.tick_count += 1;

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time covered by the last tick in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total ticks since start.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick_count
    }

    /// Set a fixed delta time for deterministic updates.
    ///
    /// Pass `None` to return to wall-clock timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.tick(), 0);
        assert_eq!(time.delta(), 0.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(time.tick(), 1);
    }

    #[test]
    fn test_fixed_delta() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(0.5));

        for i in 1..=4 {
            let (elapsed, delta) = time.update();
            assert_eq!(delta, 0.5);
            assert!((elapsed - 0.5 * i as f32).abs() < 1e-6);
        }
        assert_eq!(time.tick(), 4);
    }
}
