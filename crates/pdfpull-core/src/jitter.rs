//! Randomized inter-request delay.
//!
//! Randomness and sleeping sit behind small traits so the batch driver can be
//! run with a seeded or scripted source and without blocking in tests.

use std::time::Duration;

use crate::config::ConfigError;

/// Source of randomness for header rotation and delay jitter.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Uniform real number in `[min, max]`; returns `min` when `min == max`.
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

impl RandomSource for fastrand::Rng {
    fn pick_index(&mut self, len: usize) -> usize {
        self.usize(..len)
    }

    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        (min + (max - min) * self.f64()).min(max)
    }
}

/// Blocks the caller for a delay.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Sleeps the current thread. The whole batch waits; nothing else runs meanwhile.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Validated `[min, max]` delay in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    min_secs: f64,
    max_secs: f64,
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min_secs: 5.0,
            max_secs: 15.0,
        }
    }
}

impl DelayRange {
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self, ConfigError> {
        // `Duration::from_secs_f64` panics past `Duration::MAX`.
        let valid = min_secs.is_finite()
            && max_secs.is_finite()
            && min_secs >= 0.0
            && min_secs <= max_secs
            && max_secs <= Duration::MAX.as_secs_f64();
        if !valid {
            return Err(ConfigError::InvalidDelay {
                min: min_secs,
                max: max_secs,
            });
        }
        Ok(Self { min_secs, max_secs })
    }

    /// No delay at all; used by tests and one-off fetches.
    pub fn none() -> Self {
        Self {
            min_secs: 0.0,
            max_secs: 0.0,
        }
    }

    pub fn min_secs(&self) -> f64 {
        self.min_secs
    }

    pub fn max_secs(&self) -> f64 {
        self.max_secs
    }

    /// Draws a fresh delay, clamped into the range.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Duration {
        let secs = rng
            .uniform(self.min_secs, self.max_secs)
            .clamp(self.min_secs, self.max_secs);
        Duration::from_secs_f64(secs)
    }
}
