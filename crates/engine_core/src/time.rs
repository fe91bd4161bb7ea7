//! Time management for the game loop.
//!
//! Frames arrive with arbitrary deltas; the simulation runs on a fixed tick.
//! [`Time`] accumulates frame time, hands out whole ticks through
//! [`Time::should_fixed_update`] and reports the leftover fraction for
//! render interpolation.

use std::time::Duration;

/// Default simulation rate in ticks per second.
pub const DEFAULT_TICK_RATE: f64 = 64.0;

/// Upper bound on banked frame time. After a stall the simulation catches up
/// at most this much instead of spiralling.
pub const DEFAULT_MAX_ACCUMULATED: Duration = Duration::from_secs(2);

/// Length of one tick at `hz`, or `None` if the rate is not positive and
/// finite or its tick does not fit a nonzero [`Duration`].
pub fn tick_duration(hz: f64) -> Option<Duration> {
    if !hz.is_finite() || hz <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / hz)
        .ok()
        .filter(|step| !step.is_zero())
}

/// Manages the fixed-tick accumulator.
#[derive(Debug)]
pub struct Time {
    /// Fixed timestep for the simulation (default 1/64 s).
    fixed_timestep: Duration,
    /// Accumulated time not yet consumed by fixed ticks.
    accumulator: Duration,
    /// Clamp for the accumulator.
    max_accumulated: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager running at [`DEFAULT_TICK_RATE`].
    pub fn new() -> Self {
        Self {
            fixed_timestep: Duration::from_nanos(15_625_000),
            accumulator: Duration::ZERO,
            max_accumulated: DEFAULT_MAX_ACCUMULATED,
        }
    }

    /// Create a time manager with a custom tick rate (Hz) and accumulator bound.
    pub fn with_rate(hz: f64, max_accumulated: Duration) -> Self {
        let mut time = Self::new();
        time.set_fixed_rate(hz);
        time.max_accumulated = max_accumulated;
        time
    }

    /// Feed an explicit frame delta into the accumulator.
    ///
    /// Returns true if the accumulator hit its upper bound and time was dropped.
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.accumulator = self.accumulator.saturating_add(delta);

        if self.accumulator > self.max_accumulated {
            log::warn!(
                "Frame delta {:.3}s exceeds catch-up window, dropping {:.3}s",
                delta.as_secs_f32(),
                (self.accumulator - self.max_accumulated).as_secs_f32()
            );
            self.accumulator = self.max_accumulated;
            true
        } else {
            false
        }
    }

    /// Get the fixed timestep as a Duration.
    pub fn fixed_timestep(&self) -> Duration {
        self.fixed_timestep
    }

    /// Maximum number of ticks a single frame can ever trigger.
    pub fn max_ticks_per_frame(&self) -> u32 {
        (self.max_accumulated.as_nanos() / self.fixed_timestep.as_nanos().max(1)) as u32
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Fraction of a tick left in the accumulator, in `[0, 1)`.
    ///
    /// Only meaningful after all pending ticks were consumed. Rendering uses
    /// it to blend between the previous and current object transforms.
    pub fn alpha(&self) -> f32 {
        let alpha = self.accumulator.as_secs_f64() / self.fixed_timestep.as_secs_f64();
        (alpha as f32).clamp(0.0, 1.0 - f32::EPSILON)
    }

    /// Set the fixed timestep rate in Hz. An unusable rate is logged and
    /// the current timestep kept; returns whether the rate was applied.
    pub fn set_fixed_rate(&mut self, hz: f64) -> bool {
        match tick_duration(hz) {
            Some(step) => {
                self.fixed_timestep = step;
                true
            }
            None => {
                log::warn!(
                    "Tick rate {} Hz has no usable timestep, keeping {:?}",
                    hz,
                    self.fixed_timestep
                );
                false
            }
        }
    }
}
