//! Decay cadence arithmetic.
//!
//! A policy fixes the total decay window and the tick interval; every tick
//! erodes each gauge by the same fixed delta so that an untouched gauge
//! reaches 0 exactly when the window elapses.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::store::GAUGE_MAX;

/// Full-gauge decay window in production: 2 hours.
pub const DEFAULT_DECAY_WINDOW: Duration = Duration::from_secs(2 * 60 * 60);
/// Production tick interval: 10 seconds.
pub const DEFAULT_DECAY_TICK: Duration = Duration::from_secs(10);
/// Fast-iteration window: 2 minutes.
pub const FAST_DECAY_WINDOW: Duration = Duration::from_secs(2 * 60);
/// Fast-iteration tick interval: 1 second.
pub const FAST_DECAY_TICK: Duration = Duration::from_secs(1);

/// Uniform decay schedule for all three gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayPolicy {
    window: Duration,
    tick: Duration,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            window: DEFAULT_DECAY_WINDOW,
            tick: DEFAULT_DECAY_TICK,
        }
    }
}

impl DecayPolicy {
    /// Create a policy. Falls back to the production cadence when the
    /// combination is degenerate (zero tick, or a window shorter than one
    /// tick); gauge erosion must never divide by zero or outpace its own
    /// clock.
    pub fn new(window: Duration, tick: Duration) -> Self {
        if tick.is_zero() || window < tick {
            return Self::default();
        }
        Self { window, tick }
    }

    /// The shortened cadence for fast-iteration builds.
    pub fn fast() -> Self {
        Self {
            window: FAST_DECAY_WINDOW,
            tick: FAST_DECAY_TICK,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Signed delta applied to every gauge on each tick:
    /// `-100 / (window / tick)`.
    pub fn per_tick_delta(&self) -> f64 {
        let ticks_per_window = self.window.as_secs_f64() / self.tick.as_secs_f64();
        -(GAUGE_MAX / ticks_per_window)
    }
}
