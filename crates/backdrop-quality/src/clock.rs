//! Monotonic time sources for frame measurement.
//!
//! The governor reads time only through [`FrameClock`], so hosts that
//! already carry a frame timestamp (or tests that need exact timings) can
//! drive it with a [`ManualClock`] instead of the system clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic timeline measured from an arbitrary fixed origin.
pub trait FrameClock {
    /// Time elapsed since this clock's origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time from [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    /// Origin of the timeline.
    origin: Instant,
}

impl SystemClock {
    /// A clock whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock advanced explicitly by its owner.
///
/// Clones share one timeline: a host keeps one handle and hands a clone to
/// the governor, then advances it as frames are presented.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    /// Nanoseconds since the origin.
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// A clock at its origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        let step = u64::try_from(step.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .nanos
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_add(step))
            });
    }

    /// Jump to an absolute position on the timeline.
    pub fn set(&self, at: Duration) {
        let at = u64::try_from(at.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.store(at, Ordering::Relaxed);
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_millis(16));
        handle.advance(Duration::from_millis(4));
        assert_eq!(clock.now(), Duration::from_millis(20));
    }

    #[test]
    fn manual_clock_can_jump() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(3));
        assert_eq!(clock.now(), Duration::from_secs(3));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
