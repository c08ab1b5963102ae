//! Bounded FIFO of recent instantaneous FPS readings.

use std::collections::VecDeque;

/// Default number of readings kept.
pub const DEFAULT_WINDOW_CAPACITY: usize = 120;

/// The most recent `capacity` FPS readings, oldest first.
///
/// The mean is a plain unweighted average over whatever is present, so the
/// governor reacts to a sustained change only after it has displaced a
/// large share of the window.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWindow {
    /// Readings, oldest at the front.
    samples: VecDeque<f64>,
    /// Maximum number of readings retained.
    capacity: usize,
}

impl SampleWindow {
    /// An empty window holding at most `capacity` readings.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest when over capacity.
    pub fn push(&mut self, fps: f64) {
        self.samples.push_back(fps);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Arithmetic mean of the retained readings, or `None` when empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().sum();
        // Window sizes are tiny relative to 2^52.
        Some(sum / self.samples.len() as f64)
    }

    /// Number of readings currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no readings are held.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of readings retained.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every reading.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Iterate readings from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}
