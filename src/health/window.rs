//! Sliding RTT window.
//!
//! # Responsibilities
//! - Keep exactly the latest N samples, oldest evicted first
//! - Reduce them to one smoothed RTT (truncating integer mean)

use std::collections::VecDeque;

use crate::failover::Path;

/// Fixed-capacity FIFO of RTT samples in milliseconds.
///
/// The window is filled to capacity on creation, so its length never changes.
#[derive(Debug, Clone)]
pub struct RttWindow {
    samples: VecDeque<u64>,
}

impl RttWindow {
    /// Create a window of `capacity` copies of `value`.
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn filled(capacity: usize, value: u64) -> Self {
        assert!(capacity > 0, "RTT window capacity must be non-zero");
        Self {
            samples: std::iter::repeat(value).take(capacity).collect(),
        }
    }

    /// Starting window for a sampling loop on `path`.
    ///
    /// On minor every slot starts at the penalty value, so major has to earn
    /// its way back with real samples. On major the window starts at zero.
    pub fn for_path(path: Path, capacity: usize, penalty_ms: u64) -> Self {
        match path {
            Path::Major => Self::filled(capacity, 0),
            Path::Minor => Self::filled(capacity, penalty_ms),
        }
    }

    /// Append a sample, evicting the oldest.
    pub fn push(&mut self, sample_ms: u64) {
        self.samples.pop_front();
        self.samples.push_back(sample_ms);
    }

    /// Truncating mean of the window.
    pub fn smoothed(&self) -> u64 {
        let sum: u64 = self.samples.iter().copied().fold(0, u64::saturating_add);
        sum / self.samples.len() as u64
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Samples from oldest to newest.
    pub fn samples(&self) -> impl Iterator<Item = u64> + '_ {
        self.samples.iter().copied()
    }
}
