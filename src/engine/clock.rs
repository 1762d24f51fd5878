//! The output-device sample counter, shared across threads.
//!
//! All scheduling happens against this clock, never against wall time. The
//! mixer advances it once per rendered block; while the stream is paused no
//! blocks render, so the clock freezes and queued events simply wait.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic count of samples the device has consumed.
///
/// Cloning is cheap and every clone observes the same counter.
#[derive(Clone)]
pub struct AudioClock {
    samples: Arc<AtomicU64>,
    sample_rate: u32,
}

impl AudioClock {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Arc::new(AtomicU64::new(0)),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples rendered so far.
    pub fn now_samples(&self) -> u64 {
        self.samples.load(Ordering::Relaxed)
    }

    /// Current time in seconds on the device clock.
    pub fn now(&self) -> f64 {
        self.now_samples() as f64 / self.sample_rate as f64
    }

    /// Called by the mixer after rendering a block.
    pub fn advance(&self, frames: u64) {
        self.samples.fetch_add(frames, Ordering::Relaxed);
    }
}
