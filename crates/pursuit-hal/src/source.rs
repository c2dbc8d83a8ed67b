//! Inputs consumed by the control loop: the target position stream and the
//! operator's run signal.
//!
//! The detector runs at its own rate and overwrites the latest observation;
//! the control loop polls whatever is current.  There is no queue: a sample
//! that is overwritten before the next poll is simply never seen.
//!
//! # Example
//!
//! ```rust
//! use pursuit_hal::source::{LatestSample, PositionSource};
//! use pursuit_types::TargetSample;
//!
//! let slot = LatestSample::new();
//! let detector_side = slot.clone();
//!
//! assert_eq!(slot.sample(), None);
//! detector_side.publish(TargetSample::new(12, 110, 140));
//! assert_eq!(slot.sample(), Some(TargetSample::new(12, 110, 140)));
//! detector_side.clear();
//! assert_eq!(slot.sample(), None);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use pursuit_types::TargetSample;

/// Latest-value stream of target observations.
pub trait PositionSource: Send + Sync {
    /// The most recent observation, or `None` when no target is visible.
    fn sample(&self) -> Option<TargetSample>;
}

/// Operator "go" signal.
pub trait RunSignal: Send + Sync {
    /// `true` once the operator has asked the robot to start following.
    fn is_running(&self) -> bool;
}

// ────────────────────────────────────────────────────────────────────────────
// LatestSample
// ────────────────────────────────────────────────────────────────────────────

/// Shared single-slot mailbox between a detector and the control loop.
///
/// A whole [`TargetSample`] is written under one lock, so readers never see
/// fields from two different frames.  Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct LatestSample {
    slot: Arc<Mutex<Option<TargetSample>>>,
}

impl LatestSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current observation.
    pub fn publish(&self, sample: TargetSample) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(sample);
    }

    /// Mark the target as not visible.
    pub fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl PositionSource for LatestSample {
    fn sample(&self) -> Option<TargetSample> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RunFlag
// ────────────────────────────────────────────────────────────────────────────

/// Shared boolean run signal.  Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn halt(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RunSignal for RunFlag {
    fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn latest_value_overwrites() {
        let slot = LatestSample::new();
        slot.publish(TargetSample::new(1, 100, 150));
        slot.publish(TargetSample::new(2, 101, 151));
        assert_eq!(slot.sample(), Some(TargetSample::new(2, 101, 151)));
        // Polling does not consume the value.
        assert_eq!(slot.sample(), Some(TargetSample::new(2, 101, 151)));
    }

    #[test]
    fn samples_are_never_torn() {
        let slot = LatestSample::new();
        let writer = slot.clone();
        let handle = thread::spawn(move || {
            for i in 0..2_000 {
                writer.publish(TargetSample::new(i, i, i));
            }
        });
        for _ in 0..2_000 {
            if let Some(s) = slot.sample() {
                assert!(s.x == s.height && s.height == s.center_y, "torn sample {s:?}");
            }
        }
        handle.join().unwrap();
    }

    #[test]
    fn run_flag_is_shared_between_clones() {
        let flag = RunFlag::new();
        let operator = flag.clone();
        assert!(!flag.is_running());
        operator.start();
        assert!(flag.is_running());
        operator.halt();
        assert!(!flag.is_running());
    }
}
