//! Simulated collaborators for headless tests and demos.
//!
//! - [`ScriptedSource`] replays a fixed list of observations, one per poll.
//! - [`SimTarget`] synthesises a person wandering in front of the camera,
//!   including periodic drop-outs where the detector loses the target.
//! - [`RecordingSink`] stores every command it receives and can be switched
//!   into a fault state.
//! - [`LogSink`] reports commands through `tracing`.
//!
//! # Example
//!
//! ```rust
//! use pursuit_hal::sim::{RecordingSink, ScriptedSource};
//! use pursuit_hal::{CommandSink, PositionSource};
//! use pursuit_types::TargetSample;
//!
//! let source = ScriptedSource::new(vec![Some(TargetSample::new(0, 100, 150)), None]);
//! assert!(source.sample().is_some());
//! assert!(source.sample().is_none());
//!
//! let mut sink = RecordingSink::new();
//! sink.set_velocity(80.0, 0.1).expect("sim drive must succeed");
//! assert_eq!(sink.commands().len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use pursuit_types::{PursuitError, TargetSample, VelocityCommand};
use tracing::info;

use crate::sink::CommandSink;
use crate::source::PositionSource;

// ────────────────────────────────────────────────────────────────────────────
// Scripted source
// ────────────────────────────────────────────────────────────────────────────

/// Replays a script of observations; each poll consumes one entry.  Once the
/// script is exhausted every poll reports "no target".
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Option<TargetSample>>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Option<TargetSample>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Number of entries not yet replayed.
    pub fn remaining(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl PositionSource for ScriptedSource {
    fn sample(&self) -> Option<TargetSample> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .flatten()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wandering target
// ────────────────────────────────────────────────────────────────────────────

/// A synthetic person that sways left and right and drifts nearer and
/// further, disappearing for a few polls every `dropout_every` polls.
#[derive(Debug)]
pub struct SimTarget {
    tick: AtomicU64,
    calibrated_height: i32,
    dropout_every: u64,
    dropout_len: u64,
}

impl SimTarget {
    /// Create a target whose height oscillates around `calibrated_height`.
    pub fn new(calibrated_height: i32) -> Self {
        Self {
            tick: AtomicU64::new(0),
            calibrated_height,
            dropout_every: 40,
            dropout_len: 3,
        }
    }

    /// Lose the target for `len` polls out of every `every` polls.
    /// `every = 0` disables drop-outs.
    pub fn with_dropouts(mut self, every: u64, len: u64) -> Self {
        self.dropout_every = every;
        self.dropout_len = len;
        self
    }

    fn observe(&self, tick: u64) -> Option<TargetSample> {
        if self.dropout_every > 0 && tick % self.dropout_every >= self.dropout_every - self.dropout_len
        {
            return None;
        }
        let t = tick as f64 * 0.3;
        let x = (110.0 * (t * 0.35).sin()).round() as i32;
        let height = self.calibrated_height - 10 + (25.0 * (t * 0.2).sin()).round() as i32;
        Some(TargetSample::new(x, height, 150))
    }
}

impl PositionSource for SimTarget {
    fn sample(&self) -> Option<TargetSample> {
        let tick = self.tick.fetch_add(1, Ordering::Relaxed);
        self.observe(tick)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sinks
// ────────────────────────────────────────────────────────────────────────────

/// A simulated drive base that records every command.  Clones share the
/// same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Arc<Mutex<Vec<VelocityCommand>>>,
    faulted: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every command accepted so far.
    pub fn commands(&self) -> Vec<VelocityCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// When `true`, subsequent commands are rejected with a
    /// [`PursuitError::DriveFault`] and not recorded.
    pub fn set_faulted(&self, faulted: bool) {
        self.faulted.store(faulted, Ordering::Release);
    }
}

impl CommandSink for RecordingSink {
    fn id(&self) -> &str {
        "sim_drive"
    }

    fn set_velocity(&mut self, linear: f64, angular: f64) -> Result<(), PursuitError> {
        if self.faulted.load(Ordering::Acquire) {
            return Err(PursuitError::DriveFault {
                details: "sim_drive is in a fault state".to_string(),
            });
        }
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(VelocityCommand::new(linear, angular));
        Ok(())
    }
}

/// A drive sink that only logs the commands it receives.
#[derive(Debug, Default)]
pub struct LogSink;

impl CommandSink for LogSink {
    fn id(&self) -> &str {
        "log_drive"
    }

    fn set_velocity(&mut self, linear: f64, angular: f64) -> Result<(), PursuitError> {
        info!(v = linear, w = angular, "drive command");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_source_replays_in_order_then_goes_silent() {
        let a = TargetSample::new(-10, 100, 150);
        let b = TargetSample::new(5, 104, 150);
        let source = ScriptedSource::new(vec![Some(a), None, Some(b)]);
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.sample(), Some(a));
        assert_eq!(source.sample(), None);
        assert_eq!(source.sample(), Some(b));
        assert_eq!(source.sample(), None);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn sim_target_drops_out_periodically() {
        let target = SimTarget::new(120).with_dropouts(10, 2);
        let seen: Vec<bool> = (0..20).map(|_| target.sample().is_some()).collect();
        assert_eq!(seen.iter().filter(|s| !**s).count(), 4);
        assert!(!seen[8] && !seen[9] && !seen[18] && !seen[19]);
        assert!(seen[0] && seen[10]);
    }

    #[test]
    fn sim_target_without_dropouts_is_always_visible() {
        let target = SimTarget::new(120).with_dropouts(0, 0);
        assert!((0..100).all(|_| target.sample().is_some()));
    }

    #[test]
    fn sim_target_stays_near_calibrated_height() {
        let target = SimTarget::new(120).with_dropouts(0, 0);
        for _ in 0..200 {
            let s = target.sample().unwrap();
            assert!((85..=135).contains(&s.height), "height {}", s.height);
            assert!(s.x.abs() <= 110);
        }
    }

    #[test]
    fn recording_sink_records_and_faults() {
        let mut sink = RecordingSink::new();
        let observer = sink.clone();
        sink.set_velocity(100.0, 0.2).unwrap();
        sink.set_faulted(true);
        let err = sink.set_velocity(50.0, 0.0).unwrap_err();
        assert!(matches!(err, PursuitError::DriveFault { .. }));
        sink.set_faulted(false);
        sink.set_velocity(0.0, 0.0).unwrap();
        assert_eq!(
            observer.commands(),
            vec![VelocityCommand::new(100.0, 0.2), VelocityCommand::ZERO]
        );
    }

    #[test]
    fn log_sink_always_succeeds() {
        let mut sink = LogSink;
        assert_eq!(sink.id(), "log_drive");
        sink.set_velocity(12.0, -0.4).expect("log sink must succeed");
    }
}
