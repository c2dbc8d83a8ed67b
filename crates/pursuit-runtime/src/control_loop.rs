//! [`ControlLoop`] – fixed-cadence person-following state machine.
//!
//! The loop has two phases:
//!
//! 1. **Idle** – poll the [`RunSignal`] every `idle_poll_ms` until the
//!    operator starts the robot.
//! 2. **Tracking** – every `period_ms`, read the latest [`TargetSample`],
//!    run one [`step`][ControlLoop::step] and send the resulting command to
//!    the [`CommandSink`].
//!
//! There is no transition back from Tracking to Idle.  A [`StopSignal`] ends
//! the loop from either phase, after which one final zero command is sent.
//!
//! All per-cycle logic lives in the pure [`ControlLoop::step`]; the only
//! state carried between cycles is the [`TrackingState`] it returns.
//!
//! # Example
//!
//! ```rust
//! use pursuit_fuzzy::{ControllerConfig, FuzzyController};
//! use pursuit_runtime::control_loop::{ControlLoop, LoopConfig, TrackingState};
//! use pursuit_types::TargetSample;
//!
//! let controller = FuzzyController::new(&ControllerConfig::default(), 120.0).unwrap();
//! let control = ControlLoop::new(controller, LoopConfig::default()).unwrap();
//!
//! let (state, report) = control.step(TrackingState::default(), Some(TargetSample::new(60, 95, 150)));
//! assert!(report.command.linear > 0.0);
//! assert!(report.command.angular < 0.0); // target on the right: turn right
//! assert_eq!(state.prev_x, Some(60));
//! ```

use std::fmt;
use std::time::Duration;

use pursuit_fuzzy::{ControlOutput, ControllerInputs, FuzzyController};
use pursuit_hal::{CommandSink, PositionSource, RunSignal};
use pursuit_types::{PursuitError, TargetSample, VelocityCommand};
use serde::{Deserialize, Serialize};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::stop::StopSignal;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Timing and override settings for [`ControlLoop`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Tracking cycle period.
    pub period_ms: u64,
    /// Run-signal poll period while Idle.
    pub idle_poll_ms: u64,
    /// A target whose centre is at or above this pixel row is treated as
    /// within arm's reach and the robot stops advancing.
    pub near_field_threshold: i32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            period_ms: 300,
            idle_poll_ms: 1000,
            near_field_threshold: 30,
        }
    }
}

impl LoopConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// State and reports
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Tracking,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => f.write_str("idle"),
            Phase::Tracking => f.write_str("tracking"),
        }
    }
}

/// The previous target position, used for the one-step finite difference.
/// `None` means unknown: never seen, or lost on the previous cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingState {
    pub prev_x: Option<i32>,
    pub prev_height: Option<i32>,
}

impl TrackingState {
    pub fn is_tracking(&self) -> bool {
        self.prev_x.is_some()
    }
}

/// Everything one cycle decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// The command to send, in platform convention (left turn positive).
    pub command: VelocityCommand,
    pub x_rate: f64,
    pub height_rate: f64,
    /// Controller result; `None` when no target was visible.
    pub output: Option<ControlOutput>,
    /// `true` when the near-field override zeroed the forward speed.
    pub near_field: bool,
}

impl CycleReport {
    fn target_lost() -> Self {
        Self {
            command: VelocityCommand::ZERO,
            x_rate: 0.0,
            height_rate: 0.0,
            output: None,
            near_field: false,
        }
    }
}

/// Counters returned by [`ControlLoop::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    /// Phase the loop was in when it stopped.
    pub phase: Option<Phase>,
    /// Tracking cycles executed.
    pub cycles: u64,
    /// Cycles in which no target was visible.
    pub target_lost_cycles: u64,
    /// Commands the sink rejected.
    pub sink_faults: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// ControlLoop
// ─────────────────────────────────────────────────────────────────────────────

/// Couples a [`FuzzyController`] to its sources and sink at a fixed rate.
#[derive(Debug, Clone)]
pub struct ControlLoop {
    controller: FuzzyController,
    config: LoopConfig,
}

impl ControlLoop {
    /// # Errors
    ///
    /// Returns [`PursuitError::Config`] if either period is zero.
    pub fn new(controller: FuzzyController, config: LoopConfig) -> Result<Self, PursuitError> {
        if config.period_ms == 0 {
            return Err(PursuitError::Config(
                "control_loop.period_ms must be greater than zero".to_string(),
            ));
        }
        if config.idle_poll_ms == 0 {
            return Err(PursuitError::Config(
                "control_loop.idle_poll_ms must be greater than zero".to_string(),
            ));
        }
        Ok(Self { controller, config })
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// One tracking cycle: `(state, sample) → (state', report)`.
    ///
    /// A missing sample yields the zero command and forgets the previous
    /// position, so the first cycle after re-acquisition sees zero rates.
    pub fn step(
        &self,
        state: TrackingState,
        sample: Option<TargetSample>,
    ) -> (TrackingState, CycleReport) {
        let Some(sample) = sample else {
            return (TrackingState::default(), CycleReport::target_lost());
        };

        let x_rate = rate(sample.x, state.prev_x);
        let height_rate = rate(sample.height, state.prev_height);

        let output = self.controller.compute(ControllerInputs {
            x: f64::from(sample.x),
            x_rate,
            height: f64::from(sample.height),
            height_rate,
        });

        let near_field = sample.center_y <= self.config.near_field_threshold;
        let linear = if near_field { 0.0 } else { output.linear };
        // Controller turns right positive; the drive base turns left positive.
        let command = VelocityCommand::new(linear, -output.angular);

        let next = TrackingState {
            prev_x: Some(sample.x),
            prev_height: Some(sample.height),
        };
        let report = CycleReport {
            command,
            x_rate,
            height_rate,
            output: Some(output),
            near_field,
        };
        (next, report)
    }

    /// Drive the Idle → Tracking state machine until `stop` fires.
    ///
    /// The sink receives exactly one command per tracking cycle, plus a final
    /// zero command when the loop stops.  Sink errors are logged and counted
    /// but never end the loop.
    pub async fn run<S, R, K>(
        &self,
        source: &S,
        run_signal: &R,
        sink: &mut K,
        mut stop: StopSignal,
    ) -> LoopStats
    where
        S: PositionSource + ?Sized,
        R: RunSignal + ?Sized,
        K: CommandSink + ?Sized,
    {
        let mut stats = LoopStats {
            phase: Some(Phase::Idle),
            ..LoopStats::default()
        };
        info!(phase = %Phase::Idle, sink = sink.id(), "control loop waiting for run signal");

        let mut idle = interval(self.config.idle_poll());
        idle.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = stop.stopped() => {
                    info!(phase = %Phase::Idle, "control loop stopped");
                    emit(sink, VelocityCommand::ZERO, &mut stats);
                    return stats;
                }
                _ = idle.tick() => {
                    if run_signal.is_running() {
                        break;
                    }
                }
            }
        }

        stats.phase = Some(Phase::Tracking);
        info!(
            phase = %Phase::Tracking,
            period_ms = self.config.period_ms,
            "run signal received, tracking target"
        );

        let mut ticker = interval(self.config.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut state = TrackingState::default();
        loop {
            tokio::select! {
                biased;
                _ = stop.stopped() => break,
                _ = ticker.tick() => {
                    let sample = source.sample();
                    match (state.is_tracking(), sample.is_some()) {
                        (true, false) => warn!("target lost"),
                        (false, true) if stats.cycles > 0 => info!("target reacquired"),
                        _ => {}
                    }

                    let (next, report) = self.step(state, sample);
                    state = next;
                    stats.cycles += 1;
                    if report.output.is_none() {
                        stats.target_lost_cycles += 1;
                    }
                    debug!(
                        cycle = stats.cycles,
                        v = report.command.linear,
                        w = report.command.angular,
                        xd = report.x_rate,
                        yd = report.height_rate,
                        near_field = report.near_field,
                        "control cycle"
                    );
                    emit(sink, report.command, &mut stats);
                }
            }
        }

        info!(phase = %Phase::Tracking, cycles = stats.cycles, "control loop stopped");
        emit(sink, VelocityCommand::ZERO, &mut stats);
        stats
    }
}

fn rate(current: i32, previous: Option<i32>) -> f64 {
    previous.map_or(0.0, |prev| f64::from(current) - f64::from(prev))
}

fn emit<K: CommandSink + ?Sized>(sink: &mut K, command: VelocityCommand, stats: &mut LoopStats) {
    if let Err(e) = sink.set_velocity(command.linear, command.angular) {
        stats.sink_faults += 1;
        warn!(sink = sink.id(), error = %e, "drive command rejected");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stop::StopHandle;
    use pursuit_fuzzy::ControllerConfig;
    use pursuit_hal::RunFlag;
    use pursuit_hal::sim::{RecordingSink, ScriptedSource};

    fn control_loop() -> ControlLoop {
        let controller = FuzzyController::new(&ControllerConfig::default(), 120.0).unwrap();
        ControlLoop::new(controller, LoopConfig::default()).unwrap()
    }

    fn visible(x: i32, height: i32) -> Option<TargetSample> {
        Some(TargetSample::new(x, height, 150))
    }

    // ── step ──────────────────────────────────────────────────────────────────

    #[test]
    fn first_sample_has_zero_rates() {
        let (state, report) = control_loop().step(TrackingState::default(), visible(10, 100));
        assert_eq!(report.x_rate, 0.0);
        assert_eq!(report.height_rate, 0.0);
        assert_eq!(state.prev_x, Some(10));
        assert_eq!(state.prev_height, Some(100));
    }

    #[test]
    fn rates_are_one_step_differences() {
        let control = control_loop();
        let (state, _) = control.step(TrackingState::default(), visible(10, 100));
        let (_, report) = control.step(state, visible(25, 104));
        assert_eq!(report.x_rate, 15.0);
        assert_eq!(report.height_rate, 4.0);
    }

    #[test]
    fn target_loss_sends_zero_and_resets_rates() {
        let control = control_loop();
        let (state, _) = control.step(TrackingState::default(), visible(10, 100));
        let (state, _) = control.step(state, visible(25, 104));

        let (state, lost) = control.step(state, None);
        assert_eq!(lost.command, VelocityCommand::ZERO);
        assert!(lost.output.is_none());
        assert_eq!(state, TrackingState::default());

        let (_, report) = control.step(state, visible(40, 110));
        assert_eq!(report.x_rate, 0.0);
        assert_eq!(report.height_rate, 0.0);
    }

    #[test]
    fn angular_sign_is_flipped_for_the_platform() {
        let (_, report) = control_loop().step(TrackingState::default(), visible(70, 100));
        let output = report.output.unwrap();
        assert!(output.angular > 0.0);
        assert_eq!(report.command.angular, -output.angular);
    }

    #[test]
    fn near_field_forces_linear_to_zero() {
        let control = control_loop();
        let (_, far) = control.step(TrackingState::default(), visible(0, 90));
        assert!(far.command.linear > 0.0);
        assert!(!far.near_field);

        let (_, near) =
            control.step(TrackingState::default(), Some(TargetSample::new(0, 90, 20)));
        assert!(near.near_field);
        assert_eq!(near.command.linear, 0.0);
        // Turning is unaffected by the override.
        assert_eq!(near.command.angular, far.command.angular);
    }

    #[test]
    fn near_field_threshold_is_inclusive() {
        let (_, report) =
            control_loop().step(TrackingState::default(), Some(TargetSample::new(0, 90, 30)));
        assert!(report.near_field);
    }

    #[test]
    fn saturated_distance_forces_linear_to_zero() {
        let (_, report) = control_loop().step(TrackingState::default(), visible(0, 130));
        assert!(report.output.unwrap().distance_saturated);
        assert!(!report.near_field);
        assert_eq!(report.command.linear, 0.0);
    }

    #[test]
    fn step_is_deterministic() {
        let control = control_loop();
        let state = TrackingState {
            prev_x: Some(-20),
            prev_height: Some(95),
        };
        assert_eq!(
            control.step(state, visible(-35, 98)),
            control.step(state, visible(-35, 98))
        );
    }

    #[test]
    fn zero_period_is_rejected() {
        let controller = FuzzyController::new(&ControllerConfig::default(), 120.0).unwrap();
        let config = LoopConfig {
            period_ms: 0,
            ..LoopConfig::default()
        };
        assert!(matches!(
            ControlLoop::new(controller, config),
            Err(PursuitError::Config(_))
        ));
    }

    #[test]
    fn loop_config_deserializes_with_defaults() {
        let config: LoopConfig = toml::from_str("near_field_threshold = 12").unwrap();
        assert_eq!(config.near_field_threshold, 12);
        assert_eq!(config.period(), Duration::from_millis(300));
        assert_eq!(config.idle_poll(), Duration::from_secs(1));
    }

    // ── run ───────────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn stop_while_idle_sends_single_zero_command() {
        let control = control_loop();
        let source = ScriptedSource::new(vec![visible(10, 100)]);
        let flag = RunFlag::new();
        let mut sink = RecordingSink::new();
        let observer = sink.clone();
        let (handle, signal) = StopHandle::new();

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(2_500)).await;
            handle.stop();
        };
        let (stats, ()) = tokio::join!(control.run(&source, &flag, &mut sink, signal), stopper);

        assert_eq!(stats.phase, Some(Phase::Idle));
        assert_eq!(stats.cycles, 0);
        assert_eq!(observer.commands(), vec![VelocityCommand::ZERO]);
        // Nothing was read from the source while idle.
        assert_eq!(source.remaining(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_tracking_ends_with_zero_command() {
        let control = control_loop();
        let source = ScriptedSource::new(vec![visible(60, 95), visible(70, 97), None, visible(50, 99)]);
        let flag = RunFlag::new();
        flag.start();
        let mut sink = RecordingSink::new();
        let observer = sink.clone();
        let (handle, signal) = StopHandle::new();

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(2_000)).await;
            handle.stop();
        };
        let (stats, ()) = tokio::join!(control.run(&source, &flag, &mut sink, signal), stopper);

        assert_eq!(stats.phase, Some(Phase::Tracking));
        assert!(stats.cycles >= 4, "cycles = {}", stats.cycles);
        assert_eq!(stats.sink_faults, 0);

        let commands = observer.commands();
        // One command per cycle plus the final stop.
        assert_eq!(commands.len() as u64, stats.cycles + 1);
        assert!(commands[0].linear > 0.0);
        assert!(commands[0].angular < 0.0);
        assert_eq!(commands[2], VelocityCommand::ZERO);
        assert_eq!(*commands.last().unwrap(), VelocityCommand::ZERO);
        // The script ran dry, so every later cycle saw no target.
        assert_eq!(stats.target_lost_cycles, stats.cycles - 3);
    }

    #[tokio::test(start_paused = true)]
    async fn run_signal_moves_idle_loop_into_tracking() {
        let control = control_loop();
        let source = ScriptedSource::new(vec![visible(0, 100)]);
        let flag = RunFlag::new();
        let operator = flag.clone();
        let mut sink = RecordingSink::new();
        let observer = sink.clone();
        let (handle, signal) = StopHandle::new();

        let script = async {
            tokio::time::sleep(Duration::from_millis(1_500)).await;
            assert!(observer.commands().is_empty());
            operator.start();
            tokio::time::sleep(Duration::from_millis(1_500)).await;
            handle.stop();
        };
        let (stats, ()) = tokio::join!(control.run(&source, &flag, &mut sink, signal), script);

        assert_eq!(stats.phase, Some(Phase::Tracking));
        assert!(stats.cycles >= 1);
        assert_eq!(source.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sink_faults_are_counted_and_the_loop_continues() {
        let control = control_loop();
        let source = ScriptedSource::new(vec![visible(0, 100); 8]);
        let flag = RunFlag::new();
        flag.start();
        let mut sink = RecordingSink::new();
        sink.set_faulted(true);
        let (handle, signal) = StopHandle::new();

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(1_000)).await;
            handle.stop();
        };
        let (stats, ()) = tokio::join!(control.run(&source, &flag, &mut sink, signal), stopper);

        assert!(stats.cycles >= 3);
        assert_eq!(stats.sink_faults, stats.cycles + 1);
        assert!(sink.commands().is_empty());
    }
}
