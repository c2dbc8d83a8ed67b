//! `pursuit-runtime` – runs the fuzzy controller against live collaborators.
//!
//! # Modules
//!
//! - [`control_loop`] – [`ControlLoop`][control_loop::ControlLoop]: the
//!   Idle → Tracking state machine, with a pure per-cycle
//!   [`step`][control_loop::ControlLoop::step] and an async
//!   [`run`][control_loop::ControlLoop::run] driven by a tokio interval.
//! - [`stop`] – [`StopHandle`][stop::StopHandle] /
//!   [`StopSignal`][stop::StopSignal]: deterministic shutdown from either
//!   phase.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: global
//!   `tracing` subscriber with optional OTLP span export.

pub mod control_loop;
pub mod stop;
pub mod telemetry;

pub use control_loop::{ControlLoop, CycleReport, LoopConfig, LoopStats, Phase, TrackingState};
pub use stop::{StopHandle, StopSignal};
pub use telemetry::{TracerProviderGuard, init_tracing};
