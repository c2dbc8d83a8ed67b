//! `pursuit-hal` – hardware seams for the person-following robot.
//!
//! # Modules
//!
//! - [`source`] – [`PositionSource`] and [`RunSignal`] traits plus the
//!   shared latest-value slot the detector writes into.
//! - [`sink`] – [`CommandSink`] trait for the drive base.
//! - [`sim`] – scripted and synthetic sources and recording sinks for
//!   headless runs.

pub mod sim;
pub mod sink;
pub mod source;

pub use sink::CommandSink;
pub use source::{LatestSample, PositionSource, RunFlag, RunSignal};
