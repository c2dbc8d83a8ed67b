//! Generic `CommandSink` trait for the drive base.
//!
//! Drivers for a concrete platform implement this trait; the control loop
//! only ever talks to the trait, so the drive transport can be swapped
//! without touching the controller.

use pursuit_types::PursuitError;

/// Anything that can accept a differential-drive velocity command.
pub trait CommandSink: Send {
    /// Stable identifier for this sink, e.g. `"drive_base"`.
    fn id(&self) -> &str;

    /// Command forward speed `linear` and turn rate `angular` (turning left
    /// is positive).
    ///
    /// # Errors
    ///
    /// Returns [`PursuitError::DriveFault`] if the command cannot be applied
    /// (e.g. the transport is disconnected).
    fn set_velocity(&mut self, linear: f64, angular: f64) -> Result<(), PursuitError>;
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn set_velocity(&mut self, linear: f64, angular: f64) -> Result<(), PursuitError> {
        (**self).set_velocity(linear, angular)
    }
}
