//! `pursuit-types` – shared vocabulary for the person-following stack.
//!
//! Every other crate in the workspace speaks in these types: the detector
//! side publishes [`TargetSample`]s, the controller produces
//! [`VelocityCommand`]s, and anything that can fail reports a
//! [`PursuitError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One observation of the followed person, in camera pixel space.
///
/// Samples are published as a whole unit; a reader never sees `x` from one
/// frame and `height` from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSample {
    /// Lateral offset of the target from the calibrated centre line (pixels,
    /// negative = left of centre).
    pub x: i32,
    /// Apparent height of the target (pixels). Used as the distance proxy:
    /// the taller the target, the closer it is.
    pub height: i32,
    /// Vertical pixel coordinate of the target's centre. Very small values
    /// mean the target fills the top of the frame, i.e. it is within arm's
    /// reach of the robot.
    pub center_y: i32,
}

impl TargetSample {
    pub fn new(x: i32, height: i32, center_y: i32) -> Self {
        Self {
            x,
            height,
            center_y,
        }
    }
}

/// A differential-drive command emitted once per control cycle.
///
/// `angular` follows the platform convention: turning left is positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VelocityCommand {
    /// Forward speed in drive units (mm/s on the reference platform).
    pub linear: f64,
    /// Turn rate in rad/s, positive = counter-clockwise (left).
    pub angular: f64,
}

impl VelocityCommand {
    /// The all-stop command.
    pub const ZERO: Self = Self {
        linear: 0.0,
        angular: 0.0,
    };

    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }

    /// `true` when both components are exactly zero.
    pub fn is_stop(&self) -> bool {
        self.linear == 0.0 && self.angular == 0.0
    }
}

/// Error type shared across the workspace.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PursuitError {
    #[error("Invalid range for {quantity}: {details}")]
    InvalidRange { quantity: String, details: String },

    #[error("Drive Fault: {details}")]
    DriveFault { details: String },

    #[error("Config Error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_sample_roundtrip() {
        let sample = TargetSample::new(-35, 118, 140);
        let json = serde_json::to_string(&sample).unwrap();
        let back: TargetSample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, back);
    }

    #[test]
    fn zero_command_is_stop() {
        assert!(VelocityCommand::ZERO.is_stop());
        assert!(VelocityCommand::default().is_stop());
        assert!(!VelocityCommand::new(12.5, 0.0).is_stop());
        assert!(!VelocityCommand::new(0.0, -0.1).is_stop());
    }

    #[test]
    fn velocity_command_serializes_field_names() {
        let json = serde_json::to_string(&VelocityCommand::new(100.0, 0.25)).unwrap();
        assert!(json.contains("\"linear\":100.0"));
        assert!(json.contains("\"angular\":0.25"));
    }

    #[test]
    fn pursuit_error_display() {
        let err = PursuitError::InvalidRange {
            quantity: "lateral_position".to_string(),
            details: "max must equal -min".to_string(),
        };
        assert!(err.to_string().contains("lateral_position"));

        let err2 = PursuitError::DriveFault {
            details: "serial port closed".to_string(),
        };
        assert!(err2.to_string().contains("Drive Fault"));

        let err3 = PursuitError::Config("bad toml".to_string());
        assert!(err3.to_string().contains("bad toml"));
    }
}
