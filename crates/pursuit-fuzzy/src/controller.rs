//! [`FuzzyController`] – one full inference pass for both control axes.
//!
//! ```text
//! x, xd ──normalize──▶ fuzzify ──▶ ANGULAR_VELOCITY_RULES ──▶ centroid ──▶ w
//! h, hd ──normalize──▶ fuzzify ──▶ LINEAR_VELOCITY_RULES  ──▶ centroid ──▶ v
//! ```
//!
//! The distance input (target height) lives on a one-sided domain anchored
//! at the calibrated height, so it is fuzzified through the `[0, 1] → [-1, 1]`
//! remap and its centroid is mapped back with [`OutputMapping::UNIT`].
//!
//! # Example
//!
//! ```rust
//! use pursuit_fuzzy::controller::{ControllerConfig, ControllerInputs, FuzzyController};
//!
//! let controller = FuzzyController::new(&ControllerConfig::default(), 120.0).unwrap();
//!
//! // Target centred, not moving, at the calibrated distance: stand still.
//! let out = controller.compute(ControllerInputs {
//!     x: 0.0,
//!     x_rate: 0.0,
//!     height: 120.0,
//!     height_rate: 0.0,
//! });
//! assert_eq!(out.linear, 0.0);
//! assert!(out.angular.abs() < 1e-9);
//! ```

use pursuit_types::PursuitError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defuzzifier::OutputMapping;
use crate::membership::MembershipFunctionSet;
use crate::normalizer::{Domain, LinguisticVariable, Quantity};
use crate::rules::{ANGULAR_VELOCITY_RULES, LINEAR_VELOCITY_RULES};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Physical range `[min, max]` of one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Tuning of the normalizers for every controller variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Lateral target offset, pixels.
    pub lateral: Range,
    /// Lateral offset change per cycle, pixels.
    pub lateral_rate: Range,
    /// Width of the distance domain below the calibrated height, pixels.
    pub distance_span: f64,
    /// Height change per cycle, pixels.
    pub distance_rate: Range,
    /// Forward speed output range.
    pub linear_velocity: Range,
    /// Turn rate output range, rad/s.
    pub angular_velocity: Range,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            lateral: Range::new(-140.0, 140.0),
            lateral_rate: Range::new(-140.0, 140.0),
            distance_span: 40.0,
            distance_rate: Range::new(-100.0, 100.0),
            linear_velocity: Range::new(0.0, 250.0),
            angular_velocity: Range::new(-0.8, 0.8),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inputs / outputs
// ─────────────────────────────────────────────────────────────────────────────

/// Crisp physical inputs for one inference pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerInputs {
    pub x: f64,
    pub x_rate: f64,
    pub height: f64,
    pub height_rate: f64,
}

/// Saturated canonical-domain values of the inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedInputs {
    pub x: f64,
    pub x_rate: f64,
    /// One-sided, in `[0, 1]`.
    pub height: f64,
    pub height_rate: f64,
}

/// Result of one inference pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOutput {
    /// Forward speed in physical units.
    pub linear: f64,
    /// Turn rate in physical units, turning left is negative.
    pub angular: f64,
    pub normalized: NormalizedInputs,
    /// `true` when the distance input saturated at its maximum (target at or
    /// inside the calibrated following distance); `linear` is then 0.
    pub distance_saturated: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// FuzzyController
// ─────────────────────────────────────────────────────────────────────────────

/// Stateless two-axis Mamdani controller.
///
/// Holds only the immutable per-variable normalizers; every call to
/// [`compute`][Self::compute] builds and discards its own fuzzy sets.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyController {
    lateral: LinguisticVariable,
    lateral_rate: LinguisticVariable,
    distance: LinguisticVariable,
    distance_rate: LinguisticVariable,
    linear_velocity: LinguisticVariable,
    angular_velocity: LinguisticVariable,
}

impl FuzzyController {
    /// Build the controller for a target whose height at the desired
    /// following distance is `calibrated_height` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`PursuitError::InvalidRange`] when any range is rejected by
    /// its normalizer, when an input/output that must be two-sided is not, or
    /// when `calibrated_height` is smaller than the distance span (the
    /// distance domain must be one-sided).
    pub fn new(config: &ControllerConfig, calibrated_height: f64) -> Result<Self, PursuitError> {
        let two_sided = |quantity, range: Range| {
            variable(quantity, range.min, range.max, Domain::TwoSided)
        };
        Ok(Self {
            lateral: two_sided(Quantity::LateralPosition, config.lateral)?,
            lateral_rate: two_sided(Quantity::LateralRate, config.lateral_rate)?,
            distance: variable(
                Quantity::Distance,
                calibrated_height - config.distance_span,
                calibrated_height,
                Domain::OneSided,
            )?,
            distance_rate: two_sided(Quantity::DistanceRate, config.distance_rate)?,
            linear_velocity: variable(
                Quantity::LinearVelocity,
                config.linear_velocity.min,
                config.linear_velocity.max,
                Domain::OneSided,
            )?,
            angular_velocity: two_sided(Quantity::AngularVelocity, config.angular_velocity)?,
        })
    }

    /// Run normalize → fuzzify → fire → defuzzify → denormalize on both axes.
    pub fn compute(&self, inputs: ControllerInputs) -> ControlOutput {
        let shapes = MembershipFunctionSet::standard();

        let normalized = NormalizedInputs {
            x: self.lateral.normalize_saturated(inputs.x),
            x_rate: self.lateral_rate.normalize_saturated(inputs.x_rate),
            height: self.distance.normalize_saturated(inputs.height),
            height_rate: self.distance_rate.normalize_saturated(inputs.height_rate),
        };

        let x_sets = shapes.fuzzify(normalized.x);
        let x_rate_sets = shapes.fuzzify(normalized.x_rate);
        let height_sets = shapes.fuzzify_unit(normalized.height);
        let height_rate_sets = shapes.fuzzify(normalized.height_rate);

        let turn_rules = ANGULAR_VELOCITY_RULES.fire(&x_rate_sets, &x_sets);
        let speed_rules = LINEAR_VELOCITY_RULES.fire(&height_rate_sets, &height_sets);

        let angular = shapes.centroid(&turn_rules, OutputMapping::NATIVE);
        let mut linear = shapes.centroid(&speed_rules, OutputMapping::UNIT);

        // The clipped-area centroid never reaches exactly 0, so without this
        // the robot would creep forward forever once it is at the target.
        let distance_saturated = normalized.height == 1.0;
        if distance_saturated {
            linear = 0.0;
        }

        debug!(
            xn = normalized.x,
            xdn = normalized.x_rate,
            yn = normalized.height,
            ydn = normalized.height_rate,
            turn_rules = turn_rules.len(),
            speed_rules = speed_rules.len(),
            angular_centroid = angular,
            linear_centroid = linear,
            "fuzzy inference"
        );

        ControlOutput {
            linear: self.linear_velocity.denormalize(linear),
            angular: self.angular_velocity.denormalize(angular),
            normalized,
            distance_saturated,
        }
    }

    pub fn distance(&self) -> &LinguisticVariable {
        &self.distance
    }
}

fn variable(
    quantity: Quantity,
    min: f64,
    max: f64,
    domain: Domain,
) -> Result<LinguisticVariable, PursuitError> {
    let var = LinguisticVariable::new(quantity, min, max)?;
    if var.normalizer().domain() != domain {
        let details = match domain {
            Domain::TwoSided => format!("range [{min}, {max}] must be symmetric around zero"),
            Domain::OneSided => format!("range [{min}, {max}] must start at or above zero"),
        };
        return Err(PursuitError::InvalidRange {
            quantity: quantity.to_string(),
            details,
        });
    }
    Ok(var)
}
