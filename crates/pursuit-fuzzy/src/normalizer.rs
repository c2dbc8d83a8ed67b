//! Mapping between physical units and the canonical fuzzy domains.
//!
//! A [`Normalizer`] maps a physical quantity onto `[-1, 1]` (two-sided
//! domains, `min < 0`) or `[0, 1]` (one-sided domains, `min >= 0`) and back.
//! It never clamps: values outside the configured range simply land outside
//! the canonical domain.  Saturation is a caller policy, applied by
//! [`LinguisticVariable::normalize_saturated`].
//!
//! # Example
//!
//! ```rust
//! use pursuit_fuzzy::normalizer::Normalizer;
//!
//! let lateral = Normalizer::new(-140.0, 140.0).unwrap();
//! assert!((lateral.normalize(70.0) - 0.5).abs() < 1e-12);
//! assert!((lateral.denormalize(0.5) - 70.0).abs() < 1e-12);
//!
//! // Asymmetric two-sided ranges are a configuration error.
//! assert!(Normalizer::new(-100.0, 140.0).is_err());
//! ```

use std::fmt;

use pursuit_types::PursuitError;
use serde::{Deserialize, Serialize};

/// Which canonical domain a [`Normalizer`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// `[-1, 1]`, for ranges symmetric around zero.
    TwoSided,
    /// `[0, 1]`, for ranges anchored at a non-negative minimum.
    OneSided,
}

/// Immutable physical ↔ canonical mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    min: f64,
    scale: f64,
    domain: Domain,
}

impl Normalizer {
    /// Build a normalizer for the physical range `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`PursuitError::InvalidRange`] when a bound is not finite, when
    /// a two-sided range (`min < 0`) is not symmetric (`max != -min`), or when
    /// a one-sided range is empty (`max <= min`).
    pub fn new(min: f64, max: f64) -> Result<Self, PursuitError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(invalid(format!("bounds must be finite, got [{min}, {max}]")));
        }
        if min < 0.0 {
            if max != -min {
                return Err(invalid(format!(
                    "two-sided range [{min}, {max}] must be symmetric (max == -min)"
                )));
            }
            Ok(Self {
                min,
                scale: min.abs(),
                domain: Domain::TwoSided,
            })
        } else {
            if max <= min {
                return Err(invalid(format!(
                    "one-sided range [{min}, {max}] must have max > min"
                )));
            }
            Ok(Self {
                min,
                scale: max - min,
                domain: Domain::OneSided,
            })
        }
    }

    /// Map a physical value into the canonical domain.
    ///
    /// One-sided values below `min` map to `0`.
    pub fn normalize(&self, v: f64) -> f64 {
        match self.domain {
            Domain::TwoSided => v / self.scale,
            Domain::OneSided if v < self.min => 0.0,
            Domain::OneSided => (v - self.min) / self.scale,
        }
    }

    /// Inverse of [`normalize`][Self::normalize] on the unsaturated range.
    pub fn denormalize(&self, vn: f64) -> f64 {
        match self.domain {
            Domain::TwoSided => vn * self.scale,
            Domain::OneSided => self.min + vn * self.scale,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the physical range.
    pub fn max(&self) -> f64 {
        match self.domain {
            Domain::TwoSided => self.scale,
            Domain::OneSided => self.min + self.scale,
        }
    }
}

fn invalid(details: String) -> PursuitError {
    PursuitError::InvalidRange {
        quantity: "normalizer".to_string(),
        details,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Linguistic variables
// ────────────────────────────────────────────────────────────────────────────

/// The physical quantities the controller reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Target's lateral offset in the image.
    LateralPosition,
    /// Frame-to-frame change of the lateral offset.
    LateralRate,
    /// Target's apparent height (distance proxy).
    Distance,
    /// Frame-to-frame change of the apparent height.
    DistanceRate,
    /// Commanded turn rate.
    AngularVelocity,
    /// Commanded forward speed.
    LinearVelocity,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::LateralPosition => "lateral_position",
            Quantity::LateralRate => "lateral_rate",
            Quantity::Distance => "distance",
            Quantity::DistanceRate => "distance_rate",
            Quantity::AngularVelocity => "angular_velocity",
            Quantity::LinearVelocity => "linear_velocity",
        };
        f.write_str(name)
    }
}

/// A named physical quantity together with the one [`Normalizer`] that maps
/// it onto its canonical fuzzy domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinguisticVariable {
    quantity: Quantity,
    normalizer: Normalizer,
}

impl LinguisticVariable {
    /// # Errors
    ///
    /// Returns [`PursuitError::InvalidRange`] naming `quantity` when
    /// `[min, max]` is rejected by [`Normalizer::new`].
    pub fn new(quantity: Quantity, min: f64, max: f64) -> Result<Self, PursuitError> {
        let normalizer = Normalizer::new(min, max).map_err(|e| match e {
            PursuitError::InvalidRange { details, .. } => PursuitError::InvalidRange {
                quantity: quantity.to_string(),
                details,
            },
            other => other,
        })?;
        Ok(Self {
            quantity,
            normalizer,
        })
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Normalize `v` and saturate the result into the canonical domain.
    ///
    /// Two-sided values whose magnitude exceeds 1 become `±1`; one-sided
    /// values saturate on the high side only (the low side is already floored
    /// at 0 by the normalizer).
    pub fn normalize_saturated(&self, v: f64) -> f64 {
        let vn = self.normalizer.normalize(v);
        match self.normalizer.domain() {
            Domain::TwoSided if vn > 1.0 || vn < -1.0 => {
                if vn > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Domain::OneSided if vn > 1.0 => 1.0,
            _ => vn,
        }
    }

    pub fn denormalize(&self, vn: f64) -> f64 {
        self.normalizer.denormalize(vn)
    }
}
