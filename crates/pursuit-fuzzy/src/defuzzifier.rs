//! Clipped-area centroid defuzzification.
//!
//! Each fired consequent contributes its shape clipped at the rule degree;
//! the crisp output is the area-weighted mean of the shape centres:
//!
//! ```text
//! Σ (centre_i + offset)·scale · area_i(1 − degree_i)·scale
//! ─────────────────────────────────────────────────────────
//!             Σ area_i(1 − degree_i)·scale
//! ```
//!
//! This is the usual closed-form shortcut for piecewise-linear shapes, not a
//! sampled integral over the aggregated output surface.

use crate::membership::MembershipFunctionSet;
use crate::rules::FiredRules;

/// Affine transform from the canonical `[-1, 1]` shape domain to the domain
/// the centroid should be reported in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputMapping {
    pub scale: f64,
    pub offset: f64,
}

impl OutputMapping {
    /// Report in `[-1, 1]`.
    pub const NATIVE: Self = Self {
        scale: 1.0,
        offset: 0.0,
    };

    /// Report in `[0, 1]`, undoing the `2v - 1` remap of
    /// [`fuzzify_unit`][crate::fuzzifier::fuzzify_unit].
    pub const UNIT: Self = Self {
        scale: 0.5,
        offset: 1.0,
    };
}

impl MembershipFunctionSet {
    /// Centroid of the clipped consequent shapes in `fired`.
    ///
    /// Returns exactly `0.0` when nothing fired (or every consequent fired
    /// with degree 0), so an empty rule set contributes no motion.
    pub fn centroid(&self, fired: &FiredRules, mapping: OutputMapping) -> f64 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (set, degree) in fired.iter() {
            let clip = 1.0 - degree;
            let center = (self.center(set) + mapping.offset) * mapping.scale;
            let area = self.area(clip, set) * mapping.scale;
            weighted += center * area;
            total += area;
        }
        if total == 0.0 { 0.0 } else { weighted / total }
    }
}

/// [`MembershipFunctionSet::centroid`] on the standard shapes.
pub fn centroid(fired: &FiredRules, mapping: OutputMapping) -> f64 {
    MembershipFunctionSet::standard().centroid(fired, mapping)
}
