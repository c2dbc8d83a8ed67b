//! Crisp value → fuzzy membership degrees.

use crate::membership::MembershipFunctionSet;

/// Membership of a crisp value in one linguistic set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyElement {
    /// Set index, `0..SET_COUNT`.
    pub set: usize,
    /// Degree of membership in `[0, 1]`.
    pub degree: f64,
}

impl FuzzyElement {
    pub fn new(set: usize, degree: f64) -> Self {
        Self { set, degree }
    }
}

impl MembershipFunctionSet {
    /// Evaluate `v` (canonical domain `[-1, 1]`) against every shape and
    /// return the sets with a non-zero degree, in index order.
    ///
    /// Inside `[-1, 1]` the result holds one element in a shape's core and
    /// two in an overlap region.
    pub fn fuzzify(&self, v: f64) -> Vec<FuzzyElement> {
        self.shapes()
            .iter()
            .enumerate()
            .filter(|(_, shape)| shape.is_in_support(v))
            .filter_map(|(set, shape)| {
                let degree = shape.degree(v);
                (degree != 0.0).then_some(FuzzyElement { set, degree })
            })
            .collect()
    }

    /// Fuzzify a value from the one-sided domain `[0, 1]` by remapping it
    /// onto `[-1, 1]` first.
    ///
    /// Centroids computed from the resulting sets must be mapped back with
    /// [`OutputMapping::UNIT`][crate::defuzzifier::OutputMapping::UNIT].
    pub fn fuzzify_unit(&self, v: f64) -> Vec<FuzzyElement> {
        self.fuzzify(v * 2.0 - 1.0)
    }
}

/// [`MembershipFunctionSet::fuzzify`] on the standard shapes.
pub fn fuzzify(v: f64) -> Vec<FuzzyElement> {
    MembershipFunctionSet::standard().fuzzify(v)
}

/// [`MembershipFunctionSet::fuzzify_unit`] on the standard shapes.
pub fn fuzzify_unit(v: f64) -> Vec<FuzzyElement> {
    MembershipFunctionSet::standard().fuzzify_unit(v)
}
