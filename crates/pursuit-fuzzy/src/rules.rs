//! Rule tables and Mamdani rule firing.
//!
//! A [`RuleTable`] is a constant 5×5 grid: rows are indexed by the first
//! antecedent's set, columns by the second's, and each cell names the
//! consequent set or is empty ("no rule").  [`RuleTable::fire`] evaluates
//! every antecedent pair with fuzzy AND (`min`) and aggregates rules that
//! reach the same consequent with fuzzy OR (`max`).
//!
//! # Example
//!
//! ```rust
//! use pursuit_fuzzy::fuzzifier::FuzzyElement;
//! use pursuit_fuzzy::rules::ANGULAR_VELOCITY_RULES;
//! use pursuit_fuzzy::sets::{AngularVelocity, LateralPosition, LateralRate, LinguisticSet};
//!
//! let rate = [FuzzyElement::new(LateralRate::NoChange.index(), 1.0)];
//! let position = [FuzzyElement::new(LateralPosition::Right.index(), 0.8)];
//!
//! let fired = ANGULAR_VELOCITY_RULES.fire(&rate, &position);
//! assert_eq!(fired.degree(AngularVelocity::TurnRight.index()), Some(0.8));
//! ```

use std::collections::BTreeMap;

use crate::fuzzifier::FuzzyElement;
use crate::sets::{AngularVelocity as AV, LinearVelocity as LV, SET_COUNT};

/// Fuzzy AND.
pub fn fuzzy_and(a: f64, b: f64) -> f64 {
    a.min(b)
}

/// Fuzzy OR.
pub fn fuzzy_or(a: f64, b: f64) -> f64 {
    a.max(b)
}

// ────────────────────────────────────────────────────────────────────────────
// RuleTable
// ────────────────────────────────────────────────────────────────────────────

/// A constant lookup from an antecedent set pair to a consequent set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    name: &'static str,
    cells: [[Option<usize>; SET_COUNT]; SET_COUNT],
}

impl RuleTable {
    pub const fn new(name: &'static str, cells: [[Option<usize>; SET_COUNT]; SET_COUNT]) -> Self {
        Self { name, cells }
    }

    /// Human-readable table name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Consequent for the antecedent pair `(row, col)`, or `None` when the
    /// cell holds no rule or an index is out of range.
    pub fn lookup(&self, row: usize, col: usize) -> Option<usize> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// Fire every applicable rule for the Cartesian product of the two
    /// antecedent element lists.
    ///
    /// The result is empty when no antecedent pair hits a populated cell;
    /// callers treat that as "no contribution" on this axis.
    pub fn fire(&self, first: &[FuzzyElement], second: &[FuzzyElement]) -> FiredRules {
        let mut fired = FiredRules::default();
        for a in first {
            for b in second {
                if let Some(consequent) = self.lookup(a.set, b.set) {
                    fired.aggregate(consequent, fuzzy_and(a.degree, b.degree));
                }
            }
        }
        fired
    }
}

/// Aggregated rule output for one control axis: consequent set index →
/// degree.  Iteration is in ascending set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiredRules {
    degrees: BTreeMap<usize, f64>,
}

impl FiredRules {
    /// OR `degree` into whatever is already recorded for `consequent`.
    pub fn aggregate(&mut self, consequent: usize, degree: f64) {
        self.degrees
            .entry(consequent)
            .and_modify(|d| *d = fuzzy_or(*d, degree))
            .or_insert(degree);
    }

    pub fn degree(&self, consequent: usize) -> Option<f64> {
        self.degrees.get(&consequent).copied()
    }

    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// `(consequent, degree)` pairs in ascending consequent order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.degrees.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(usize, f64)> for FiredRules {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        let mut fired = FiredRules::default();
        for (consequent, degree) in iter {
            fired.aggregate(consequent, degree);
        }
        fired
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tables
// ────────────────────────────────────────────────────────────────────────────

const BTL: Option<usize> = Some(AV::BigTurnLeft as usize);
const TL: Option<usize> = Some(AV::TurnLeft as usize);
const NC: Option<usize> = Some(AV::NoChange as usize);
const TR: Option<usize> = Some(AV::TurnRight as usize);
const BTR: Option<usize> = Some(AV::BigTurnRight as usize);

/// Turn rate from (lateral rate, lateral position).
///
/// ```text
///               FarLeft  Left  Center  Right  FarRight
/// RapidLeft       -      BTL    BTL     TL      NC
/// Left            -      BTL    TL      NC      TR
/// NoChange       BTL     TL     NC      TR      BTR
/// Right          TL      NC     TR      BTR     -
/// RapidRight     NC      TR     BTR     BTR     -
/// ```
///
/// A target already at the frame edge and still drifting outward has no rule.
pub static ANGULAR_VELOCITY_RULES: RuleTable = RuleTable::new(
    "angular_velocity",
    [
        [None, BTL, BTL, TL, NC],
        [None, BTL, TL, NC, TR],
        [BTL, TL, NC, TR, BTR],
        [TL, NC, TR, BTR, None],
        [NC, TR, BTR, BTR, None],
    ],
);

const VS: Option<usize> = Some(LV::VerySlow as usize);
const SL: Option<usize> = Some(LV::Slow as usize);
const NM: Option<usize> = Some(LV::Nominal as usize);
const FA: Option<usize> = Some(LV::Fast as usize);
const VF: Option<usize> = Some(LV::VeryFast as usize);

/// Forward speed from (distance rate, distance).
///
/// ```text
///                  VerySmall  Small  Medium  Large  VeryLarge
/// RapidClosingIn      NM       SL      VS     VS       -
/// ClosingIn           FA       NM      SL     VS       -
/// Steady              VF       FA      NM     SL       VS
/// MovingAway          -        VF      FA     NM       SL
/// RapidMovingAway     -        VF      VF     FA       NM
/// ```
///
/// No rule fires for a very near target still closing in, or a very far target
/// still moving away.
pub static LINEAR_VELOCITY_RULES: RuleTable = RuleTable::new(
    "linear_velocity",
    [
        [NM, SL, VS, VS, None],
        [FA, NM, SL, VS, None],
        [VF, FA, NM, SL, VS],
        [None, VF, FA, NM, SL],
        [None, VF, VF, FA, NM],
    ],
);
