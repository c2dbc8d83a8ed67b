//! `pursuit-fuzzy` – Mamdani fuzzy inference for person following.
//!
//! # Modules
//!
//! - [`normalizer`] – [`Normalizer`][normalizer::Normalizer] and
//!   [`LinguisticVariable`][normalizer::LinguisticVariable]: physical ↔
//!   canonical domain mapping plus the saturation policy.
//! - [`sets`] – named linguistic sets for every variable.
//! - [`membership`] – the five fixed piecewise-linear shapes with exact
//!   degree and clipped-area formulas.
//! - [`fuzzifier`] – crisp value → [`FuzzyElement`][fuzzifier::FuzzyElement]s.
//! - [`rules`] – [`RuleTable`][rules::RuleTable] constants and rule firing
//!   with `min`/`max` aggregation.
//! - [`defuzzifier`] – clipped-area centroid.
//! - [`controller`] – [`FuzzyController`][controller::FuzzyController]: one
//!   full inference pass for the angular and linear axes.

pub mod controller;
pub mod defuzzifier;
pub mod fuzzifier;
pub mod membership;
pub mod normalizer;
pub mod rules;
pub mod sets;

pub use controller::{ControlOutput, ControllerConfig, ControllerInputs, FuzzyController, Range};
pub use defuzzifier::OutputMapping;
pub use fuzzifier::FuzzyElement;
pub use membership::MembershipFunctionSet;
pub use normalizer::{LinguisticVariable, Normalizer, Quantity};
pub use rules::{ANGULAR_VELOCITY_RULES, FiredRules, LINEAR_VELOCITY_RULES, RuleTable};
