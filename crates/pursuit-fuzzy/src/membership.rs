//! The five piecewise-linear membership shapes shared by every variable.
//!
//! ```text
//!  1 ┤━━━╮   ╱╲    ╱╲    ╱╲   ╭━━━
//!    │    ╲ ╱  ╲  ╱  ╲  ╱  ╲ ╱
//!    │     ╳    ╲╱    ╲╱    ╳
//!    │    ╱ ╲   ╱╲    ╱╲   ╱ ╲
//!  0 ┼───┴───┴─┴──┴──┴──┴─┴───┴───
//!   -1 -0.8 -0.4   0   0.4  0.8  1
//! ```
//!
//! Index 0 and 4 are trapezoids with a flat top over the outer 20 % of the
//! domain; 1..=3 are symmetric triangles with a base of 0.8.  Every point of
//! `[-1, 1]` is covered by at most two shapes and, where two overlap, their
//! degrees sum to 1.
//!
//! The degree and area formulas are written out segment by segment rather
//! than derived from a generic centre/width description so that results stay
//! bit-identical to the reference outputs the controller was tuned against.

use crate::sets::SET_COUNT;

/// Height of every shape before clipping.
const SHAPE_HEIGHT: f64 = 1.0;

/// Closed interval `[lo, hi]` on which a segment applies.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    /// Constant degree 1.
    Flat { lo: f64, hi: f64 },
    /// `slope * v + intercept`.
    Line {
        lo: f64,
        hi: f64,
        slope: f64,
        intercept: f64,
    },
}

impl Segment {
    fn eval(&self, v: f64) -> Option<f64> {
        match *self {
            Segment::Flat { lo, hi } if v >= lo && v <= hi => Some(1.0),
            Segment::Line {
                lo,
                hi,
                slope,
                intercept,
            } if v >= lo && v <= hi => Some(slope * v + intercept),
            _ => None,
        }
    }
}

/// Support interval with per-end openness.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Support {
    lo: f64,
    hi: f64,
    lo_closed: bool,
    hi_closed: bool,
}

impl Support {
    const fn open(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            hi,
            lo_closed: false,
            hi_closed: false,
        }
    }

    fn contains(&self, v: f64) -> bool {
        let above = if self.lo_closed { v >= self.lo } else { v > self.lo };
        let below = if self.hi_closed { v <= self.hi } else { v < self.hi };
        above && below
    }
}

/// Geometry used by the clipped-area formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Triangle { bottom: f64 },
    Trapezoid { bottom: f64, upper: f64 },
}

/// One membership shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembershipFunction {
    kind: ShapeKind,
    segments: [Segment; 2],
    support: Support,
    center: f64,
}

impl MembershipFunction {
    /// Membership degree of `v`; 0 outside the shape.
    ///
    /// Segments are tested in order with inclusive bounds, so on a shared
    /// breakpoint the first segment wins.
    pub fn degree(&self, v: f64) -> f64 {
        self.segments
            .iter()
            .find_map(|s| s.eval(v))
            .unwrap_or(0.0)
    }

    /// Cheap pre-check used to skip shapes that cannot contribute.
    pub fn is_in_support(&self, v: f64) -> bool {
        self.support.contains(v)
    }

    /// Centroid abscissa of the unclipped shape.
    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Area left after removing a horizontal slab of height `clip` from the
    /// top of the shape.  `clip = 0` gives the full area (0.4), `clip = 1`
    /// gives 0.
    pub fn area(&self, clip: f64) -> f64 {
        match self.kind {
            ShapeKind::Triangle { bottom } => clipped_triangle_area(clip, bottom, SHAPE_HEIGHT),
            ShapeKind::Trapezoid { bottom, upper } => {
                clipped_trapezoid_area(clip, bottom, upper, SHAPE_HEIGHT)
            }
        }
    }
}

/// Area of a triangle of base `bottom` and height `height` once the top
/// `clip` has been cut off (the remainder is a trapezoid).
pub fn clipped_triangle_area(clip: f64, bottom: f64, height: f64) -> f64 {
    let h = height - clip;
    let u = bottom * clip / height;
    (u + bottom) * h / 2.0
}

/// Area of a trapezoid with parallel sides `bottom` and `upper` and height
/// `height` once the top `clip` has been cut off.
pub fn clipped_trapezoid_area(clip: f64, bottom: f64, upper: f64, height: f64) -> f64 {
    let h = height - clip;
    let u = (bottom - upper) * clip / height + upper;
    (u + bottom) * h / 2.0
}

/// The fixed family of five shapes partitioning `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipFunctionSet {
    shapes: [MembershipFunction; SET_COUNT],
}

/// The shape family used by every controller variable.
pub static STANDARD_SHAPES: MembershipFunctionSet = MembershipFunctionSet {
    shapes: [
        // 0: left shoulder
        MembershipFunction {
            kind: ShapeKind::Trapezoid {
                bottom: 0.6,
                upper: 0.2,
            },
            segments: [
                Segment::Flat { lo: -1.0, hi: -0.8 },
                Segment::Line {
                    lo: -0.8,
                    hi: -0.4,
                    slope: -2.5,
                    intercept: -1.0,
                },
            ],
            support: Support {
                lo: -1.0,
                hi: -0.4,
                lo_closed: true,
                hi_closed: false,
            },
            center: -0.7,
        },
        // 1
        MembershipFunction {
            kind: ShapeKind::Triangle { bottom: 0.8 },
            segments: [
                Segment::Line {
                    lo: -0.8,
                    hi: -0.4,
                    slope: 2.5,
                    intercept: 2.0,
                },
                Segment::Line {
                    lo: -0.4,
                    hi: 0.0,
                    slope: -2.5,
                    intercept: 0.0,
                },
            ],
            support: Support::open(-0.8, 0.0),
            center: -0.4,
        },
        // 2
        MembershipFunction {
            kind: ShapeKind::Triangle { bottom: 0.8 },
            segments: [
                Segment::Line {
                    lo: -0.4,
                    hi: 0.0,
                    slope: 2.5,
                    intercept: 1.0,
                },
                Segment::Line {
                    lo: 0.0,
                    hi: 0.4,
                    slope: -2.5,
                    intercept: 1.0,
                },
            ],
            support: Support::open(-0.4, 0.4),
            center: 0.0,
        },
        // 3
        MembershipFunction {
            kind: ShapeKind::Triangle { bottom: 0.8 },
            segments: [
                Segment::Line {
                    lo: 0.0,
                    hi: 0.4,
                    slope: 2.5,
                    intercept: 0.0,
                },
                Segment::Line {
                    lo: 0.4,
                    hi: 0.8,
                    slope: -2.5,
                    intercept: 2.0,
                },
            ],
            support: Support::open(0.0, 0.8),
            center: 0.4,
        },
        // 4: right shoulder
        MembershipFunction {
            kind: ShapeKind::Trapezoid {
                bottom: 0.6,
                upper: 0.2,
            },
            segments: [
                Segment::Line {
                    lo: 0.4,
                    hi: 0.8,
                    slope: 2.5,
                    intercept: -1.0,
                },
                Segment::Flat { lo: 0.8, hi: 1.0 },
            ],
            support: Support {
                lo: 0.4,
                hi: 1.0,
                lo_closed: false,
                hi_closed: true,
            },
            center: 0.7,
        },
    ],
};

impl MembershipFunctionSet {
    /// The shape family used by every controller variable.
    pub fn standard() -> &'static Self {
        &STANDARD_SHAPES
    }

    /// # Panics
    ///
    /// Panics when `index >= SET_COUNT`.
    pub fn shape(&self, index: usize) -> &MembershipFunction {
        &self.shapes[index]
    }

    /// All shapes in index order.
    pub fn shapes(&self) -> &[MembershipFunction; SET_COUNT] {
        &self.shapes
    }

    pub fn degree(&self, index: usize, v: f64) -> f64 {
        self.shape(index).degree(v)
    }

    pub fn is_in_support(&self, index: usize, v: f64) -> bool {
        self.shape(index).is_in_support(v)
    }

    pub fn center(&self, index: usize) -> f64 {
        self.shape(index).center()
    }

    pub fn area(&self, clip: f64, index: usize) -> f64 {
        self.shape(index).area(clip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn shapes() -> &'static MembershipFunctionSet {
        MembershipFunctionSet::standard()
    }

    #[test]
    fn flat_tops_have_full_degree() {
        for v in [-1.0, -0.95, -0.9, -0.85, -0.8] {
            assert_eq!(shapes().degree(0, v), 1.0, "v = {v}");
            assert!(shapes().is_in_support(0, v));
        }
        for v in [0.8, 0.85, 0.9, 0.95, 1.0] {
            assert_eq!(shapes().degree(4, v), 1.0, "v = {v}");
            assert!(shapes().is_in_support(4, v));
        }
    }

    #[test]
    fn triangle_peaks_at_center() {
        for i in 1..=3 {
            let c = shapes().center(i);
            assert!((shapes().degree(i, c) - 1.0).abs() < EPS, "shape {i}");
        }
    }

    #[test]
    fn overlapping_degrees_sum_to_one() {
        let centers = [-0.8, -0.4, 0.0, 0.4, 0.8];
        for pair in 0..4 {
            let (lo, hi) = (centers[pair], centers[pair + 1]);
            for step in 1..20 {
                let v = lo + (hi - lo) * step as f64 / 20.0;
                let sum = shapes().degree(pair, v) + shapes().degree(pair + 1, v);
                assert!((sum - 1.0).abs() < 1e-6, "v = {v}, sum = {sum}");
            }
        }
    }

    #[test]
    fn at_most_two_shapes_cover_any_point() {
        for step in 0..=200 {
            let v = -1.0 + step as f64 / 100.0;
            let covering = shapes()
                .shapes()
                .iter()
                .filter(|s| s.is_in_support(v) && s.degree(v) != 0.0)
                .count();
            assert!((1..=2).contains(&covering), "v = {v} covered by {covering}");
        }
    }

    #[test]
    fn degree_is_zero_outside_shape() {
        assert_eq!(shapes().degree(0, 0.3), 0.0);
        assert_eq!(shapes().degree(2, -0.9), 0.0);
        assert_eq!(shapes().degree(4, -1.0), 0.0);
    }

    #[test]
    fn support_ends_follow_shape_openness() {
        assert!(shapes().is_in_support(0, -1.0));
        assert!(!shapes().is_in_support(0, -0.4));
        assert!(!shapes().is_in_support(1, -0.8));
        assert!(!shapes().is_in_support(1, 0.0));
        assert!(!shapes().is_in_support(3, 0.0));
        assert!(!shapes().is_in_support(4, 0.4));
        assert!(shapes().is_in_support(4, 1.0));
    }

    #[test]
    fn centers_match_shape_layout() {
        let expected = [-0.7, -0.4, 0.0, 0.4, 0.7];
        for (i, c) in expected.iter().enumerate() {
            assert_eq!(shapes().center(i), *c);
        }
    }

    #[test]
    fn unclipped_area_is_point_four() {
        for i in 0..SET_COUNT {
            assert!((shapes().area(0.0, i) - 0.4).abs() < 1e-12, "shape {i}");
        }
    }

    #[test]
    fn fully_clipped_area_is_zero() {
        for i in 0..SET_COUNT {
            assert_eq!(shapes().area(1.0, i), 0.0, "shape {i}");
        }
    }

    #[test]
    fn half_clipped_areas() {
        assert!((shapes().area(0.5, 0) - 0.25).abs() < EPS);
        assert!((shapes().area(0.5, 4) - 0.25).abs() < EPS);
        for i in 1..=3 {
            assert!((shapes().area(0.5, i) - 0.3).abs() < EPS);
        }
    }

    #[test]
    fn clipped_area_formulas() {
        // Triangle base 0.8, height 1, top 0.25 removed: trapezoid with
        // parallel sides 0.8 and 0.2, height 0.75.
        let a = clipped_triangle_area(0.25, 0.8, 1.0);
        assert!((a - 0.375).abs() < EPS);
        // Trapezoid 0.6/0.2, top 0.25 removed: sides 0.6 and 0.3, height 0.75.
        let b = clipped_trapezoid_area(0.25, 0.6, 0.2, 1.0);
        assert!((b - 0.3375).abs() < EPS);
    }
}
