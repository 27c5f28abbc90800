pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Default distance below which two wall endpoints are the same corner.
pub const SNAP_TOLERANCE: f64 = 2.0;

/// Slack on parametric positions when deciding whether a crossing lies on a
/// segment. `t` in `[-PARAM_SLACK, 1 + PARAM_SLACK]` counts as on-segment.
pub const PARAM_SLACK: f64 = 0.1;

/// Returns `true` if both axis deltas between `p1` and `p2` are below
/// `tolerance`.
///
/// Identical points are always equal, even with a zero tolerance.
#[must_use]
pub fn points_equal(p1: &Point2, p2: &Point2, tolerance: f64) -> bool {
    p1 == p2 || ((p1.x - p2.x).abs() < tolerance && (p1.y - p2.y).abs() < tolerance)
}

/// Returns `true` if both coordinates are finite.
#[must_use]
pub fn is_finite_point(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Midpoint of the segment `a → b`.
#[must_use]
pub fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}
