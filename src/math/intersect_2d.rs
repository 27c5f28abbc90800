use super::Point2;

/// Crossing of two infinite lines, each given by a segment.
///
/// `t1` locates `point` along the first segment and `t2` along the second,
/// where `0` is the segment start and `1` is its end.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineIntersection {
    pub point: Point2,
    pub t1: f64,
    pub t2: f64,
}

impl LineIntersection {
    /// Returns `true` if both parameters lie in `[-slack, 1 + slack]`.
    #[must_use]
    pub fn within_segments(&self, slack: f64) -> bool {
        param_on_segment(self.t1, slack) && param_on_segment(self.t2, slack)
    }

    /// Returns `true` if at least one parameter lies in `[-slack, 1 + slack]`.
    #[must_use]
    pub fn within_either_segment(&self, slack: f64) -> bool {
        param_on_segment(self.t1, slack) || param_on_segment(self.t2, slack)
    }
}

/// Returns `true` if `t` lies in `[-slack, 1 + slack]`.
#[must_use]
pub fn param_on_segment(t: f64, slack: f64) -> bool {
    t >= -slack && t <= 1.0 + slack
}

/// Parametric 2D line-line intersection of the lines through `a0 → a1` and
/// `b0 → b1`.
///
/// Solves `a0 + t1 * (a1 - a0) = b0 + t2 * (b1 - b0)` with the cross-product
/// determinant. Returns `None` if `|determinant| < tolerance`, which covers
/// both parallel and coincident lines. The result is not clipped: callers
/// check [`LineIntersection::within_segments`] to restrict to the segments.
#[must_use]
pub fn segment_intersection(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    tolerance: f64,
) -> Option<LineIntersection> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.x * db.y - da.y * db.x;
    if cross.is_nan() || cross.abs() < tolerance {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t1 = (dx * db.y - dy * db.x) / cross;
    let t2 = (dx * da.y - dy * da.x) / cross;

    Some(LineIntersection {
        point: a0 + da * t1,
        t1,
        t2,
    })
}
