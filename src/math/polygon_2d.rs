use super::{Point2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Unsigned polygon area.
#[must_use]
pub fn area_2d(points: &[Point2]) -> f64 {
    signed_area_2d(points).abs()
}

/// Sum of edge lengths, including the closing edge back to the first vertex.
#[must_use]
pub fn perimeter_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| nalgebra::distance(&points[i], &points[(i + 1) % n]))
        .sum()
}

/// Arithmetic mean of the vertices.
///
/// Not the area-weighted centroid; close enough for convex and near-convex
/// rooms. Returns `None` for an empty slice.
#[must_use]
pub fn vertex_centroid_2d(points: &[Point2]) -> Option<Point2> {
    if points.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point2::new(sx / n, sy / n))
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || ((pt.x - b.x).abs() < TOLERANCE && pt.y < b.y) {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Returns the polygon in counter-clockwise order starting from its
/// leftmost-bottom vertex.
#[must_use]
pub fn normalize_ccw(points: &[Point2]) -> Vec<Point2> {
    if signed_area_2d(points) < 0.0 {
        let reversed: Vec<Point2> = points.iter().rev().copied().collect();
        rotate_to_canonical_start(&reversed)
    } else {
        rotate_to_canonical_start(points)
    }
}

/// Even-odd point-in-polygon test. Points exactly on an edge may go either way.
#[must_use]
pub fn contains_point_2d(points: &[Point2], p: &Point2) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&points[i], &points[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_ccw() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_relative_eq!(signed_area_2d(&square_ccw()), 1.0);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square_ccw();
        pts.reverse();
        assert_relative_eq!(signed_area_2d(&pts), -1.0);
        assert_relative_eq!(area_2d(&pts), 1.0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn perimeter_includes_closing_edge() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 4.0),
        ];
        assert_relative_eq!(perimeter_2d(&pts), 12.0);
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let c = vertex_centroid_2d(&pts).unwrap();
        assert_relative_eq!(c.x, 2.0);
        assert_relative_eq!(c.y, 1.0);
        assert!(vertex_centroid_2d(&[]).is_none());
    }

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let rotated = rotate_to_canonical_start(&pts);
        assert_eq!(rotated[0], Point2::new(0.0, 0.0));
        assert_eq!(rotated[1], Point2::new(1.0, 0.0));
    }

    #[test]
    fn normalize_reverses_clockwise() {
        let mut pts = square_ccw();
        pts.reverse();
        let norm = normalize_ccw(&pts);
        assert_eq!(norm, square_ccw());
    }

    #[test]
    fn contains_point_square() {
        let pts = square_ccw();
        assert!(contains_point_2d(&pts, &Point2::new(0.5, 0.5)));
        assert!(!contains_point_2d(&pts, &Point2::new(1.5, 0.5)));
        assert!(!contains_point_2d(&pts[..2], &Point2::new(0.5, 0.0)));
    }
}
