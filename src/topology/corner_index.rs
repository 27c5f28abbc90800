use spade::{
    mitigate_underflow, DelaunayTriangulation, FloatTriangulation, HasPosition, InsertionError,
    Point2 as SpadePoint2, Triangulation,
};

use crate::error::{GeometryError, Result};
use crate::math::{is_finite_point, points_equal, Point2};

/// Vertex payload stored in the triangulation: position plus corner number.
#[derive(Debug, Clone, Copy)]
struct CornerVertex {
    position: SpadePoint2<f64>,
    index: usize,
}

impl HasPosition for CornerVertex {
    type Scalar = f64;

    fn position(&self) -> SpadePoint2<f64> {
        self.position
    }
}

/// Spatial index that merges points closer than a tolerance into corners.
///
/// A Delaunay triangulation of the corners answers range queries; a query
/// point joins the first corner whose axis deltas are both below the
/// tolerance, and otherwise founds a new corner. Corners are
/// numbered in the order they were first seen, and each keeps the position
/// of the point that founded it.
#[derive(Debug)]
pub struct CornerIndex {
    triangulation: DelaunayTriangulation<CornerVertex>,
    corners: Vec<Point2>,
    tolerance: f64,
}

impl CornerIndex {
    /// Creates an empty index merging points within `tolerance`.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            triangulation: DelaunayTriangulation::new(),
            corners: Vec::new(),
            tolerance,
        }
    }

    /// Returns the corner matching `p`, if any.
    ///
    /// Every corner inside the tolerance square around `p` is a candidate;
    /// the earliest one wins, so a lookup never depends on which candidate
    /// happens to be nearest.
    #[must_use]
    pub fn find(&self, p: &Point2) -> Option<usize> {
        if !is_finite_point(p) {
            return None;
        }
        let lower = SpadePoint2::new(p.x - self.tolerance, p.y - self.tolerance);
        let upper = SpadePoint2::new(p.x + self.tolerance, p.y + self.tolerance);
        self.triangulation
            .get_vertices_in_rectangle(lower, upper)
            .map(|v| v.data().index)
            .filter(|&index| points_equal(&self.corners[index], p, self.tolerance))
            .min()
    }

    /// Returns the corner matching `p`, creating one if none matches.
    ///
    /// Coordinates too close to zero for the triangulation are indexed as
    /// zero; the corner itself keeps the exact position.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the triangulation rejects the
    /// point (non-finite or out-of-range coordinates).
    pub fn insert(&mut self, p: &Point2) -> Result<usize> {
        if let Some(index) = self.find(p) {
            return Ok(index);
        }
        let index = self.corners.len();
        self.triangulation
            .insert(CornerVertex {
                position: mitigate_underflow(SpadePoint2::new(p.x, p.y)),
                index,
            })
            .map_err(|e: InsertionError| {
                GeometryError::Degenerate(format!("corner ({}, {}): {e}", p.x, p.y))
            })?;
        self.corners.push(*p);
        Ok(index)
    }

    /// Corner positions by corner number.
    #[must_use]
    pub fn corners(&self) -> &[Point2] {
        &self.corners
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }
}
