use tracing::trace;

use crate::error::{OperationError, Result};
use crate::math::intersect_2d::segment_intersection;
use crate::math::{Point2, TOLERANCE};
use crate::plan::{validate_snapshot, Wall};
use crate::topology::CornerIndex;

/// Collects the points a drawing cursor may snap to.
///
/// Candidates are wall endpoints, optionally wall midpoints, and every point
/// where two walls cross within both segments. Points closer than the
/// tolerance are merged; the first occurrence wins, so endpoints take
/// precedence over midpoints and crossings.
pub struct SnapPoints<'a> {
    walls: &'a [Wall],
    include_midpoints: bool,
    tolerance: f64,
}

impl<'a> SnapPoints<'a> {
    /// Creates a new `SnapPoints` query without midpoints.
    #[must_use]
    pub fn new(walls: &'a [Wall]) -> Self {
        Self {
            walls,
            include_midpoints: false,
            tolerance: TOLERANCE,
        }
    }

    #[must_use]
    pub fn include_midpoints(mut self, enabled: bool) -> Self {
        self.include_midpoints = enabled;
        self
    }

    /// Sets the distance below which candidates are merged.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidParameters` for a negative or
    /// non-finite tolerance, and a geometry or topology error for an
    /// invalid snapshot.
    pub fn execute(&self) -> Result<Vec<Point2>> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(OperationError::InvalidParameters(format!(
                "snap point tolerance must be finite and non-negative, got {}",
                self.tolerance
            ))
            .into());
        }
        validate_snapshot(self.walls)?;

        let mut index = CornerIndex::new(self.tolerance);
        for wall in self.walls {
            index.insert(&wall.start)?;
            index.insert(&wall.end)?;
        }
        if self.include_midpoints {
            for wall in self.walls {
                index.insert(&wall.midpoint())?;
            }
        }
        for (i, a) in self.walls.iter().enumerate() {
            for b in &self.walls[i + 1..] {
                let crossing = segment_intersection(&a.start, &a.end, &b.start, &b.end, TOLERANCE)
                    .filter(|hit| hit.within_segments(0.0));
                if let Some(hit) = crossing {
                    index.insert(&hit.point)?;
                }
            }
        }

        trace!(walls = self.walls.len(), points = index.len(), "collected snap points");
        Ok(index.corners().to_vec())
    }
}
