use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::math::intersect_2d::segment_intersection;
use crate::math::Point2;
use crate::plan::Wall;

use super::JoinParams;

/// Both walls after being clipped to their common corner.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoinedWalls {
    pub first: Wall,
    pub second: Wall,
    pub point: Point2,
}

/// Connects two walls at the crossing of their lines.
///
/// For each wall, the endpoint nearer to the crossing is moved onto it,
/// trimming an overshoot or extending a short wall. A wall the crossing
/// lies well inside of (farther than the snap band from either end) is
/// left as it is, so a T-junction only touches the stem.
pub struct JoinAtIntersection<'a> {
    a: &'a Wall,
    b: &'a Wall,
    params: JoinParams,
}

impl<'a> JoinAtIntersection<'a> {
    /// Creates a new `JoinAtIntersection` operation with default parameters.
    #[must_use]
    pub fn new(a: &'a Wall, b: &'a Wall) -> Self {
        Self {
            a,
            b,
            params: JoinParams::default(),
        }
    }

    /// Sets custom joining parameters.
    #[must_use]
    pub fn with_params(mut self, params: JoinParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` or `GeometryError::Negative` for
    /// an invalid wall, `GeometryError::Parallel` if the walls are parallel
    /// or coincident, and `GeometryError::OutsideSegments` if their lines
    /// cross away from both walls.
    pub fn execute(&self) -> Result<JoinedWalls> {
        self.a.validate()?;
        self.b.validate()?;

        let hit = segment_intersection(
            &self.a.start,
            &self.a.end,
            &self.b.start,
            &self.b.end,
            self.params.parallel_tolerance,
        )
        .ok_or(GeometryError::Parallel)?;

        if !hit.within_either_segment(self.params.slack) {
            return Err(GeometryError::OutsideSegments {
                t1: hit.t1,
                t2: hit.t2,
            }
            .into());
        }

        let first = self.clip(self.a, hit.t1, hit.point);
        let second = self.clip(self.b, hit.t2, hit.point);
        debug!(t1 = hit.t1, t2 = hit.t2, "joined walls at intersection");
        Ok(JoinedWalls {
            first,
            second,
            point: hit.point,
        })
    }

    fn clip(&self, wall: &Wall, t: f64, point: Point2) -> Wall {
        let band = self.params.snap_band;
        let mut clipped = wall.clone();
        if t > band && t < 1.0 - band {
            return clipped;
        }
        if t < 0.5 {
            clipped.start = point;
        } else {
            clipped.end = point;
        }
        clipped
    }
}
