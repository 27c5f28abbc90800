use crate::error::Result;
use crate::math::intersect_2d::{segment_intersection, LineIntersection};
use crate::plan::{validate_snapshot, Wall};

use super::JoinParams;

/// Tests two walls for a crossing that lies on both of them.
///
/// `t1` locates the crossing on `a` and `t2` on `b`. Parallel and
/// coincident walls never intersect.
#[must_use]
pub fn check_wall_intersection(a: &Wall, b: &Wall) -> Option<LineIntersection> {
    intersect_walls(a, b, &JoinParams::default())
}

pub(super) fn intersect_walls(a: &Wall, b: &Wall, params: &JoinParams) -> Option<LineIntersection> {
    segment_intersection(&a.start, &a.end, &b.start, &b.end, params.parallel_tolerance)
        .filter(|hit| hit.within_segments(params.slack))
}

/// An existing wall crossed by a target wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallHit<'a> {
    pub wall: &'a Wall,
    /// `t1` is on the target wall, `t2` on `wall`.
    pub intersection: LineIntersection,
}

/// Finds every wall of a snapshot that crosses a target wall.
///
/// The target itself (matched by id) is skipped. Hits keep snapshot order.
pub struct FindIntersectingWalls<'a> {
    target: &'a Wall,
    walls: &'a [Wall],
    params: JoinParams,
}

impl<'a> FindIntersectingWalls<'a> {
    /// Creates a new `FindIntersectingWalls` query with default parameters.
    #[must_use]
    pub fn new(target: &'a Wall, walls: &'a [Wall]) -> Self {
        Self {
            target,
            walls,
            params: JoinParams::default(),
        }
    }

    /// Sets custom intersection parameters.
    #[must_use]
    pub fn with_params(mut self, params: JoinParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns a geometry or topology error if the target or the snapshot
    /// holds non-finite coordinates, negative dimensions, or repeated ids.
    pub fn execute(&self) -> Result<Vec<WallHit<'a>>> {
        self.target.validate()?;
        validate_snapshot(self.walls)?;

        Ok(self
            .walls
            .iter()
            .filter(|w| w.id != self.target.id)
            .filter_map(|wall| {
                intersect_walls(self.target, wall, &self.params)
                    .map(|intersection| WallHit { wall, intersection })
            })
            .collect())
    }
}
