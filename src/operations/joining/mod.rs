mod intersect;
mod join_at_intersection;
mod snap_points;
mod wall_joining;

pub use intersect::{check_wall_intersection, FindIntersectingWalls, WallHit};
pub use join_at_intersection::{JoinAtIntersection, JoinedWalls};
pub use snap_points::SnapPoints;
pub use wall_joining::{
    Crossing, CrossingKind, EndpointUpdate, WallEnd, WallJoin, WallJoining, WallSplit,
};

use crate::math::{PARAM_SLACK, TOLERANCE};

/// Default width of the parametric bands at either end of an existing wall
/// in which a crossing moves the endpoint instead of splitting the wall.
pub const DEFAULT_SNAP_BAND: f64 = 0.1;

/// Parameters shared by the intersection and joining operations.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoinParams {
    /// Determinant magnitude below which two walls count as parallel.
    pub parallel_tolerance: f64,
    /// Parametric slack when deciding whether a crossing lies on a wall.
    pub slack: f64,
    /// Crossings with `t <= snap_band` or `t >= 1 - snap_band` on an
    /// existing wall move its endpoint; crossings between split it.
    pub snap_band: f64,
    /// Endpoint moves shorter than this are not reported.
    pub min_move: f64,
}

impl Default for JoinParams {
    fn default() -> Self {
        Self {
            parallel_tolerance: TOLERANCE,
            slack: PARAM_SLACK,
            snap_band: DEFAULT_SNAP_BAND,
            min_move: 1e-6,
        }
    }
}
