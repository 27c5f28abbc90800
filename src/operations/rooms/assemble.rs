use crate::math::polygon_2d::{contains_point_2d, normalize_ccw};
use crate::math::Point2;
use crate::plan::WallId;

use super::polygon::PolygonMetrics;

/// Fill colors assigned to rooms in discovery order, wrapping around.
pub const ROOM_PALETTE: [&str; 8] = [
    "#F4D6A0", "#B8D8E8", "#C9E4C5", "#F2C4CE", "#E0D4F0", "#FBE7B5", "#CDE3E1", "#EAD1BC",
];

/// A detected room: a closed polygon bounded by walls.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    /// Position among the rooms of this detection pass, from zero.
    pub id: usize,
    pub name: String,
    /// Counter-clockwise, starting at the leftmost-bottom vertex. The last
    /// vertex connects back to the first.
    pub vertices: Vec<Point2>,
    /// Boundary walls in ascending id order.
    pub wall_ids: Vec<WallId>,
    pub area: f64,
    pub perimeter: f64,
    pub centroid: Point2,
    pub color: String,
}

impl Room {
    /// Even-odd containment test against the room outline.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        contains_point_2d(&self.vertices, point)
    }
}

/// A polygon that passed the area filter, not yet numbered.
#[derive(Debug)]
pub(super) struct Candidate {
    pub wall_ids: Vec<WallId>,
    pub vertices: Vec<Point2>,
    pub metrics: PolygonMetrics,
}

/// Numbers candidates in order and assigns names and palette colors.
pub(super) fn assemble_rooms(candidates: Vec<Candidate>) -> Vec<Room> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(id, candidate)| {
            let mut wall_ids = candidate.wall_ids;
            wall_ids.sort_unstable();
            Room {
                id,
                name: format!("Room {}", id + 1),
                vertices: normalize_ccw(&candidate.vertices),
                wall_ids,
                area: candidate.metrics.area,
                perimeter: candidate.metrics.perimeter,
                centroid: candidate.metrics.centroid,
                color: ROOM_PALETTE[id % ROOM_PALETTE.len()].to_owned(),
            }
        })
        .collect()
}
