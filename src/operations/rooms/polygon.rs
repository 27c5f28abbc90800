use crate::math::polygon_2d::{perimeter_2d, signed_area_2d, vertex_centroid_2d};
use crate::math::Point2;
use crate::plan::Wall;

/// Reconstructs the vertex loop of a wall cycle.
///
/// Walks the walls in cycle order. The first wall is oriented so that it
/// leaves through the endpoint nearer to the second wall; every following
/// wall is entered through whichever endpoint is nearer to the point just
/// arrived at and left through the other one. The result holds one vertex
/// per wall, with the closing edge back to the first vertex implied.
///
/// Returns an empty vector for fewer than three walls.
#[must_use]
pub fn cycle_to_polygon(walls: &[&Wall]) -> Vec<Point2> {
    if walls.len() < 3 {
        return Vec::new();
    }

    let first = walls[0];
    let second = walls[1];
    let (mut vertices, mut arrival) =
        if distance_to_wall_ends(&first.end, second) <= distance_to_wall_ends(&first.start, second) {
            (vec![first.start], first.end)
        } else {
            (vec![first.end], first.start)
        };

    for wall in &walls[1..] {
        vertices.push(arrival);
        arrival = if nalgebra::distance(&wall.start, &arrival) <= nalgebra::distance(&wall.end, &arrival)
        {
            wall.end
        } else {
            wall.start
        };
    }

    vertices
}

fn distance_to_wall_ends(p: &Point2, wall: &Wall) -> f64 {
    nalgebra::distance(p, &wall.start).min(nalgebra::distance(p, &wall.end))
}

/// Area, perimeter, and centroid of a closed vertex loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonMetrics {
    pub signed_area: f64,
    pub area: f64,
    pub perimeter: f64,
    pub centroid: Point2,
}

impl PolygonMetrics {
    /// Measures a polygon. Returns `None` for fewer than three vertices.
    #[must_use]
    pub fn measure(vertices: &[Point2]) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let signed_area = signed_area_2d(vertices);
        Some(Self {
            signed_area,
            area: signed_area.abs(),
            perimeter: perimeter_2d(vertices),
            centroid: vertex_centroid_2d(vertices)?,
        })
    }
}
