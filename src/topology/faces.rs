use std::f64::consts::{PI, TAU};

use tracing::trace;

use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point2, TOLERANCE};

use super::graph::WallGraph;
use super::Cycle;

/// Traces the bounded faces of the planar wall arrangement.
///
/// Every wall contributes two half-edges (one per direction). Walking a
/// half-edge into a corner, the walk continues along the outgoing half-edge
/// with the smallest counter-clockwise angle from the reversed incoming
/// direction. Each resulting loop keeps its face on the right, so bounded
/// faces come out clockwise and the outer boundary of each connected piece
/// comes out counter-clockwise and is dropped.
///
/// Walls hanging off a single corner are pruned first. Loops that still use
/// a wall twice (bridges between separate loops) are not simple and are
/// dropped.
#[must_use]
pub fn trace_faces(graph: &WallGraph) -> Vec<Cycle> {
    let nodes = graph.nodes();
    let corners = graph.corners();
    let alive = prune_dangling(graph);

    // Half-edge h = 2 * wall + dir; dir 0 runs start → end, dir 1 end → start.
    let tail = |h: usize| {
        let n = &nodes[h / 2];
        if h % 2 == 0 {
            n.start_corner
        } else {
            n.end_corner
        }
    };
    let head = |h: usize| tail(h ^ 1);

    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); corners.len()];
    for (wall, &is_alive) in alive.iter().enumerate() {
        if is_alive {
            outgoing[nodes[wall].start_corner].push(2 * wall);
            outgoing[nodes[wall].end_corner].push(2 * wall + 1);
        }
    }

    let angle_of = |h: usize| direction_angle(&corners[tail(h)], &corners[head(h)]);

    let mut used = vec![false; nodes.len() * 2];
    let mut faces = Vec::new();

    for first in 0..nodes.len() * 2 {
        if used[first] || !alive[first / 2] {
            continue;
        }

        let mut loop_edges = Vec::new();
        let mut current = first;
        while !used[current] {
            used[current] = true;
            loop_edges.push(current);

            let corner = head(current);
            let reverse_angle = normalize_angle(angle_of(current) + PI);
            let next = outgoing[corner]
                .iter()
                .copied()
                .map(|h| {
                    let mut delta = normalize_angle(angle_of(h) - reverse_angle);
                    if delta < TOLERANCE {
                        delta = TAU;
                    }
                    (h, delta)
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(h, _)| h);
            match next {
                Some(h) => current = h,
                None => break,
            }
        }

        if current != first || loop_edges.len() < 3 {
            continue;
        }

        let mut walls: Vec<usize> = loop_edges.iter().map(|&h| h / 2).collect();
        walls.sort_unstable();
        if walls.windows(2).any(|w| w[0] == w[1]) {
            trace!(len = loop_edges.len(), "dropping face that reuses a wall");
            continue;
        }

        let points: Vec<Point2> = loop_edges.iter().map(|&h| corners[tail(h)]).collect();
        if signed_area_2d(&points) >= -TOLERANCE {
            continue;
        }

        faces.push(Cycle {
            walls: loop_edges.iter().map(|&h| nodes[h / 2].id).collect(),
        });
    }

    faces
}

/// Marks walls that survive repeatedly removing walls with a free end.
fn prune_dangling(graph: &WallGraph) -> Vec<bool> {
    let nodes = graph.nodes();
    let mut alive = vec![true; nodes.len()];
    let mut degree: Vec<usize> = (0..graph.corners().len())
        .map(|c| graph.corner_degree(c))
        .collect();

    let mut stack: Vec<usize> = (0..degree.len()).filter(|&c| degree[c] == 1).collect();
    while let Some(corner) = stack.pop() {
        for &wall in graph.walls_at_corner(corner) {
            if !alive[wall] {
                continue;
            }
            alive[wall] = false;
            for c in [nodes[wall].start_corner, nodes[wall].end_corner] {
                degree[c] -= 1;
                if degree[c] == 1 {
                    stack.push(c);
                }
            }
        }
    }
    alive
}

fn direction_angle(from: &Point2, to: &Point2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Normalizes an angle to [0, 2pi).
fn normalize_angle(a: f64) -> f64 {
    let r = a % TAU;
    if r < 0.0 {
        r + TAU
    } else {
        r
    }
}
