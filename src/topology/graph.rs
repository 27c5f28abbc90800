use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::error::Result;
use crate::math::Point2;
use crate::plan::{Wall, WallId};

use super::corner_index::CornerIndex;

/// A wall as seen by the graph: its id and the corners at either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallNode {
    pub id: WallId,
    pub start_corner: usize,
    pub end_corner: usize,
}

impl WallNode {
    /// Given one corner of this wall, returns the corner at the other end.
    #[must_use]
    pub fn other_corner(&self, corner: usize) -> usize {
        if corner == self.start_corner {
            self.end_corner
        } else {
            self.start_corner
        }
    }
}

/// Adjacency between walls that share an endpoint.
///
/// Built fresh from one wall snapshot. Endpoints are merged into corners
/// with a [`CornerIndex`]; any two walls touching the same corner are
/// adjacent. Walls whose two endpoints merge into one corner are degenerate
/// and left out of the graph entirely.
#[derive(Debug)]
pub struct WallGraph {
    nodes: Vec<WallNode>,
    corners: Vec<Point2>,
    /// Corner number → indices into `nodes`, in snapshot order.
    corner_walls: Vec<Vec<usize>>,
    adjacency: BTreeMap<WallId, BTreeSet<WallId>>,
}

impl WallGraph {
    /// Builds the graph for a snapshot, merging endpoints within `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint cannot be indexed (non-finite
    /// coordinates). Callers validate snapshots first, so this only fires
    /// on unvalidated input.
    pub fn build(walls: &[Wall], tolerance: f64) -> Result<Self> {
        let mut index = CornerIndex::new(tolerance);
        let mut nodes = Vec::with_capacity(walls.len());

        for wall in walls {
            let start_corner = index.insert(&wall.start)?;
            let end_corner = index.insert(&wall.end)?;
            if start_corner == end_corner {
                trace!(wall = ?wall.id, "skipping wall shorter than snap tolerance");
                continue;
            }
            nodes.push(WallNode {
                id: wall.id,
                start_corner,
                end_corner,
            });
        }

        let mut corner_walls = vec![Vec::new(); index.len()];
        for (i, node) in nodes.iter().enumerate() {
            corner_walls[node.start_corner].push(i);
            corner_walls[node.end_corner].push(i);
        }

        let mut adjacency: BTreeMap<WallId, BTreeSet<WallId>> =
            nodes.iter().map(|n| (n.id, BTreeSet::new())).collect();
        for incident in &corner_walls {
            for &a in incident {
                for &b in incident {
                    let (a, b) = (nodes[a].id, nodes[b].id);
                    if a != b {
                        adjacency.entry(a).or_default().insert(b);
                    }
                }
            }
        }

        let graph = Self {
            nodes,
            corners: index.corners().to_vec(),
            corner_walls,
            adjacency,
        };
        debug!(
            walls = graph.nodes.len(),
            corners = graph.corners.len(),
            links = graph.link_count(),
            "built wall graph"
        );
        Ok(graph)
    }

    /// Walls in the graph, in snapshot order.
    #[must_use]
    pub fn nodes(&self) -> &[WallNode] {
        &self.nodes
    }

    /// Corner positions by corner number.
    #[must_use]
    pub fn corners(&self) -> &[Point2] {
        &self.corners
    }

    /// Indices into [`nodes`](Self::nodes) of the walls touching `corner`.
    #[must_use]
    pub fn walls_at_corner(&self, corner: usize) -> &[usize] {
        self.corner_walls.get(corner).map_or(&[][..], Vec::as_slice)
    }

    /// Wall id → ids of walls sharing an endpoint with it.
    #[must_use]
    pub fn adjacency(&self) -> &BTreeMap<WallId, BTreeSet<WallId>> {
        &self.adjacency
    }

    /// Walls sharing an endpoint with `id`, in id order.
    pub fn neighbors(&self, id: WallId) -> impl Iterator<Item = WallId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    /// Number of unordered adjacent pairs.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Number of walls touching `corner`.
    #[must_use]
    pub fn corner_degree(&self, corner: usize) -> usize {
        self.walls_at_corner(corner).len()
    }
}
