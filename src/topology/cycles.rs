use tracing::{trace, warn};

use super::graph::WallGraph;
use super::Cycle;

/// Default cap on the number of walls in one detected cycle.
pub const DEFAULT_MAX_CYCLE_WALLS: usize = 10;

/// Enumerates simple cycles of the wall graph by depth-first search.
///
/// Each wall in snapshot order starts one search, leaving through its end
/// corner. The walk may only extend through walls later in snapshot order
/// than the starting wall, never revisits a corner, and records a cycle when
/// it arrives back at the starting wall's start corner having used at least
/// three walls. Paths are abandoned once they hold `max_walls` walls.
#[must_use]
pub fn find_cycles_dfs(graph: &WallGraph, max_walls: usize) -> Vec<Cycle> {
    let mut search = Search {
        graph,
        max_walls,
        start: 0,
        origin: 0,
        path: Vec::new(),
        on_path: vec![false; graph.nodes().len()],
        corner_seen: vec![false; graph.corners().len()],
        cycles: Vec::new(),
        capped: 0,
    };

    for (start, node) in graph.nodes().iter().enumerate() {
        search.start = start;
        search.origin = node.start_corner;
        search.path.push(start);
        search.on_path[start] = true;
        search.corner_seen[node.start_corner] = true;

        search.extend(node.end_corner);

        search.corner_seen[node.start_corner] = false;
        search.on_path[start] = false;
        search.path.pop();
    }

    if search.capped > 0 {
        let excessive = search.capped > graph.nodes().len() * 4;
        if excessive {
            warn!(
                capped = search.capped,
                max_walls, "cycle search cut many paths at the length cap"
            );
        } else {
            trace!(capped = search.capped, max_walls, "cycle search hit length cap");
        }
    }
    search.cycles
}

struct Search<'a> {
    graph: &'a WallGraph,
    max_walls: usize,
    /// Index of the wall the current search started from.
    start: usize,
    /// Corner the current search must return to.
    origin: usize,
    path: Vec<usize>,
    on_path: Vec<bool>,
    corner_seen: Vec<bool>,
    cycles: Vec<Cycle>,
    capped: usize,
}

impl Search<'_> {
    fn extend(&mut self, corner: usize) {
        if corner == self.origin {
            if self.path.len() >= 3 {
                self.record();
            }
            return;
        }
        if self.corner_seen[corner] {
            return;
        }
        if self.path.len() >= self.max_walls {
            self.capped += 1;
            return;
        }

        self.corner_seen[corner] = true;

        let graph = self.graph;
        for &next in graph.walls_at_corner(corner) {
            if next <= self.start || self.on_path[next] {
                continue;
            }
            self.path.push(next);
            self.on_path[next] = true;
            self.extend(graph.nodes()[next].other_corner(corner));
            self.on_path[next] = false;
            self.path.pop();
        }

        self.corner_seen[corner] = false;
    }

    fn record(&mut self) {
        let nodes = self.graph.nodes();
        let cycle = Cycle {
            walls: self.path.iter().map(|&i| nodes[i].id).collect(),
        };
        trace!(walls = cycle.walls.len(), "found cycle");
        self.cycles.push(cycle);
    }
}
