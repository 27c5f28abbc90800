pub mod corner_index;
pub mod cycles;
pub mod faces;
pub mod graph;

pub use corner_index::CornerIndex;
pub use cycles::{find_cycles_dfs, DEFAULT_MAX_CYCLE_WALLS};
pub use faces::trace_faces;
pub use graph::{WallGraph, WallNode};

use std::collections::HashSet;

use tracing::debug;

use crate::plan::WallId;

/// A closed chain of distinct walls: a candidate room boundary.
///
/// Walls are listed in walking order: each shares a corner with the next,
/// and the last shares one with the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub walls: Vec<WallId>,
}

impl Cycle {
    /// Wall ids in ascending order: the identity of the cycle regardless of
    /// start wall and direction.
    #[must_use]
    pub fn key(&self) -> Vec<WallId> {
        let mut key = self.walls.clone();
        key.sort_unstable();
        key
    }
}

/// How candidate room boundaries are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CycleStrategy {
    /// Every simple cycle of at most `max_walls` walls, including outlines
    /// that enclose several smaller rooms.
    DepthFirst { max_walls: usize },
    /// Only the minimal faces of the planar arrangement, of any length.
    FaceTrace,
}

impl Default for CycleStrategy {
    fn default() -> Self {
        Self::DepthFirst {
            max_walls: DEFAULT_MAX_CYCLE_WALLS,
        }
    }
}

/// Enumerates cycles with the given strategy, keeping the first of any
/// group that share the same set of walls.
#[must_use]
pub fn find_cycles(graph: &WallGraph, strategy: CycleStrategy) -> Vec<Cycle> {
    let found = match strategy {
        CycleStrategy::DepthFirst { max_walls } => find_cycles_dfs(graph, max_walls),
        CycleStrategy::FaceTrace => trace_faces(graph),
    };
    let total = found.len();
    let cycles = dedup_cycles(found);
    debug!(found = total, unique = cycles.len(), ?strategy, "enumerated cycles");
    cycles
}

/// Drops cycles whose wall set equals that of an earlier cycle, and any
/// cycle with fewer than three walls or a repeated wall.
#[must_use]
pub fn dedup_cycles(cycles: Vec<Cycle>) -> Vec<Cycle> {
    let mut seen = HashSet::new();
    cycles
        .into_iter()
        .filter(|cycle| {
            let key = cycle.key();
            key.len() >= 3 && key.windows(2).all(|w| w[0] != w[1]) && seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn id(n: u64) -> WallId {
        WallId::from(KeyData::from_ffi(n))
    }

    fn cycle(walls: &[u64]) -> Cycle {
        Cycle {
            walls: walls.iter().map(|&n| id(n)).collect(),
        }
    }

    #[test]
    fn reversed_and_rotated_cycles_collapse() {
        let cycles = vec![cycle(&[1, 2, 3, 4]), cycle(&[4, 3, 2, 1]), cycle(&[3, 4, 1, 2])];
        let unique = dedup_cycles(cycles);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].walls, cycle(&[1, 2, 3, 4]).walls);
    }

    #[test]
    fn different_sets_survive() {
        let unique = dedup_cycles(vec![cycle(&[1, 2, 3]), cycle(&[1, 2, 4])]);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn degenerate_cycles_dropped() {
        let unique = dedup_cycles(vec![cycle(&[1, 2]), cycle(&[1, 2, 1])]);
        assert!(unique.is_empty());
    }
}
