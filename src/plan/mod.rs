pub mod wall;

pub use wall::{validate_snapshot, Wall, WallDraft, WallId, DEFAULT_HEIGHT, DEFAULT_THICKNESS};

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::Point2;
use crate::operations::joining::{WallEnd, WallJoin};

/// Arena that owns the walls of one floor plan.
///
/// Walls reference each other only through [`WallId`]s (generational
/// indices), so removed walls can never be confused with later ones.
/// Detection and joining never read the store directly: callers take a
/// [`snapshot`](Self::snapshot) and feed it to the operations.
#[derive(Debug, Default, Clone)]
pub struct FloorPlan {
    walls: SlotMap<WallId, Wall>,
}

impl FloorPlan {
    /// Creates a new, empty floor plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a wall and returns its ID.
    pub fn add_wall(&mut self, draft: WallDraft) -> WallId {
        self.walls.insert_with_key(|id| draft.with_id(id))
    }

    /// Returns a reference to the wall, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::WallNotFound` if the id is unknown.
    pub fn wall(&self, id: WallId) -> Result<&Wall> {
        self.walls
            .get(id)
            .ok_or_else(|| TopologyError::WallNotFound(format!("{id:?}")).into())
    }

    /// Returns a mutable reference to the wall, or an error if not found.
    ///
    /// The wall's `id` field must not be changed through this reference.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::WallNotFound` if the id is unknown.
    pub fn wall_mut(&mut self, id: WallId) -> Result<&mut Wall> {
        self.walls
            .get_mut(id)
            .ok_or_else(|| TopologyError::WallNotFound(format!("{id:?}")).into())
    }

    /// Removes a wall, returning it.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::WallNotFound` if the id is unknown.
    pub fn remove_wall(&mut self, id: WallId) -> Result<Wall> {
        self.walls
            .remove(id)
            .ok_or_else(|| TopologyError::WallNotFound(format!("{id:?}")).into())
    }

    #[must_use]
    pub fn contains(&self, id: WallId) -> bool {
        self.walls.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Iterates over walls in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Wall> {
        self.walls.values()
    }

    /// Copies the current walls into an immutable snapshot.
    ///
    /// The order is stable for an unchanged plan, so repeated detection
    /// passes over snapshots of the same plan agree.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Wall> {
        self.walls.values().cloned().collect()
    }

    /// Finds the wall whose centerline passes closest to `point`, if any
    /// lies within `tolerance`.
    #[must_use]
    pub fn wall_at(&self, point: &Point2, tolerance: f64) -> Option<WallId> {
        self.walls
            .iter()
            .map(|(id, w)| (id, point_to_segment_dist(point, &w.start, &w.end)))
            .filter(|&(_, d)| d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Applies the mutations of a [`WallJoin`] as one transaction.
    ///
    /// Endpoint updates are written in place, split walls are replaced by
    /// their two pieces, and if the join carries pieces of the new wall the
    /// new wall is replaced by them. Returns the ids of all inserted walls
    /// in the order the join lists them.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::WallNotFound` if any referenced wall is
    /// missing. In that case the plan is left unchanged.
    pub fn apply_join(&mut self, join: &WallJoin) -> Result<Vec<WallId>> {
        let referenced = join
            .endpoint_updates
            .iter()
            .map(|u| u.wall)
            .chain(join.splits.iter().map(|s| s.wall))
            .chain((!join.new_wall_pieces.is_empty()).then_some(join.new_wall));
        for id in referenced {
            self.wall(id)?;
        }

        for update in &join.endpoint_updates {
            let wall = self.wall_mut(update.wall)?;
            match update.end {
                WallEnd::Start => wall.start = update.to,
                WallEnd::End => wall.end = update.to,
            }
        }

        let mut added = Vec::new();
        for split in &join.splits {
            self.remove_wall(split.wall)?;
            for piece in &split.pieces {
                added.push(self.add_wall(piece.clone()));
            }
        }

        if !join.new_wall_pieces.is_empty() {
            self.remove_wall(join.new_wall)?;
            for piece in &join.new_wall_pieces {
                added.push(self.add_wall(piece.clone()));
            }
        }

        debug!(
            updates = join.endpoint_updates.len(),
            splits = join.splits.len(),
            added = added.len(),
            "applied wall join"
        );
        Ok(added)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FloorplanError;
    use crate::operations::joining::WallJoining;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn add_get_remove() {
        let mut plan = FloorPlan::new();
        let id = plan.add_wall(WallDraft::new(p(0.0, 0.0), p(100.0, 0.0)));
        assert_eq!(plan.wall(id).unwrap().id, id);
        assert_eq!(plan.len(), 1);

        let removed = plan.remove_wall(id).unwrap();
        assert_eq!(removed.end, p(100.0, 0.0));
        assert!(plan.is_empty());
        assert!(matches!(
            plan.wall(id).unwrap_err(),
            FloorplanError::Topology(TopologyError::WallNotFound(_))
        ));
    }

    #[test]
    fn snapshot_keeps_insertion_order() {
        let mut plan = FloorPlan::new();
        let a = plan.add_wall(WallDraft::new(p(0.0, 0.0), p(1.0, 0.0)));
        let b = plan.add_wall(WallDraft::new(p(1.0, 0.0), p(1.0, 1.0)));
        let ids: Vec<WallId> = plan.snapshot().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn wall_at_picks_nearest() {
        let mut plan = FloorPlan::new();
        let a = plan.add_wall(WallDraft::new(p(0.0, 0.0), p(100.0, 0.0)));
        let b = plan.add_wall(WallDraft::new(p(0.0, 10.0), p(100.0, 10.0)));
        assert_eq!(plan.wall_at(&p(50.0, 3.0), 5.0), Some(a));
        assert_eq!(plan.wall_at(&p(50.0, 8.0), 5.0), Some(b));
        assert_eq!(plan.wall_at(&p(50.0, 50.0), 5.0), None);
    }

    #[test]
    fn apply_split_replaces_wall() {
        let mut plan = FloorPlan::new();
        let existing = plan.add_wall(WallDraft::new(p(0.0, 0.0), p(100.0, 0.0)));
        let new = plan.add_wall(WallDraft::new(p(50.0, -50.0), p(50.0, 50.0)));
        let snapshot = plan.snapshot();
        let new_wall = plan.wall(new).unwrap().clone();

        let join = WallJoining::new(&new_wall, &snapshot).execute().unwrap();
        let added = plan.apply_join(&join).unwrap();

        assert_eq!(added.len(), 2);
        assert!(!plan.contains(existing));
        assert_eq!(plan.len(), 3);
        let first = plan.wall(added[0]).unwrap();
        assert_eq!(first.start, p(0.0, 0.0));
        assert!((first.end.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let mut plan = FloorPlan::new();
        plan.add_wall(WallDraft::new(p(0.0, 0.0), p(100.0, 0.0)));
        let new = plan.add_wall(WallDraft::new(p(50.0, -50.0), p(50.0, 50.0)));
        let snapshot = plan.snapshot();
        let new_wall = plan.wall(new).unwrap().clone();
        let join = WallJoining::new(&new_wall, &snapshot).execute().unwrap();
        plan.apply_join(&join).unwrap();
        let after_first = plan.snapshot();

        // The split wall is gone, so replaying the same join must fail
        // without touching anything.
        assert!(plan.apply_join(&join).is_err());
        assert_eq!(plan.snapshot(), after_first);
    }
}
