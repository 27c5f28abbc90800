use tracing::debug;

use crate::error::Result;
use crate::math::intersect_2d::LineIntersection;
use crate::math::Point2;
use crate::plan::{validate_snapshot, Wall, WallDraft, WallId};

use super::intersect::intersect_walls;
use super::JoinParams;

/// One end of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WallEnd {
    Start,
    End,
}

/// How a crossing affects the existing wall it lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossingKind {
    /// Near the start: the start moves onto the crossing.
    SnapStart,
    /// Near the end: the end moves onto the crossing.
    SnapEnd,
    /// Mid-segment: the wall is cut in two at the crossing.
    Split,
}

/// A crossing between the new wall and one existing wall.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crossing {
    pub wall: WallId,
    /// `t1` is on the new wall, `t2` on the existing wall.
    pub intersection: LineIntersection,
    pub kind: CrossingKind,
}

/// Move one endpoint of an existing wall.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndpointUpdate {
    pub wall: WallId,
    pub end: WallEnd,
    pub to: Point2,
}

/// Replace an existing wall by two walls meeting at `at`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallSplit {
    pub wall: WallId,
    pub at: Point2,
    /// `start → at` and `at → end` of the original wall.
    pub pieces: [WallDraft; 2],
}

/// Mutations that keep the arrangement consistent after a new wall is drawn.
///
/// Nothing here has been applied; see
/// [`FloorPlan::apply_join`](crate::plan::FloorPlan::apply_join).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallJoin {
    pub new_wall: WallId,
    pub should_join: bool,
    pub crossings: Vec<Crossing>,
    pub join_points: Vec<Point2>,
    pub endpoint_updates: Vec<EndpointUpdate>,
    pub splits: Vec<WallSplit>,
    /// Pieces replacing the new wall. Empty unless requested with
    /// [`WallJoining::split_new_wall`] and the new wall actually changes.
    pub new_wall_pieces: Vec<WallDraft>,
}

impl WallJoin {
    /// The first join point, if any.
    #[must_use]
    pub fn join_point(&self) -> Option<Point2> {
        self.join_points.first().copied()
    }

    /// Ids of walls that are removed when the join is applied.
    pub fn removed_walls(&self) -> impl Iterator<Item = WallId> + '_ {
        self.splits
            .iter()
            .map(|s| s.wall)
            .chain((!self.new_wall_pieces.is_empty()).then_some(self.new_wall))
    }

    /// Walls that are created when the join is applied.
    pub fn new_walls(&self) -> impl Iterator<Item = &WallDraft> {
        self.splits
            .iter()
            .flat_map(|s| s.pieces.iter())
            .chain(self.new_wall_pieces.iter())
    }
}

/// Works out how existing walls must change when `new_wall` is drawn.
///
/// Each existing wall crossed by the new wall is classified by where the
/// crossing falls along it (`t2`): within the snap band of its start or end
/// the endpoint moves onto the crossing, otherwise the wall is split there.
/// Every crossing is classified independently.
pub struct WallJoining<'a> {
    new_wall: &'a Wall,
    existing: &'a [Wall],
    params: JoinParams,
    split_new_wall: bool,
}

impl<'a> WallJoining<'a> {
    /// Creates a new `WallJoining` operation with default parameters.
    ///
    /// `existing` may contain `new_wall` itself; it is skipped by id.
    #[must_use]
    pub fn new(new_wall: &'a Wall, existing: &'a [Wall]) -> Self {
        Self {
            new_wall,
            existing,
            params: JoinParams::default(),
            split_new_wall: false,
        }
    }

    /// Sets custom joining parameters.
    #[must_use]
    pub fn with_params(mut self, params: JoinParams) -> Self {
        self.params = params;
        self
    }

    /// Also cut the new wall at interior crossings and stretch it onto
    /// crossings just beyond its ends, so that every crossing becomes a
    /// shared corner.
    #[must_use]
    pub fn split_new_wall(mut self, enabled: bool) -> Self {
        self.split_new_wall = enabled;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns a geometry or topology error if the new wall or the existing
    /// walls hold non-finite coordinates, negative dimensions, or repeated
    /// ids.
    pub fn execute(&self) -> Result<WallJoin> {
        self.new_wall.validate()?;
        validate_snapshot(self.existing)?;

        let band = self.params.snap_band;
        let mut join = WallJoin {
            new_wall: self.new_wall.id,
            should_join: false,
            crossings: Vec::new(),
            join_points: Vec::new(),
            endpoint_updates: Vec::new(),
            splits: Vec::new(),
            new_wall_pieces: Vec::new(),
        };

        for wall in self.existing.iter().filter(|w| w.id != self.new_wall.id) {
            let Some(hit) = intersect_walls(self.new_wall, wall, &self.params) else {
                continue;
            };
            let point = hit.point;

            let kind = if hit.t2 <= band {
                CrossingKind::SnapStart
            } else if hit.t2 >= 1.0 - band {
                CrossingKind::SnapEnd
            } else {
                CrossingKind::Split
            };

            match kind {
                CrossingKind::SnapStart => {
                    if nalgebra::distance(&wall.start, &point) >= self.params.min_move {
                        join.endpoint_updates.push(EndpointUpdate {
                            wall: wall.id,
                            end: WallEnd::Start,
                            to: point,
                        });
                    }
                }
                CrossingKind::SnapEnd => {
                    if nalgebra::distance(&wall.end, &point) >= self.params.min_move {
                        join.endpoint_updates.push(EndpointUpdate {
                            wall: wall.id,
                            end: WallEnd::End,
                            to: point,
                        });
                    }
                }
                CrossingKind::Split => join.splits.push(WallSplit {
                    wall: wall.id,
                    at: point,
                    pieces: [
                        wall.draft_between(wall.start, point),
                        wall.draft_between(point, wall.end),
                    ],
                }),
            }

            join.crossings.push(Crossing {
                wall: wall.id,
                intersection: hit,
                kind,
            });
            join.join_points.push(point);
        }

        join.should_join = !join.crossings.is_empty();
        if self.split_new_wall && join.should_join {
            join.new_wall_pieces = self.cut_new_wall(&join.crossings);
        }

        debug!(
            crossings = join.crossings.len(),
            updates = join.endpoint_updates.len(),
            splits = join.splits.len(),
            "computed wall joining"
        );
        Ok(join)
    }

    /// Breaks the new wall at its crossings. Returns an empty list if the
    /// wall would come out unchanged.
    fn cut_new_wall(&self, crossings: &[Crossing]) -> Vec<WallDraft> {
        let wall = self.new_wall;
        let mut stops: Vec<(f64, Point2)> = Vec::with_capacity(crossings.len() + 2);
        // A crossing beyond an end replaces that end.
        if !crossings.iter().any(|c| c.intersection.t1 < 0.0) {
            stops.push((0.0, wall.start));
        }
        if !crossings.iter().any(|c| c.intersection.t1 > 1.0) {
            stops.push((1.0, wall.end));
        }
        stops.extend(crossings.iter().map(|c| (c.intersection.t1, c.intersection.point)));
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut points: Vec<Point2> = Vec::with_capacity(stops.len());
        for (_, point) in stops {
            let is_new = points
                .last()
                .is_none_or(|prev| nalgebra::distance(prev, &point) >= self.params.min_move);
            if is_new {
                points.push(point);
            }
        }

        if points.len() < 2 || points == [wall.start, wall.end] {
            return Vec::new();
        }
        points
            .windows(2)
            .map(|seg| wall.draft_between(seg[0], seg[1]))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{FloorplanError, GeometryError, TopologyError};
    use crate::math::SNAP_TOLERANCE;
    use crate::operations::rooms::{DetectRooms, DetectionParams};
    use crate::plan::FloorPlan;
    use crate::topology::CycleStrategy;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    /// Existing horizontal wall from (0, 0) to (100, 0) and a vertical new
    /// wall crossing it at `x`.
    fn crossing_at(x: f64) -> (Vec<Wall>, Wall) {
        let mut plan = FloorPlan::new();
        plan.add_wall(WallDraft::new(p(0.0, 0.0), p(100.0, 0.0)).with_thickness(15.0));
        let new = plan.add_wall(WallDraft::new(p(x, -50.0), p(x, 50.0)));
        let new_wall = plan.wall(new).unwrap().clone();
        (plan.snapshot(), new_wall)
    }

    #[test]
    fn mid_segment_split() {
        let (walls, new_wall) = crossing_at(50.0);
        let join = WallJoining::new(&new_wall, &walls).execute().unwrap();

        assert!(join.should_join);
        assert_eq!(join.crossings[0].kind, CrossingKind::Split);
        assert!(join.endpoint_updates.is_empty());
        assert_eq!(join.splits.len(), 1);

        let split = &join.splits[0];
        assert_eq!(split.wall, walls[0].id);
        let [left, right] = &split.pieces;
        // No gap, no overlap along the original line.
        assert_eq!(left.start, walls[0].start);
        assert_eq!(left.end, split.at);
        assert_eq!(right.start, split.at);
        assert_eq!(right.end, walls[0].end);
        assert_relative_eq!(split.at.x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(split.at.y, 0.0, epsilon = 1e-9);
        assert_eq!(left.thickness, 15.0);

        assert_eq!(join.removed_walls().collect::<Vec<_>>(), vec![walls[0].id]);
        assert_eq!(join.new_walls().count(), 2);
        assert_eq!(join.join_point(), Some(split.at));
    }

    #[test]
    fn snap_band_near_start() {
        let (walls, new_wall) = crossing_at(5.0);
        let join = WallJoining::new(&new_wall, &walls).execute().unwrap();
        assert_eq!(join.crossings[0].kind, CrossingKind::SnapStart);
        assert!(join.splits.is_empty());
        assert_eq!(join.endpoint_updates.len(), 1);
        let update = join.endpoint_updates[0];
        assert_eq!(update.end, WallEnd::Start);
        assert_relative_eq!(update.to.x, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn snap_band_near_end() {
        let (walls, new_wall) = crossing_at(95.0);
        let join = WallJoining::new(&new_wall, &walls).execute().unwrap();
        assert_eq!(join.crossings[0].kind, CrossingKind::SnapEnd);
        assert_eq!(join.endpoint_updates[0].end, WallEnd::End);
        assert_relative_eq!(join.endpoint_updates[0].to.x, 95.0, epsilon = 1e-9);
    }

    #[test]
    fn snap_band_extends_beyond_end() {
        // Crossing 5% past the existing wall's end still counts.
        let (walls, new_wall) = crossing_at(105.0);
        let join = WallJoining::new(&new_wall, &walls).execute().unwrap();
        assert_eq!(join.crossings[0].kind, CrossingKind::SnapEnd);
        assert_relative_eq!(join.endpoint_updates[0].to.x, 105.0, epsilon = 1e-9);
    }

    #[test]
    fn touching_endpoint_needs_no_update() {
        let (walls, new_wall) = crossing_at(100.0);
        let join = WallJoining::new(&new_wall, &walls).execute().unwrap();
        assert!(join.should_join);
        assert!(join.endpoint_updates.is_empty());
        assert!(join.splits.is_empty());
    }

    #[test]
    fn no_crossing_no_join() {
        let (walls, new_wall) = crossing_at(300.0);
        let join = WallJoining::new(&new_wall, &walls).execute().unwrap();
        assert!(!join.should_join);
        assert!(join.join_point().is_none());
        assert_eq!(join.new_walls().count(), 0);
    }

    #[test]
    fn invalid_input_is_rejected() {
        let (walls, mut new_wall) = crossing_at(50.0);
        new_wall.thickness = f64::NAN;
        assert!(matches!(
            WallJoining::new(&new_wall, &walls).execute().unwrap_err(),
            FloorplanError::Geometry(GeometryError::NonFinite { field: "thickness", .. })
        ));

        let (mut walls, new_wall) = crossing_at(50.0);
        walls[0].start.y = f64::NAN;
        assert!(matches!(
            WallJoining::new(&new_wall, &walls).execute().unwrap_err(),
            FloorplanError::Geometry(GeometryError::NonFinite { field: "start", .. })
        ));

        let (mut walls, new_wall) = crossing_at(50.0);
        walls.push(walls[0].clone());
        assert!(matches!(
            WallJoining::new(&new_wall, &walls).execute().unwrap_err(),
            FloorplanError::Topology(TopologyError::DuplicateWall(_))
        ));
    }

    #[test]
    fn several_crossings_classified_independently() {
        let mut plan = FloorPlan::new();
        plan.add_wall(WallDraft::new(p(0.0, 0.0), p(100.0, 0.0)));
        plan.add_wall(WallDraft::new(p(0.0, 100.0), p(100.0, 100.0)));
        plan.add_wall(WallDraft::new(p(100.0, 200.0), p(0.0, 200.0)));
        let new = plan.add_wall(WallDraft::new(p(50.0, -10.0), p(5.0, 210.0)));
        let new_wall = plan.wall(new).unwrap().clone();
        let walls = plan.snapshot();

        let join = WallJoining::new(&new_wall, &walls).execute().unwrap();
        let kinds: Vec<CrossingKind> = join.crossings.iter().map(|c| c.kind).collect();
        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds[1], CrossingKind::Split);
        // The third wall runs right to left, so x = 7 is near its end.
        assert_eq!(kinds[2], CrossingKind::SnapEnd);
    }

    #[test]
    fn split_new_wall_cuts_and_extends() {
        let mut plan = FloorPlan::new();
        plan.add_wall(WallDraft::new(p(0.0, 0.0), p(100.0, 0.0)));
        plan.add_wall(WallDraft::new(p(0.0, 100.0), p(100.0, 100.0)));
        // Starts on the lower wall, crosses nothing else, stops 5 short of
        // the upper wall.
        let new = plan.add_wall(WallDraft::new(p(50.0, 0.0), p(50.0, 95.0)));
        let new_wall = plan.wall(new).unwrap().clone();
        let walls = plan.snapshot();

        let join = WallJoining::new(&new_wall, &walls)
            .split_new_wall(true)
            .execute()
            .unwrap();
        assert_eq!(join.splits.len(), 2);
        assert_eq!(join.new_wall_pieces.len(), 1);
        let piece = &join.new_wall_pieces[0];
        assert_relative_eq!(piece.start.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(piece.end.y, 100.0, epsilon = 1e-9);
        assert!(join.removed_walls().any(|id| id == new));
    }

    #[test]
    fn split_new_wall_at_interior_crossing() {
        let (walls, new_wall) = crossing_at(100.0);
        let join = WallJoining::new(&new_wall, &walls)
            .split_new_wall(true)
            .execute()
            .unwrap();
        // The existing wall is only touched at its end, but the crossing
        // sits halfway along the new wall.
        assert!(join.endpoint_updates.is_empty());
        assert_eq!(join.new_wall_pieces.len(), 2);
        assert_eq!(join.new_wall_pieces[0].start, new_wall.start);
        assert_eq!(join.new_wall_pieces[1].end, new_wall.end);
    }

    #[test]
    fn split_new_wall_unchanged_when_clean() {
        let mut plan = FloorPlan::new();
        plan.add_wall(WallDraft::new(p(0.0, 0.0), p(100.0, 0.0)));
        let new = plan.add_wall(WallDraft::new(p(100.0, 0.0), p(100.0, 80.0)));
        let new_wall = plan.wall(new).unwrap().clone();
        let walls = plan.snapshot();
        let join = WallJoining::new(&new_wall, &walls)
            .split_new_wall(true)
            .execute()
            .unwrap();
        assert!(join.should_join);
        assert!(join.new_wall_pieces.is_empty());
        assert_eq!(join.removed_walls().count(), 0);
    }

    #[test]
    fn joining_then_detection_closes_rooms() {
        // A rectangle crossed by a partition that overshoots both sides.
        let mut plan = FloorPlan::new();
        for (a, b) in [
            ((0.0, 0.0), (600.0, 0.0)),
            ((600.0, 0.0), (600.0, 400.0)),
            ((600.0, 400.0), (0.0, 400.0)),
            ((0.0, 400.0), (0.0, 0.0)),
        ] {
            plan.add_wall(WallDraft::new(p(a.0, a.1), p(b.0, b.1)));
        }
        let new = plan.add_wall(WallDraft::new(p(300.0, -20.0), p(300.0, 420.0)));
        let new_wall = plan.wall(new).unwrap().clone();
        let join = WallJoining::new(&new_wall, &plan.snapshot())
            .split_new_wall(true)
            .execute()
            .unwrap();
        plan.apply_join(&join).unwrap();

        let params = DetectionParams {
            snap_tolerance: SNAP_TOLERANCE,
            strategy: CycleStrategy::FaceTrace,
            ..DetectionParams::default()
        };
        let walls = plan.snapshot();
        let rooms = DetectRooms::new(&walls).with_params(params).execute().unwrap().rooms;
        assert_eq!(rooms.len(), 2);
        for room in &rooms {
            assert_relative_eq!(room.area, 120_000.0, epsilon = 1e-6);
        }
    }
}
