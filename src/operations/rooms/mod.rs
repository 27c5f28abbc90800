mod assemble;
mod polygon;

pub use assemble::{Room, ROOM_PALETTE};
pub use polygon::{cycle_to_polygon, PolygonMetrics};

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::math::{Point2, SNAP_TOLERANCE};
use crate::plan::{validate_snapshot, Wall, WallId};
use crate::topology::{find_cycles, CycleStrategy, WallGraph};

use assemble::{assemble_rooms, Candidate};

/// Default minimum room area; smaller loops are treated as slivers.
pub const DEFAULT_MIN_ROOM_AREA: f64 = 100.0;

/// Parameters for room detection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectionParams {
    /// Distance below which wall endpoints count as the same corner.
    pub snap_tolerance: f64,
    /// Polygons with a smaller area are not reported as rooms.
    pub min_area: f64,
    pub strategy: CycleStrategy,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            snap_tolerance: SNAP_TOLERANCE,
            min_area: DEFAULT_MIN_ROOM_AREA,
            strategy: CycleStrategy::default(),
        }
    }
}

impl DetectionParams {
    fn validate(&self) -> Result<()> {
        if !self.snap_tolerance.is_finite() || self.snap_tolerance < 0.0 {
            return Err(OperationError::InvalidParameters(format!(
                "snap tolerance must be finite and non-negative, got {}",
                self.snap_tolerance
            ))
            .into());
        }
        if self.min_area.is_nan() {
            return Err(OperationError::InvalidParameters("minimum area is NaN".into()).into());
        }
        if let CycleStrategy::DepthFirst { max_walls } = self.strategy {
            if max_walls < 3 {
                return Err(OperationError::InvalidParameters(format!(
                    "cycle length cap must be at least 3, got {max_walls}"
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Output of one detection pass.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomDetection {
    pub rooms: Vec<Room>,
    /// Vertex loops of every closed cycle, including those too small to be
    /// rooms, in traversal order.
    pub closed_shapes: Vec<Vec<Point2>>,
}

/// Infers rooms from a wall snapshot.
///
/// Builds the wall graph, enumerates closed wall cycles, turns each into a
/// polygon, and keeps the polygons whose area reaches the minimum. The
/// result depends only on the snapshot and parameters.
pub struct DetectRooms<'a> {
    walls: &'a [Wall],
    params: DetectionParams,
}

impl<'a> DetectRooms<'a> {
    /// Creates a new `DetectRooms` operation with default parameters.
    #[must_use]
    pub fn new(walls: &'a [Wall]) -> Self {
        Self {
            walls,
            params: DetectionParams::default(),
        }
    }

    /// Sets custom detection parameters.
    #[must_use]
    pub fn with_params(mut self, params: DetectionParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the detection.
    ///
    /// Fewer than three walls is not an error: the result is simply empty.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidParameters` for unusable parameters,
    /// and a geometry or topology error if the snapshot holds non-finite
    /// coordinates, negative dimensions, or repeated wall ids.
    pub fn execute(&self) -> Result<RoomDetection> {
        self.params.validate()?;
        validate_snapshot(self.walls)?;

        if self.walls.len() < 3 {
            return Ok(RoomDetection::default());
        }

        let graph = WallGraph::build(self.walls, self.params.snap_tolerance)?;
        let cycles = find_cycles(&graph, self.params.strategy);

        let by_id: HashMap<WallId, &Wall> = self.walls.iter().map(|w| (w.id, w)).collect();
        let mut closed_shapes = Vec::with_capacity(cycles.len());
        let mut candidates = Vec::new();

        for cycle in cycles {
            let walls: Vec<&Wall> = cycle
                .walls
                .iter()
                .filter_map(|id| by_id.get(id).copied())
                .collect();
            let vertices = cycle_to_polygon(&walls);
            let Some(metrics) = PolygonMetrics::measure(&vertices) else {
                continue;
            };
            closed_shapes.push(vertices.clone());

            if metrics.area < self.params.min_area {
                trace!(area = metrics.area, "discarding sliver cycle");
                continue;
            }
            candidates.push(Candidate {
                wall_ids: cycle.walls,
                vertices,
                metrics,
            });
        }

        let rooms = assemble_rooms(candidates);
        debug!(
            walls = self.walls.len(),
            shapes = closed_shapes.len(),
            rooms = rooms.len(),
            "room detection finished"
        );
        Ok(RoomDetection {
            rooms,
            closed_shapes,
        })
    }
}
