//! Floor plan walkthrough: draw walls, join them, detect rooms.
//!
//! ```text
//! cargo run --example rooms
//! RUST_LOG=floorplan=debug cargo run --example rooms
//! ```

use floorplan::math::Point2;
use floorplan::operations::joining::{SnapPoints, WallJoining};
use floorplan::operations::rooms::{DetectRooms, DetectionParams};
use floorplan::plan::{FloorPlan, WallDraft};
use floorplan::topology::CycleStrategy;
use floorplan::FloorplanError;
use tracing::info;

fn main() -> Result<(), FloorplanError> {
    // Default: WARN for everything, INFO for floorplan.
    // Override with RUST_LOG env var (e.g. RUST_LOG=floorplan=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("rooms=info".parse().unwrap_or_default())
        .add_directive("floorplan=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // 8 m x 5 m outline, in centimetres.
    let mut plan = FloorPlan::new();
    let outline = [
        (Point2::new(0.0, 0.0), Point2::new(800.0, 0.0)),
        (Point2::new(800.0, 0.0), Point2::new(800.0, 500.0)),
        (Point2::new(800.0, 500.0), Point2::new(0.0, 500.0)),
        (Point2::new(0.0, 500.0), Point2::new(0.0, 0.0)),
    ];
    for (start, end) in outline {
        plan.add_wall(WallDraft::new(start, end).with_thickness(20.0));
    }

    // Interior partitions, drawn sloppily past the walls they meet.
    let partitions = [
        (Point2::new(500.0, -15.0), Point2::new(500.0, 515.0)),
        (Point2::new(-10.0, 250.0), Point2::new(504.0, 250.0)),
    ];
    for (start, end) in partitions {
        let id = plan.add_wall(WallDraft::new(start, end));
        let new_wall = plan.wall(id)?.clone();
        let join = WallJoining::new(&new_wall, &plan.snapshot())
            .split_new_wall(true)
            .execute()?;
        info!(
            crossings = join.crossings.len(),
            splits = join.splits.len(),
            updates = join.endpoint_updates.len(),
            "joined partition"
        );
        plan.apply_join(&join)?;
    }

    let walls = plan.snapshot();
    let snap_points = SnapPoints::new(&walls).include_midpoints(true).execute()?;
    info!(walls = walls.len(), snap_points = snap_points.len(), "plan ready");

    for strategy in [CycleStrategy::default(), CycleStrategy::FaceTrace] {
        let params = DetectionParams {
            strategy,
            ..DetectionParams::default()
        };
        let detection = DetectRooms::new(&walls).with_params(params).execute()?;
        info!(?strategy, rooms = detection.rooms.len(), "detected rooms");
        for room in &detection.rooms {
            info!(
                name = %room.name,
                area_m2 = room.area / 10_000.0,
                perimeter_m = room.perimeter / 100.0,
                color = %room.color,
                "room"
            );
        }
    }
    Ok(())
}
