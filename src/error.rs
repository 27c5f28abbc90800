use thiserror::Error;

/// Top-level error type for the floor-plan engine.
#[derive(Debug, Error)]
pub enum FloorplanError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite {field} on wall {wall}: {value}")]
    NonFinite {
        wall: String,
        field: &'static str,
        value: f64,
    },

    #[error("negative {field} on wall {wall}: {value}")]
    Negative {
        wall: String,
        field: &'static str,
        value: f64,
    },

    #[error("walls are parallel and never meet")]
    Parallel,

    #[error("walls only meet outside both segments (t1 = {t1:.3}, t2 = {t2:.3})")]
    OutsideSegments { t1: f64, t2: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to the wall network and the plan store.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("wall not found: {0}")]
    WallNotFound(String),

    #[error("wall id appears more than once in snapshot: {0}")]
    DuplicateWall(String),
}

/// Errors related to floor-plan operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Convenience type alias for results using [`FloorplanError`].
pub type Result<T> = std::result::Result<T, FloorplanError>;
