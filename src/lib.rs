pub mod error;
pub mod math;
pub mod operations;
pub mod plan;
pub mod topology;

pub use error::{FloorplanError, Result};
