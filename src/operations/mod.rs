pub mod joining;
pub mod rooms;
