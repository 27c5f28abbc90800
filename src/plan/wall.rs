use std::collections::HashSet;

use crate::error::{GeometryError, Result, TopologyError};
use crate::math::{is_finite_point, midpoint, Point2};

slotmap::new_key_type! {
    /// Stable identifier for a wall in a floor plan.
    pub struct WallId;
}

/// Default wall thickness in plan units.
pub const DEFAULT_THICKNESS: f64 = 10.0;

/// Default wall height in plan units.
pub const DEFAULT_HEIGHT: f64 = 250.0;

/// A drawn wall: a directed segment with physical attributes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wall {
    pub id: WallId,
    pub start: Point2,
    pub end: Point2,
    pub thickness: f64,
    pub height: f64,
    /// Reference into an external material catalog.
    pub material: Option<String>,
}

impl Wall {
    /// Creates a wall with default thickness and height.
    #[must_use]
    pub fn new(id: WallId, start: Point2, end: Point2) -> Self {
        WallDraft::new(start, end).with_id(id)
    }

    /// Centerline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.start, &self.end)
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        midpoint(&self.start, &self.end)
    }

    /// Copy of this wall's attributes with new endpoints and no identity.
    #[must_use]
    pub fn draft_between(&self, start: Point2, end: Point2) -> WallDraft {
        WallDraft {
            start,
            end,
            thickness: self.thickness,
            height: self.height,
            material: self.material.clone(),
        }
    }

    /// Checks that coordinates are finite and attributes are non-negative.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` or `GeometryError::Negative`.
    pub fn validate(&self) -> Result<()> {
        let wall = || format!("{:?}", self.id);
        for (field, point) in [("start", &self.start), ("end", &self.end)] {
            if !is_finite_point(point) {
                let value = if point.x.is_finite() { point.y } else { point.x };
                return Err(GeometryError::NonFinite {
                    wall: wall(),
                    field,
                    value,
                }
                .into());
            }
        }
        for (field, value) in [("thickness", self.thickness), ("height", self.height)] {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite {
                    wall: wall(),
                    field,
                    value,
                }
                .into());
            }
            if value < 0.0 {
                return Err(GeometryError::Negative {
                    wall: wall(),
                    field,
                    value,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// A wall that has not been assigned an identity yet.
///
/// Replacement walls produced by the joining engine are drafts; the plan
/// store assigns ids when it applies them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallDraft {
    pub start: Point2,
    pub end: Point2,
    pub thickness: f64,
    pub height: f64,
    pub material: Option<String>,
}

impl WallDraft {
    /// Creates a draft with default thickness and height.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            start,
            end,
            thickness: DEFAULT_THICKNESS,
            height: DEFAULT_HEIGHT,
            material: None,
        }
    }

    #[must_use]
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Attaches an identity, producing a [`Wall`].
    #[must_use]
    pub fn with_id(self, id: WallId) -> Wall {
        Wall {
            id,
            start: self.start,
            end: self.end,
            thickness: self.thickness,
            height: self.height,
            material: self.material,
        }
    }
}

/// Validates every wall of a snapshot and rejects repeated ids.
///
/// # Errors
///
/// Returns the first validation failure found, in snapshot order.
pub fn validate_snapshot(walls: &[Wall]) -> Result<()> {
    let mut seen = HashSet::with_capacity(walls.len());
    for wall in walls {
        wall.validate()?;
        if !seen.insert(wall.id) {
            return Err(TopologyError::DuplicateWall(format!("{:?}", wall.id)).into());
        }
    }
    Ok(())
}
