//! World/cell coordinate conversion.

use cavenav_core::{Point, Vec2};

use crate::error::NavError;

/// Fine cells aggregated per navigation cell along each axis.
///
/// One graph cell spans `cell_width * COARSE_FACTOR` by
/// `cell_height * COARSE_FACTOR` world units.
pub const COARSE_FACTOR: i32 = 8;

/// Scaling metadata shared by the navigation graph and the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavInfo {
    /// Map height in cells.
    pub cave_height: i32,
    /// Fine cell width in world units.
    pub cell_width: i32,
    /// Fine cell height in world units.
    pub cell_height: i32,
}

impl Default for NavInfo {
    fn default() -> Self {
        Self {
            cave_height: 34,
            cell_width: 8,
            cell_height: 8,
        }
    }
}

impl NavInfo {
    pub const fn new(cave_height: i32, cell_width: i32, cell_height: i32) -> Self {
        Self {
            cave_height,
            cell_width,
            cell_height,
        }
    }

    /// World units per cell along each axis.
    #[inline]
    pub fn scale(&self) -> Vec2 {
        Vec2::new(
            (self.cell_width * COARSE_FACTOR) as f32,
            (self.cell_height * COARSE_FACTOR) as f32,
        )
    }

    /// Map height in world units.
    #[inline]
    pub fn world_height(&self) -> f32 {
        self.cave_height as f32 * self.scale().y
    }

    /// The cell containing world position `v`.
    #[inline]
    pub fn cell_of(&self, v: Vec2) -> Point {
        let s = self.scale();
        Point::new((v.x / s.x).floor() as i32, (v.y / s.y).floor() as i32)
    }

    /// World position of the centre of cell `p`.
    #[inline]
    pub fn cell_center(&self, p: Point) -> Vec2 {
        let s = self.scale();
        Vec2::new((p.x as f32 + 0.5) * s.x, (p.y as f32 + 0.5) * s.y)
    }

    /// Convert a world position to fractional cell units.
    #[inline]
    pub(crate) fn to_cells(&self, v: Vec2) -> Vec2 {
        let s = self.scale();
        Vec2::new(v.x / s.x, v.y / s.y)
    }

    /// Inverse of [`to_cells`](Self::to_cells).
    #[inline]
    pub(crate) fn to_world(&self, v: Vec2) -> Vec2 {
        let s = self.scale();
        Vec2::new(v.x * s.x, v.y * s.y)
    }

    /// Reject non-positive dimensions.
    pub fn validate(&self) -> Result<(), NavError> {
        for (field, value) in [
            ("cave_height", self.cave_height),
            ("cell_width", self.cell_width),
            ("cell_height", self.cell_height),
        ] {
            if value <= 0 {
                return Err(NavError::InvalidConfiguration {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        Ok(())
    }
}
