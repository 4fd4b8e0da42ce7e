//! Translation between world-space rays and board tiles.
//!
//! The board lies on the `y = 0` ground plane, centered on the origin, with
//! one world unit per tile. Columns run along the x axis and rows along the
//! z axis.

use flow_board_core::{BoardSize, TileCoord};
use glam::Vec3;

/// World-space ray used to pick tiles from pointer input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Creates a ray starting at `origin` travelling along `direction`.
    #[must_use]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Starting point of the ray.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Direction of travel; need not be normalised.
    #[must_use]
    pub const fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point where the ray meets the ground plane.
    ///
    /// Rays parallel to the plane or pointing away from it miss.
    #[must_use]
    pub fn ground_hit(&self) -> Option<Vec3> {
        if self.direction.y.abs() <= f32::EPSILON {
            return None;
        }

        let t = -self.origin.y / self.direction.y;
        if !t.is_finite() || t < 0.0 {
            return None;
        }

        Some(self.origin + self.direction * t)
    }
}

/// Tile hit by the ray, if it strikes the board.
#[must_use]
pub fn tile_at_ray(size: BoardSize, ray: &Ray) -> Option<TileCoord> {
    let hit = ray.ground_hit()?;
    let column = axis_index(hit.x, size.columns())?;
    let row = axis_index(hit.z, size.rows())?;
    Some(TileCoord::new(column, row))
}

/// World-space position of the tile's center on the ground plane.
#[must_use]
pub fn tile_center(size: BoardSize, tile: TileCoord) -> Vec3 {
    let offset_x = (size.columns() as f32 - 1.0) * 0.5;
    let offset_z = (size.rows() as f32 - 1.0) * 0.5;
    Vec3::new(
        tile.column() as f32 - offset_x,
        0.0,
        tile.row() as f32 - offset_z,
    )
}

fn axis_index(position: f32, extent: u32) -> Option<u32> {
    let shifted = (position + extent as f32 * 0.5).floor();
    if !shifted.is_finite() || shifted < 0.0 || shifted >= extent as f32 {
        return None;
    }
    Some(shifted as u32)
}
