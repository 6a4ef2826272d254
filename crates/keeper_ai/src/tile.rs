//! Tile grid coordinates and the tile-to-world transform

use crate::error::{NavigationError, Result};
use keeper_math::Vec2;
use serde::{Deserialize, Serialize};

/// Width of one map tile in world units
pub const TILE_WIDTH: f32 = 1.0;

/// A position in continuous world space
pub type WorldPoint = Vec2;

/// A discrete map tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TileCoordinate {
    pub x: i32,
    pub y: i32,
}

impl TileCoordinate {
    /// Create a new tile coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by a grid step
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for TileCoordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Mapping between tiles and world space
///
/// Tile `t` is centred on `tile_size * (t - 0.5)` and covers a square of
/// side `tile_size` around that point. Read-only once built, so a single
/// instance can be shared by every agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSpace {
    tile_size: f32,
}

impl Default for TileSpace {
    fn default() -> Self {
        Self { tile_size: TILE_WIDTH }
    }
}

impl TileSpace {
    /// Create a transform for the given tile size
    pub fn new(tile_size: f32) -> Result<Self> {
        if tile_size.is_finite() && tile_size > 0.0 {
            Ok(Self { tile_size })
        } else {
            Err(NavigationError::InvalidConfig(format!(
                "tile size must be finite and positive, got {}",
                tile_size
            )))
        }
    }

    /// Tile size in world units
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Centre of a tile in world space
    #[inline]
    pub fn to_world(&self, tile: TileCoordinate) -> WorldPoint {
        WorldPoint::new(
            self.tile_size * (tile.x as f32 - 0.5),
            self.tile_size * (tile.y as f32 - 0.5),
        )
    }

    /// Tile containing a world point
    #[inline]
    pub fn tile_at(&self, point: WorldPoint) -> TileCoordinate {
        TileCoordinate::new(
            (point.x / self.tile_size).floor() as i32 + 1,
            (point.y / self.tile_size).floor() as i32 + 1,
        )
    }
}
