//! Tile paths translated into world space

use crate::tile::{TileCoordinate, TileSpace, WorldPoint};
use serde::{Deserialize, Serialize};

/// An ordered world-space path, one point per tile of the source path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<WorldPoint>,
}

impl Path {
    /// Create a path from world points
    pub fn new(points: Vec<WorldPoint>) -> Self {
        Self { points }
    }

    /// Empty path
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if path has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in order
    pub fn points(&self) -> &[WorldPoint] {
        &self.points
    }

    /// Last point of the path
    pub fn destination(&self) -> Option<WorldPoint> {
        self.points.last().copied()
    }

    /// Sum of segment lengths
    pub fn total_length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl TileSpace {
    /// Translate a tile path into world space, keeping the tile order
    pub fn translate(&self, tiles: &[TileCoordinate]) -> Path {
        Path::new(tiles.iter().map(|&tile| self.to_world(tile)).collect())
    }
}

/// Translate with the default tile width
pub fn translate(tiles: &[TileCoordinate]) -> Path {
    TileSpace::default().translate(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(coords: &[(i32, i32)]) -> Vec<TileCoordinate> {
        coords.iter().map(|&c| c.into()).collect()
    }

    #[test]
    fn test_translate_column() {
        let path = translate(&tiles(&[(2, 2), (2, 3), (2, 4)]));
        assert_eq!(
            path.points(),
            &[
                WorldPoint::new(1.5, 1.5),
                WorldPoint::new(1.5, 2.5),
                WorldPoint::new(1.5, 3.5),
            ]
        );
        assert_eq!(path.total_length(), 2.0);
    }

    #[test]
    fn test_translate_keeps_order() {
        // Pathfinder order is kept even when it doubles back
        let path = translate(&tiles(&[(4, 1), (1, 1), (3, 1)]));
        let xs: Vec<f32> = path.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![3.5, 0.5, 2.5]);
    }

    #[test]
    fn test_translate_is_pure() {
        let input = tiles(&[(7, -2)]);
        let first = translate(&input);
        let _ = translate(&tiles(&[(1, 1), (9, 9)]));
        assert_eq!(translate(&input), first);
    }

    #[test]
    fn test_translate_empty_and_single() {
        assert!(translate(&[]).is_empty());
        let single = translate(&tiles(&[(5, 5)]));
        assert_eq!(single.len(), 1);
        assert_eq!(single.destination(), Some(WorldPoint::new(4.5, 4.5)));
        assert_eq!(single.total_length(), 0.0);
    }
}
