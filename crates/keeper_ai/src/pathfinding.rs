//! Tile grid pathfinding
//!
//! The composer only depends on the [`Pathfinder`] trait. [`TileGrid`] is a
//! weighted A* over a rectangular dungeon map, enough to drive the
//! simulation and the tests.

use crate::error::{NavigationError, Result};
use crate::tile::TileCoordinate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::f32::consts::SQRT_2;

/// Grid pathfinder
pub trait Pathfinder {
    /// Ordered tiles from `start` to `goal`, both included
    ///
    /// Returns `None` when the goal cannot be reached. `passable` decides
    /// which tiles the moving creature may enter.
    fn find_path(
        &self,
        start: TileCoordinate,
        goal: TileCoordinate,
        passable: &dyn Fn(TileCoordinate) -> bool,
    ) -> Option<Vec<TileCoordinate>>;
}

/// Terrain of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Floor,
    Rock,
    Water,
    Lava,
}

impl TileKind {
    /// Parse a map character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Self::Floor),
            '#' => Some(Self::Rock),
            '~' => Some(Self::Water),
            '%' => Some(Self::Lava),
            _ => None,
        }
    }

    /// Movement cost multiplier for entering this tile
    pub fn cost(self) -> f32 {
        match self {
            Self::Floor => 1.0,
            Self::Water => 2.0,
            Self::Lava => 3.0,
            Self::Rock => f32::INFINITY,
        }
    }

    /// Solid tiles block everyone
    pub fn is_solid(self) -> bool {
        self == Self::Rock
    }
}

/// What terrain a creature may cross
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementProfile {
    pub can_swim: bool,
    pub lava_immune: bool,
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self {
            can_swim: true,
            lava_immune: false,
        }
    }
}

impl MovementProfile {
    /// Creature that avoids water
    pub fn land_only() -> Self {
        Self {
            can_swim: false,
            lava_immune: false,
        }
    }

    /// Check whether the creature may enter `kind`
    pub fn can_enter(&self, kind: TileKind) -> bool {
        match kind {
            TileKind::Floor => true,
            TileKind::Water => self.can_swim,
            TileKind::Lava => self.lava_immune,
            TileKind::Rock => false,
        }
    }
}

/// A rectangular tile map
///
/// `x` is the column and `y` the row, both starting at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Create a grid filled with `kind`
    pub fn filled(width: i32, height: i32, kind: TileKind) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(NavigationError::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let count = width.checked_mul(height).ok_or_else(|| {
            NavigationError::InvalidConfig(format!(
                "grid of {}x{} tiles is too large",
                width, height
            ))
        })?;
        Ok(Self {
            width,
            height,
            tiles: vec![kind; count as usize],
        })
    }

    /// Parse rows of `.` floor, `#` rock, `~` water and `%` lava
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count()) as i32;
        let mut grid = Self::filled(width, height, TileKind::Floor)?;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() as i32 != width {
                return Err(NavigationError::InvalidConfig(format!(
                    "map row {} has {} tiles, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let kind = TileKind::from_char(c).ok_or_else(|| {
                    NavigationError::InvalidConfig(format!(
                        "unknown map tile '{}' at ({}, {})",
                        c, x, y
                    ))
                })?;
                grid.tiles[y * width as usize + x] = kind;
            }
        }

        Ok(grid)
    }

    /// Grid width in tiles
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in tiles
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check a tile is on the map
    pub fn contains(&self, tile: TileCoordinate) -> bool {
        tile.x >= 0 && tile.x < self.width && tile.y >= 0 && tile.y < self.height
    }

    /// Terrain at a tile, `None` off the map
    pub fn kind(&self, tile: TileCoordinate) -> Option<TileKind> {
        if self.contains(tile) {
            Some(self.tiles[(tile.y * self.width + tile.x) as usize])
        } else {
            None
        }
    }

    /// Change terrain at a tile
    pub fn set_kind(&mut self, tile: TileCoordinate, kind: TileKind) {
        if self.contains(tile) {
            self.tiles[(tile.y * self.width + tile.x) as usize] = kind;
        }
    }

    /// Passability predicate for a creature profile
    pub fn passable_for(&self, profile: MovementProfile) -> impl Fn(TileCoordinate) -> bool + '_ {
        move |tile| self.kind(tile).is_some_and(|kind| profile.can_enter(kind))
    }

    fn walkable(&self, tile: TileCoordinate, passable: &dyn Fn(TileCoordinate) -> bool) -> bool {
        matches!(self.kind(tile), Some(kind) if !kind.is_solid()) && passable(tile)
    }

    fn neighbors(
        &self,
        tile: TileCoordinate,
        passable: &dyn Fn(TileCoordinate) -> bool,
    ) -> Vec<(TileCoordinate, f32)> {
        const STEPS: [(i32, i32); 8] = [
            (0, -1),
            (-1, 0),
            (1, 0),
            (0, 1),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ];

        let mut neighbors = Vec::with_capacity(8);
        for (dx, dy) in STEPS {
            let next = tile.offset(dx, dy);
            if !self.walkable(next, passable) {
                continue;
            }
            let diagonal = dx != 0 && dy != 0;
            // No cutting corners past blocked tiles
            if diagonal
                && !(self.walkable(tile.offset(dx, 0), passable)
                    && self.walkable(tile.offset(0, dy), passable))
            {
                continue;
            }
            let step = if diagonal { SQRT_2 } else { 1.0 };
            if let Some(kind) = self.kind(next) {
                neighbors.push((next, step * kind.cost()));
            }
        }
        neighbors
    }
}

/// Octile distance, admissible for a minimum tile cost of one
fn octile(a: TileCoordinate, b: TileCoordinate) -> f32 {
    let dx = (a.x - b.x).abs() as f32;
    let dy = (a.y - b.y).abs() as f32;
    dx.max(dy) + (SQRT_2 - 1.0) * dx.min(dy)
}

#[derive(Clone, Copy)]
struct Node {
    tile: TileCoordinate,
    f_score: f32,
    order: u64,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on f, then first pushed
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl Pathfinder for TileGrid {
    fn find_path(
        &self,
        start: TileCoordinate,
        goal: TileCoordinate,
        passable: &dyn Fn(TileCoordinate) -> bool,
    ) -> Option<Vec<TileCoordinate>> {
        if !self.contains(start) || !self.walkable(goal, passable) {
            return None;
        }
        if start == goal {
            return Some(vec![start]);
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<TileCoordinate, TileCoordinate> = HashMap::new();
        let mut g_score: HashMap<TileCoordinate, f32> = HashMap::new();
        let mut closed_set: HashSet<TileCoordinate> = HashSet::new();
        let mut order = 0u64;

        g_score.insert(start, 0.0);
        open_set.push(Node {
            tile: start,
            f_score: octile(start, goal),
            order,
        });

        while let Some(current) = open_set.pop() {
            if current.tile == goal {
                let mut path = vec![goal];
                let mut tile = goal;
                while let Some(&prev) = came_from.get(&tile) {
                    path.push(prev);
                    tile = prev;
                }
                path.reverse();
                log::trace!("Found {} tile path from {} to {}", path.len(), start, goal);
                return Some(path);
            }

            if !closed_set.insert(current.tile) {
                continue;
            }

            let current_g = g_score.get(&current.tile).copied().unwrap_or(f32::MAX);

            for (neighbor, cost) in self.neighbors(current.tile, passable) {
                if closed_set.contains(&neighbor) {
                    continue;
                }

                let tentative_g = current_g + cost;
                let neighbor_g = g_score.get(&neighbor).copied().unwrap_or(f32::MAX);
                if tentative_g < neighbor_g {
                    came_from.insert(neighbor, current.tile);
                    g_score.insert(neighbor, tentative_g);
                    order += 1;
                    open_set.push(Node {
                        tile: neighbor,
                        f_score: tentative_g + octile(neighbor, goal),
                        order,
                    });
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(x: i32, y: i32) -> TileCoordinate {
        TileCoordinate::new(x, y)
    }

    fn any(_: TileCoordinate) -> bool {
        true
    }

    fn assert_connected(path: &[TileCoordinate]) {
        for w in path.windows(2) {
            assert!((w[0].x - w[1].x).abs() <= 1 && (w[0].y - w[1].y).abs() <= 1);
            assert_ne!(w[0], w[1]);
        }
    }

    #[test]
    fn test_parse_map() {
        let grid = TileGrid::from_ascii(&["..#", "~%."]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.kind(t(2, 0)), Some(TileKind::Rock));
        assert_eq!(grid.kind(t(0, 1)), Some(TileKind::Water));
        assert_eq!(grid.kind(t(1, 1)), Some(TileKind::Lava));
        assert_eq!(grid.kind(t(3, 0)), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(TileGrid::from_ascii(&["...", ".."]).is_err());
        assert!(TileGrid::from_ascii(&["..x"]).is_err());
        assert!(TileGrid::from_ascii::<&str>(&[]).is_err());
    }

    #[test]
    fn test_oversized_grid() {
        assert!(matches!(
            TileGrid::filled(i32::MAX, 2, TileKind::Floor),
            Err(NavigationError::InvalidConfig(_))
        ));
        assert!(TileGrid::filled(0, 4, TileKind::Floor).is_err());
    }

    #[test]
    fn test_straight_path() {
        let grid = TileGrid::filled(5, 5, TileKind::Floor).unwrap();
        let path = grid.find_path(t(0, 2), t(4, 2), &any).unwrap();
        assert_eq!(path, vec![t(0, 2), t(1, 2), t(2, 2), t(3, 2), t(4, 2)]);
    }

    #[test]
    fn test_start_is_goal() {
        let grid = TileGrid::filled(3, 3, TileKind::Floor).unwrap();
        assert_eq!(grid.find_path(t(1, 1), t(1, 1), &any), Some(vec![t(1, 1)]));
    }

    #[test]
    fn test_path_around_wall() {
        let grid = TileGrid::from_ascii(&[
            ".....",
            ".###.",
            ".#...",
            ".#.#.",
            "...#.",
        ])
        .unwrap();
        let path = grid.find_path(t(0, 0), t(2, 3), &any).unwrap();
        assert_eq!(path.first(), Some(&t(0, 0)));
        assert_eq!(path.last(), Some(&t(2, 3)));
        assert_connected(&path);
        assert!(path.iter().all(|&tile| grid.kind(tile) != Some(TileKind::Rock)));
    }

    #[test]
    fn test_no_corner_cutting() {
        let grid = TileGrid::from_ascii(&[".#", "#."]).unwrap();
        assert!(grid.find_path(t(0, 0), t(1, 1), &any).is_none());
    }

    #[test]
    fn test_unreachable_goal() {
        let grid = TileGrid::from_ascii(&["..#.."]).unwrap();
        assert!(grid.find_path(t(0, 0), t(4, 0), &any).is_none());
        assert!(grid.find_path(t(0, 0), t(2, 0), &any).is_none());
        assert!(grid.find_path(t(0, 0), t(9, 0), &any).is_none());
    }

    #[test]
    fn test_passability_predicate() {
        let grid = TileGrid::from_ascii(&[
            "..~..",
            "..~..",
            "..~..",
        ])
        .unwrap();

        let swimmer = grid.passable_for(MovementProfile::default());
        assert!(grid.find_path(t(0, 1), t(4, 1), &swimmer).is_some());

        let walker = grid.passable_for(MovementProfile::land_only());
        assert!(grid.find_path(t(0, 1), t(4, 1), &walker).is_none());
    }

    #[test]
    fn test_prefers_cheaper_terrain() {
        let grid = TileGrid::from_ascii(&[
            ".....",
            ".%%%.",
            ".....",
        ])
        .unwrap();
        let fireproof = grid.passable_for(MovementProfile {
            can_swim: true,
            lava_immune: true,
        });
        let path = grid.find_path(t(0, 1), t(4, 1), &fireproof).unwrap();
        // Going around costs less than wading through three lava tiles
        assert!(path.iter().all(|&tile| grid.kind(tile) != Some(TileKind::Lava)));
    }

    #[test]
    fn test_deterministic() {
        let grid = TileGrid::filled(8, 8, TileKind::Floor).unwrap();
        let a = grid.find_path(t(0, 0), t(7, 5), &any);
        let b = grid.find_path(t(0, 0), t(7, 5), &any);
        assert_eq!(a, b);
    }
}
