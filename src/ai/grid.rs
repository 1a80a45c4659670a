//! 2D walkability grid
//!
//! Owns per-tile passability and the mapping between world space and grid
//! cells. Coordinates outside the grid are never an error: they are simply
//! not walkable.

use glam::Vec2;
use smallvec::SmallVec;

/// Cardinal offsets, clockwise from north (negative y).
const CARDINAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// All eight offsets, clockwise from north.
const OCTILE: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Neighbor list returned by [`NavGrid::neighbors`]
pub type Neighbors = SmallVec<[(i32, i32); 8]>;

/// A 2D navigation grid
#[derive(Debug, Clone, PartialEq)]
pub struct NavGrid {
    /// Width in cells
    width: usize,
    /// Height in cells
    height: usize,
    /// Cell size in world units
    tile_size: f32,
    /// Walkable cells (true = walkable), row-major
    cells: Vec<bool>,
    /// World origin offset
    pub origin: Vec2,
}

impl NavGrid {
    /// Create a new grid (all cells walkable by default)
    #[must_use]
    pub fn new(width: usize, height: usize, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            cells: vec![true; width * height],
            origin: Vec2::ZERO,
        }
    }

    /// Place the grid's (0, 0) corner at `origin` in world space
    #[must_use]
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Width in cells
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// World units per tile
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Check whether a cell lies inside the grid
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Set a cell's walkability. Out-of-range cells are ignored.
    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = walkable;
        }
    }

    /// Check if a cell is walkable. Out-of-range cells never are.
    #[must_use]
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    /// Make every cell walkable again
    pub fn clear(&mut self) {
        self.cells.fill(true);
    }

    /// Number of walkable cells
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Convert world position to grid coordinates
    ///
    /// Uses floor division, so points left of or above the origin map to
    /// negative cells rather than collapsing onto row/column zero. NaN or
    /// infinite input, and any point on a zero-sized tile grid, maps to
    /// `i32::MIN`, which is never walkable.
    #[must_use]
    pub fn world_to_grid(&self, pos: Vec2) -> (i32, i32) {
        let local = (pos - self.origin) / self.tile_size;
        (to_cell(local.x), to_cell(local.y))
    }

    /// Convert grid coordinates to world position (center of cell)
    #[must_use]
    pub fn grid_to_world(&self, x: i32, y: i32) -> Vec2 {
        self.origin
            + Vec2::new(
                (x as f32 + 0.5) * self.tile_size,
                (y as f32 + 0.5) * self.tile_size,
            )
    }

    /// Walkable neighbors of a cell
    ///
    /// With `allow_diagonal`, a diagonal step is only produced when both
    /// orthogonal cells it passes between are walkable (no corner cutting).
    #[must_use]
    pub fn neighbors(&self, x: i32, y: i32, allow_diagonal: bool) -> Neighbors {
        let offsets: &[(i32, i32)] = if allow_diagonal { &OCTILE } else { &CARDINAL };
        let mut result = Neighbors::new();

        for &(dx, dy) in offsets {
            let (nx, ny) = (x + dx, y + dy);
            if !self.is_walkable(nx, ny) {
                continue;
            }
            if dx != 0
                && dy != 0
                && (!self.is_walkable(x + dx, y) || !self.is_walkable(x, y + dy))
            {
                continue;
            }
            result.push((nx, ny));
        }

        result
    }
}

fn to_cell(v: f32) -> i32 {
    if v.is_finite() {
        v.floor() as i32
    } else {
        i32::MIN
    }
}
