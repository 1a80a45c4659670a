//! Line-of-sight path smoothing
//!
//! Drops waypoints that a straight walk can skip. Visibility is tested by
//! stepping a Bresenham line between grid cells, which is an approximation
//! (cell to cell, not true clearance) good enough for tile-based movement.

use glam::Vec2;

use super::grid::NavGrid;
use super::path::Path;

/// Iterator over the grid cells of a Bresenham line, both endpoints included
#[derive(Debug, Clone)]
pub struct GridLine {
    x: i32,
    y: i32,
    end: (i32, i32),
    dx: i64,
    dy: i64,
    sx: i32,
    sy: i32,
    err: i64,
    done: bool,
}

impl GridLine {
    /// Line from `(x0, y0)` to `(x1, y1)`
    #[must_use]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        // Widened so lines spanning the whole i32 range cannot overflow
        let dx = (i64::from(x1) - i64::from(x0)).abs();
        let dy = (i64::from(y1) - i64::from(y0)).abs();
        Self {
            x: x0,
            y: y0,
            end: (x1, y1),
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            sy: if y0 < y1 { 1 } else { -1 },
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for GridLine {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.done {
            return None;
        }

        let cell = (self.x, self.y);
        if cell == self.end {
            self.done = true;
            return Some(cell);
        }

        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }

        Some(cell)
    }
}

/// Removes redundant waypoints from grid paths
#[derive(Debug, Clone, Copy)]
pub struct PathSmoother<'a> {
    grid: &'a NavGrid,
}

impl<'a> PathSmoother<'a> {
    /// Create a smoother over `grid`
    #[must_use]
    pub fn new(grid: &'a NavGrid) -> Self {
        Self { grid }
    }

    /// Whether every cell on the line between two world points is walkable
    #[must_use]
    pub fn has_line_of_sight(&self, from: Vec2, to: Vec2) -> bool {
        let (x0, y0) = self.grid.world_to_grid(from);
        let (x1, y1) = self.grid.world_to_grid(to);
        if !self.grid.is_walkable(x0, y0) || !self.grid.is_walkable(x1, y1) {
            return false;
        }

        GridLine::new(x0, y0, x1, y1).all(|(x, y)| self.grid.is_walkable(x, y))
    }

    /// Greedy furthest-visible-point reduction
    ///
    /// From each anchor, scanning stops at the first waypoint that cannot be
    /// seen; the last visible one becomes the next anchor. Paths with two or
    /// fewer waypoints, and paths that were not found, come back unchanged.
    ///
    /// Because the scan stops early, a waypoint hidden from the anchor can
    /// shadow a later one that is visible, so a second pass over the result
    /// may remove more waypoints.
    #[must_use]
    pub fn smooth(&self, path: &Path) -> Path {
        let points = &path.waypoints;
        if !path.found || points.len() <= 2 {
            return path.clone();
        }

        let mut smoothed = vec![points[0]];
        let mut anchor = 0;

        while anchor < points.len() - 1 {
            let mut furthest = anchor + 1;

            for candidate in (anchor + 2)..points.len() {
                if !self.has_line_of_sight(points[anchor], points[candidate]) {
                    break;
                }
                furthest = candidate;
            }

            smoothed.push(points[furthest]);
            anchor = furthest;
        }

        log::trace!(
            "Smoothed path from {} to {} waypoints",
            points.len(),
            smoothed.len()
        );

        Path::from_waypoints(smoothed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centers(grid: &NavGrid, cells: &[(i32, i32)]) -> Path {
        Path::from_waypoints(cells.iter().map(|&(x, y)| grid.grid_to_world(x, y)).collect())
    }

    #[test]
    fn test_grid_line_endpoints() {
        let cells: Vec<_> = GridLine::new(0, 0, 3, 0).collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);

        let cells: Vec<_> = GridLine::new(2, 2, 2, 2).collect();
        assert_eq!(cells, vec![(2, 2)]);

        let cells: Vec<_> = GridLine::new(3, 3, 0, 0).collect();
        assert_eq!(cells, vec![(3, 3), (2, 2), (1, 1), (0, 0)]);
    }

    #[test]
    fn test_grid_line_shallow_slope() {
        let cells: Vec<_> = GridLine::new(0, 0, 4, 2).collect();
        assert_eq!(cells.first(), Some(&(0, 0)));
        assert_eq!(cells.last(), Some(&(4, 2)));
        assert_eq!(cells.len(), 5);
    }

    #[test]
    fn test_line_of_sight() {
        let mut grid = NavGrid::new(5, 5, 10.0);
        let smoother = PathSmoother::new(&grid);
        assert!(smoother.has_line_of_sight(Vec2::new(5.0, 5.0), Vec2::new(45.0, 45.0)));

        grid.set_walkable(2, 2, false);
        let smoother = PathSmoother::new(&grid);
        assert!(!smoother.has_line_of_sight(Vec2::new(5.0, 5.0), Vec2::new(45.0, 45.0)));
        assert!(smoother.has_line_of_sight(Vec2::new(5.0, 5.0), Vec2::new(45.0, 5.0)));

        // Blocked endpoint blocks sight
        assert!(!smoother.has_line_of_sight(Vec2::new(5.0, 5.0), Vec2::new(25.0, 25.0)));
    }

    #[test]
    fn test_line_of_sight_far_outside_grid() {
        let grid = NavGrid::new(5, 5, 1.0);
        let smoother = PathSmoother::new(&grid);
        let far_left = Vec2::new(-1e12, 0.5);
        let far_right = Vec2::new(1e12, 0.5);

        assert!(!smoother.has_line_of_sight(far_left, far_right));
        assert!(!smoother.has_line_of_sight(Vec2::new(0.5, 0.5), far_right));
        assert!(!smoother.has_line_of_sight(Vec2::NAN, Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_grid_line_full_i32_span() {
        let mut line = GridLine::new(i32::MIN, 0, i32::MAX, 0);
        assert_eq!(line.next(), Some((i32::MIN, 0)));
        assert_eq!(line.next(), Some((i32::MIN + 1, 0)));

        let mut line = GridLine::new(0, i32::MAX, 0, i32::MIN);
        assert_eq!(line.next(), Some((0, i32::MAX)));
        assert_eq!(line.next(), Some((0, i32::MAX - 1)));
    }

    #[test]
    fn test_straight_line_collapses() {
        let grid = NavGrid::new(6, 1, 1.0);
        let raw = centers(&grid, &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);

        let smoothed = PathSmoother::new(&grid).smooth(&raw);
        assert_eq!(smoothed.waypoints, vec![raw[0], raw[5]]);
        assert!((smoothed.total_cost - raw.total_cost).abs() < 1e-5);
    }

    #[test]
    fn test_corner_is_kept() {
        // L-shaped corridor
        let mut grid = NavGrid::new(4, 4, 1.0);
        for x in 1..4 {
            for y in 1..4 {
                grid.set_walkable(x, y, false);
            }
        }
        let raw = centers(
            &grid,
            &[(0, 3), (0, 2), (0, 1), (0, 0), (1, 0), (2, 0), (3, 0)],
        );

        let smoothed = PathSmoother::new(&grid).smooth(&raw);
        assert_eq!(smoothed.waypoints, vec![raw[0], raw[3], raw[6]]);
        assert!((smoothed.total_cost - 6.0).abs() < 1e-5);

        // Smoothing again changes nothing
        let twice = PathSmoother::new(&grid).smooth(&smoothed);
        assert_eq!(twice, smoothed);
    }

    #[test]
    fn test_short_paths_untouched() {
        let grid = NavGrid::new(3, 3, 1.0);
        let two = centers(&grid, &[(0, 0), (1, 1)]);
        assert_eq!(PathSmoother::new(&grid).smooth(&two), two);

        let missing = Path::not_found();
        assert_eq!(PathSmoother::new(&grid).smooth(&missing), missing);
    }

    #[test]
    fn test_smoothing_never_increases_cost() {
        let grid = NavGrid::new(8, 8, 1.0);
        // Staircase that a straight diagonal covers
        let raw = centers(
            &grid,
            &[(0, 0), (1, 0), (1, 1), (2, 1), (2, 2), (3, 2), (3, 3)],
        );

        let smoothed = PathSmoother::new(&grid).smooth(&raw);
        assert_eq!(smoothed.len(), 2);
        assert!(smoothed.total_cost < raw.total_cost);
        assert_eq!(PathSmoother::new(&grid).smooth(&smoothed), smoothed);
    }

    #[test]
    fn test_second_pass_can_shorten_further() {
        let mut grid = NavGrid::new(5, 5, 1.0);
        grid.set_walkable(2, 1, false);
        // East along the top row, then south. The line to (3, 1) clips the
        // obstacle, which ends the first scan even though (3, 3) is in view.
        let raw = centers(
            &grid,
            &[(0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (3, 2), (3, 3)],
        );
        let smoother = PathSmoother::new(&grid);

        let once = smoother.smooth(&raw);
        assert_eq!(once.waypoints, vec![raw[0], raw[3], raw[6]]);

        let twice = smoother.smooth(&once);
        assert_eq!(twice.waypoints, vec![raw[0], raw[6]]);
        assert!(twice.total_cost < once.total_cost);

        // Two waypoints is a fixed point
        assert_eq!(smoother.smooth(&twice), twice);
    }
}
