//! Pathfinding facade
//!
//! Owns the navigation grid and turns world-space requests into A* searches,
//! optionally followed by line-of-sight smoothing. No input makes it panic or
//! return an error: every "can't path" case comes back as a not-found
//! [`Path`].
//!
//! # Example
//!
//! ```ignore
//! let mut pathfinder = Pathfinder::new(20, 15, 32.0);
//! pathfinder.set_walkable(5, 3, false);
//!
//! let path = pathfinder.find_path(agent_pos, target_pos, true, true);
//! if path.found {
//!     blackboard.set_path(path);
//! }
//! ```
//!
//! Searches take `&self`, so any number of threads may search a shared
//! `Pathfinder` at once. Changing walkability needs `&mut self`; callers that
//! mutate a shared instance must bring their own lock.

use std::fmt;

use glam::Vec2;

use super::astar::{AStarSearch, CostFn, HeuristicFn, SearchOutcome, euclidean, manhattan};
use super::grid::NavGrid;
use super::path::Path;
use super::smoothing::PathSmoother;
use crate::core::{ConfigError, NavConfig};

/// Per-request search options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOptions {
    /// Allow 8-directional movement
    pub allow_diagonal: bool,
    /// Run line-of-sight smoothing on the result
    pub smooth: bool,
    /// Stop after this many node expansions (None = unbounded)
    pub max_expansions: Option<usize>,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            allow_diagonal: true,
            smooth: true,
            max_expansions: None,
        }
    }
}

/// Grid pathfinder with pluggable heuristic and step cost
pub struct Pathfinder {
    grid: NavGrid,
    /// Heuristic override (None = Manhattan scaled by tile size)
    heuristic: Option<Box<HeuristicFn>>,
    /// Step cost override (None = Euclidean scaled by tile size)
    cost: Option<Box<CostFn>>,
    /// Options used by `find_path_default`
    defaults: PathOptions,
}

impl Pathfinder {
    /// Create a pathfinder over an all-walkable grid
    #[must_use]
    pub fn new(width: usize, height: usize, tile_size: f32) -> Self {
        Self::with_grid(NavGrid::new(width, height, tile_size))
    }

    /// Create a pathfinder that owns an existing grid
    #[must_use]
    pub fn with_grid(grid: NavGrid) -> Self {
        Self {
            grid,
            heuristic: None,
            cost: None,
            defaults: PathOptions::default(),
        }
    }

    /// Create a pathfinder from a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration has non-positive dimensions or
    /// tile size
    pub fn from_config(config: &NavConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid =
            NavGrid::new(config.width, config.height, config.tile_size).with_origin(config.origin);
        let mut pathfinder = Self::with_grid(grid);
        pathfinder.defaults = config.path_options();
        Ok(pathfinder)
    }

    /// The navigation grid
    #[must_use]
    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }

    /// The navigation grid, mutably (for bulk obstacle rebuilds)
    pub fn grid_mut(&mut self) -> &mut NavGrid {
        &mut self.grid
    }

    /// Grid width in cells
    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Grid height in cells
    #[must_use]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// World units per tile
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.grid.tile_size()
    }

    /// Set a cell's walkability (out-of-range cells are ignored)
    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) {
        self.grid.set_walkable(x, y, walkable);
    }

    /// Check if a cell is walkable (out-of-range cells never are)
    #[must_use]
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.grid.is_walkable(x, y)
    }

    /// Make every cell walkable
    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Convert world position to grid coordinates
    #[must_use]
    pub fn world_to_grid(&self, pos: Vec2) -> (i32, i32) {
        self.grid.world_to_grid(pos)
    }

    /// Convert grid coordinates to world position (center of cell)
    #[must_use]
    pub fn grid_to_world(&self, x: i32, y: i32) -> Vec2 {
        self.grid.grid_to_world(x, y)
    }

    /// Replace the heuristic, e.g. with octile distance for diagonal maps
    pub fn set_heuristic<F>(&mut self, heuristic: F)
    where
        F: Fn(i32, i32, i32, i32) -> f32 + Send + Sync + 'static,
    {
        self.heuristic = Some(Box::new(heuristic));
    }

    /// Replace the step cost, e.g. with terrain-weighted costs
    pub fn set_cost_function<F>(&mut self, cost: F)
    where
        F: Fn(i32, i32, i32, i32) -> f32 + Send + Sync + 'static,
    {
        self.cost = Some(Box::new(cost));
    }

    /// Go back to the Manhattan heuristic
    pub fn reset_heuristic(&mut self) {
        self.heuristic = None;
    }

    /// Go back to the Euclidean step cost
    pub fn reset_cost_function(&mut self) {
        self.cost = None;
    }

    /// Options used by [`Self::find_path_default`]
    #[must_use]
    pub fn default_options(&self) -> PathOptions {
        self.defaults
    }

    /// Change the options used by [`Self::find_path_default`]
    pub fn set_default_options(&mut self, options: PathOptions) {
        self.defaults = options;
    }

    /// Find a path between two world positions
    #[must_use]
    pub fn find_path(&self, start: Vec2, goal: Vec2, allow_diagonal: bool, smooth: bool) -> Path {
        let options = PathOptions {
            allow_diagonal,
            smooth,
            ..self.defaults
        };
        self.search(start, goal, &options).path
    }

    /// Find a path with the default options (diagonal + smoothing unless configured otherwise)
    #[must_use]
    pub fn find_path_default(&self, start: Vec2, goal: Vec2) -> Path {
        self.search(start, goal, &self.defaults).path
    }

    /// Find a path and report how the search went
    #[must_use]
    pub fn search(&self, start: Vec2, goal: Vec2, options: &PathOptions) -> SearchOutcome {
        let start_cell = self.grid.world_to_grid(start);
        let goal_cell = self.grid.world_to_grid(goal);

        let tile = self.grid.tile_size();
        let default_heuristic = move |x1, y1, x2, y2| manhattan(x1, y1, x2, y2) * tile;
        let default_cost = move |x1, y1, x2, y2| euclidean(x1, y1, x2, y2) * tile;

        let heuristic: &HeuristicFn = match &self.heuristic {
            Some(h) => h.as_ref(),
            None => &default_heuristic,
        };
        let cost: &CostFn = match &self.cost {
            Some(c) => c.as_ref(),
            None => &default_cost,
        };

        let mut outcome = AStarSearch::new(&self.grid, heuristic, cost)
            .with_diagonal(options.allow_diagonal)
            .with_max_expansions(options.max_expansions)
            .run(start_cell, goal_cell);

        if options.smooth && outcome.path.found && outcome.path.len() > 2 {
            outcome.path = PathSmoother::new(&self.grid).smooth(&outcome.path);
        }

        log::debug!(
            "Path {:?} -> {:?}: {:?}, {} waypoints, cost {:.2}, {} expanded",
            start_cell,
            goal_cell,
            outcome.status,
            outcome.path.len(),
            outcome.path.total_cost,
            outcome.stats.expanded
        );

        outcome
    }
}

impl fmt::Debug for Pathfinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pathfinder")
            .field("grid", &format_args!("{}x{}", self.grid.width(), self.grid.height()))
            .field("tile_size", &self.grid.tile_size())
            .field("custom_heuristic", &self.heuristic.is_some())
            .field("custom_cost", &self.cost.is_some())
            .field("defaults", &self.defaults)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::SearchStatus;

    #[test]
    fn test_end_to_end_row() {
        let pathfinder = Pathfinder::new(5, 5, 32.0);
        let path =
            pathfinder.find_path(Vec2::new(16.0, 16.0), Vec2::new(144.0, 16.0), false, false);

        assert!(path.found);
        assert_eq!(
            path.waypoints,
            vec![
                Vec2::new(16.0, 16.0),
                Vec2::new(48.0, 16.0),
                Vec2::new(80.0, 16.0),
                Vec2::new(112.0, 16.0),
                Vec2::new(144.0, 16.0),
            ]
        );
        assert!((path.total_cost - 128.0).abs() < 1e-3);
    }

    #[test]
    fn test_open_row_cost_matches_distance() {
        let pathfinder = Pathfinder::new(12, 3, 8.0);
        for n in 1..12 {
            let goal = pathfinder.grid_to_world(n, 0);
            let path = pathfinder.find_path(pathfinder.grid_to_world(0, 0), goal, true, true);
            assert!(path.found);
            assert!((path.total_cost - n as f32 * 8.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_same_cell_is_trivial() {
        let pathfinder = Pathfinder::new(5, 5, 32.0);
        // Both points lie inside tile (1, 2)
        let path = pathfinder.find_path(Vec2::new(33.0, 70.0), Vec2::new(60.0, 90.0), true, true);

        assert!(path.found);
        assert_eq!(path.waypoints, vec![Vec2::new(48.0, 80.0)]);
        assert_eq!(path.total_cost, 0.0);
    }

    #[test]
    fn test_unwalkable_endpoints() {
        let mut pathfinder = Pathfinder::new(5, 5, 1.0);
        pathfinder.set_walkable(2, 2, false);

        let corner = Vec2::new(0.5, 0.5);
        let blocked = Vec2::new(2.5, 2.5);

        let blocked_goal = pathfinder.find_path(corner, blocked, true, true);
        let blocked_start = pathfinder.find_path(blocked, corner, true, true);
        let outside = pathfinder.find_path(Vec2::new(-3.0, 0.5), corner, true, true);
        let same_blocked =
            pathfinder.find_path(Vec2::new(2.1, 2.1), Vec2::new(2.9, 2.9), true, true);

        for path in [blocked_goal, blocked_start, outside, same_blocked] {
            assert!(!path.found);
            assert!(path.is_empty());
            assert_eq!(path.total_cost, 0.0);
        }
    }

    #[test]
    fn test_non_finite_points_are_not_found() {
        let pathfinder = Pathfinder::new(5, 5, 1.0);
        let goal = Vec2::new(3.5, 0.5);

        let nan_start = pathfinder.search(Vec2::NAN, goal, &pathfinder.default_options());
        assert_eq!(nan_start.status, SearchStatus::BlockedEndpoint);
        assert!(!nan_start.path.found);
        assert!(nan_start.path.is_empty());

        assert!(!pathfinder.find_path(goal, Vec2::new(f32::NAN, 0.5), false, false).found);
        assert!(!pathfinder.find_path(Vec2::INFINITY, goal, true, true).found);
        let far = pathfinder.find_path(Vec2::new(-1e12, 0.5), Vec2::new(1e12, 0.5), true, true);
        assert!(!far.found);
    }

    #[test]
    fn test_zero_tile_grid_finds_nothing() {
        let pathfinder = Pathfinder::new(5, 5, 0.0);
        assert!(!pathfinder.find_path(Vec2::ZERO, Vec2::ZERO, true, true).found);
        assert!(!pathfinder.find_path(Vec2::ZERO, Vec2::new(1.0, 1.0), false, false).found);

        let empty = Pathfinder::new(0, 0, 1.0);
        assert!(!empty.find_path(Vec2::ZERO, Vec2::ZERO, true, true).found);
    }

    #[test]
    fn test_smoothing_applied() {
        let pathfinder = Pathfinder::new(10, 10, 1.0);
        let start = Vec2::new(0.5, 0.5);
        let goal = Vec2::new(9.5, 3.5);

        let raw = pathfinder.find_path(start, goal, false, false);
        let smooth = pathfinder.find_path(start, goal, false, true);

        assert_eq!(raw.len(), 13);
        assert_eq!(smooth.waypoints, vec![start, goal]);
        assert!(smooth.total_cost < raw.total_cost);
    }

    #[test]
    fn test_repeat_queries_are_deterministic() {
        let mut pathfinder = Pathfinder::new(16, 16, 2.0);
        for y in 0..12 {
            pathfinder.set_walkable(7, y, false);
        }
        let start = pathfinder.grid_to_world(1, 1);
        let goal = pathfinder.grid_to_world(14, 2);

        let first = pathfinder.find_path(start, goal, true, false);
        for _ in 0..5 {
            let again = pathfinder.find_path(start, goal, true, false);
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_concurrent_searches() {
        let mut pathfinder = Pathfinder::new(32, 32, 1.0);
        for x in 4..28 {
            pathfinder.set_walkable(x, 16, false);
        }
        let expected = pathfinder.find_path(Vec2::new(0.5, 0.5), Vec2::new(20.5, 30.5), true, true);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        pathfinder.find_path(Vec2::new(0.5, 0.5), Vec2::new(20.5, 30.5), true, true)
                    })
                })
                .collect();

            for handle in handles {
                assert_eq!(handle.join().expect("search thread panicked"), expected);
            }
        });
    }

    #[test]
    fn test_dynamic_obstacles() {
        let mut pathfinder = Pathfinder::new(5, 5, 1.0);
        let start = Vec2::new(0.5, 2.5);
        let goal = Vec2::new(4.5, 2.5);

        assert!(pathfinder.find_path(start, goal, false, false).found);

        for y in 0..5 {
            pathfinder.set_walkable(2, y, false);
        }
        assert!(!pathfinder.find_path(start, goal, false, false).found);

        pathfinder.set_walkable(2, 4, true);
        let detour = pathfinder.find_path(start, goal, false, false);
        assert!(detour.found);
        assert!((detour.total_cost - 8.0).abs() < 1e-4);

        pathfinder.clear();
        let direct = pathfinder.find_path(start, goal, false, false);
        assert!((direct.total_cost - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_custom_heuristic_and_cost() {
        let mut pathfinder = Pathfinder::new(6, 6, 1.0);
        // Column 3 is mud
        pathfinder.set_cost_function(|x1, y1, x2, y2| {
            let step = euclidean(x1, y1, x2, y2);
            if x2 == 3 { step * 5.0 } else { step }
        });
        pathfinder.set_heuristic(|x1, y1, x2, y2| {
            let dx = (x1 - x2).abs() as f32;
            let dy = (y1 - y2).abs() as f32;
            dx.max(dy) + (std::f32::consts::SQRT_2 - 1.0) * dx.min(dy)
        });

        let outcome = pathfinder.search(
            Vec2::new(0.5, 0.5),
            Vec2::new(5.5, 0.5),
            &PathOptions {
                smooth: false,
                ..PathOptions::default()
            },
        );
        assert_eq!(outcome.status, SearchStatus::Found);
        // Grid cost is ignored by total_cost, which is pure geometry
        assert!((outcome.path.total_cost - 5.0).abs() < 1e-4);
        assert!(outcome.stats.expanded > 0);

        pathfinder.reset_cost_function();
        pathfinder.reset_heuristic();
        assert!(format!("{pathfinder:?}").contains("custom_cost: false"));
    }

    #[test]
    fn test_expansion_cap_option() {
        let mut pathfinder = Pathfinder::new(40, 40, 1.0);
        pathfinder.set_default_options(PathOptions {
            max_expansions: Some(10),
            ..PathOptions::default()
        });

        let capped = pathfinder.search(
            Vec2::new(0.5, 0.5),
            Vec2::new(39.5, 39.5),
            &pathfinder.default_options(),
        );
        assert_eq!(capped.status, SearchStatus::ExpansionLimit);
        assert!(!capped.path.found);
        assert!(!pathfinder.find_path_default(Vec2::new(0.5, 0.5), Vec2::new(39.5, 39.5)).found);
    }

    #[test]
    fn test_from_config() {
        let config = NavConfig::default()
            .with_size(8, 4)
            .with_tile_size(16.0)
            .with_diagonal(false);
        let pathfinder = Pathfinder::from_config(&config).expect("valid config");

        assert_eq!(pathfinder.width(), 8);
        assert_eq!(pathfinder.height(), 4);
        assert_eq!(pathfinder.tile_size(), 16.0);
        assert!(!pathfinder.default_options().allow_diagonal);

        let bad = NavConfig::default().with_tile_size(0.0);
        assert!(Pathfinder::from_config(&bad).is_err());
    }
}
