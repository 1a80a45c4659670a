//! A* search on a [`NavGrid`]
//!
//! Every run builds its own node pool and frontier; nothing is shared
//! between runs, so a grid may be searched from several threads at once as
//! long as nobody mutates it meanwhile.

use glam::Vec2;

use super::grid::NavGrid;
use super::node::{Frontier, NodePool};
use super::path::Path;

/// Estimate of the remaining cost from `(x1, y1)` to the goal `(x2, y2)`
pub type HeuristicFn = dyn Fn(i32, i32, i32, i32) -> f32 + Send + Sync;

/// Cost of stepping from `(x1, y1)` to the neighboring cell `(x2, y2)`
pub type CostFn = dyn Fn(i32, i32, i32, i32) -> f32 + Send + Sync;

/// Manhattan distance in cells
#[must_use]
pub fn manhattan(x1: i32, y1: i32, x2: i32, y2: i32) -> f32 {
    ((x1 - x2).abs() + (y1 - y2).abs()) as f32
}

/// Euclidean distance in cells
#[must_use]
pub fn euclidean(x1: i32, y1: i32, x2: i32, y2: i32) -> f32 {
    let dx = (x2 - x1) as f32;
    let dy = (y2 - y1) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Goal reached (including start == goal)
    Found,
    /// Frontier exhausted without reaching the goal
    Unreachable,
    /// Start or goal cell is blocked or outside the grid
    BlockedEndpoint,
    /// Stopped by the expansion cap before reaching the goal
    ExpansionLimit,
}

/// Counters collected during one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes moved to the closed set
    pub expanded: usize,
    /// Distinct cells discovered
    pub generated: usize,
    /// Entries pushed onto the frontier, duplicates included
    pub frontier_pushes: u64,
    /// Stale frontier entries skipped on pop
    pub duplicates: usize,
}

/// Everything a search produces
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The path (not found unless `status` is `Found`)
    pub path: Path,
    /// How the search ended
    pub status: SearchStatus,
    /// Search counters
    pub stats: SearchStats,
}

impl SearchOutcome {
    fn without_path(status: SearchStatus, stats: SearchStats) -> Self {
        Self {
            path: Path::not_found(),
            status,
            stats,
        }
    }
}

/// A single A* query over a grid
pub struct AStarSearch<'a> {
    grid: &'a NavGrid,
    heuristic: &'a HeuristicFn,
    cost: &'a CostFn,
    allow_diagonal: bool,
    max_expansions: Option<usize>,
}

impl<'a> AStarSearch<'a> {
    /// Create a search with explicit heuristic and step cost
    #[must_use]
    pub fn new(grid: &'a NavGrid, heuristic: &'a HeuristicFn, cost: &'a CostFn) -> Self {
        Self {
            grid,
            heuristic,
            cost,
            allow_diagonal: true,
            max_expansions: None,
        }
    }

    /// Enable or disable 8-directional movement
    #[must_use]
    pub fn with_diagonal(mut self, allow_diagonal: bool) -> Self {
        self.allow_diagonal = allow_diagonal;
        self
    }

    /// Give up after this many expansions (None = unbounded)
    #[must_use]
    pub fn with_max_expansions(mut self, max_expansions: Option<usize>) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Search from `start` to `goal` (grid coordinates)
    #[must_use]
    pub fn run(&self, start: (i32, i32), goal: (i32, i32)) -> SearchOutcome {
        let mut stats = SearchStats::default();

        if !self.grid.is_walkable(start.0, start.1) || !self.grid.is_walkable(goal.0, goal.1) {
            return SearchOutcome::without_path(SearchStatus::BlockedEndpoint, stats);
        }

        if start == goal {
            return SearchOutcome {
                path: Path::from_waypoints(vec![self.grid.grid_to_world(start.0, start.1)]),
                status: SearchStatus::Found,
                stats,
            };
        }

        let mut pool = NodePool::new();
        let mut frontier = Frontier::new();

        let h = (self.heuristic)(start.0, start.1, goal.0, goal.1);
        let root = pool.insert(start.0, start.1, 0.0, h, None);
        frontier.push(root, pool.get(root));

        let mut reached = None;
        let mut status = SearchStatus::Unreachable;

        while let Some(current) = frontier.pop() {
            let node = pool.get(current);
            if node.closed {
                stats.duplicates += 1;
                continue;
            }

            let (cx, cy, current_g) = (node.x, node.y, node.g);
            if (cx, cy) == goal {
                reached = Some(current);
                status = SearchStatus::Found;
                break;
            }

            if self.max_expansions.is_some_and(|cap| stats.expanded >= cap) {
                status = SearchStatus::ExpansionLimit;
                break;
            }

            pool.close(current);
            stats.expanded += 1;

            for (nx, ny) in self.grid.neighbors(cx, cy, self.allow_diagonal) {
                if pool.is_closed(nx, ny) {
                    continue;
                }

                let tentative_g = current_g + (self.cost)(cx, cy, nx, ny);

                match pool.find(nx, ny) {
                    None => {
                        let h = (self.heuristic)(nx, ny, goal.0, goal.1);
                        let id = pool.insert(nx, ny, tentative_g, h, Some(current));
                        frontier.push(id, pool.get(id));
                    }
                    Some(id) if tentative_g < pool.get(id).g => {
                        pool.relax(id, tentative_g, current);
                        frontier.push(id, pool.get(id));
                    }
                    Some(_) => {}
                }
            }
        }

        stats.generated = pool.len();
        stats.frontier_pushes = frontier.pushes();

        let Some(goal_node) = reached else {
            return SearchOutcome::without_path(status, stats);
        };

        let waypoints: Vec<Vec2> = pool
            .trace(goal_node)
            .into_iter()
            .map(|(x, y)| self.grid.grid_to_world(x, y))
            .collect();

        SearchOutcome {
            path: Path::from_waypoints(waypoints),
            status,
            stats,
        }
    }
}
