//! AI navigation module
//!
//! Provides grid A* pathfinding, line-of-sight smoothing, and the hand-off
//! of finished paths to steering.

mod astar;
mod grid;
mod node;
mod path;
mod pathfinder;
mod smoothing;
mod steering;

pub use astar::{
    AStarSearch, CostFn, HeuristicFn, SearchOutcome, SearchStats, SearchStatus, euclidean,
    manhattan,
};
pub use grid::{NavGrid, Neighbors};
pub use path::{Path, path_length};
pub use pathfinder::{PathOptions, Pathfinder};
pub use smoothing::{GridLine, PathSmoother};
pub use steering::{PathFollower, SteeringBehavior, SteeringOutput};
