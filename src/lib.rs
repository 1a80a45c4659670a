//! Grid navigation for game AI
//!
//! This crate provides:
//! - A walkability grid with world/grid coordinate mapping
//! - A* search with 4- or 8-directional movement and no corner cutting
//! - Line-of-sight path smoothing
//! - A path follower that feeds waypoints to steering behaviors

pub mod ai;
pub mod core;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        NavGrid, Path, PathFollower, PathOptions, Pathfinder, SearchStatus, SteeringBehavior,
        SteeringOutput,
    };
    pub use crate::core::{GridLayout, NavConfig};
    pub use glam::Vec2;
}
