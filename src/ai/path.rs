//! Path value handed from the pathfinder to the locomotion layer

use std::ops::Index;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Result of pathfinding
///
/// When `found` is false the waypoints are empty and the cost is zero.
/// Callers must check `found` before reading waypoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Waypoints in world coordinates, start to goal
    pub waypoints: Vec<Vec2>,
    /// Sum of the Euclidean segment lengths between waypoints
    pub total_cost: f32,
    /// Whether a path was found
    pub found: bool,
}

impl Path {
    /// The "no path" value
    #[must_use]
    pub fn not_found() -> Self {
        Self::default()
    }

    /// A found path through `waypoints`, with its cost computed from them
    #[must_use]
    pub fn from_waypoints(waypoints: Vec<Vec2>) -> Self {
        let total_cost = path_length(&waypoints);
        Self {
            waypoints,
            total_cost,
            found: true,
        }
    }

    /// Check if the path has no waypoints
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of waypoints
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// First waypoint, if any
    #[must_use]
    pub fn first(&self) -> Option<Vec2> {
        self.waypoints.first().copied()
    }

    /// Last waypoint, if any
    #[must_use]
    pub fn last(&self) -> Option<Vec2> {
        self.waypoints.last().copied()
    }
}

impl Index<usize> for Path {
    type Output = Vec2;

    fn index(&self, index: usize) -> &Vec2 {
        &self.waypoints[index]
    }
}

/// Calculate total polyline length
#[must_use]
pub fn path_length(waypoints: &[Vec2]) -> f32 {
    waypoints.windows(2).map(|w| w[0].distance(w[1])).sum()
}
