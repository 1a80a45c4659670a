//! Hand-off from paths to steering
//!
//! The steering kernel (seek, arrival, pursuit, ...) lives with the
//! locomotion code. This module only defines the seam it plugs into and the
//! follower that walks an agent through a [`Path`] one waypoint at a time.

use glam::Vec2;

use super::path::Path;

/// Output from a steering behavior
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringOutput {
    /// Linear acceleration
    pub linear: Vec2,
    /// Angular acceleration
    pub angular: f32,
}

impl SteeringOutput {
    /// Zero steering
    pub const ZERO: Self = Self {
        linear: Vec2::ZERO,
        angular: 0.0,
    };
}

/// Trait for steering behaviors that chase a waypoint
pub trait SteeringBehavior {
    /// Calculate steering towards `target`
    ///
    /// `is_final` is set for the last waypoint of the path, where an
    /// arrival-style behavior should brake instead of passing through.
    fn calculate(
        &self,
        position: Vec2,
        velocity: Vec2,
        target: Vec2,
        is_final: bool,
    ) -> SteeringOutput;
}

/// Walks an agent along a path
///
/// Tracks the current waypoint index and the goal the path was planned
/// for, so the owner can tell when the target has moved far enough that a
/// fresh search is due.
#[derive(Debug, Clone)]
pub struct PathFollower {
    path: Path,
    index: usize,
    planned_goal: Option<Vec2>,
    /// Distance at which a waypoint counts as reached
    pub arrival_radius: f32,
    /// Target displacement that invalidates the current path
    pub repath_distance: f32,
}

impl PathFollower {
    /// Create a follower with no path
    #[must_use]
    pub fn new(arrival_radius: f32) -> Self {
        Self {
            path: Path::not_found(),
            index: 0,
            planned_goal: None,
            arrival_radius,
            repath_distance: arrival_radius * 4.0,
        }
    }

    /// Set how far the target may drift before `needs_repath` reports true
    #[must_use]
    pub fn with_repath_distance(mut self, distance: f32) -> Self {
        self.repath_distance = distance;
        self
    }

    /// Start following `path`, planned towards `goal`
    pub fn set_path(&mut self, path: Path, goal: Vec2) {
        self.path = path;
        self.index = 0;
        self.planned_goal = Some(goal);
    }

    /// Drop the current path
    pub fn clear(&mut self) {
        self.path = Path::not_found();
        self.index = 0;
        self.planned_goal = None;
    }

    /// The path being followed
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index of the waypoint currently steered towards
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Waypoint currently steered towards
    #[must_use]
    pub fn current_waypoint(&self) -> Option<Vec2> {
        if !self.path.found {
            return None;
        }
        self.path.waypoints.get(self.index).copied()
    }

    /// Move on to the next waypoint. Returns false once the path is used up.
    pub fn advance(&mut self) -> bool {
        if self.index < self.path.len() {
            self.index += 1;
        }
        self.index < self.path.len()
    }

    /// All waypoints reached (or nothing to follow)
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current_waypoint().is_none()
    }

    /// Skip every waypoint already within the arrival radius of `position`
    ///
    /// Returns the waypoint to head for next.
    pub fn update(&mut self, position: Vec2) -> Option<Vec2> {
        while let Some(waypoint) = self.current_waypoint() {
            if waypoint.distance(position) > self.arrival_radius {
                return Some(waypoint);
            }
            self.advance();
        }
        None
    }

    /// Update progress and ask `behavior` for steering towards the next waypoint
    pub fn steer<B: SteeringBehavior + ?Sized>(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        behavior: &B,
    ) -> SteeringOutput {
        match self.update(position) {
            Some(target) => {
                let is_final = self.index + 1 == self.path.len();
                behavior.calculate(position, velocity, target, is_final)
            }
            None => SteeringOutput::ZERO,
        }
    }

    /// Whether the owner should search again for `target`
    ///
    /// True when there is no usable path, or the target moved more than
    /// `repath_distance` from where the path was planned to.
    #[must_use]
    pub fn needs_repath(&self, target: Vec2) -> bool {
        let Some(goal) = self.planned_goal else {
            return true;
        };
        if !self.path.found {
            return true;
        }
        goal.distance(target) > self.repath_distance
    }
}
