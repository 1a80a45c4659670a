//! Example demonstrating grid navigation
//!
//! Builds a small maze, plans a path across it and walks an agent along the
//! result. Pass a RON config file as the first argument to change the tile
//! size or search defaults. Run with `RUST_LOG=debug` to see search stats.

use engine_nav::prelude::*;

const MAZE: &str = "
    ..........
    .########.
    .#......#.
    .#.####.#.
    .#.#..#.#.
    .#.#..#...
    .#.##.###.
    .#........
    .########.
    ..........
";

/// Demo seek with braking on the last waypoint
struct Seek {
    max_acceleration: f32,
    max_speed: f32,
}

impl SteeringBehavior for Seek {
    fn calculate(
        &self,
        position: Vec2,
        velocity: Vec2,
        target: Vec2,
        is_final: bool,
    ) -> SteeringOutput {
        let to_target = target - position;
        let speed = if is_final {
            self.max_speed.min(to_target.length())
        } else {
            self.max_speed
        };
        let desired = to_target.normalize_or_zero() * speed;
        SteeringOutput {
            linear: (desired - velocity).clamp_length_max(self.max_acceleration),
            angular: 0.0,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {path}");
            NavConfig::load_ron(path)?
        }
        None => NavConfig::default(),
    };

    let layout = GridLayout::parse(MAZE)?;
    let config = config.with_size(layout.width(), layout.height());
    let mut pathfinder = Pathfinder::from_config(&config)?;
    layout.apply(pathfinder.grid_mut())?;

    let start = pathfinder.grid_to_world(4, 4);
    let goal = pathfinder.grid_to_world(9, 9);

    let path = pathfinder.find_path_default(start, goal);
    if !path.found {
        log::warn!("No path from {start} to {goal}");
        return Ok(());
    }

    log::info!(
        "Found path with {} waypoints, length {:.1}",
        path.len(),
        path.total_cost
    );
    for (i, waypoint) in path.waypoints.iter().enumerate() {
        log::info!("  {i}: {waypoint}");
    }

    let tile = pathfinder.tile_size();
    let seek = Seek {
        max_acceleration: tile * 8.0,
        max_speed: tile * 4.0,
    };
    let mut follower = PathFollower::new(tile * 0.25);
    follower.set_path(path, goal);

    let dt = 1.0 / 60.0;
    let mut position = start;
    let mut velocity = Vec2::ZERO;

    for tick in 0..600 {
        let steering = follower.steer(position, velocity, &seek);
        if follower.is_finished() {
            log::info!("Arrived at {position} after {tick} ticks");
            break;
        }
        velocity += steering.linear * dt;
        position += velocity * dt;
    }

    if !follower.is_finished() {
        log::info!(
            "Stopped at waypoint {} of {}",
            follower.current_index(),
            follower.path().len()
        );
    }

    Ok(())
}
