//! Constant-velocity obstacle prediction

use crate::common::{Obstacle, ObstacleVelocity};

/// Translate an obstacle by `velocity * dt`; the radius is unchanged.
///
/// No bounds are applied, far-away obstacles are left for the model to ignore.
pub fn advance(obstacle: Obstacle, velocity: ObstacleVelocity, dt: f64) -> Obstacle {
    Obstacle {
        x: obstacle.x + velocity.vx * dt,
        y: obstacle.y + velocity.vy * dt,
        radius: obstacle.radius,
    }
}

/// Time the agent travels between two replans
pub fn cycle_duration(search_steps_per_cycle: usize, search_step_duration: f64) -> f64 {
    search_steps_per_cycle as f64 * search_step_duration
}
