//! Energy-cost model for a planar unicycle robot
//!
//! State is (x, y, heading), control is (linear velocity, angular velocity).
//! Each step costs the energy spent driving plus a constant idle draw, so the
//! planner trades path length against speed and turning.

use nalgebra::{Rotation2, Vector2};

use super::{check_obstacles, symmetric_samples, FromModelConfig, Model, ModelConfig};
use crate::common::{normalize_angle, ConfigResult, Control, ModelError, Obstacle, State};

/// Energy-optimal unicycle model
#[derive(Debug, Clone)]
pub struct EnergyModel {
    // Limits
    max_linear_velocity: f64,
    max_angular_velocity: f64,
    // Cost weights
    linear_cost: f64,
    angular_cost: f64,
    idle_cost: f64,
    robot_radius: f64,
    goal_tolerance: f64,
    linear_samples: usize,
    angular_samples: usize,
    obstacles: Vec<Obstacle>,
}

impl FromModelConfig for EnergyModel {
    const TYPE: &'static str = "energy";

    fn from_config(config: &ModelConfig) -> ConfigResult<Self> {
        Ok(EnergyModel {
            max_linear_velocity: config.require_positive("max_linear_velocity")?,
            max_angular_velocity: config.require_positive("max_angular_velocity")?,
            linear_cost: config.non_negative_or("linear_cost", 1.0)?,
            angular_cost: config.non_negative_or("angular_cost", 0.5)?,
            idle_cost: config.non_negative_or("idle_cost", 0.1)?,
            robot_radius: config.non_negative_or("robot_radius", 0.2)?,
            goal_tolerance: config.non_negative_or("goal_tolerance", 0.5)?,
            linear_samples: config.count_or("linear_samples", 2)?,
            angular_samples: config.count_or("angular_samples", 5)?,
            obstacles: Vec::new(),
        })
    }
}

impl EnergyModel {
    /// Lowest energy needed to cover one metre at any admissible speed
    fn min_cost_per_meter(&self) -> f64 {
        let speed = if self.linear_cost > 0.0 {
            (self.idle_cost / self.linear_cost)
                .sqrt()
                .min(self.max_linear_velocity)
        } else {
            self.max_linear_velocity
        };
        if speed <= 0.0 {
            return 0.0;
        }
        (self.linear_cost * speed * speed + self.idle_cost) / speed
    }
}

impl Model for EnergyModel {
    fn name(&self) -> &str {
        Self::TYPE
    }

    fn state_dof(&self) -> usize {
        3
    }

    fn control_dof(&self) -> usize {
        2
    }

    fn set_obstacles(&mut self, obstacles: &[Obstacle]) -> Result<(), ModelError> {
        check_obstacles(obstacles)?;
        self.obstacles = obstacles.to_vec();
        Ok(())
    }

    fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    fn control_samples(&self) -> Vec<Control> {
        // Forward speeds only, evenly spaced up to the limit
        let n = self.linear_samples;
        let speeds = (1..=n).map(|i| self.max_linear_velocity * i as f64 / n as f64);
        let turn_rates = symmetric_samples(self.max_angular_velocity, self.angular_samples);

        speeds
            .flat_map(|v| turn_rates.iter().map(move |&w| vec![v, w]))
            .collect()
    }

    fn next_state(&self, state: &State, control: &Control, dt: f64) -> State {
        let (v, w) = (control[0], control[1]);
        let heading = state[2];

        let step = Rotation2::new(heading) * Vector2::new(v * dt, 0.0);
        State::new(vec![
            state[0] + step.x,
            state[1] + step.y,
            normalize_angle(heading + w * dt),
        ])
    }

    fn cost(&self, _state: &State, control: &Control, dt: f64) -> f64 {
        let (v, w) = (control[0], control[1]);
        (self.linear_cost * v * v + self.angular_cost * w * w + self.idle_cost) * dt
    }

    fn heuristic(&self, state: &State, goal: &State) -> f64 {
        let remaining = (state.planar_distance(goal) - self.goal_tolerance).max(0.0);
        remaining * self.min_cost_per_meter()
    }

    fn is_valid(&self, state: &State) -> bool {
        self.obstacles
            .iter()
            .all(|o| o.clearance(state[0], state[1], self.robot_radius) > 0.0)
    }

    fn is_goal(&self, state: &State, goal: &State) -> bool {
        state.planar_distance(goal) <= self.goal_tolerance
    }
}
