//! One-dimensional double integrator
//!
//! State is (position, velocity), control is acceleration. The discrete
//! update is x' = A x + B u; the cost of a step is the time it takes.

use nalgebra::{Matrix2, Vector2};

use super::{check_obstacles, symmetric_samples, FromModelConfig, Model, ModelConfig};
use crate::common::{ConfigResult, Control, ModelError, Obstacle, State};

#[derive(Debug, Clone)]
pub struct DoubleIntegrator {
    max_acceleration: f64,
    max_velocity: f64,
    goal_tolerance: f64,
    velocity_tolerance: f64,
    acceleration_samples: usize,
    obstacles: Vec<Obstacle>,
}

impl FromModelConfig for DoubleIntegrator {
    const TYPE: &'static str = "double integrator";

    fn from_config(config: &ModelConfig) -> ConfigResult<Self> {
        let max_velocity = match config.get("max_velocity") {
            Some(_) => config.require_positive("max_velocity")?,
            None => 2.0,
        };
        Ok(DoubleIntegrator {
            max_acceleration: config.require_positive("max_acceleration")?,
            max_velocity,
            goal_tolerance: config.non_negative_or("goal_tolerance", 0.25)?,
            velocity_tolerance: config.non_negative_or("velocity_tolerance", 0.5)?,
            acceleration_samples: config.count_or("acceleration_samples", 3)?,
            obstacles: Vec::new(),
        })
    }
}

impl DoubleIntegrator {
    fn transition(dt: f64) -> (Matrix2<f64>, Vector2<f64>) {
        let a = Matrix2::new(1.0, dt, 0.0, 1.0);
        let b = Vector2::new(0.5 * dt * dt, dt);
        (a, b)
    }
}

impl Model for DoubleIntegrator {
    fn name(&self) -> &str {
        Self::TYPE
    }

    fn state_dof(&self) -> usize {
        2
    }

    fn control_dof(&self) -> usize {
        1
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
        symmetric_samples(self.max_acceleration, self.acceleration_samples)
            .into_iter()
            .map(|a| vec![a])
            .collect()
    }

    fn next_state(&self, state: &State, control: &Control, dt: f64) -> State {
        let (a, b) = Self::transition(dt);
        let next = a * Vector2::new(state[0], state[1]) + b * control[0];
        State::new(vec![next.x, next.y])
    }

    fn cost(&self, _state: &State, _control: &Control, dt: f64) -> f64 {
        dt
    }

    fn heuristic(&self, state: &State, goal: &State) -> f64 {
        let remaining = ((goal[0] - state[0]).abs() - self.goal_tolerance).max(0.0);
        remaining / self.max_velocity
    }

    fn is_valid(&self, state: &State) -> bool {
        // The point mass moves along the x axis
        state[1].abs() <= self.max_velocity + 1e-9
            && self
                .obstacles
                .iter()
                .all(|o| o.clearance(state[0], 0.0, 0.0) > 0.0)
    }

    fn is_goal(&self, state: &State, goal: &State) -> bool {
        (state[0] - goal[0]).abs() <= self.goal_tolerance
            && (state[1] - goal[1]).abs() <= self.velocity_tolerance
    }
}
