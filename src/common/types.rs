//! Value types shared by the models, the planner and the replanning loop

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A control input, one entry per control degree of freedom
pub type Control = Vec<f64>;

/// Agent state as an ordered, fixed-length vector (e.g. x, y, heading).
///
/// A `State` is a value: models produce new states rather than mutating the
/// ones they are given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Vec<f64>);

impl State {
    pub fn new(values: Vec<f64>) -> Self {
        State(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Planar distance between the first two channels of two states
    pub fn planar_distance(&self, other: &State) -> f64 {
        let dx = self.0.first().copied().unwrap_or(0.0) - other.0.first().copied().unwrap_or(0.0);
        let dy = self.0.get(1).copied().unwrap_or(0.0) - other.0.get(1).copied().unwrap_or(0.0);
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<Vec<f64>> for State {
    fn from(values: Vec<f64>) -> Self {
        State(values)
    }
}

impl<const N: usize> From<[f64; N]> for State {
    fn from(values: [f64; N]) -> Self {
        State(values.to_vec())
    }
}

impl Index<usize> for State {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// A circular exclusion zone: center-x, center-y and radius.
///
/// Serialized as the ordered triple `[x, y, radius]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Obstacle { x, y, radius }
    }

    /// Channels in file order
    pub fn channels(&self) -> [f64; 3] {
        [self.x, self.y, self.radius]
    }

    /// Signed clearance between a disc of `radius` at (x, y) and this obstacle
    pub fn clearance(&self, x: f64, y: f64, radius: f64) -> f64 {
        let dx = x - self.x;
        let dy = y - self.y;
        (dx * dx + dy * dy).sqrt() - self.radius - radius
    }
}

impl From<[f64; 3]> for Obstacle {
    fn from([x, y, radius]: [f64; 3]) -> Self {
        Obstacle { x, y, radius }
    }
}

impl From<Obstacle> for [f64; 3] {
    fn from(obstacle: Obstacle) -> Self {
        obstacle.channels()
    }
}

/// Constant obstacle velocity (vx, vy), serialized as `[vx, vy]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ObstacleVelocity {
    pub vx: f64,
    pub vy: f64,
}

impl ObstacleVelocity {
    pub fn new(vx: f64, vy: f64) -> Self {
        ObstacleVelocity { vx, vy }
    }
}

impl From<[f64; 2]> for ObstacleVelocity {
    fn from([vx, vy]: [f64; 2]) -> Self {
        ObstacleVelocity { vx, vy }
    }
}

impl From<ObstacleVelocity> for [f64; 2] {
    fn from(velocity: ObstacleVelocity) -> Self {
        [velocity.vx, velocity.vy]
    }
}

/// An obstacle together with the velocity it is predicted to move with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedObstacle {
    pub obstacle: Obstacle,
    #[serde(default)]
    pub velocity: ObstacleVelocity,
}

impl TrackedObstacle {
    pub fn new(obstacle: Obstacle, velocity: ObstacleVelocity) -> Self {
        TrackedObstacle { obstacle, velocity }
    }
}
