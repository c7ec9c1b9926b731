//! Trajectory planning interface

use serde::{Deserialize, Serialize};

use crate::common::{Control, PlannerError, State};
use crate::model::Model;

/// Trait for trajectory planning algorithms
pub trait Planner {
    /// Plan a trajectory from start to goal under the given model
    fn compute_trajectory(
        &mut self,
        start: &State,
        goal: &State,
        model: &dyn Model,
    ) -> Result<Trajectory, PlannerError>;
}

/// One step of a trajectory: the state reached and the control that led there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub state: State,
    pub control: Control,
    /// Accumulated cost up to this state
    pub cost: f64,
}

/// Output of a single planner invocation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trajectory {
    pub trajectory: Vec<TrajectorySample>,
    /// Total cost of the trajectory
    pub cost: f64,
    /// Nodes expanded by the search
    pub expanded: usize,
}

impl Trajectory {
    pub fn new(trajectory: Vec<TrajectorySample>, expanded: usize) -> Self {
        let cost = trajectory.last().map_or(0.0, |s| s.cost);
        Trajectory {
            trajectory,
            cost,
            expanded,
        }
    }

    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    /// State at a given step, if the trajectory is that long
    pub fn state_at(&self, step: usize) -> Option<&State> {
        self.trajectory.get(step).map(|s| &s.state)
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.trajectory.iter().map(|s| &s.state)
    }
}
