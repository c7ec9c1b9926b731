//! Navigation module: receding-horizon replanning
pub mod path_planning;
pub mod planner;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use self::planner::{Planner, Trajectory};
use crate::common::{ReplanError, ReplanResult, State};
use crate::model::Model;
use crate::perception::prediction::cycle_duration;
use crate::perception::ObstacleTracker;
use crate::results::ResultWriter;

/// How many cycles to run and how far the agent moves in each
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplanSchedule {
    pub iterations: usize,
    /// Planning steps the agent executes before the next replan
    pub search_steps_per_cycle: usize,
    /// Duration of one planning step, in seconds
    pub search_step_duration: f64,
}

impl ReplanSchedule {
    /// Time that passes between two replans
    pub fn cycle_duration(&self) -> f64 {
        cycle_duration(self.search_steps_per_cycle, self.search_step_duration)
    }
}

/// Replanning loop for a single agent
///
/// Each cycle predicts the tracked obstacles forward by one cycle, hands them
/// to the model, plans from the current state to the goal and then moves the
/// agent `search_steps_per_cycle` steps along the new trajectory. Any error
/// aborts the run; files written for earlier cycles are kept.
pub struct ReplanningLoop<P: Planner> {
    planner: P,
    writer: ResultWriter,
    schedule: ReplanSchedule,
    tracker: ObstacleTracker,
}

impl<P: Planner> ReplanningLoop<P> {
    /// Create a new replanning loop
    pub fn new(
        planner: P,
        writer: ResultWriter,
        schedule: ReplanSchedule,
        tracker: ObstacleTracker,
    ) -> Self {
        ReplanningLoop {
            planner,
            writer,
            schedule,
            tracker,
        }
    }

    pub fn tracker(&self) -> &ObstacleTracker {
        &self.tracker
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// Run every cycle and return the trajectory planned in each
    pub fn run(
        &mut self,
        model: &mut dyn Model,
        start: &State,
        goal: &State,
    ) -> ReplanResult<Vec<Trajectory>> {
        check_dimension("start", start, model.state_dof())?;
        check_dimension("goal", goal, model.state_dof())?;

        let dt = self.schedule.cycle_duration();
        let step = self.schedule.search_steps_per_cycle;
        let mut current = start.clone();
        let mut trajectories = Vec::with_capacity(self.schedule.iterations);

        info!("Model control dof: {}", model.control_dof());

        for iteration in 0..self.schedule.iterations {
            info!("iter {} from {:?}", iteration, current.as_slice());

            // Update obstacles
            self.tracker.predict(dt);
            let obstacles = self.tracker.obstacles();

            // Pass the new map to the model
            model
                .set_obstacles(&obstacles)
                .map_err(|source| ReplanError::Model { iteration, source })?;
            self.writer.write_obstacles(iteration, &obstacles)?;

            let trajectory = self
                .planner
                .compute_trajectory(&current, goal, &*model)
                .map_err(|source| ReplanError::Planner { iteration, source })?;
            let path = self.writer.write_trajectory(iteration, &trajectory)?;
            debug!("iter {} => {} samples, {}", iteration, trajectory.len(), path.display());

            // Move along the path to get the next pose
            current = next_state(&trajectory, step, goal, &*model)
                .ok_or_else(|| ReplanError::TrajectoryTooShort {
                    iteration,
                    len: trajectory.len(),
                    required: step + 1,
                })?;
            trajectories.push(trajectory);
        }

        Ok(trajectories)
    }
}

/// State the agent holds after executing `step` samples. A trajectory that
/// ends at the goal before `step` leaves the agent parked on its last state.
fn next_state(
    trajectory: &Trajectory,
    step: usize,
    goal: &State,
    model: &dyn Model,
) -> Option<State> {
    if let Some(state) = trajectory.state_at(step) {
        return Some(state.clone());
    }
    trajectory
        .states()
        .last()
        .filter(|last| model.is_goal(last, goal))
        .cloned()
}

fn check_dimension(which: &'static str, state: &State, expected: usize) -> ReplanResult<()> {
    if state.len() != expected {
        return Err(ReplanError::StateDimension {
            which,
            expected,
            actual: state.len(),
        });
    }
    Ok(())
}
