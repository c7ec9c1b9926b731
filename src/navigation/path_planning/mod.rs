//! Sampling-based trajectory planner
//!
//! Best-first search over the model's control samples. Every expansion
//! integrates each sampled control for one `sample_time` step; states are
//! de-duplicated on a uniform grid so the search stays finite. Nodes are
//! ordered by accumulated cost plus the model's (weighted) heuristic.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::planner::{Planner, Trajectory, TrajectorySample};
use crate::common::{Control, PlannerError, State};
use crate::model::Model;

/// Planner tuning parameters (`planner` section of the run config)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Duration of one search step, in seconds
    pub sample_time: f64,
    /// Maximum number of node expansions per call
    pub max_iterations: usize,
    /// Cell size used to merge nearby states
    pub grid_resolution: f64,
    /// Weight applied to the heuristic (1.0 is plain A*)
    pub heuristic_weight: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            sample_time: 0.5,
            max_iterations: 20_000,
            grid_resolution: 0.2,
            heuristic_weight: 2.0,
        }
    }
}

/// Builder that configures a [`SamplingPlanner`]
#[derive(Debug, Clone, Default)]
pub struct PlannerTuner {
    config: PlannerConfig,
    verbose: bool,
}

impl PlannerTuner {
    pub fn new() -> Self {
        PlannerTuner::default()
    }

    /// Log every expansion
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn load_config(mut self, config: &PlannerConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn build(self) -> SamplingPlanner {
        SamplingPlanner {
            config: self.config,
            verbose: self.verbose,
        }
    }
}

#[derive(Debug)]
struct Node {
    state: State,
    control: Control,
    cost: f64,
    parent: Option<usize>,
}

/// Best-first planner over sampled controls
#[derive(Debug, Clone)]
pub struct SamplingPlanner {
    config: PlannerConfig,
    verbose: bool,
}

impl SamplingPlanner {
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn cell(&self, state: &State) -> Vec<i64> {
        state
            .as_slice()
            .iter()
            .map(|v| (v / self.config.grid_resolution).floor() as i64)
            .collect()
    }

    fn reconstruct(nodes: Vec<Node>, last: usize, expanded: usize) -> Trajectory {
        let mut order = Vec::new();
        let mut current = Some(last);
        while let Some(index) = current {
            order.push(index);
            current = nodes[index].parent;
        }

        let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
        let samples = order
            .into_iter()
            .rev()
            .filter_map(|index| slots[index].take())
            .map(|node| TrajectorySample {
                state: node.state,
                control: node.control,
                cost: node.cost,
            })
            .collect();

        Trajectory::new(samples, expanded)
    }
}

fn check_dimension(
    which: &'static str,
    state: &State,
    expected: usize,
) -> Result<(), PlannerError> {
    if state.len() != expected {
        return Err(PlannerError::DimensionMismatch {
            which,
            expected,
            actual: state.len(),
        });
    }
    Ok(())
}

impl Planner for SamplingPlanner {
    fn compute_trajectory(
        &mut self,
        start: &State,
        goal: &State,
        model: &dyn Model,
    ) -> Result<Trajectory, PlannerError> {
        check_dimension("start", start, model.state_dof())?;
        check_dimension("goal", goal, model.state_dof())?;
        if !model.is_valid(start) {
            return Err(PlannerError::InvalidStart);
        }

        let dt = self.config.sample_time;
        let weight = self.config.heuristic_weight;
        let controls = model.control_samples();

        let mut nodes = vec![Node {
            state: start.clone(),
            control: vec![0.0; model.control_dof()],
            cost: 0.0,
            parent: None,
        }];
        let mut best: HashMap<Vec<i64>, f64> = HashMap::new();
        best.insert(self.cell(start), 0.0);

        let mut open = BinaryHeap::new();
        open.push(Reverse((OrderedFloat(weight * model.heuristic(start, goal)), 0usize)));

        let mut expanded = 0;
        while let Some(Reverse((_, index))) = open.pop() {
            let state = nodes[index].state.clone();
            let cost = nodes[index].cost;

            // A cheaper node reached this cell after this one was queued
            if best.get(&self.cell(&state)).map_or(false, |&b| b < cost) {
                continue;
            }

            if model.is_goal(&state, goal) {
                debug!("planner => goal reached, expanded {} nodes, cost {:.3}", expanded, cost);
                return Ok(Self::reconstruct(nodes, index, expanded));
            }

            if expanded >= self.config.max_iterations {
                debug!("planner => iteration limit {} reached", self.config.max_iterations);
                return Err(PlannerError::IterationLimit {
                    limit: self.config.max_iterations,
                });
            }
            expanded += 1;

            if self.verbose {
                trace!("planner => expand {:?}, cost {:.3}", state.as_slice(), cost);
            }

            for control in &controls {
                let next = model.next_state(&state, control, dt);
                if !model.is_valid(&next) {
                    continue;
                }
                let next_cost = cost + model.cost(&state, control, dt);

                match best.entry(self.cell(&next)) {
                    Entry::Occupied(mut slot) => {
                        if next_cost >= *slot.get() {
                            continue;
                        }
                        slot.insert(next_cost);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(next_cost);
                    }
                }

                let priority = next_cost + weight * model.heuristic(&next, goal);
                nodes.push(Node {
                    state: next,
                    control: control.clone(),
                    cost: next_cost,
                    parent: Some(index),
                });
                open.push(Reverse((OrderedFloat(priority), nodes.len() - 1)));
            }
        }

        debug!("planner => open set exhausted after {} expansions", expanded);
        Err(PlannerError::NoSolution { expanded })
    }
}
