pub mod common;
pub mod config;
pub mod model;
pub mod navigation;
pub mod perception;
pub mod results;

use std::path::PathBuf;

use tracing::info;

pub use crate::config::RunConfig;

use crate::common::{SessionError, State};
use crate::model::{Model, ModelRegistry};
use crate::navigation::path_planning::{PlannerTuner, SamplingPlanner};
use crate::navigation::planner::{Planner, Trajectory};
use crate::navigation::ReplanningLoop;
use crate::perception::ObstacleTracker;
use crate::results::ResultWriter;

/// Inputs of a single replanning run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run configuration file
    pub config: PathBuf,
    /// Standalone model descriptor, replaces the config's `model` key
    pub model: Option<PathBuf>,
    /// Output path; per-iteration files are named after its stem
    pub output: PathBuf,
    /// Log every planner expansion
    pub verbose: bool,
}

/// A configured model, scenario and replanning loop ready to run
///
/// All configuration work happens when the session is prepared, so a bad
/// config never produces output files.
pub struct ReplanSession<P: Planner = SamplingPlanner> {
    model: Box<dyn Model>,
    start: State,
    goal: State,
    replan: ReplanningLoop<P>,
}

impl ReplanSession<SamplingPlanner> {
    /// Prepare a session with the built-in model variants
    pub fn prepare(options: &RunOptions) -> Result<Self, SessionError> {
        Self::prepare_with_registry(options, &ModelRegistry::builtin())
    }

    pub fn prepare_with_registry(
        options: &RunOptions,
        registry: &ModelRegistry,
    ) -> Result<Self, SessionError> {
        let config = RunConfig::from_file(&options.config)?;
        let model_config = config.resolve_model_config(options.model.as_deref())?;
        let model = registry.load_model(&model_config)?;

        let planner = PlannerTuner::new()
            .verbose(options.verbose)
            .load_config(&config.planner)
            .build();

        info!("CONFIG => {}, model => {}", options.config.display(), model.name());
        Self::with_planner(&config, model, planner, &options.output)
    }
}

impl<P: Planner> ReplanSession<P> {
    /// Assemble a session around an already constructed model and planner
    pub fn with_planner(
        config: &RunConfig,
        model: Box<dyn Model>,
        planner: P,
        output: impl Into<PathBuf>,
    ) -> Result<Self, SessionError> {
        let tracker = ObstacleTracker::new(config.scenario.tracked_obstacles()?);
        let writer = ResultWriter::new(output.into());
        let replan = ReplanningLoop::new(planner, writer, config.schedule(), tracker);

        Ok(ReplanSession {
            model,
            start: config.scenario.start.clone(),
            goal: config.scenario.goal.clone(),
            replan,
        })
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    pub fn replanning_loop(&self) -> &ReplanningLoop<P> {
        &self.replan
    }

    /// Run every replanning cycle
    pub fn run(&mut self) -> Result<Vec<Trajectory>, SessionError> {
        let trajectories = self.replan.run(self.model.as_mut(), &self.start, &self.goal)?;
        info!("finished {} replanning cycles", trajectories.len());
        Ok(trajectories)
    }
}
