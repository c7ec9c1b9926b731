use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::{
    ConfigError, ConfigResult, Obstacle, ObstacleVelocity, ResultError, State, TrackedObstacle,
};
use crate::model::ModelConfig;
use crate::navigation::path_planning::PlannerConfig;
use crate::navigation::ReplanSchedule;
use crate::results::read_obstacles;

/// Top-level run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Embedded model descriptor; may instead come from a separate file
    #[serde(default)]
    pub model: Option<ModelConfig>,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub iterations: usize,
    pub search_steps_per_cycle: usize,
    pub start: State,
    pub goal: State,
    pub obstacles: Vec<TrackedObstacle>,
    /// Extra obstacles in the plain-text snapshot format
    pub obstacle_file: Option<PathBuf>,
    /// Velocity given to every obstacle read from `obstacle_file`
    pub obstacle_velocity: ObstacleVelocity,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            iterations: 3,
            search_steps_per_cycle: 1,
            start: State::from([0.0, 0.0, 0.0]),
            goal: State::from([10.0, 10.0, 0.0]),
            obstacles: vec![TrackedObstacle::new(
                Obstacle::new(2.0, 2.0, 0.5),
                ObstacleVelocity::new(1.0, 0.0),
            )],
            obstacle_file: None,
            obstacle_velocity: ObstacleVelocity::default(),
        }
    }
}

impl ScenarioConfig {
    /// Inline obstacles followed by any read from `obstacle_file`
    pub fn tracked_obstacles(&self) -> Result<Vec<TrackedObstacle>, ResultError> {
        let mut tracked = self.obstacles.clone();
        if let Some(path) = &self.obstacle_file {
            tracked.extend(
                read_obstacles(path)?
                    .into_iter()
                    .map(|o| TrackedObstacle::new(o, self.obstacle_velocity)),
            );
        }
        Ok(tracked)
    }
}

impl RunConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialization alone cannot
    pub fn validate(&self) -> ConfigResult<()> {
        if self.planner.sample_time <= 0.0 {
            return Err(ConfigError::invalid("planner.sample_time", "must be positive"));
        }
        if self.planner.grid_resolution <= 0.0 {
            return Err(ConfigError::invalid("planner.grid_resolution", "must be positive"));
        }
        if self.planner.heuristic_weight < 0.0 {
            return Err(ConfigError::invalid("planner.heuristic_weight", "must be non-negative"));
        }
        Ok(())
    }

    /// The model descriptor: a separate file wins over the embedded `model` key
    pub fn resolve_model_config(&self, override_file: Option<&Path>) -> ConfigResult<ModelConfig> {
        match override_file {
            Some(path) => ModelConfig::from_file(path),
            None => self
                .model
                .clone()
                .ok_or_else(|| ConfigError::MissingKey("model".to_string())),
        }
    }

    /// Replanning schedule; one planning step lasts the planner's sample time
    pub fn schedule(&self) -> ReplanSchedule {
        ReplanSchedule {
            iterations: self.scenario.iterations,
            search_steps_per_cycle: self.scenario.search_steps_per_cycle,
            search_step_duration: self.planner.sample_time,
        }
    }
}
