//! Dynamics/cost models consumed by the planner, with multiple variants
//!
//! A model is selected once at startup from a configuration document by its
//! `type` tag (see [`registry`]) and then reused for the whole run; only its
//! obstacle set changes between replanning cycles.

use crate::common::{ConfigError, ConfigResult, Control, ModelError, Obstacle, State};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::path::Path;

/// Capability interface every model variant implements
pub trait Model: Debug + Send + Sync {
    /// Get the type tag of this model
    fn name(&self) -> &str;

    /// Number of state channels
    fn state_dof(&self) -> usize;

    /// Number of independent control inputs
    fn control_dof(&self) -> usize;

    /// Replace the current obstacle set
    fn set_obstacles(&mut self, obstacles: &[Obstacle]) -> Result<(), ModelError>;

    /// Obstacles currently held by the model
    fn obstacles(&self) -> &[Obstacle];

    /// Discrete control samples the planner branches on
    fn control_samples(&self) -> Vec<Control>;

    /// Integrate `control` from `state` over `dt`
    fn next_state(&self, state: &State, control: &Control, dt: f64) -> State;

    /// Cost of applying `control` from `state` over `dt`
    fn cost(&self, state: &State, control: &Control, dt: f64) -> f64;

    /// Lower bound estimate of the cost from `state` to `goal`
    fn heuristic(&self, state: &State, goal: &State) -> f64;

    /// Check the state against limits and obstacles
    fn is_valid(&self, state: &State) -> bool;

    fn is_goal(&self, state: &State, goal: &State) -> bool;
}

/// Construction of a model variant from its configuration document
pub trait FromModelConfig: Model + Sized + 'static {
    /// Tag matched against the config's `type` field
    const TYPE: &'static str;

    fn from_config(config: &ModelConfig) -> ConfigResult<Self>;
}

/// Key-value model descriptor with a mandatory `type` discriminator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelConfig(Map<String, Value>);

impl ModelConfig {
    pub fn new(map: Map<String, Value>) -> Self {
        ModelConfig(map)
    }

    /// Build from an arbitrary JSON value, which must be an object
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        match value {
            Value::Object(map) => Ok(ModelConfig(map)),
            other => Err(ConfigError::invalid(
                "model",
                format!("expected an object, found {}", other),
            )),
        }
    }

    /// Read a standalone model config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The mandatory `type` tag
    pub fn model_type(&self) -> ConfigResult<&str> {
        match self.0.get("type") {
            None => Err(ConfigError::MissingKey("type".to_string())),
            Some(Value::String(tag)) => Ok(tag.as_str()),
            Some(other) => Err(ConfigError::invalid(
                "type",
                format!("expected a string, found {}", other),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.insert(key.to_string(), value)
    }

    /// A required numeric field
    pub fn require_f64(&self, key: &str) -> ConfigResult<f64> {
        match self.0.get(key) {
            None => Err(ConfigError::MissingKey(key.to_string())),
            Some(value) => as_f64(key, value),
        }
    }

    /// A required numeric field that must be strictly positive
    pub fn require_positive(&self, key: &str) -> ConfigResult<f64> {
        let value = self.require_f64(key)?;
        if value <= 0.0 {
            return Err(ConfigError::invalid(key, "must be positive"));
        }
        Ok(value)
    }

    pub fn f64_or(&self, key: &str, default: f64) -> ConfigResult<f64> {
        match self.0.get(key) {
            None => Ok(default),
            Some(value) => as_f64(key, value),
        }
    }

    pub fn non_negative_or(&self, key: &str, default: f64) -> ConfigResult<f64> {
        let value = self.f64_or(key, default)?;
        if value < 0.0 {
            return Err(ConfigError::invalid(key, "must be non-negative"));
        }
        Ok(value)
    }

    /// An optional sample count; at least one sample is required
    pub fn count_or(&self, key: &str, default: usize) -> ConfigResult<usize> {
        let count = match self.0.get(key) {
            None => return Ok(default),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| ConfigError::invalid(key, "expected a non-negative integer"))?,
        };
        if count == 0 {
            return Err(ConfigError::invalid(key, "must be at least 1"));
        }
        Ok(count as usize)
    }
}

fn as_f64(key: &str, value: &Value) -> ConfigResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| ConfigError::invalid(key, format!("expected a number, found {}", value)))
}

/// Evenly spaced samples over [-limit, limit]; a single sample is zero
pub(crate) fn symmetric_samples(limit: f64, count: usize) -> Vec<f64> {
    if count <= 1 {
        return vec![0.0];
    }
    let step = 2.0 * limit / (count - 1) as f64;
    (0..count).map(|i| -limit + step * i as f64).collect()
}

/// Reject obstacle sets with negative radii
pub(crate) fn check_obstacles(obstacles: &[Obstacle]) -> Result<(), ModelError> {
    match obstacles.iter().position(|o| o.radius < 0.0) {
        Some(index) => Err(ModelError::InvalidObstacle {
            index,
            radius: obstacles[index].radius,
        }),
        None => Ok(()),
    }
}

pub mod double_integrator;
pub mod energy;
pub mod registry;

pub use double_integrator::DoubleIntegrator;
pub use energy::EnergyModel;
pub use registry::{load_model, ModelRegistry};
