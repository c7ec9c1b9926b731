use std::path::PathBuf;
use thiserror::Error;

/// Configuration could not be resolved into a model or a run
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing key \"{0}\"")]
    MissingKey(String),

    #[error("model \"{0}\" not found")]
    UnknownModel(String),

    #[error("invalid value for \"{key}\": {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("obstacle {index} has negative radius {radius}")]
    InvalidObstacle { index: usize, radius: f64 },
}

#[derive(Error, Debug, PartialEq)]
pub enum PlannerError {
    #[error("{which} state has {actual} channels, model expects {expected}")]
    DimensionMismatch {
        which: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("start state is not valid for the model")]
    InvalidStart,

    #[error("no trajectory to goal after expanding {expanded} nodes")]
    NoSolution { expanded: usize },

    #[error("iteration limit of {limit} reached before the goal")]
    IterationLimit { limit: usize },
}

/// Writing or reading per-iteration result files failed
#[derive(Error, Debug)]
pub enum ResultError {
    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize trajectory")]
    Serialize(#[from] serde_json::Error),

    #[error("malformed obstacle on line {line} of {}", path.display())]
    Parse { path: PathBuf, line: usize },
}

#[derive(Error, Debug)]
pub enum ReplanError {
    #[error("{which} state has {actual} channels, model expects {expected}")]
    StateDimension {
        which: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("iteration {iteration}: model rejected obstacles")]
    Model {
        iteration: usize,
        #[source]
        source: ModelError,
    },

    #[error("iteration {iteration}: planner failed")]
    Planner {
        iteration: usize,
        #[source]
        source: PlannerError,
    },

    #[error("iteration {iteration}: trajectory has {len} samples, need at least {required}")]
    TrajectoryTooShort {
        iteration: usize,
        len: usize,
        required: usize,
    },

    #[error("output error")]
    Output(#[from] ResultError),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Replan(#[from] ReplanError),

    #[error("output error")]
    Output(#[from] ResultError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ReplanResult<T> = Result<T, ReplanError>;
