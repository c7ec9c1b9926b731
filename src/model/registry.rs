//! Model selection by configuration `type` tag

use std::collections::HashMap;

use tracing::debug;

use super::{DoubleIntegrator, EnergyModel, FromModelConfig, Model, ModelConfig};
use crate::common::{ConfigError, ConfigResult};

type Constructor = fn(&ModelConfig) -> ConfigResult<Box<dyn Model>>;

fn construct<M: FromModelConfig>(config: &ModelConfig) -> ConfigResult<Box<dyn Model>> {
    let model: Box<dyn Model> = Box::new(M::from_config(config)?);
    Ok(model)
}

/// Lookup from model type tag to constructor
pub struct ModelRegistry {
    constructors: HashMap<&'static str, Constructor>,
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        ModelRegistry {
            constructors: HashMap::new(),
        }
    }

    /// Registry with every model shipped in this crate
    pub fn builtin() -> Self {
        let mut registry = ModelRegistry::new();
        registry.register::<EnergyModel>();
        registry.register::<DoubleIntegrator>();
        registry
    }

    /// Register a model variant under its type tag, replacing any previous one
    pub fn register<M: FromModelConfig>(&mut self) {
        self.constructors.insert(M::TYPE, construct::<M>);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Known tags, sorted
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.constructors.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Construct the model named by the config's `type` tag
    pub fn load_model(&self, config: &ModelConfig) -> ConfigResult<Box<dyn Model>> {
        let model_type = config.model_type()?;
        let constructor = self
            .constructors
            .get(model_type)
            .ok_or_else(|| ConfigError::UnknownModel(model_type.to_string()))?;

        let model = constructor(config)?;
        debug!(
            "CONFIG => model, type => {}, control dof => {}",
            model_type,
            model.control_dof()
        );
        Ok(model)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        ModelRegistry::builtin()
    }
}

/// Load a model using the built-in registry
pub fn load_model(config: &ModelConfig) -> ConfigResult<Box<dyn Model>> {
    ModelRegistry::builtin().load_model(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Obstacle;
    use serde_json::{json, Value};

    fn config(value: Value) -> ModelConfig {
        ModelConfig::from_value(value).unwrap()
    }

    #[test]
    fn builtin_tags() {
        assert_eq!(
            ModelRegistry::builtin().tags(),
            vec!["double integrator", "energy"]
        );
    }

    #[test]
    fn loads_each_builtin_with_its_control_dof() {
        let energy = load_model(&config(json!({
            "type": "energy",
            "max_linear_velocity": 1.0,
            "max_angular_velocity": 0.8,
        })))
        .unwrap();
        assert_eq!(energy.name(), "energy");
        assert_eq!(energy.control_dof(), 2);

        let double = load_model(&config(json!({
            "type": "double integrator",
            "max_acceleration": 2.0,
        })))
        .unwrap();
        assert_eq!(double.name(), "double integrator");
        assert_eq!(double.control_dof(), 1);
    }

    #[test]
    fn missing_type_is_missing_key() {
        let err = load_model(&config(json!({ "max_acceleration": 2.0 }))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref key) if key == "type"));
    }

    #[test]
    fn unknown_type_names_the_tag() {
        let err = load_model(&config(json!({ "type": "unknown-foo" }))).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownModel(ref tag) if tag == "unknown-foo"));
        assert!(err.to_string().contains("unknown-foo"));
    }

    #[test]
    fn tags_match_exactly() {
        for tag in ["Energy", "energy ", "double_integrator"] {
            let err = load_model(&config(json!({ "type": tag }))).unwrap_err();
            assert!(matches!(err, ConfigError::UnknownModel(_)), "{tag}");
        }
    }

    #[test]
    fn variant_fields_are_validated() {
        let err = load_model(&config(json!({ "type": "energy" }))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref key) if key == "max_linear_velocity"));
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = ModelRegistry::new();
        assert!(!registry.contains("energy"));
        assert!(matches!(
            registry.load_model(&config(json!({ "type": "energy" }))),
            Err(ConfigError::UnknownModel(_))
        ));
    }

    #[test]
    fn setting_obstacles_keeps_control_dof() {
        let mut model = load_model(&config(json!({
            "type": "energy",
            "max_linear_velocity": 1.0,
            "max_angular_velocity": 1.0,
        })))
        .unwrap();
        let obstacles = [Obstacle::new(2.0, 2.0, 0.5)];
        let before = model.control_dof();
        model.set_obstacles(&obstacles).unwrap();
        model.set_obstacles(&obstacles).unwrap();
        assert_eq!(model.control_dof(), before);
        assert_eq!(model.obstacles(), &obstacles[..]);
    }

    #[test]
    fn custom_variant_registers_by_tag() {
        use crate::common::{Control, ModelError, State};

        #[derive(Debug)]
        struct Still(DoubleIntegrator);

        impl Model for Still {
            fn name(&self) -> &str {
                "still"
            }
            fn state_dof(&self) -> usize {
                self.0.state_dof()
            }
            fn control_dof(&self) -> usize {
                0
            }
            fn set_obstacles(&mut self, obstacles: &[Obstacle]) -> Result<(), ModelError> {
                self.0.set_obstacles(obstacles)
            }
            fn obstacles(&self) -> &[Obstacle] {
                self.0.obstacles()
            }
            fn control_samples(&self) -> Vec<Control> {
                vec![vec![0.0]]
            }
            fn next_state(&self, state: &State, control: &Control, dt: f64) -> State {
                self.0.next_state(state, control, dt)
            }
            fn cost(&self, state: &State, control: &Control, dt: f64) -> f64 {
                self.0.cost(state, control, dt)
            }
            fn heuristic(&self, state: &State, goal: &State) -> f64 {
                self.0.heuristic(state, goal)
            }
            fn is_valid(&self, state: &State) -> bool {
                self.0.is_valid(state)
            }
            fn is_goal(&self, state: &State, goal: &State) -> bool {
                self.0.is_goal(state, goal)
            }
        }

        impl FromModelConfig for Still {
            const TYPE: &'static str = "still";

            fn from_config(config: &ModelConfig) -> ConfigResult<Self> {
                let mut inner = config.clone();
                inner.insert("max_acceleration", json!(1.0));
                Ok(Still(DoubleIntegrator::from_config(&inner)?))
            }
        }

        let mut registry = ModelRegistry::builtin();
        registry.register::<Still>();
        assert!(registry.contains("still"));

        let model = registry.load_model(&config(json!({ "type": "still" }))).unwrap();
        assert_eq!(model.name(), "still");
        assert_eq!(model.control_dof(), 0);
        // Built-ins are untouched
        assert!(registry.contains("energy"));
    }
}
