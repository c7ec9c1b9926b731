use horizon_core::common::{ConfigError, PlannerError, SessionError, State};
use horizon_core::model::{load_model, Model, ModelConfig};
use horizon_core::navigation::planner::{Planner, Trajectory, TrajectorySample};
use horizon_core::results::read_obstacles;
use horizon_core::{ReplanSession, RunConfig, RunOptions};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Two-sample trajectory; remembers the first obstacle the model held on each call
#[derive(Default)]
struct RecordingPlanner {
    obstacle_x: Vec<f64>,
}

impl Planner for RecordingPlanner {
    fn compute_trajectory(
        &mut self,
        start: &State,
        _goal: &State,
        model: &dyn Model,
    ) -> Result<Trajectory, PlannerError> {
        self.obstacle_x.push(model.obstacles()[0].x);

        let mut next = start.clone().into_inner();
        next[0] += 1.0;
        let samples = vec![
            TrajectorySample {
                state: start.clone(),
                control: vec![0.0; model.control_dof()],
                cost: 0.0,
            },
            TrajectorySample {
                state: State::new(next),
                control: vec![1.0, 0.0],
                cost: 1.0,
            },
        ];
        Ok(Trajectory::new(samples, 1))
    }
}

fn energy_model() -> Box<dyn Model> {
    load_model(
        &ModelConfig::from_value(json!({
            "type": "energy",
            "max_linear_velocity": 1.0,
            "max_angular_velocity": 1.0,
        }))
        .unwrap(),
    )
    .unwrap()
}

fn write_config(dir: &Path, config: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

fn options(config: std::path::PathBuf, output: std::path::PathBuf) -> RunOptions {
    RunOptions {
        config,
        model: None,
        output,
        verbose: false,
    }
}

#[test]
fn test_default_scenario_feeds_predicted_obstacles() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results").join("result.json");

    let mut session = ReplanSession::with_planner(
        &RunConfig::default(),
        energy_model(),
        RecordingPlanner::default(),
        &output,
    )
    .unwrap();
    let trajectories = session.run().unwrap();
    assert_eq!(trajectories.len(), 3);

    // One cycle of 0.5 s at 1 m/s before every planner call
    assert_eq!(session.replanning_loop().planner().obstacle_x, vec![2.5, 3.0, 3.5]);
    assert_eq!(session.model().control_dof(), 2);

    let results = dir.path().join("results");
    for i in 0..3 {
        assert!(results.join(format!("result_{}.json", i)).exists());
        assert!(results.join(format!("obstacles_{}.txt", i)).exists());
    }
    assert!(!results.join("result_3.json").exists());

    let snapshot = read_obstacles(&results.join("obstacles_1.txt")).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!((snapshot[0].x, snapshot[0].y, snapshot[0].radius), (3.0, 2.0, 0.5));

    // The agent moved one step per cycle
    let last: Trajectory =
        serde_json::from_str(&fs::read_to_string(results.join("result_2.json")).unwrap()).unwrap();
    assert_eq!(last.trajectory[0].state, State::from([2.0, 0.0, 0.0]));
}

#[test]
fn test_unknown_model_type_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), json!({ "model": { "type": "unknown-foo" } }));
    let output = dir.path().join("out").join("result.json");

    let err = ReplanSession::prepare(&options(config, output)).err().unwrap();
    match err {
        SessionError::Config(ConfigError::UnknownModel(tag)) => assert_eq!(tag, "unknown-foo"),
        other => panic!("unexpected error: {}", other),
    }
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_model_key_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), json!({ "scenario": { "iterations": 1 } }));
    let output = dir.path().join("out").join("result.json");

    let err = ReplanSession::prepare(&options(config, output)).err().unwrap();
    assert!(matches!(
        err,
        SessionError::Config(ConfigError::MissingKey(ref key)) if key == "model"
    ));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_variant_field_is_reported() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        json!({ "model": { "type": "energy", "max_linear_velocity": 1.0 } }),
    );
    let err = ReplanSession::prepare(&options(config, dir.path().join("result.json")))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        SessionError::Config(ConfigError::MissingKey(ref key)) if key == "max_angular_velocity"
    ));
}

#[test]
fn test_energy_model_runs_with_builtin_planner() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        json!({
            "model": {
                "type": "energy",
                "max_linear_velocity": 1.0,
                "max_angular_velocity": 1.0
            },
            "scenario": {
                "iterations": 2,
                "start": [0.0, 0.0, 0.0],
                "goal": [3.0, 0.0, 0.0]
            }
        }),
    );
    let output = dir.path().join("result.json");

    let mut session = ReplanSession::prepare(&options(config, output)).unwrap();
    let trajectories = session.run().unwrap();
    assert_eq!(trajectories.len(), 2);

    let goal = State::from([3.0, 0.0, 0.0]);
    for trajectory in &trajectories {
        let end = trajectory.states().last().unwrap();
        assert!(session.model().is_goal(end, &goal));
        assert!(trajectory.states().all(|s| session.model().is_valid(s)));
    }
    // The second cycle starts where the first one's step landed
    assert_eq!(
        trajectories[1].state_at(0),
        trajectories[0].state_at(1)
    );
    assert!(dir.path().join("result_1.json").exists());
    assert!(dir.path().join("obstacles_1.txt").exists());
}

#[test]
fn test_run_longer_than_arrival_holds_at_goal() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        json!({
            "model": {
                "type": "energy",
                "max_linear_velocity": 1.0,
                "max_angular_velocity": 1.0
            },
            "scenario": {
                "iterations": 20,
                "start": [0.0, 0.0, 0.0],
                "goal": [3.0, 0.0, 0.0]
            }
        }),
    );

    let mut session =
        ReplanSession::prepare(&options(config, dir.path().join("result.json"))).unwrap();
    let trajectories = session.run().unwrap();
    assert_eq!(trajectories.len(), 20);

    // Once the agent is inside the goal region the planner returns the start alone
    let last = trajectories.last().unwrap();
    assert_eq!(last.len(), 1);
    assert!(session.model().is_goal(last.state_at(0).unwrap(), &State::from([3.0, 0.0, 0.0])));
    assert!(dir.path().join("result_19.json").exists());
}

#[test]
fn test_model_file_overrides_embedded_model() {
    let dir = tempdir().unwrap();
    let model = dir.path().join("model.json");
    fs::write(&model, r#"{ "type": "double integrator", "max_acceleration": 1.0 }"#).unwrap();
    let config = write_config(
        dir.path(),
        json!({
            "model": { "type": "unknown-foo" },
            "scenario": {
                "iterations": 1,
                "start": [0.0, 0.0],
                "goal": [3.0, 0.0],
                "obstacles": []
            }
        }),
    );

    let mut opts = options(config, dir.path().join("result.json"));
    opts.model = Some(model);
    let mut session = ReplanSession::prepare(&opts).unwrap();
    assert_eq!(session.model().name(), "double integrator");
    assert_eq!(session.model().control_dof(), 1);

    let trajectories = session.run().unwrap();
    assert_eq!(trajectories.len(), 1);
    assert_eq!(fs::read_to_string(dir.path().join("obstacles_0.txt")).unwrap(), "");
}

#[test]
fn test_state_dimension_mismatch_aborts_run() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        json!({
            "model": { "type": "double integrator", "max_acceleration": 1.0 },
            "scenario": { "iterations": 1 }
        }),
    );
    let mut session =
        ReplanSession::prepare(&options(config, dir.path().join("result.json"))).unwrap();
    let err = session.run().unwrap_err();
    assert!(matches!(err, SessionError::Replan(_)));
    assert!(!dir.path().join("obstacles_0.txt").exists());
}

#[test]
fn test_shipped_configs_parse() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
    let config = RunConfig::from_file(root.join("replan.json")).unwrap();
    assert_eq!(config.scenario, horizon_core::config::ScenarioConfig::default());
    assert_eq!(load_model(&config.resolve_model_config(None).unwrap()).unwrap().name(), "energy");

    let model = config
        .resolve_model_config(Some(&root.join("double_integrator.json")))
        .unwrap();
    assert_eq!(load_model(&model).unwrap().state_dof(), 2);
}
