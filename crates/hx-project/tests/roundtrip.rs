use hx_project::schema::*;
use hx_project::{
    ProjectError, ValidationError, from_yaml_str, load_json, load_scenario, load_yaml, save_json,
    save_yaml, to_yaml_string,
};

fn tuned_scenario() -> ScenarioDef {
    ScenarioDef {
        version: LATEST_VERSION,
        name: "Tuned loop".to_string(),
        plant: PlantDef {
            tau_s: 45.0,
            gain_c: 80.0,
            ambient_c: 15.0,
            initial_c: 25.0,
        },
        control: ControlDef {
            setpoint_c: 60.0,
            tolerance_pct: 1.0,
            kp: 2.0,
            ki: 0.1,
            kd: 0.0,
        },
        simulation: SimulationDef {
            dt_s: 0.1,
            record_every: 5,
        },
    }
}

#[test]
fn roundtrip_yaml_default_scenario() {
    let scenario = ScenarioDef::default();

    let path = std::env::temp_dir().join("hx_project_roundtrip_default.yaml");
    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json_tuned_scenario() {
    let scenario = tuned_scenario();

    let path = std::env::temp_dir().join("hx_project_roundtrip_tuned.json");
    save_json(&path, &scenario).unwrap();
    assert_eq!(load_json(&path).unwrap(), scenario);
    assert_eq!(load_scenario(&path).unwrap(), scenario);
}

#[test]
fn yaml_string_roundtrip() {
    let scenario = tuned_scenario();
    let text = to_yaml_string(&scenario).unwrap();
    assert_eq!(from_yaml_str(&text).unwrap(), scenario);
}

#[test]
fn partial_yaml_fills_defaults() {
    let text = "\
name: Hot setpoint
control:
  setpoint_c: 80
";
    let scenario = from_yaml_str(text).unwrap();
    assert_eq!(scenario.name, "Hot setpoint");
    assert_eq!(scenario.version, LATEST_VERSION);
    assert_eq!(scenario.control.setpoint_c, 80.0);
    assert_eq!(scenario.control.kp, ControlDef::default().kp);
    assert_eq!(scenario.plant, PlantDef::default());
    assert_eq!(scenario.simulation, SimulationDef::default());
}

#[test]
fn out_of_range_yaml_is_rejected_on_load() {
    let text = "\
control:
  kd: 3.5
";
    match from_yaml_str(text) {
        Err(ProjectError::Validation(ValidationError::OutOfRange { field, value, .. })) => {
            assert_eq!(field, "control.kd");
            assert_eq!(value, 3.5);
        }
        other => panic!("expected range error, got {other:?}"),
    }
}

#[test]
fn malformed_yaml_is_a_yaml_error() {
    let text = "control: [not, a, map]";
    assert!(matches!(from_yaml_str(text), Err(ProjectError::Yaml(_))));
}

#[test]
fn read_then_clamp_recovers_out_of_range_file() {
    let path = std::env::temp_dir().join("hx_project_clamp_source.yaml");
    std::fs::write(&path, "control:\n  setpoint_c: 95\n  kp: 0.0\n").unwrap();

    assert!(load_scenario(&path).is_err());

    let mut scenario = hx_project::read_scenario(&path).unwrap();
    let adjusted = hx_project::clamp_scenario(&mut scenario);
    assert_eq!(adjusted.len(), 2);
    assert_eq!(scenario.control.setpoint_c, 90.0);
    assert_eq!(scenario.control.kp, 0.1);
    hx_project::validate_scenario(&scenario).unwrap();
}
