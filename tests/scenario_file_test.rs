// Integration tests for loading scenarios and config from disk
use deadlock_toolkit::{Error, ScenarioInput, ToolkitConfig, ValidationPolicy};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_scenario_file_round_trip_to_report() -> deadlock_toolkit::Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cross_wait.json");
    fs::write(
        &path,
        r#"{
            "allocation": [[1, 0], [0, 1]],
            "max_demand": [[1, 1], [1, 1]],
            "available": [0, 0]
        }"#,
    )?;

    let report = ScenarioInput::from_file(&path)?.run(ValidationPolicy::default())?;
    assert!(!report.safe);
    assert!(report.deadlock_detected);
    assert_eq!(report.cycle.to_string(), "P0 -> R1 -> P1 -> R0 -> P0");

    Ok(())
}

#[test]
fn test_missing_scenario_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = ScenarioInput::from_file(temp_dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_negative_value_in_file_is_rejected() -> deadlock_toolkit::Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("negative.json");
    fs::write(&path, r#"{"allocation": [[0]], "max_demand": [[-1]], "available": [0]}"#)?;

    let err = ScenarioInput::from_file(&path)?.run(ValidationPolicy::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { value: -1, .. }));

    Ok(())
}

#[test]
fn test_config_file_loading() -> deadlock_toolkit::Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    fs::write(
        &path,
        r#"{"logging": {"level": "debug"}, "validation": {"enforce_max_claim": false}}"#,
    )?;
    let config = ToolkitConfig::from_file(&path)?;
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "pretty");
    assert_eq!(config.validation_policy(), ValidationPolicy::permissive());

    fs::write(&path, r#"{"logging": {"format": "yaml"}}"#)?;
    assert!(matches!(ToolkitConfig::from_file(&path), Err(Error::ConfigError(_))));

    Ok(())
}
