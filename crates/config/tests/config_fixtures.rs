//! Integration tests for parsing config fixtures from the workspace testkit.

use metric_recorder_config::{
    CURRENT_CONFIG_VERSION, LoggingLevel, RecorderEnv, RecorderKind,
    load_recorder_config_from_path, parse_recorder_config_json, parse_recorder_config_toml,
};
use metric_recorder_domain::DuplicatePolicy;
use metric_recorder_shared::ErrorCode;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn fixture_path(relative: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join("testkit")
        .join("fixtures")
        .join(relative)
}

fn read_fixture(relative: &str) -> Result<String, Box<dyn Error>> {
    Ok(fs::read_to_string(fixture_path(relative))?)
}

#[test]
fn parses_valid_json_fixture_and_normalizes() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("config/recorder-config.valid.json")?;
    let config = parse_recorder_config_json(&contents)?;

    assert_eq!(config.version, CURRENT_CONFIG_VERSION);
    assert_eq!(config.kind, RecorderKind::JsonLines);
    assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
    assert_eq!(config.logging.level, LoggingLevel::Warn);

    let keys: Vec<&str> = config
        .json_lines
        .base_properties
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["Marketplace", "Service"], "keys should be trimmed");
    Ok(())
}

#[test]
fn parses_valid_toml_fixture() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("config/recorder-config.valid.toml")?;
    let config = parse_recorder_config_toml(&contents)?;

    assert_eq!(config.kind, RecorderKind::InMemory);
    assert_eq!(config.duplicate_policy, DuplicatePolicy::LastWriteWins);
    assert_eq!(config.logging.level, LoggingLevel::Debug);
    assert_eq!(
        config
            .json_lines
            .base_properties
            .get("Service")
            .map(String::as_str),
        Some("profiles")
    );
    Ok(())
}

#[test]
fn rejects_reserved_base_property() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("config/recorder-config.invalid.json")?;
    let error = parse_recorder_config_json(&contents).err();
    let Some(error) = error else {
        return Err("reserved base property should be rejected".into());
    };

    assert_eq!(error.code, ErrorCode::new("config", "invalid_base_property"));
    assert_eq!(
        error.metadata.get("key").map(String::as_str),
        Some("Operation")
    );
    Ok(())
}

#[test]
fn loads_from_path_by_extension() -> Result<(), Box<dyn Error>> {
    let env = RecorderEnv::default();
    let from_json = load_recorder_config_from_path(
        Some(&fixture_path("config/recorder-config.valid.json")),
        None,
        &env,
    )?;
    let from_toml = load_recorder_config_from_path(
        Some(&fixture_path("config/recorder-config.valid.toml")),
        None,
        &env,
    )?;

    assert_eq!(from_json.kind, RecorderKind::JsonLines);
    assert_eq!(from_toml.kind, RecorderKind::InMemory);
    Ok(())
}

#[test]
fn missing_file_maps_to_not_found() {
    let error = load_recorder_config_from_path(
        Some(&fixture_path("config/does-not-exist.json")),
        None,
        &RecorderEnv::default(),
    )
    .err();

    assert!(matches!(
        error,
        Some(ref envelope) if envelope.code == ErrorCode::new("config", "config_file_not_found")
    ));
}
