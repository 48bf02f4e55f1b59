use crate::config::{BenchConfig, ConfigErrors};
use std::{fs, path::PathBuf};
use tempfile::tempdir;

#[test]
pub fn defaults_match_the_benchmark_file_names() {
    let config = BenchConfig::load(None).unwrap();

    assert_eq!(config.combine.mysql, PathBuf::from("mysql_test_results.json"));
    assert_eq!(config.combine.dynamodb, PathBuf::from("dynamodb_test_results.json"));
    assert_eq!(config.combine.output, PathBuf::from("combined_results.json"));
    assert_eq!(config.analyze.input, config.combine.output);
    assert_eq!(config.analyze.tables, PathBuf::from("comparison_tables.txt"));
    assert_eq!(config.analyze.metrics, PathBuf::from("analysis_metrics.json"));
    assert_eq!(config.combine.operation_kinds().expected_total(), 150);
}

#[test]
pub fn default_config_passes_preflight() {
    assert!(!BenchConfig::default().preflight_checks());
}

#[test]
pub fn partial_yaml_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cartbench.yaml");
    fs::write(
        &path,
        "combine:\n  mysql: runs/mysql.json\n  operations_per_type: 10\n",
    )
    .unwrap();

    let config = BenchConfig::load(Some(&path)).unwrap();

    assert_eq!(config.combine.mysql, PathBuf::from("runs/mysql.json"));
    assert_eq!(config.combine.operations_per_type, 10);
    assert_eq!(config.combine.operation_types, vec!["create", "add", "get"]);
    assert_eq!(config.analyze.tables, PathBuf::from("comparison_tables.txt"));
}

#[test]
pub fn unknown_fields_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cartbench.yaml");
    fs::write(&path, "combine:\n  postgres: pg.json\n").unwrap();

    assert!(matches!(
        BenchConfig::load(Some(&path)),
        Err(ConfigErrors::Parse(_))
    ));
}

#[test]
pub fn missing_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.yaml");

    assert!(matches!(
        BenchConfig::load(Some(&path)),
        Err(ConfigErrors::FileNotFound(_))
    ));
}

#[test]
pub fn preflight_normalizes_operation_types() {
    let mut config = BenchConfig::default();
    config.combine.operation_types = vec![" Create ".into(), "ADD".into()];

    assert!(!config.preflight_checks());
    assert_eq!(config.combine.operation_types, vec!["create", "add"]);
}

#[test]
pub fn preflight_rejects_bad_operation_types() {
    let mut duplicated = BenchConfig::default();
    duplicated.combine.operation_types = vec!["get".into(), "GET".into()];
    assert!(duplicated.preflight_checks());

    let mut empty = BenchConfig::default();
    empty.combine.operation_types = Vec::new();
    assert!(empty.preflight_checks());

    let mut blank = BenchConfig::default();
    blank.combine.operation_types = vec!["create".into(), " ".into()];
    assert!(blank.preflight_checks());
}

#[test]
pub fn preflight_rejects_zero_per_type() {
    let mut config = BenchConfig::default();
    config.combine.operations_per_type = 0;

    assert!(config.preflight_checks());
}

#[test]
pub fn preflight_rejects_colliding_outputs() {
    let mut config = BenchConfig::default();
    config.analyze.metrics = config.combine.output.clone();

    assert!(config.preflight_checks());
}

#[test]
pub fn preflight_rejects_same_analysis_outputs() {
    let mut config = BenchConfig::default();
    config.analyze.metrics = config.analyze.tables.clone();

    assert!(config.preflight_checks());
}

#[test]
pub fn preflight_rejects_collisions_spelled_differently() {
    let mut tables = BenchConfig::default();
    tables.analyze.tables = PathBuf::from("./combined_results.json");
    assert!(tables.preflight_checks());

    let mut metrics = BenchConfig::default();
    metrics.analyze.metrics = PathBuf::from("./comparison_tables.txt");
    assert!(metrics.preflight_checks());

    let mut nested = BenchConfig::default();
    nested.combine.output = PathBuf::from("out/./combined.json");
    nested.analyze.metrics = PathBuf::from("./out/combined.json");
    assert!(nested.preflight_checks());
}
