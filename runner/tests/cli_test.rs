use serde_json::{json, Value};
use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};
use tempfile::tempdir;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cartbench"))
}

fn run_cli(dir: &Path, args: &[&str]) -> Output {
    Command::new(bin_path())
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn cartbench")
}

fn write_results(path: &Path, base: f64, per_kind: usize) {
    let records = ["create_cart", "add_items", "get_cart"]
        .iter()
        .enumerate()
        .flat_map(|(offset, operation)| {
            (0..per_kind).map(move |i| {
                json!({
                    "operation": operation,
                    "response_time": base + (offset * 10 + i % 3) as f64,
                    "success": true,
                    "status_code": 200,
                    "timestamp": "2025-10-31T12:00:00Z",
                })
            })
        })
        .collect::<Vec<_>>();

    fs::write(path, serde_json::to_string_pretty(&records).unwrap()).unwrap();
}

#[test]
fn combine_then_analyze() {
    let dir = tempdir().unwrap();
    write_results(&dir.path().join("mysql_test_results.json"), 40.0, 50);
    write_results(&dir.path().join("dynamodb_test_results.json"), 15.0, 50);

    let output = run_cli(dir.path(), &["combine"]);
    assert!(
        output.status.success(),
        "combine failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let combined: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("combined_results.json")).unwrap())
            .unwrap();
    assert_eq!(combined["metadata"]["total_operations"], 300);
    assert_eq!(combined["metadata"]["operation_types"], json!(["create", "add", "get"]));

    let output = run_cli(dir.path(), &["analyze"]);
    assert!(
        output.status.success(),
        "analyze failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("REQUIRED COMPARISON TABLE"));
    assert!(stdout.contains("DynamoDB by 25.00 ms"));

    let tables = fs::read_to_string(dir.path().join("comparison_tables.txt")).unwrap();
    assert!(tables.contains("OPERATION-SPECIFIC BREAKDOWN"));

    let metrics: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("analysis_metrics.json")).unwrap())
            .unwrap();
    assert_eq!(metrics["comparison_metrics"]["dynamodb"]["total_ops"], 150);
    assert_eq!(metrics["comparison_metrics"]["mysql"]["success_rate"], 100.0);
}

#[test]
fn invalid_distribution_fails_without_output() {
    let dir = tempdir().unwrap();
    write_results(&dir.path().join("mysql_test_results.json"), 40.0, 50);
    write_results(&dir.path().join("dynamodb_test_results.json"), 15.0, 49);

    let output = run_cli(dir.path(), &["combine"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("DynamoDB"));
    assert!(!dir.path().join("combined_results.json").exists());
}

#[test]
fn missing_input_fails_cleanly() {
    let dir = tempdir().unwrap();
    write_results(&dir.path().join("mysql_test_results.json"), 40.0, 50);

    let output = run_cli(dir.path(), &["run"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("dynamodb_test_results.json not found"));
    assert!(!dir.path().join("combined_results.json").exists());
    assert!(!dir.path().join("analysis_metrics.json").exists());
}

#[test]
fn config_file_and_flag_overrides() {
    let dir = tempdir().unwrap();
    write_results(&dir.path().join("a.json"), 10.0, 4);
    write_results(&dir.path().join("b.json"), 12.0, 4);
    fs::write(
        dir.path().join("cartbench.yaml"),
        "combine:\n  mysql: a.json\n  dynamodb: wrong.json\n  operations_per_type: 4\n",
    )
    .unwrap();

    let output = run_cli(
        dir.path(),
        &[
            "run",
            "--config",
            "cartbench.yaml",
            "--dynamodb",
            "b.json",
            "--output",
            "merged.json",
            "--metrics",
            "metrics.json",
        ],
    );
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let merged: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("merged.json")).unwrap()).unwrap();
    assert_eq!(merged["metadata"]["total_operations"], 24);
    assert_eq!(merged["metadata"]["operations_per_type"], 4);
    assert!(dir.path().join("metrics.json").exists());
    assert!(dir.path().join("comparison_tables.txt").exists());
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("cartbench.yaml"),
        "combine:\n  operations_per_type: 0\n",
    )
    .unwrap();

    let output = run_cli(dir.path(), &["combine", "--config", "cartbench.yaml"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("operations_per_type"));
}
