use crate::{
    compare::{comparison_rows, operation_rows, ComparisonRow, OperationRow},
    stats::{
        operation_breakdown, operation_groups, BackendMetrics, OperationBreakdown, OperationGroup,
    },
    AnalysisError,
};
use cartbench_ingest::{load_combined, Backend, CombinedDocument, OperationRecord};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use tabled::{
    settings::{style::HorizontalLine, Style},
    Table, Tabled,
};
use tracing::{debug, info, instrument, warn};

const RULE_WIDTH: usize = 80;

/// A value per backend, serialized under the backend keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerBackend<T> {
    pub mysql: T,
    pub dynamodb: T,
}

impl<T> PerBackend<T> {
    pub fn try_build<E>(mut build: impl FnMut(Backend) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            mysql: build(Backend::MySql)?,
            dynamodb: build(Backend::DynamoDb)?,
        })
    }

    pub fn get(&self, backend: Backend) -> &T {
        match backend {
            Backend::MySql => &self.mysql,
            Backend::DynamoDb => &self.dynamodb,
        }
    }
}

/// Raw metrics as persisted to `analysis_metrics.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub comparison_metrics: PerBackend<BackendMetrics>,
    pub operation_breakdown: PerBackend<OperationBreakdown>,
    /// groups under the labels the benchmark clients actually used
    pub raw_operations: PerBackend<BTreeMap<String, OperationGroup>>,
}

impl AnalysisReport {
    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        comparison_rows(
            &self.comparison_metrics.mysql,
            &self.comparison_metrics.dynamodb,
        )
    }

    pub fn operation_rows(&self) -> Vec<OperationRow> {
        operation_rows(
            &self.operation_breakdown.mysql,
            &self.operation_breakdown.dynamodb,
        )
    }
}

/// log what a backend's records look like before crunching numbers
fn inspect(backend: Backend, records: &[OperationRecord]) {
    debug!(backend = %backend, "Inspecting data structure");
    info!(backend = %backend, "Total records: {}", records.len());

    if let Some(sample) = records.first() {
        debug!(backend = %backend, "Sample record: {sample:?}");
    }

    let operations = records
        .iter()
        .map(|record| record.operation.as_str())
        .unique()
        .sorted()
        .join(", ");
    info!(backend = %backend, "Unique operations found: {operations}");
}

pub fn analyze_document(document: &CombinedDocument) -> Result<AnalysisReport, AnalysisError> {
    for backend in Backend::ALL {
        inspect(backend, document.records(backend));
    }

    let comparison_metrics = PerBackend::try_build(|backend| {
        info!("Calculating {backend} metrics...");

        BackendMetrics::compute(backend, document.records(backend))
    })?;
    let raw_operations = PerBackend::try_build(|backend| {
        Ok::<_, AnalysisError>(operation_groups(backend, document.records(backend)))
    })?;
    let operation_breakdown = PerBackend::try_build(|backend| {
        Ok::<_, AnalysisError>(operation_breakdown(document.records(backend)))
    })?;

    Ok(AnalysisReport {
        comparison_metrics,
        operation_breakdown,
        raw_operations,
    })
}

fn banner(output: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);

    output.push_str(&rule);
    output.push('\n');
    output.push_str(title);
    output.push('\n');
    output.push_str(&rule);
    output.push('\n');
}

/// ascii grid with `=` below the header row
fn grid<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::ascii().horizontals([(1, HorizontalLine::full('=', '+', '+', '+'))]))
        .to_string()
}

/// render both comparison tables as plain text
pub fn render_tables(
    comparison: &[ComparisonRow],
    operations: &[OperationRow],
    source: &str,
) -> String {
    let mut output = String::new();

    banner(&mut output, "REQUIRED COMPARISON TABLE");
    output.push_str(&grid(comparison));
    output.push_str(&format!("\n\nData Source: {source}\n\n"));

    banner(&mut output, "OPERATION-SPECIFIC BREAKDOWN");
    output.push_str(&grid(operations));
    output.push('\n');

    output
}

fn write_output(path: &Path, content: &str) -> Result<(), AnalysisError> {
    fs::write(path, content).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// analyze the combined document at `input`, print the tables and persist tables and metrics
#[instrument(level = "info")]
pub fn run_analysis(
    input: &Path,
    tables: &Path,
    metrics: &Path,
) -> Result<AnalysisReport, AnalysisError> {
    let document = load_combined(input)?;
    let report = analyze_document(&document)?;

    let source = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let rendered = render_tables(&report.comparison_rows(), &report.operation_rows(), &source);
    let serialized = serde_json::to_string_pretty(&report)?;

    println!("{rendered}");

    write_output(tables, &rendered)?;
    info!("Results saved to {}", tables.display());

    if let Err(error) = write_output(metrics, &serialized) {
        // leave no tables behind without their metrics
        if let Err(cleanup) = fs::remove_file(tables) {
            warn!("Failed to remove {}: {cleanup}", tables.display());
        }

        return Err(error);
    }
    info!("Metrics saved to {}", metrics.display());

    Ok(report)
}
