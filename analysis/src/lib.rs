pub mod compare;
pub mod normalize;
pub mod report;
pub mod stats;


pub use compare::{comparison_rows, operation_rows, ComparisonRow, OperationRow};
pub use normalize::normalize_operation_name;
pub use report::{analyze_document, render_tables, run_analysis, AnalysisReport, PerBackend};
pub use stats::{
    mean, operation_breakdown, operation_groups, percentile, BackendMetrics, OperationBreakdown,
    OperationGroup,
};

use cartbench_ingest::{Backend, IngestError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("{0} has no records, statistics are undefined")]
    EmptyResultSet(Backend),
    #[error("Failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize analysis metrics")]
    Serialize(#[from] serde_json::Error),
}
