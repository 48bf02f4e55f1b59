pub mod combine;
pub mod record;
pub mod validate;


pub use combine::{
    combine, combine_files, load_combined, write_combined, CombinedDocument, Metadata,
};
pub use record::{load_result_set, Backend, BackendResultSet, OperationRecord};
pub use validate::{
    count_operations, verify_operations, DistributionReport, KindCounts, OperationKinds,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{} not found", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize combined results")]
    Serialize(#[from] serde_json::Error),
    #[error("Data verification failed for {}", backend_list(.backends))]
    Distribution { backends: Vec<Backend> },
}

impl IngestError {
    /// map an io error on `path` into either `FileNotFound` or a generic `Io` error
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();

        match source.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound(path),
            _ => Self::Io { path, source },
        }
    }
}

fn backend_list(backends: &[Backend]) -> String {
    backends
        .iter()
        .map(|backend| backend.label())
        .collect::<Vec<_>>()
        .join(", ")
}
