use crate::IngestError;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path};
use tracing::{debug, info, instrument};

/// One logged request against a cart service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub operation: String,
    /// latency in milliseconds
    pub response_time: f64,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl OperationRecord {
    pub fn new(operation: impl Into<String>, response_time: f64, success: bool) -> Self {
        Self {
            operation: operation.into(),
            response_time,
            success,
            status_code: None,
            timestamp: None,
        }
    }
}

fn default_success() -> bool {
    true
}

/// Ordered records of a single backend, in the order they were issued
pub type BackendResultSet = Vec<OperationRecord>;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    MySql,
    DynamoDb,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::MySql, Backend::DynamoDb];

    /// key used in every json document
    pub fn key(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::DynamoDb => "dynamodb",
        }
    }

    /// human readable name used in logs and tables
    pub fn label(&self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::DynamoDb => "DynamoDB",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// load a json array of operation records as written by a benchmark client
#[instrument(level = "debug")]
pub fn load_result_set(path: &Path) -> Result<BackendResultSet, IngestError> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::from_io(path, source))?;
    let records: BackendResultSet =
        serde_json::from_str(&content).map_err(|source| IngestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Loaded {}", path.display());
    debug!(records = records.len(), "Parsed result set");

    Ok(records)
}
