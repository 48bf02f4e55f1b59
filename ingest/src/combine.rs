use crate::{
    record::{load_result_set, Backend, BackendResultSet},
    validate::{verify_operations, OperationKinds},
    IngestError,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{error, info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub total_operations: usize,
    pub operations_per_db: usize,
    pub databases: Vec<Backend>,
    pub operation_types: Vec<String>,
    pub operations_per_type: usize,
}

/// Both result sets plus a summary, written once by the combiner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedDocument {
    pub mysql: BackendResultSet,
    pub dynamodb: BackendResultSet,
    pub metadata: Metadata,
}

impl CombinedDocument {
    pub fn records(&self, backend: Backend) -> &BackendResultSet {
        match backend {
            Backend::MySql => &self.mysql,
            Backend::DynamoDb => &self.dynamodb,
        }
    }
}

/// validate both result sets and merge them, nothing is built if either is invalid
pub fn combine(
    mysql: BackendResultSet,
    dynamodb: BackendResultSet,
    kinds: &OperationKinds,
) -> Result<CombinedDocument, IngestError> {
    let failed = [(Backend::MySql, &mysql), (Backend::DynamoDb, &dynamodb)]
        .into_iter()
        .map(|(backend, records)| verify_operations(backend, records, kinds))
        .filter(|report| !report.is_valid())
        .map(|report| report.backend)
        .collect::<Vec<_>>();

    if !failed.is_empty() {
        return Err(IngestError::Distribution { backends: failed });
    }

    let metadata = Metadata {
        total_operations: mysql.len() + dynamodb.len(),
        operations_per_db: kinds.expected_total(),
        databases: Backend::ALL.to_vec(),
        operation_types: kinds.kinds.clone(),
        operations_per_type: kinds.per_kind,
    };

    Ok(CombinedDocument {
        mysql,
        dynamodb,
        metadata,
    })
}

/// write the document as indented json, the file is only created once serialization succeeded
pub fn write_combined(document: &CombinedDocument, path: &Path) -> Result<(), IngestError> {
    let content = serde_json::to_string_pretty(document)?;

    fs::write(path, content).map_err(|source| IngestError::from_io(path, source))
}

#[instrument(level = "debug")]
pub fn load_combined(path: &Path) -> Result<CombinedDocument, IngestError> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::from_io(path, source))?;
    let document = serde_json::from_str(&content).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded {}", path.display());

    Ok(document)
}

/// load both result files, validate, merge and write the combined document
#[instrument(skip(kinds), level = "info")]
pub fn combine_files(
    mysql_path: &Path,
    dynamodb_path: &Path,
    output: &Path,
    kinds: &OperationKinds,
) -> Result<CombinedDocument, IngestError> {
    let mysql = load_result_set(mysql_path)?;
    let dynamodb = load_result_set(dynamodb_path)?;

    let document = match combine(mysql, dynamodb, kinds) {
        Ok(document) => document,
        Err(error) => {
            error!("Data verification failed. Please check your source files.");

            return Err(error);
        }
    };

    write_combined(&document, output)?;

    info!("Successfully created {}", output.display());
    info!("  Total records: {}", document.metadata.total_operations);

    Ok(document)
}
