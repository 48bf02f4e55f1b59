use cartbench_ingest::OperationKinds;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Config file {} not found", .0.display())]
    FileNotFound(PathBuf),
    #[error("Config file could not be read")]
    Io(#[from] io::Error),
    #[error("Config file is not valid yaml")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    #[serde(default)]
    pub combine: CombineConfig,
    #[serde(default)]
    pub analyze: AnalyzeConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CombineConfig {
    #[serde(default = "default_mysql_path")]
    pub mysql: PathBuf,
    #[serde(default = "default_dynamodb_path")]
    pub dynamodb: PathBuf,
    #[serde(default = "default_combined_path")]
    pub output: PathBuf,
    // substrings every backend is validated against
    #[serde(default = "default_operation_types")]
    pub operation_types: Vec<String>,
    #[serde(default = "default_operations_per_type")]
    pub operations_per_type: usize,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeConfig {
    #[serde(default = "default_combined_path")]
    pub input: PathBuf,
    #[serde(default = "default_tables_path")]
    pub tables: PathBuf,
    #[serde(default = "default_metrics_path")]
    pub metrics: PathBuf,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            mysql: default_mysql_path(),
            dynamodb: default_dynamodb_path(),
            output: default_combined_path(),
            operation_types: default_operation_types(),
            operations_per_type: default_operations_per_type(),
        }
    }
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            input: default_combined_path(),
            tables: default_tables_path(),
            metrics: default_metrics_path(),
        }
    }
}

impl CombineConfig {
    pub fn operation_kinds(&self) -> OperationKinds {
        OperationKinds::new(self.operation_types.clone(), self.operations_per_type)
    }
}

impl BenchConfig {
    /// load a yaml config, `None` falls back to the defaults
    ///
    /// preflight checks are left to the caller so command line overrides are checked as well
    pub fn load(path: Option<&PathBuf>) -> Result<Self, ConfigErrors> {
        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigErrors::FileNotFound(path.clone()));
                }

                debug!("Reading config from {}", path.display());
                Ok(serde_yaml::from_str::<Self>(&fs::read_to_string(path)?)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// check the config for problems, returns whether any were found
    pub fn preflight_checks(&mut self) -> bool {
        // collect all errors instead of bailing on the first one
        let mut contains_error = false;
        let combine = &mut self.combine;

        combine.operation_types = combine
            .operation_types
            .iter()
            .map(|kind| kind.trim().to_lowercase())
            .collect();

        if combine.operation_types.is_empty() {
            error!("combine.operation_types must name at least one operation type");
            contains_error = true;
        }

        if combine.operation_types.iter().any(String::is_empty) {
            error!("combine.operation_types must not contain empty names");
            contains_error = true;
        }

        for kind in combine.operation_types.iter().duplicates() {
            error!("combine.operation_types contains '{kind}' more than once");
            contains_error = true;
        }

        if combine.operations_per_type == 0 {
            error!("combine.operations_per_type cannot be 0, every type has to be measured");
            contains_error = true;
        }

        let output = normalized(&combine.output);
        let tables = normalized(&self.analyze.tables);
        let metrics = normalized(&self.analyze.metrics);

        if output == tables || output == metrics {
            error!(
                "combine.output ({}) would be overwritten by the analysis output",
                combine.output.display()
            );
            contains_error = true;
        }

        if tables == metrics {
            error!("analyze.tables and analyze.metrics must be different files");
            contains_error = true;
        }

        contains_error
    }
}

/// `./a/./b.json` and `a/b.json` name the same file
fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

fn default_mysql_path() -> PathBuf {
    PathBuf::from("mysql_test_results.json")
}

fn default_dynamodb_path() -> PathBuf {
    PathBuf::from("dynamodb_test_results.json")
}

fn default_combined_path() -> PathBuf {
    PathBuf::from("combined_results.json")
}

fn default_tables_path() -> PathBuf {
    PathBuf::from("comparison_tables.txt")
}

fn default_metrics_path() -> PathBuf {
    PathBuf::from("analysis_metrics.json")
}

fn default_operation_types() -> Vec<String> {
    OperationKinds::default().kinds
}

fn default_operations_per_type() -> usize {
    OperationKinds::default().per_kind
}
