use crate::{normalize::normalize_operation_name, AnalysisError};
use cartbench_ingest::{Backend, OperationRecord};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// canonical operation name -> average latency in ms
pub type OperationBreakdown = BTreeMap<String, f64>;

/// Aggregate latency and success statistics for one backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendMetrics {
    pub avg: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    /// percentage in [0, 100]
    pub success_rate: f64,
    pub total_ops: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationGroup {
    pub count: usize,
    pub avg: f64,
}

pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Percentile with linear interpolation between the closest ranks of the sorted samples.
///
/// The rank is `p / 100 * (n - 1)`, `p` is clamped to [0, 100].
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let sorted = samples
        .iter()
        .copied()
        .sorted_by(|a, b| a.total_cmp(b))
        .collect_vec();
    let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

impl BackendMetrics {
    pub fn compute(backend: Backend, records: &[OperationRecord]) -> Result<Self, AnalysisError> {
        // sorted so the floating point sum does not depend on record order
        let response_times = records
            .iter()
            .map(|record| record.response_time)
            .sorted_by(|a, b| a.total_cmp(b))
            .collect_vec();

        let (Some(avg), Some(p50), Some(p95), Some(p99)) = (
            mean(&response_times),
            percentile(&response_times, 50.0),
            percentile(&response_times, 95.0),
            percentile(&response_times, 99.0),
        ) else {
            return Err(AnalysisError::EmptyResultSet(backend));
        };

        let successes = records.iter().filter(|record| record.success).count();

        Ok(Self {
            avg,
            p50,
            p95,
            p99,
            success_rate: successes as f64 / records.len() as f64 * 100.0,
            total_ops: records.len(),
        })
    }
}

/// group latencies by the raw operation label and log each group
#[instrument(skip(records), level = "debug")]
pub fn operation_groups(
    backend: Backend,
    records: &[OperationRecord],
) -> BTreeMap<String, OperationGroup> {
    let groups = records
        .iter()
        .map(|record| (record.operation.clone(), record.response_time))
        .into_group_map()
        .into_iter()
        .filter_map(|(operation, times)| {
            mean(&times).map(|avg| {
                (
                    operation,
                    OperationGroup {
                        count: times.len(),
                        avg,
                    },
                )
            })
        })
        .collect::<BTreeMap<_, _>>();

    for (operation, group) in groups.iter() {
        info!(
            backend = %backend,
            "  {operation}: {} records, avg = {:.2} ms",
            group.count, group.avg
        );
    }

    groups
}

/// average latency per canonical operation, labels normalizing to the same name are pooled
pub fn operation_breakdown(records: &[OperationRecord]) -> OperationBreakdown {
    records
        .iter()
        .map(|record| {
            (
                normalize_operation_name(&record.operation),
                record.response_time,
            )
        })
        .into_group_map()
        .into_iter()
        .filter_map(|(operation, mut times)| {
            times.sort_by(f64::total_cmp);
            mean(&times).map(|avg| (operation, avg))
        })
        .collect()
}
