use crate::record::{Backend, OperationRecord};
use itertools::Itertools;
use tracing::{info, warn};

/// Expected operation mix of a single backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationKinds {
    // substrings identifying each kind, matched case-insensitive
    pub kinds: Vec<String>,
    pub per_kind: usize,
}

impl Default for OperationKinds {
    fn default() -> Self {
        Self {
            kinds: vec!["create".into(), "add".into(), "get".into()],
            per_kind: 50,
        }
    }
}

impl OperationKinds {
    pub fn new(kinds: Vec<String>, per_kind: usize) -> Self {
        Self {
            kinds: kinds.into_iter().map(|kind| kind.to_lowercase()).collect(),
            per_kind,
        }
    }

    pub fn expected_total(&self) -> usize {
        self.kinds.len() * self.per_kind
    }

    /// first kind contained in `operation`, if any
    pub fn classify(&self, operation: &str) -> Option<&str> {
        let operation = operation.to_lowercase();

        self.kinds
            .iter()
            .find(|kind| operation.contains(&kind.to_lowercase()))
            .map(String::as_str)
    }
}

/// Per-kind tally of a result set, kinds are kept in configured order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindCounts {
    pub counts: Vec<(String, usize)>,
    pub other: usize,
}

impl KindCounts {
    pub fn get(&self, kind: &str) -> usize {
        self.counts
            .iter()
            .find(|(name, _)| name == kind)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

pub fn count_operations(records: &[OperationRecord], kinds: &OperationKinds) -> KindCounts {
    let mut counts = kinds
        .kinds
        .iter()
        .map(|kind| (kind.clone(), 0))
        .collect_vec();
    let mut other = 0;

    for record in records {
        match kinds.classify(&record.operation) {
            Some(kind) => {
                if let Some((_, count)) = counts.iter_mut().find(|(name, _)| name == kind) {
                    *count += 1;
                }
            }
            None => other += 1,
        }
    }

    KindCounts { counts, other }
}

#[derive(Debug, Clone)]
pub struct DistributionReport {
    pub backend: Backend,
    pub counts: KindCounts,
    pub total: usize,
    pub per_kind: usize,
    pub expected_total: usize,
}

impl DistributionReport {
    /// every kind has to match exactly and so does the total
    pub fn is_valid(&self) -> bool {
        self.counts
            .counts
            .iter()
            .all(|(_, count)| *count == self.per_kind)
            && self.total == self.expected_total
    }

    /// kinds whose count deviates from the expected one
    pub fn mismatches(&self) -> Vec<(&str, usize)> {
        self.counts
            .counts
            .iter()
            .filter(|(_, count)| *count != self.per_kind)
            .map(|(kind, count)| (kind.as_str(), *count))
            .collect()
    }
}

/// tally and log the operation mix of a backend
pub fn verify_operations(
    backend: Backend,
    records: &[OperationRecord],
    kinds: &OperationKinds,
) -> DistributionReport {
    info!(backend = %backend, "Operation counts");
    records
        .iter()
        .map(|record| record.operation.as_str())
        .counts()
        .into_iter()
        .sorted()
        .for_each(|(operation, count)| info!(backend = %backend, "  {operation}: {count}"));

    let counts = count_operations(records, kinds);
    let report = DistributionReport {
        backend,
        total: records.len(),
        per_kind: kinds.per_kind,
        expected_total: kinds.expected_total(),
        counts,
    };

    info!(backend = %backend, "  Total: {}", report.total);

    if report.is_valid() {
        info!(backend = %backend, "{backend} verified successfully");
    } else {
        for (kind, count) in report.mismatches() {
            warn!(
                backend = %backend,
                "{kind}: expected {} operations but found {count}",
                report.per_kind
            );
        }
        if report.counts.other > 0 {
            warn!(
                backend = %backend,
                "{} operations match none of the expected types",
                report.counts.other
            );
        }
        warn!(
            backend = %backend,
            "{backend} does not have the expected operation distribution ({} of {})",
            report.total, report.expected_total
        );
    }

    report
}
