use crate::stats::{BackendMetrics, OperationBreakdown};
use cartbench_ingest::Backend;
use itertools::Itertools;
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ComparisonRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "MySQL")]
    pub mysql: String,
    #[tabled(rename = "DynamoDB")]
    pub dynamodb: String,
    #[tabled(rename = "Winner")]
    pub winner: String,
    #[tabled(rename = "Margin")]
    pub margin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct OperationRow {
    #[tabled(rename = "Operation")]
    pub operation: String,
    #[tabled(rename = "MySQL Avg (ms)")]
    pub mysql_avg: String,
    #[tabled(rename = "DynamoDB Avg (ms)")]
    pub dynamodb_avg: String,
    #[tabled(rename = "Faster By")]
    pub faster: String,
}

#[derive(Debug, Clone, Copy)]
enum Better {
    Lower,
    Higher,
    Neither,
}

#[derive(Debug, Clone, Copy)]
enum Metric {
    Avg,
    P50,
    P95,
    P99,
    SuccessRate,
    TotalOps,
}

impl Metric {
    const ALL: [Metric; 6] = [
        Metric::Avg,
        Metric::P50,
        Metric::P95,
        Metric::P99,
        Metric::SuccessRate,
        Metric::TotalOps,
    ];

    fn name(&self) -> &'static str {
        match self {
            Self::Avg => "Avg Response Time (ms)",
            Self::P50 => "P50 Response Time (ms)",
            Self::P95 => "P95 Response Time (ms)",
            Self::P99 => "P99 Response Time (ms)",
            Self::SuccessRate => "Success Rate (%)",
            Self::TotalOps => "Total Operations",
        }
    }

    fn value(&self, metrics: &BackendMetrics) -> f64 {
        match self {
            Self::Avg => metrics.avg,
            Self::P50 => metrics.p50,
            Self::P95 => metrics.p95,
            Self::P99 => metrics.p99,
            Self::SuccessRate => metrics.success_rate,
            Self::TotalOps => metrics.total_ops as f64,
        }
    }
}

const TIE: &str = "Tie";
const DATA_MISSING: &str = "Data missing";

fn winner(mysql: f64, dynamodb: f64, better: Better) -> &'static str {
    let mysql_wins = match better {
        Better::Lower => mysql < dynamodb,
        Better::Higher => mysql > dynamodb,
        Better::Neither => return TIE,
    };

    if mysql == dynamodb {
        TIE
    } else if mysql_wins {
        Backend::MySql.label()
    } else {
        Backend::DynamoDb.label()
    }
}

/// one row per overall metric: both values, the winning backend and the absolute margin
pub fn comparison_rows(mysql: &BackendMetrics, dynamodb: &BackendMetrics) -> Vec<ComparisonRow> {
    Metric::ALL
        .iter()
        .map(|metric| {
            let name = metric.name().to_string();
            let (mysql_value, dynamodb_value) = (metric.value(mysql), metric.value(dynamodb));
            let difference = (mysql_value - dynamodb_value).abs();

            match metric {
                Metric::TotalOps => ComparisonRow {
                    metric: name,
                    mysql: mysql.total_ops.to_string(),
                    dynamodb: dynamodb.total_ops.to_string(),
                    winner: winner(mysql_value, dynamodb_value, Better::Neither).to_string(),
                    margin: "N/A".to_string(),
                },
                Metric::SuccessRate => ComparisonRow {
                    metric: name,
                    mysql: format!("{mysql_value:.2}"),
                    dynamodb: format!("{dynamodb_value:.2}"),
                    winner: winner(mysql_value, dynamodb_value, Better::Higher).to_string(),
                    margin: format!("{difference:.2}%"),
                },
                _ => ComparisonRow {
                    metric: name,
                    mysql: format!("{mysql_value:.2}"),
                    dynamodb: format!("{dynamodb_value:.2}"),
                    winner: winner(mysql_value, dynamodb_value, Better::Lower).to_string(),
                    margin: format!("{difference:.2} ms"),
                },
            }
        })
        .collect()
}

/// one row per canonical operation of either backend, sorted by name
pub fn operation_rows(mysql: &OperationBreakdown, dynamodb: &OperationBreakdown) -> Vec<OperationRow> {
    mysql
        .keys()
        .chain(dynamodb.keys())
        .unique()
        .sorted()
        .map(|operation| {
            // zero latency is as good as no data
            let mysql_avg = mysql.get(operation).copied().filter(|avg| *avg != 0.0);
            let dynamodb_avg = dynamodb.get(operation).copied().filter(|avg| *avg != 0.0);

            let faster = match (mysql_avg, dynamodb_avg) {
                (Some(mysql), Some(dynamodb)) => match winner(mysql, dynamodb, Better::Lower) {
                    TIE => TIE.to_string(),
                    backend => format!("{backend} by {:.2} ms", (mysql - dynamodb).abs()),
                },
                _ => DATA_MISSING.to_string(),
            };

            OperationRow {
                operation: operation.clone(),
                mysql_avg: format!("{:.2}", mysql_avg.unwrap_or(0.0)),
                dynamodb_avg: format!("{:.2}", dynamodb_avg.unwrap_or(0.0)),
                faster,
            }
        })
        .collect()
}
