//! Cross-domain aggregation over evaluation tables
//!
//! Selects the best-scoring grid per domain, computes grouped descriptive
//! statistics and a metric correlation matrix, and tests the compressibility
//! hypothesis `cr ≈ 1 / (entropy × density)` by linear regression. Runs as a
//! read-only reduction after all evaluation rows are available and produces
//! its summary exactly once per run.

use crate::eval::evaluator::{EvaluationTable, MetricRow, MetricSet};
use crate::grid::assign::GridResolution;
use crate::io::error::{EvalError, Result};
use crate::math::statistics::{self, LinearFit};
use ndarray::Array2;
use std::collections::HashMap;

/// Metrics included in descriptive statistics, in output order
pub const SUMMARY_METRICS: [&str; 7] = [
    "grid_consistency",
    "hit_rate",
    "density",
    "entropy",
    "bbox_coverage",
    "cr_file",
    "p_score",
];

/// Metrics included in the correlation matrix, in output order
pub const CORRELATION_METRICS: [&str; 5] =
    ["density", "entropy", "bbox_coverage", "cr_file", "p_score"];

/// The best-scoring row for one domain plus hypothesis-derived fields
#[derive(Debug, Clone, PartialEq)]
pub struct BestGridRecord {
    /// Domain the row belongs to
    pub domain: String,
    /// Dataset label of the table the row came from
    pub dataset: String,
    /// Site category label of the row
    pub category: String,
    /// Winning grid resolution
    pub resolution: GridResolution,
    /// Component count of the winning row
    pub component_count: usize,
    /// Metrics of the winning row
    pub metrics: MetricSet,
    /// Product of entropy and density, the hypothesis predictor
    pub entropy_density: f64,
    /// Compression ratio predicted by the hypothesis model,
    /// `None` when entropy × density is zero
    pub expected_cr: Option<f64>,
    /// `expected_cr − file_cr`, `None` when either side is undefined
    pub cr_residual: Option<f64>,
}

/// Mean, sample standard deviation, and count for one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    /// Metric name from [`SUMMARY_METRICS`]
    pub metric: &'static str,
    /// Arithmetic mean, `None` when no samples were available
    pub mean: Option<f64>,
    /// Sample standard deviation, `None` for fewer than two samples
    pub std_dev: Option<f64>,
    /// Number of samples the statistics were computed over
    pub count: usize,
}

/// Descriptive statistics for one (dataset, category) group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// Dataset label of the group
    pub dataset: String,
    /// Site category label of the group
    pub category: String,
    /// One summary per metric in [`SUMMARY_METRICS`] order
    pub metrics: Vec<MetricSummary>,
}

/// Pairwise Pearson correlations over the best-grid table
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    /// Metric labels in matrix order
    pub labels: Vec<&'static str>,
    /// Correlation values; `None` marks undefined pairs
    pub values: Array2<Option<f64>>,
}

/// Complete aggregation output for one run
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    /// Best-scoring row per domain, in first-seen domain order
    pub best_grids: Vec<BestGridRecord>,
    /// Grouped descriptive statistics, in first-seen group order
    pub group_stats: Vec<GroupSummary>,
    /// Metric correlation matrix over the best-grid table
    pub correlation: CorrelationMatrix,
    /// Regression of file compression ratio on entropy × density,
    /// `None` when fewer than two complete samples exist
    pub hypothesis: Option<LinearFit>,
}

/// Aggregate evaluation tables into the cross-domain summary
///
/// Selection is stable: within a domain the first row with the maximal
/// P_Score wins, so resolution-table input order breaks ties.
///
/// # Errors
///
/// Returns an error when any expected domain has no evaluation rows — the
/// aggregation aborts and reports the missing inputs rather than silently
/// reducing a partial set
pub fn aggregate(
    tables: &[EvaluationTable],
    expected_domains: &[String],
) -> Result<AggregateSummary> {
    check_domains_present(tables, expected_domains)?;

    let best_grids = select_best_grids(tables);
    let group_stats = summarize_groups(&best_grids);
    let correlation = correlation_matrix(&best_grids);
    let hypothesis = fit_hypothesis(&best_grids);

    Ok(AggregateSummary {
        best_grids,
        group_stats,
        correlation,
        hypothesis,
    })
}

/// Abort aggregation when expected per-domain rows are missing
fn check_domains_present(tables: &[EvaluationTable], expected_domains: &[String]) -> Result<()> {
    let mut missing: Vec<String> = Vec::new();
    for expected in expected_domains {
        let present = tables
            .iter()
            .any(|table| table.rows.iter().any(|row| row.domain == *expected));
        if !present && !missing.contains(expected) {
            missing.push(expected.clone());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EvalError::MissingDomains { missing })
    }
}

/// Pick the maximal-P_Score row per domain, first occurrence winning ties
fn select_best_grids(tables: &[EvaluationTable]) -> Vec<BestGridRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut best: HashMap<String, (&str, &MetricRow)> = HashMap::new();

    for table in tables {
        for row in &table.rows {
            let replace = match best.get(&row.domain) {
                Some((_, current)) => row.metrics.p_score > current.metrics.p_score,
                None => {
                    order.push(row.domain.clone());
                    true
                }
            };
            if replace {
                best.insert(row.domain.clone(), (table.dataset.as_str(), row));
            }
        }
    }

    order
        .iter()
        .filter_map(|domain| best.get(domain))
        .map(|&(dataset, row)| derive_best_grid(dataset, row))
        .collect()
}

/// Attach the hypothesis-derived fields to a winning row
fn derive_best_grid(dataset: &str, row: &MetricRow) -> BestGridRecord {
    let entropy_density = row.metrics.entropy * row.metrics.density;
    let expected_cr = (entropy_density > 0.0).then_some(1.0 / entropy_density);
    let cr_residual = match (expected_cr, row.metrics.compression) {
        (Some(expected), Some(probe)) => Some(expected - probe.ratio),
        _ => None,
    };

    BestGridRecord {
        domain: row.domain.clone(),
        dataset: dataset.to_string(),
        category: row.category.clone(),
        resolution: row.resolution,
        component_count: row.component_count,
        metrics: row.metrics.clone(),
        entropy_density,
        expected_cr,
        cr_residual,
    }
}

/// Extract one summary metric value from a best-grid record
///
/// The compression ratio is `None` for records whose probe was unavailable;
/// every other metric is always defined.
fn metric_value(record: &BestGridRecord, metric: &str) -> Option<f64> {
    match metric {
        "grid_consistency" => Some(record.metrics.grid_consistency),
        "hit_rate" => Some(record.metrics.hit_rate),
        "density" => Some(record.metrics.density),
        "entropy" => Some(record.metrics.entropy),
        "bbox_coverage" => Some(record.metrics.bbox_coverage),
        "cr_file" => record.metrics.compression.map(|p| p.ratio),
        "p_score" => Some(record.metrics.p_score),
        _ => None,
    }
}

/// Descriptive statistics per (dataset, category) group
fn summarize_groups(best_grids: &[BestGridRecord]) -> Vec<GroupSummary> {
    let mut group_order: Vec<(String, String)> = Vec::new();
    let mut members: HashMap<(String, String), Vec<&BestGridRecord>> = HashMap::new();

    for record in best_grids {
        let key = (record.dataset.clone(), record.category.clone());
        if !members.contains_key(&key) {
            group_order.push(key.clone());
        }
        members.entry(key).or_default().push(record);
    }

    group_order
        .into_iter()
        .map(|key| {
            let records = members.get(&key).map_or(&[] as &[_], Vec::as_slice);
            let metrics = SUMMARY_METRICS
                .iter()
                .map(|&metric| {
                    let values: Vec<f64> = records
                        .iter()
                        .filter_map(|record| metric_value(record, metric))
                        .collect();
                    MetricSummary {
                        metric,
                        mean: statistics::mean(&values),
                        std_dev: statistics::sample_std_dev(&values),
                        count: values.len(),
                    }
                })
                .collect();
            GroupSummary {
                dataset: key.0,
                category: key.1,
                metrics,
            }
        })
        .collect()
}

/// Pairwise Pearson correlation over pairwise-complete observations
fn correlation_matrix(best_grids: &[BestGridRecord]) -> CorrelationMatrix {
    let labels: Vec<&'static str> = CORRELATION_METRICS.to_vec();
    let size = labels.len();

    let values = Array2::from_shape_fn((size, size), |(i, j)| {
        let row_metric = labels.get(i)?;
        let col_metric = labels.get(j)?;

        let mut xs = Vec::with_capacity(best_grids.len());
        let mut ys = Vec::with_capacity(best_grids.len());
        for record in best_grids {
            if let (Some(x), Some(y)) = (
                metric_value(record, row_metric),
                metric_value(record, col_metric),
            ) {
                xs.push(x);
                ys.push(y);
            }
        }

        statistics::pearson(&xs, &ys)
    });

    CorrelationMatrix { labels, values }
}

/// Regress the file compression ratio on entropy × density
///
/// Only rows where both the predictor is positive and the probe is available
/// enter the sample; degenerate samples yield `None`.
fn fit_hypothesis(best_grids: &[BestGridRecord]) -> Option<LinearFit> {
    let mut xs = Vec::with_capacity(best_grids.len());
    let mut ys = Vec::with_capacity(best_grids.len());
    for record in best_grids {
        if let (Some(_), Some(probe)) = (record.expected_cr, record.metrics.compression) {
            xs.push(record.entropy_density);
            ys.push(probe.ratio);
        }
    }

    statistics::linear_fit(&xs, &ys)
}
