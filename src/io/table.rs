//! CSV export of evaluation and aggregation tables
//!
//! Column layouts follow the capture pipeline's reporting conventions:
//! agreement fractions are exported as percentages, unavailable values are
//! written as an explicit marker rather than omitted.

use crate::eval::aggregate::{BestGridRecord, CorrelationMatrix, GroupSummary};
use crate::eval::evaluator::{EvaluationTable, MetricSet};
use crate::io::configuration::UNAVAILABLE_FIELD;
use crate::io::error::{EvalError, Result};
use crate::math::statistics::LinearFit;
use std::fmt::Write as _;
use std::path::Path;

/// Quote a CSV field when it contains a delimiter, quote, or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render an optional value, writing the unavailable marker for `None`
fn optional_field<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| UNAVAILABLE_FIELD.to_string(), |v| v.to_string())
}

/// Shared metric columns of the evaluation and best-grid tables
fn metric_fields(component_count: usize, metrics: &MetricSet) -> String {
    let compression = metrics.compression.as_ref();
    format!(
        "{},{},{},{},{},{},{},{},{},{}",
        component_count,
        metrics.grid_consistency * 100.0,
        metrics.hit_rate * 100.0,
        metrics.density,
        metrics.entropy,
        metrics.bbox_coverage,
        optional_field(compression.map(|p| p.ratio)),
        optional_field(compression.map(|p| p.lossless_bytes)),
        optional_field(compression.map(|p| p.lossy_bytes)),
        metrics.p_score,
    )
}

/// Write table contents to disk, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written
fn write_table(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| EvalError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    std::fs::write(path, contents).map_err(|e| EvalError::TableExport {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Export per-(domain, resolution) evaluation rows
///
/// # Errors
///
/// Returns an error if the file cannot be written
pub fn export_evaluation_table(table: &EvaluationTable, path: &Path) -> Result<()> {
    let mut contents = String::from(
        "Domain,Grid_Size,Num_Components,Grid_Consistency(%),Hit_Rate(%),Density,Entropy,\
         BBox_Coverage,CR_File,Screenshot_Size(Bytes),Compressed_Size(Bytes),P_Score\n",
    );

    for row in &table.rows {
        let _ = writeln!(
            contents,
            "{},{},{}",
            csv_field(&row.domain),
            row.resolution,
            metric_fields(row.component_count, &row.metrics),
        );
    }

    write_table(path, &contents)
}

/// Export the best-scoring row per domain with hypothesis-derived fields
///
/// # Errors
///
/// Returns an error if the file cannot be written
pub fn export_best_grids(best_grids: &[BestGridRecord], path: &Path) -> Result<()> {
    let mut contents = String::from(
        "Domain,Dataset,Category,Grid_Size,Num_Components,Grid_Consistency(%),Hit_Rate(%),\
         Density,Entropy,BBox_Coverage,CR_File,Screenshot_Size(Bytes),Compressed_Size(Bytes),\
         P_Score,Entropy_x_Density,Expected_CR,CR_Residual\n",
    );

    for record in best_grids {
        let _ = writeln!(
            contents,
            "{},{},{},{},{},{},{},{}",
            csv_field(&record.domain),
            csv_field(&record.dataset),
            csv_field(&record.category),
            record.resolution,
            metric_fields(record.component_count, &record.metrics),
            record.entropy_density,
            optional_field(record.expected_cr),
            optional_field(record.cr_residual),
        );
    }

    write_table(path, &contents)
}

/// Export grouped descriptive statistics
///
/// # Errors
///
/// Returns an error if the file cannot be written
pub fn export_group_stats(groups: &[GroupSummary], path: &Path) -> Result<()> {
    let mut contents = String::from("Dataset,Category,Metric,Mean,StdDev,Count\n");

    for group in groups {
        for summary in &group.metrics {
            let _ = writeln!(
                contents,
                "{},{},{},{},{},{}",
                csv_field(&group.dataset),
                csv_field(&group.category),
                summary.metric,
                optional_field(summary.mean),
                optional_field(summary.std_dev),
                summary.count,
            );
        }
    }

    write_table(path, &contents)
}

/// Export the metric correlation matrix
///
/// # Errors
///
/// Returns an error if the file cannot be written
pub fn export_correlation_matrix(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    let mut contents = String::from("Metric");
    for label in &matrix.labels {
        let _ = write!(contents, ",{label}");
    }
    contents.push('\n');

    for (i, label) in matrix.labels.iter().enumerate() {
        let _ = write!(contents, "{label}");
        for j in 0..matrix.labels.len() {
            let value = matrix.values.get((i, j)).copied().flatten();
            let _ = write!(contents, ",{}", optional_field(value));
        }
        contents.push('\n');
    }

    write_table(path, &contents)
}

/// Export per-domain compressibility-hypothesis rows
///
/// The fitted regression, when defined, is appended as trailing summary rows
/// so the analysis file is self-contained.
///
/// # Errors
///
/// Returns an error if the file cannot be written
pub fn export_hypothesis(
    best_grids: &[BestGridRecord],
    fit: Option<&LinearFit>,
    path: &Path,
) -> Result<()> {
    let mut contents = String::from(
        "Domain,Grid_Size,Entropy,Density,Entropy_x_Density,CR_File,Expected_CR,CR_Residual\n",
    );

    for record in best_grids {
        let _ = writeln!(
            contents,
            "{},{},{},{},{},{},{},{}",
            csv_field(&record.domain),
            record.resolution,
            record.metrics.entropy,
            record.metrics.density,
            record.entropy_density,
            optional_field(record.metrics.compression.map(|p| p.ratio)),
            optional_field(record.expected_cr),
            optional_field(record.cr_residual),
        );
    }

    if let Some(fit) = fit {
        let _ = writeln!(
            contents,
            "R_Squared,,,,,,,{}\nSlope,,,,,,,{}\nIntercept,,,,,,,{}",
            fit.r_squared, fit.slope, fit.intercept,
        );
    }

    write_table(path, &contents)
}
