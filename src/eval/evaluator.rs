//! Multi-resolution evaluation of layout records
//!
//! Drives assignment, consistency validation, information metrics, and
//! composite scoring across a configured set of grid resolutions, producing
//! one metric row per resolution in input order. Evaluation is stateless per
//! record: the same immutable record always yields the same rows.

use crate::eval::record::LayoutRecord;
use crate::grid::assign::{CellAssignment, CellGeometry, GridResolution, ScreenResolution};
use crate::grid::consistency;
use crate::io::configuration::{
    DEFAULT_GRID_SIZES, DEFAULT_JPEG_QUALITY, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH,
};
use crate::io::error::{Result, invalid_parameter};
use crate::metrics::compression::{self, CompressionProbe};
use crate::metrics::information;
use crate::metrics::score::ScoreWeights;

/// Evaluation configuration
///
/// Passed explicitly to the evaluator at construction; there is no shared
/// module-level configuration state.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    /// Fallback reference resolution for records that declare none
    pub screen: ScreenResolution,
    /// Grid resolutions to evaluate, in output order
    pub resolutions: Vec<GridResolution>,
    /// Composite score weights
    pub weights: ScoreWeights,
    /// JPEG quality for the compressibility probe (1–100)
    pub jpeg_quality: u8,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            screen: ScreenResolution::new(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT),
            resolutions: DEFAULT_GRID_SIZES
                .iter()
                .map(|&cells| GridResolution::square(cells))
                .collect(),
            weights: ScoreWeights::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl EvalConfig {
    /// Check the configuration for internal consistency
    ///
    /// # Errors
    ///
    /// Returns an error if no resolutions are configured, any resolution is
    /// degenerate against the fallback screen, the weights do not sum to 1.0,
    /// or the JPEG quality is outside 1–100
    pub fn validate(&self) -> Result<()> {
        if self.resolutions.is_empty() {
            return Err(invalid_parameter(
                "resolutions",
                &"[]",
                &"at least one grid resolution is required",
            ));
        }
        for &resolution in &self.resolutions {
            CellGeometry::new(resolution, self.screen)?;
        }
        self.weights.validate()?;
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(invalid_parameter(
                "jpeg_quality",
                &self.jpeg_quality,
                &"quality must be between 1 and 100",
            ));
        }
        Ok(())
    }
}

/// All metrics computed for one (record, resolution) pair
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSet {
    /// Fraction of components whose stored cell matches exactly
    pub grid_consistency: f64,
    /// Fraction of components within the one-cell tolerance window
    pub hit_rate: f64,
    /// Component count over screen area
    pub density: f64,
    /// Shannon entropy of the tag distribution in bits
    pub entropy: f64,
    /// Summed bounding-box area over screen area
    pub bbox_coverage: f64,
    /// Compressibility probe result, `None` when the screenshot was
    /// missing or undecodable
    pub compression: Option<CompressionProbe>,
    /// Weighted composite layout-quality score
    pub p_score: f64,
}

/// One evaluation table row: a metric set tagged with its origin
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    /// Domain the record was captured from
    pub domain: String,
    /// Site category label of the record
    pub category: String,
    /// Grid resolution the metrics were computed at
    pub resolution: GridResolution,
    /// Number of accepted components in the record
    pub component_count: usize,
    /// Computed metrics
    pub metrics: MetricSet,
}

/// Ordered metric rows tagged with a dataset label
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationTable {
    /// Dataset label applied to every row
    pub dataset: String,
    /// Rows in evaluation order
    pub rows: Vec<MetricRow>,
}

impl EvaluationTable {
    /// Create an empty table with a dataset label
    pub const fn new(dataset: String) -> Self {
        Self {
            dataset,
            rows: Vec::new(),
        }
    }
}

/// Drives per-record evaluation across all configured grid resolutions
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    /// Create an evaluator from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(config: EvalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Borrow the evaluation configuration
    pub const fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate one record across all configured resolutions
    ///
    /// The screenshot bytes, when present, are decoded and re-encoded once;
    /// the resulting probe is shared by every resolution row. A probe failure
    /// degrades to an unavailable compression metric rather than an error.
    ///
    /// Components annotated by the capture pipeline are validated against the
    /// cell recomputed at each resolution; unannotated components are assigned
    /// at the evaluated resolution itself and therefore always agree.
    ///
    /// # Errors
    ///
    /// Returns an error if the record's declared reference resolution is
    /// degenerate for one of the configured grids
    pub fn evaluate(
        &self,
        record: &LayoutRecord,
        screenshot: Option<&[u8]>,
    ) -> Result<Vec<MetricRow>> {
        let probe = screenshot
            .and_then(|bytes| compression::probe(bytes, self.config.jpeg_quality).ok());

        self.config
            .resolutions
            .iter()
            .map(|&resolution| self.evaluate_resolution(record, resolution, probe))
            .collect()
    }

    fn evaluate_resolution(
        &self,
        record: &LayoutRecord,
        resolution: GridResolution,
        probe: Option<CompressionProbe>,
    ) -> Result<MetricRow> {
        let geometry = CellGeometry::new(resolution, record.screen)?;

        let stored: Vec<CellAssignment> = record
            .components
            .iter()
            .map(|c| c.annotation.unwrap_or_else(|| geometry.assign(c)))
            .collect();
        let report = consistency::validate(&record.components, &stored, &geometry);

        let density = information::component_density(record.components.len(), record.screen);
        let entropy = information::tag_entropy(&record.components);
        let bbox_coverage = information::bbox_coverage(&record.components, record.screen);

        let p_score = self.config.weights.score(
            report.fuzzy_fraction,
            density,
            entropy,
            bbox_coverage,
            probe.map(|p| p.ratio),
        );

        Ok(MetricRow {
            domain: record.domain.clone(),
            category: record.category.clone(),
            resolution,
            component_count: record.components.len(),
            metrics: MetricSet {
                grid_consistency: report.exact_fraction,
                hit_rate: report.fuzzy_fraction,
                density,
                entropy,
                bbox_coverage,
                compression: probe,
                p_score,
            },
        })
    }
}
