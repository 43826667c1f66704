//! Engine constants and runtime configuration defaults

// Evaluation defaults
/// Default square grid resolutions evaluated per record
pub const DEFAULT_GRID_SIZES: [u32; 3] = [4, 8, 16];

/// Default reference screen width in pixels
pub const DEFAULT_SCREEN_WIDTH: u32 = 1920;

/// Default reference screen height in pixels
pub const DEFAULT_SCREEN_HEIGHT: u32 = 1080;

/// JPEG quality for the compressibility probe
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

// Composite score weights; must sum to 1.0
/// Weight on the fuzzy hit rate
pub const WEIGHT_HIT_RATE: f64 = 0.30;

/// Weight on layout sparsity
pub const WEIGHT_SPARSITY: f64 = 0.20;

/// Weight on tag entropy
pub const WEIGHT_ENTROPY: f64 = 0.20;

/// Weight on bounding-box coverage
pub const WEIGHT_COVERAGE: f64 = 0.15;

/// Weight on the file compression ratio
pub const WEIGHT_COMPRESSION: f64 = 0.15;

// Dataset labelling
/// Dataset label applied when none is given
pub const DEFAULT_DATASET_LABEL: &str = "training";

// Output file names
/// Per-(domain, resolution) evaluation rows
pub const EVALUATION_CSV: &str = "evaluation_results.csv";

/// Best-scoring resolution per domain
pub const BEST_GRID_CSV: &str = "best_grid_per_domain.csv";

/// Grouped descriptive statistics
pub const STATS_CSV: &str = "final_evaluation_stats.csv";

/// Metric correlation matrix
pub const CORRELATION_CSV: &str = "metric_correlation_matrix.csv";

/// Compressibility hypothesis analysis rows
pub const HYPOTHESIS_CSV: &str = "cr_hypothesis_analysis.csv";

// CSV rendering
/// Marker written for unavailable metric values
pub const UNAVAILABLE_FIELD: &str = "N/A";
