//! Command-line interface for batch evaluation of layout record files

use crate::eval::aggregate::{self, AggregateSummary};
use crate::eval::evaluator::{EvalConfig, EvaluationTable, Evaluator};
use crate::eval::record::LayoutRecord;
use crate::grid::assign::{GridResolution, ScreenResolution};
use crate::io::configuration::{
    BEST_GRID_CSV, CORRELATION_CSV, DEFAULT_DATASET_LABEL, DEFAULT_GRID_SIZES,
    DEFAULT_JPEG_QUALITY, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, EVALUATION_CSV,
    HYPOTHESIS_CSV, STATS_CSV,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::io::table;
use crate::metrics::score::ScoreWeights;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gridscore")]
#[command(
    author,
    version,
    about = "Score grid-layout quality of captured interfaces across grid resolutions"
)]
/// Command-line arguments for the evaluation tool
pub struct Cli {
    /// Input record JSON file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Directory containing captured screenshots (defaults to the target directory)
    #[arg(short, long)]
    pub screenshots: Option<PathBuf>,

    /// Directory for CSV outputs (defaults to the target directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Square grid resolutions to evaluate
    #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_GRID_SIZES)]
    pub grids: Vec<u32>,

    /// Reference screen width for records that declare no resolution
    #[arg(short = 'W', long, default_value_t = DEFAULT_SCREEN_WIDTH)]
    pub width: u32,

    /// Reference screen height for records that declare no resolution
    #[arg(short = 'H', long, default_value_t = DEFAULT_SCREEN_HEIGHT)]
    pub height: u32,

    /// JPEG quality for the compressibility probe
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    pub quality: u8,

    /// Dataset label attached to every evaluated row
    #[arg(short, long, default_value = DEFAULT_DATASET_LABEL)]
    pub dataset: String,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Orchestrates batch evaluation of record files with progress tracking
pub struct BatchProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl BatchProcessor {
    /// Create a new batch processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Evaluate every record file, aggregate, and export the summary tables
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid, the configuration fails
    /// validation, any expected domain ends up without evaluation rows, or a
    /// table cannot be written
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        let evaluator = Evaluator::new(self.build_config())?;
        let screenshot_dir = self.screenshot_dir();
        let output_dir = self.output_dir();

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let mut eval_table = EvaluationTable::new(self.cli.dataset.clone());
        let mut expected_domains: Vec<String> = Vec::new();

        for file in &files {
            self.process_file(
                file,
                &evaluator,
                &screenshot_dir,
                &mut eval_table,
                &mut expected_domains,
            )?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        table::export_evaluation_table(&eval_table, &output_dir.join(EVALUATION_CSV))?;

        let summary = aggregate::aggregate(std::slice::from_ref(&eval_table), &expected_domains)?;
        self.export_summary(&summary, &output_dir)?;
        self.report_summary(&summary);

        Ok(())
    }

    // Allow print for user feedback on degraded records
    #[allow(clippy::print_stderr)]
    fn process_file(
        &self,
        file: &Path,
        evaluator: &Evaluator,
        screenshot_dir: &Path,
        eval_table: &mut EvaluationTable,
        expected_domains: &mut Vec<String>,
    ) -> Result<()> {
        let fallback_screen = evaluator.config().screen;

        let record = match LayoutRecord::from_json_path(file, fallback_screen) {
            Ok(record) => record,
            Err(error) => {
                // The stem still marks this input as expected so that
                // aggregation aborts instead of reducing a partial set
                if !self.cli.quiet {
                    eprintln!("Skipping record: {error}");
                }
                expected_domains.push(file.file_stem().unwrap_or_default().to_string_lossy().into_owned());
                if let Some(ref pm) = self.progress_manager {
                    pm.complete_record();
                }
                return Ok(());
            }
        };

        if let Some(ref pm) = self.progress_manager {
            pm.start_record(&record.domain);
        }
        if record.rejected_components > 0 && !self.cli.quiet {
            eprintln!(
                "{}: rejected {} malformed component(s)",
                record.domain, record.rejected_components
            );
        }

        let screenshot_path = screenshot_dir.join(&record.screenshot);
        let screenshot = std::fs::read(&screenshot_path).ok();
        if screenshot.is_none() && !self.cli.quiet {
            eprintln!(
                "{}: screenshot '{}' unavailable, compression ratio degraded",
                record.domain,
                screenshot_path.display()
            );
        }

        expected_domains.push(record.domain.clone());

        match evaluator.evaluate(&record, screenshot.as_deref()) {
            Ok(rows) => eval_table.rows.extend(rows),
            Err(error) => {
                // Leaving the domain expected without rows makes the
                // aggregation precondition surface this failure
                if !self.cli.quiet {
                    eprintln!("{}: evaluation failed: {error}", record.domain);
                }
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.complete_record();
        }

        Ok(())
    }

    fn build_config(&self) -> EvalConfig {
        EvalConfig {
            screen: ScreenResolution::new(self.cli.width, self.cli.height),
            resolutions: self
                .cli
                .grids
                .iter()
                .map(|&cells| GridResolution::square(cells))
                .collect(),
            weights: ScoreWeights::default(),
            jpeg_quality: self.cli.quality,
        }
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if self.cli.target.extension().and_then(|s| s.to_str()) == Some("json") {
                Ok(vec![self.cli.target.clone()])
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"target file must be a JSON record",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if path.extension().and_then(|s| s.to_str()) == Some("json") {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"target must be a JSON record file or directory",
            ))
        }
    }

    /// Directory holding record files, used for defaulting other directories
    fn record_dir(&self) -> PathBuf {
        if self.cli.target.is_dir() {
            self.cli.target.clone()
        } else {
            self.cli
                .target
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        }
    }

    fn screenshot_dir(&self) -> PathBuf {
        self.cli
            .screenshots
            .clone()
            .unwrap_or_else(|| self.record_dir())
    }

    fn output_dir(&self) -> PathBuf {
        self.cli.output.clone().unwrap_or_else(|| self.record_dir())
    }

    fn export_summary(&self, summary: &AggregateSummary, output_dir: &Path) -> Result<()> {
        table::export_best_grids(&summary.best_grids, &output_dir.join(BEST_GRID_CSV))?;
        table::export_group_stats(&summary.group_stats, &output_dir.join(STATS_CSV))?;
        table::export_correlation_matrix(&summary.correlation, &output_dir.join(CORRELATION_CSV))?;
        table::export_hypothesis(
            &summary.best_grids,
            summary.hypothesis.as_ref(),
            &output_dir.join(HYPOTHESIS_CSV),
        )
    }

    // Allow print for the run summary shown to the user
    #[allow(clippy::print_stderr)]
    fn report_summary(&self, summary: &AggregateSummary) {
        if self.cli.quiet {
            return;
        }

        eprintln!("Best grids selected for {} domain(s)", summary.best_grids.len());
        for record in &summary.best_grids {
            eprintln!(
                "  {} -> {} (P_Score {:.4})",
                record.domain, record.resolution, record.metrics.p_score
            );
        }
        match summary.hypothesis {
            Some(fit) => eprintln!(
                "Hypothesis cr ~ entropy*density: R^2 = {:.4} (slope {:.4}, intercept {:.4})",
                fit.r_squared, fit.slope, fit.intercept
            ),
            None => eprintln!("Hypothesis regression unavailable (insufficient samples)"),
        }
    }
}
