//! Batch progress display for record evaluation

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Records: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates progress display for batch record evaluation
pub struct ProgressManager {
    bar: ProgressBar,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager with a hidden bar
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Initialize the batch bar for the given record count
    pub fn initialize(&mut self, record_count: usize) {
        self.bar = ProgressBar::new(record_count as u64);
        self.bar.set_style(BATCH_STYLE.clone());
    }

    /// Show the domain currently being evaluated
    pub fn start_record(&self, domain: &str) {
        self.bar.set_message(domain.to_string());
    }

    /// Advance the batch bar past a completed record
    pub fn complete_record(&self) {
        self.bar.inc(1);
    }

    /// Clean up the progress display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
