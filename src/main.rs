//! CLI entry point for multi-resolution grid-layout quality scoring

use clap::Parser;
use gridscore::io::cli::{BatchProcessor, Cli};

fn main() -> gridscore::Result<()> {
    let cli = Cli::parse();
    let mut processor = BatchProcessor::new(cli);
    processor.process()
}
