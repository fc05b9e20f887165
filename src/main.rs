//! CLI entry point for the layered edition generator

use clap::Parser;
use collagen::io::cli::{Cli, CollectionProcessor};

fn main() -> collagen::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level(config.debug_logs))
        .with_target(false)
        .init();

    let mut processor = CollectionProcessor::new(cli, config);
    processor.process()
}
