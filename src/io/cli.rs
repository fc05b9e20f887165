//! Command-line interface for generating a collection from a configuration file

use crate::generation::engine::{EditionEngine, SilentObserver, prepare_build_dir};
use crate::io::configuration::{CollectionConfig, DEFAULT_SEED};
use crate::io::error::Result;
use crate::io::progress::ProgressManager;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "collagen")]
#[command(
    author,
    version,
    about = "Generate a collection of layered images with unique trait combinations"
)]
/// Command-line arguments for the edition generator
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Collection configuration (JSON)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Override the directory holding one folder per layer
    #[arg(short, long, value_name = "DIR")]
    pub layers_dir: Option<PathBuf>,

    /// Override the output directory
    #[arg(short, long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Suppress progress bars and informational logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every layer placement and DNA collision
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Keep existing files in the build directory
    #[arg(long)]
    pub no_clean: bool,
}

impl Cli {
    /// Check if the build directory should be wiped first
    pub const fn clean_build(&self) -> bool {
        !self.no_clean
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Most verbose log level to emit
    pub const fn log_level(&self, debug_logs: bool) -> Level {
        if self.quiet {
            Level::WARN
        } else if self.verbose || debug_logs {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Load the configuration and apply command-line overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or is invalid
    pub fn load_config(&self) -> Result<CollectionConfig> {
        let mut config = CollectionConfig::load(&self.config)?;
        if let Some(ref dir) = self.layers_dir {
            config.layers_dir.clone_from(dir);
        }
        if let Some(ref dir) = self.build_dir {
            config.build_dir.clone_from(dir);
        }
        Ok(config)
    }
}

/// Orchestrates one generation run with progress tracking
pub struct CollectionProcessor {
    cli: Cli,
    config: CollectionConfig,
    progress_manager: Option<ProgressManager>,
}

impl CollectionProcessor {
    /// Create a processor for an already loaded configuration
    pub fn new(cli: Cli, config: CollectionConfig) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            config,
            progress_manager,
        }
    }

    /// Configuration this processor runs
    pub const fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Generate every edition of the collection
    ///
    /// # Errors
    ///
    /// Returns an error if the build directory cannot be prepared or any
    /// edition fails to generate
    pub fn process(&mut self) -> Result<()> {
        let start_time = Instant::now();
        prepare_build_dir(&self.config.build_dir, self.cli.clean_build())?;

        let mut engine = EditionEngine::new(&self.config, self.cli.seed)?;

        let records = match self.progress_manager {
            Some(ref mut pm) => {
                pm.initialize(self.config.layer_configurations.len());
                let records = engine.run(pm);
                pm.finish();
                records?
            }
            None => engine.run(&mut SilentObserver)?,
        };

        info!(
            editions = records.len(),
            build_dir = %self.config.build_dir.display(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "collection generated"
        );
        Ok(())
    }
}
