use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use trophinet_core::artifacts::ArtifactStore;

mod config;
mod plotting;
mod workflow;

use config::PipelineConfig;

/// Grows a microbial community in silico and mines its trophic network.
#[derive(Debug, Parser)]
#[command(name = "trophinet", version, about)]
struct Cli {
    /// Run configuration (YAML).
    #[arg(short, long, default_value = "run.yaml")]
    config: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    stage: Stage,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Stage {
    /// Iterate growth and secretion over the configured rounds.
    Iterate,
    /// Build the trophic edge list from recorded secretion tables.
    Network,
    /// Enumerate shortest exudate paths and snapshot them.
    Enumerate,
    /// Classify snapshotted courses by differential abundance.
    Classify,
    /// Render charts from the recorded artifacts.
    Plot,
    /// Every stage in order.
    Run,
}

impl Stage {
    fn name(self) -> &'static str {
        match self {
            Stage::Iterate => "iterate",
            Stage::Network => "network",
            Stage::Enumerate => "enumerate",
            Stage::Classify => "classify",
            Stage::Plot => "plot",
            Stage::Run => "run",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    info!("--- Trophinet ---");
    let config = PipelineConfig::load(&cli.config)?;
    let store = ArtifactStore::new(&config.output_dir).with_context(|| {
        format!("Failed to open output directory {:?}", config.output_dir)
    })?;
    workflow::record_run(&cli.config, &store, cli.stage.name())?;

    match cli.stage {
        Stage::Iterate => {
            workflow::run_iteration(&config, &store)?;
        }
        Stage::Network => {
            workflow::run_network(&config, &store)?;
        }
        Stage::Enumerate => {
            workflow::run_enumeration(&config, &store)?;
        }
        Stage::Classify => {
            workflow::run_classification(&config, &store)?;
        }
        Stage::Plot => plotting::generate_all_plots(&store)?,
        Stage::Run => {
            workflow::run_iteration(&config, &store)?;
            workflow::run_network(&config, &store)?;
            workflow::run_enumeration(&config, &store)?;
            workflow::run_classification(&config, &store)?;
            plotting::generate_all_plots(&store)?;
        }
    }

    info!("--- Trophinet finished: artifacts in '{}' ---", store.root().display());
    Ok(())
}
