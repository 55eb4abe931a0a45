//! Listing Churn Pipeline - Main Entry Point

use anyhow::Context;
use clap::Parser;
use feature_engine::NeighborStrategy;
use pipeline::{init_logging, run, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

/// Compute geo features and churn targets for a listing CSV.
#[derive(Parser, Debug)]
#[command(name = "churn-pipeline")]
#[command(about = "Compute geo features and churn targets for a listing CSV")]
struct Cli {
    /// Config file (TOML, YAML or JSON); `CHURN_*` env vars override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Raw listing CSV.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Augmented CSV to write.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write a JSON run summary here.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Neighbour radius in km.
    #[arg(long)]
    radius: Option<f64>,

    /// Neighbour search strategy (`pairwise` or `indexed`).
    #[arg(long)]
    strategy: Option<NeighborStrategy>,

    /// Skip churn labelling.
    #[arg(long)]
    no_labels: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(summary) = self.summary {
            config.summary = Some(summary);
        }
        if let Some(radius) = self.radius {
            config.geo.neighbor_radius_km = radius;
        }
        if let Some(strategy) = self.strategy {
            config.geo.strategy = strategy;
        }
        if self.no_labels {
            config.label_churn = false;
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs, cli.verbose);

    info!("=== Listing Churn Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::load(cli.config.as_deref()).context("loading pipeline config")?;
    let config = cli.apply(config);

    let summary = run(&config)
        .with_context(|| format!("processing {}", config.input.display()))?;
    info!(
        "Wrote {} rows for {} entities to {}",
        summary.rows_out,
        summary.dedup.entities,
        summary.output.display()
    );

    Ok(())
}
