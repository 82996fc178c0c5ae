//! imfilters — apply one color or tone filter (or a JSON recipe) to an image
//! and save or view the result.

mod cli;
mod config;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use imfilters_core::{EngineOptions, load_raster, save_raster, show_raster};
use tracing::info;

use crate::cli::Args;
use crate::config::CliConfig;

fn main() -> Result<()> {
    logger::init();
    run(Args::parse(), &CliConfig::from_env())
}

fn run(args: Args, config: &CliConfig) -> Result<()> {
    let options = EngineOptions {
        overflow: args.overflow.unwrap_or(config.overflow),
    };

    let raster = load_raster(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let filter = args.command.into_filter()?;
    let result = filter
        .apply_with(&raster, &options)
        .with_context(|| format!("applying {}", filter.name()))?;

    if let Some(output) = &args.output {
        save_raster(&result, output).with_context(|| format!("writing {}", output.display()))?;
        info!(path = %output.display(), filter = filter.name(), "saved result");
    }

    if args.show || args.output.is_none() {
        let viewer = args.viewer.as_deref().or(config.viewer.as_deref());
        let shown = show_raster(&result, viewer).context("opening viewer")?;
        info!(path = %shown.display(), "handed result to viewer");
    }

    Ok(())
}
