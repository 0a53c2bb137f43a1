//! Chromatch CLI — grade a batch of photos to match a reference.

mod args;
mod logging;

use std::process::ExitCode;

use chromatch_core::pipeline::{BatchContext, prepare_output_dir, run_batch};
use chromatch_core::{ReferenceStatistics, TransferError, TransferParams, analyze_reference};
use clap::Parser;

use crate::args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    logging::init_tracing(level);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Merge the JSON config (if any) with command-line overrides.
fn resolve_params(cli: &Cli) -> Result<TransferParams, TransferError> {
    let mut params = match &cli.config {
        Some(path) => TransferParams::load_json(path)?,
        None => TransferParams::default(),
    };
    if cli.strict_exposure {
        params.adaptive_exposure = false;
    }
    if let Some(p) = cli.preservation {
        params.saturation_preservation = p;
    }
    if let Some(format) = cli.format {
        params.output_format = format;
    }
    if let Some(q) = cli.quality {
        params.jpeg_quality = q;
    }
    params.validate()?;
    Ok(params)
}

fn run(cli: Cli) -> Result<ExitCode, TransferError> {
    let params = resolve_params(&cli)?;

    let (reference, targets) = cli.split_inputs().map_err(TransferError::InvalidConfig)?;

    let stats = match (&cli.stats, reference) {
        (Some(path), _) => {
            tracing::info!("loading reference statistics from {}", path.display());
            ReferenceStatistics::load_json(path)?
        }
        (None, Some(reference)) => analyze_reference(reference)?,
        (None, None) => {
            return Err(TransferError::InvalidConfig(
                "a reference image or --stats is required".to_string(),
            ));
        }
    };

    if let Some(path) = &cli.save_stats {
        stats.save_json(path)?;
        tracing::info!("reference statistics saved to {}", path.display());
    }

    prepare_output_dir(&cli.output)?;
    tracing::info!(
        "exposure: {}, preservation: {:.2}, format: {}",
        if params.adaptive_exposure { "adaptive" } else { "strict" },
        params.saturation_preservation,
        params.output_format
    );

    let ctx = BatchContext::new(cli.output.clone(), params, stats);
    let report = run_batch(&ctx, targets, cli.jobs);

    for (target, err) in report.failures() {
        tracing::warn!("failed: {}: {err}", target.display());
    }
    tracing::info!("results saved in {}", ctx.output_dir.display());

    if cli.fail_on_error && report.failed() > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
