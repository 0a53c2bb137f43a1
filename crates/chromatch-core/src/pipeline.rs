//! Per-target transform and batch runner.
//!
//! Every target is an independent function of (target image, reference
//! statistics, params). Workers only read the shared [`BatchContext`], so a
//! batch can fan out across threads without locks.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use crate::analysis::ReferenceStatistics;
use crate::color::{perceptual_to_rgb8, rgb8_to_perceptual};
use crate::error::TransferError;
use crate::grading::chroma::transfer_chroma_in_place;
use crate::grading::exposure::normalize_luminance_in_place;
use crate::image::PerceptualImage;
use crate::io::{load_rgb, save_rgb};
use crate::transform::params::TransferParams;

/// Apply exposure normalization, then chroma transfer.
///
/// Pure: no I/O, and the reference statistics are only read.
pub fn transfer_image(
    mut image: PerceptualImage,
    stats: &ReferenceStatistics,
    params: &TransferParams,
) -> PerceptualImage {
    normalize_luminance_in_place(&mut image, stats.lightness, params.adaptive_exposure);
    transfer_chroma_in_place(&mut image, stats, params.saturation_preservation);
    image
}

/// Read-only state shared by every target in a batch.
#[derive(Debug, Clone)]
pub struct BatchContext {
    /// Directory receiving the output files. Must already exist.
    pub output_dir: PathBuf,
    pub params: TransferParams,
    pub stats: Arc<ReferenceStatistics>,
}

impl BatchContext {
    pub fn new(output_dir: impl Into<PathBuf>, params: TransferParams, stats: ReferenceStatistics) -> Self {
        Self {
            output_dir: output_dir.into(),
            params,
            stats: Arc::new(stats),
        }
    }

    /// Where the output for `target` is written.
    pub fn output_path(&self, target: &Path) -> PathBuf {
        self.params.output_path(&self.output_dir, target)
    }
}

/// Decode, transform and encode one target. Returns the written path.
pub fn process_target(target: &Path, ctx: &BatchContext) -> Result<PathBuf, TransferError> {
    let raster = load_rgb(target)?;
    let image = transfer_image(rgb8_to_perceptual(&raster), &ctx.stats, &ctx.params);

    let output = ctx.output_path(target);
    save_rgb(
        &perceptual_to_rgb8(&image),
        &output,
        ctx.params.output_format.resolve(target),
        ctx.params.jpeg_quality,
    )?;
    Ok(output)
}

/// Written output path, or why the target failed.
pub type ProcessingResult = Result<PathBuf, TransferError>;

/// Result for one target in a batch.
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: PathBuf,
    pub result: ProcessingResult,
}

impl TargetOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Targets that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &TransferError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.target.as_path(), e)))
    }

    /// Output files that were written.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(PathBuf::as_path))
    }
}

/// Create the output directory if needed.
pub fn prepare_output_dir(path: &Path) -> Result<(), TransferError> {
    std::fs::create_dir_all(path).map_err(|source| TransferError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}

fn run_one(target: &Path, ctx: &BatchContext, claimed: bool) -> TargetOutcome {
    let result = if claimed {
        process_target(target, ctx)
    } else {
        Err(TransferError::DuplicateOutput {
            target: target.to_path_buf(),
            output: ctx.output_path(target),
        })
    };
    match &result {
        Ok(output) => tracing::info!("[OK] {} -> {}", display_name(target), display_name(output)),
        Err(e) => tracing::error!("[ERROR] {}: {e}", display_name(target)),
    }
    TargetOutcome {
        target: target.to_path_buf(),
        result,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// For each target, whether it is the first to map to its output path.
fn claim_outputs(ctx: &BatchContext, targets: &[PathBuf]) -> Vec<bool> {
    let mut seen = HashSet::new();
    targets
        .iter()
        .map(|t| seen.insert(ctx.output_path(t)))
        .collect()
}

/// Process every target, never stopping on a failed one.
///
/// A target whose output path was already claimed by an earlier target (same
/// stem from another directory, or a repeated path) fails with
/// [`TransferError::DuplicateOutput`] instead of overwriting it.
///
/// `jobs <= 1` runs sequentially. Larger values dispatch targets over a
/// dedicated rayon pool of that size; the report keeps input order either way.
pub fn run_batch(ctx: &BatchContext, targets: &[PathBuf], jobs: usize) -> BatchReport {
    let start = Instant::now();
    tracing::info!(
        "processing {} target(s) into {} ({} job(s))",
        targets.len(),
        ctx.output_dir.display(),
        jobs.max(1)
    );

    let claimed = claim_outputs(ctx, targets);
    let sequential = || -> Vec<TargetOutcome> {
        targets
            .iter()
            .zip(&claimed)
            .map(|(t, &c)| run_one(t, ctx, c))
            .collect()
    };

    let outcomes: Vec<TargetOutcome> = if jobs <= 1 {
        sequential()
    } else {
        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| {
                targets
                    .par_iter()
                    .zip(claimed.par_iter())
                    .map(|(t, &c)| run_one(t, ctx, c))
                    .collect()
            }),
            Err(e) => {
                tracing::warn!("cannot build a {jobs}-thread pool ({e}); running sequentially");
                sequential()
            }
        }
    };

    let report = BatchReport { outcomes };
    tracing::info!(
        "done in {:.2}s: {} succeeded, {} failed",
        start.elapsed().as_secs_f64(),
        report.succeeded(),
        report.failed()
    );
    report
}
