//! Command-line arguments.

use std::path::{Path, PathBuf};

use chromatch_core::OutputFormat;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "chromatch")]
#[command(
    version,
    about = "Apply the tone and color of a reference photo to target photos (Lab statistical transfer)",
    long_about = None
)]
pub struct Cli {
    /// Reference image followed by the target images to grade.
    /// With --stats, every path is a target.
    #[arg(value_name = "PATHS", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    pub output: PathBuf,

    /// JSON file with transfer parameters; flags below override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use classic mean/std exposure matching (accepts highlight clipping)
    #[arg(long)]
    pub strict_exposure: bool,

    /// Share of each target's own color spread to keep (0.0-1.0)
    #[arg(long, value_name = "FLOAT")]
    pub preservation: Option<f32>,

    /// Output format: jpeg, png, or match (keep the target's format)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// JPEG quality (1-100)
    #[arg(long, value_name = "N")]
    pub quality: Option<u8>,

    /// Load reference statistics from JSON instead of analyzing REFERENCE
    #[arg(long, value_name = "FILE")]
    pub stats: Option<PathBuf>,

    /// Write the reference statistics to JSON
    #[arg(long, value_name = "FILE")]
    pub save_stats: Option<PathBuf>,

    /// Number of targets processed in parallel
    #[arg(short = 'j', long, value_name = "N", default_value_t = 1)]
    pub jobs: usize,

    /// Exit non-zero if any target fails
    #[arg(long)]
    pub fail_on_error: bool,

    /// Debug-level logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Split the positional paths into the reference (absent with `--stats`)
    /// and the targets.
    pub fn split_inputs(&self) -> Result<(Option<&Path>, &[PathBuf]), String> {
        if self.stats.is_some() {
            return Ok((None, &self.inputs));
        }
        match self.inputs.split_first() {
            Some((reference, targets)) if !targets.is_empty() => {
                Ok((Some(reference.as_path()), targets))
            }
            _ => Err("expected a reference image followed by at least one target".to_string()),
        }
    }
}
