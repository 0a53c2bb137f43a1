//! Chromatch Core — domain layer for reference-driven color transfer.
//!
//! Statistics are extracted once from a reference photograph and applied to
//! any number of targets: adaptive exposure normalization on the lightness
//! channel, then saturation-preserving Reinhard transfer on the two chroma
//! channels. All math runs in 8-bit-convention Lab (every channel in 0–255).

pub mod analysis;
pub mod color;
pub mod error;
pub mod grading;
pub mod image;
pub mod io;
pub mod pipeline;
pub mod transform;

// Re-exports for convenience.
pub use analysis::{ChannelStats, ReferenceStatistics, analyze_reference};
pub use error::TransferError;
pub use image::{Channel, PerceptualImage};
pub use pipeline::{BatchContext, BatchReport, TargetOutcome, run_batch};
pub use transform::params::{OutputFormat, TransferParams};
