//! Grading operations — exposure normalization and chroma transfer.

pub mod chroma;
pub mod exposure;

use crate::image::CHANNEL_MAX;

/// Clamp a channel value into the valid `[0, 255]` range.
#[inline]
pub(crate) fn clip_channel(v: f32) -> f32 {
    v.clamp(0.0, CHANNEL_MAX)
}
