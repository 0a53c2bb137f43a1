//! Saturation-preserving Reinhard transfer on the chroma channels.
//!
//! Each chroma channel is recentred on the reference mean. Its spread is
//! scaled by a blend of the strict Reinhard ratio and identity, so the
//! target keeps most of its own saturation.

use crate::analysis::{ChannelStats, ReferenceStatistics};
use crate::grading::clip_channel;
use crate::image::PerceptualImage;

/// Smoothing term in the strict ratio denominator.
pub const STD_EPSILON: f32 = 1e-5;

/// Default share of the original spread that is kept.
pub const DEFAULT_PRESERVATION: f32 = 0.8;

/// Scale applied to a chroma channel's deviations.
///
/// ```text
/// strict = ref_std / (current_std + 1e-5)
/// scale  = strict × (1 − p) + 1.0 × p
/// ```
///
/// `p = 0` is classic Reinhard, `p = 1` keeps the spread untouched.
pub fn saturation_scale(current_std: f32, ref_std: f32, preservation: f32) -> f32 {
    let strict = ref_std / (current_std + STD_EPSILON);
    strict * (1.0 - preservation) + preservation
}

/// Transfer one chroma channel toward the reference statistics.
///
/// A flat input channel is returned unchanged rather than moved to the
/// reference mean, so grayscale targets stay neutral. Output is clipped to
/// `[0, 255]`.
pub fn transfer_channel(values: &[f32], reference: ChannelStats, preservation: f32) -> Vec<f32> {
    let current = ChannelStats::compute(values);
    if current.is_flat() {
        return values.iter().copied().map(clip_channel).collect();
    }

    let scale = saturation_scale(current.std, reference.std, preservation);
    tracing::debug!(
        "chroma: mean {:.2} -> {:.2}, std {:.2} x {scale:.3}",
        current.mean,
        reference.mean,
        current.std
    );

    values
        .iter()
        .map(|&v| clip_channel((v - current.mean) * scale + reference.mean))
        .collect()
}

/// Transfer both chroma channels. Run after exposure normalization.
pub fn transfer_chroma(
    chroma_a: &[f32],
    chroma_b: &[f32],
    reference: &ReferenceStatistics,
    preservation: f32,
) -> (Vec<f32>, Vec<f32>) {
    (
        transfer_channel(chroma_a, reference.chroma_a, preservation),
        transfer_channel(chroma_b, reference.chroma_b, preservation),
    )
}

/// Transfer the chroma planes of `image` in place.
pub fn transfer_chroma_in_place(
    image: &mut PerceptualImage,
    reference: &ReferenceStatistics,
    preservation: f32,
) {
    let (a, b) = transfer_chroma(&image.chroma_a, &image.chroma_b, reference, preservation);
    image.chroma_a = a;
    image.chroma_b = b;
}
