//! Exposure normalization on the lightness channel.
//!
//! Plain mean/std matching pushes already-bright pixels past the ceiling when
//! the reference is much brighter than the target. The adaptive mode damps
//! the mean shift per pixel by its own brightness before matching contrast.

use crate::analysis::ChannelStats;
use crate::grading::clip_channel;
use crate::image::{CHANNEL_MAX, PerceptualImage};

/// Share of the shift removed at full brightness.
const HIGHLIGHT_DAMPING: f32 = 0.5;
/// Minimum share of the shift any pixel receives.
const MIN_SAFETY: f32 = 0.3;

/// Per-pixel damping applied to the mean shift.
///
/// ```text
/// safety = clamp(1 − n × 0.5, 0.3, 1.0)     n = L / 255
/// ```
///
/// Non-increasing in `n`: brighter pixels never receive more of the shift.
pub fn damping_factor(normalized: f32) -> f32 {
    (1.0 - normalized * HIGHLIGHT_DAMPING).clamp(MIN_SAFETY, 1.0)
}

/// Match a lightness channel to the reference's mean and spread.
///
/// Adaptive (`adaptive = true`):
/// ```text
/// shifted = L + (target.mean − mean(L)) × damping_factor(L / 255)
/// out     = (shifted − m') × target.std / s' + m'     m', s' = stats(shifted)
/// ```
/// The contrast step is skipped when `s' == 0`.
///
/// Classic (`adaptive = false`):
/// ```text
/// out = (L − mean(L)) × target.std / std(L) + target.mean
/// ```
/// When `std(L) == 0` the rescale is skipped, so a flat channel lands on
/// `target.mean`.
///
/// Both modes clip the result to `[0, 255]`.
pub fn normalize_luminance(lightness: &[f32], target: ChannelStats, adaptive: bool) -> Vec<f32> {
    let current = ChannelStats::compute(lightness);

    let adjusted: Vec<f32> = if adaptive {
        let delta = target.mean - current.mean;
        let shifted: Vec<f32> = lightness
            .iter()
            .map(|&v| v + delta * damping_factor(v / CHANNEL_MAX))
            .collect();

        let reshaped = ChannelStats::compute(&shifted);
        if reshaped.is_flat() {
            shifted
        } else {
            let ratio = target.std / reshaped.std;
            shifted
                .into_iter()
                .map(|v| (v - reshaped.mean) * ratio + reshaped.mean)
                .collect()
        }
    } else if current.is_flat() {
        lightness
            .iter()
            .map(|&v| v - current.mean + target.mean)
            .collect()
    } else {
        let ratio = target.std / current.std;
        lightness
            .iter()
            .map(|&v| (v - current.mean) * ratio + target.mean)
            .collect()
    };

    tracing::debug!(
        "exposure: L mean {:.2}, std {:.2} -> target {:.2}/{:.2}, adaptive={adaptive}",
        current.mean,
        current.std,
        target.mean,
        target.std
    );

    adjusted.into_iter().map(clip_channel).collect()
}

/// Normalize the lightness plane of `image` in place.
pub fn normalize_luminance_in_place(image: &mut PerceptualImage, target: ChannelStats, adaptive: bool) {
    image.lightness = normalize_luminance(&image.lightness, target, adaptive);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(n: usize, lo: f32, hi: f32) -> Vec<f32> {
        (0..n)
            .map(|i| lo + (hi - lo) * i as f32 / (n - 1) as f32)
            .collect()
    }

    #[test]
    fn test_damping_endpoints() {
        assert_eq!(damping_factor(0.0), 1.0);
        assert_eq!(damping_factor(1.0), 0.5);
        assert!((damping_factor(0.5) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_damping_is_monotone_and_bounded() {
        let mut prev = f32::INFINITY;
        for i in 0..=300 {
            // Deliberately overshoot the nominal [0, 1] domain.
            let n = i as f32 / 100.0 - 0.5;
            let d = damping_factor(n);
            assert!((MIN_SAFETY..=1.0).contains(&d), "damping {d} out of bounds at {n}");
            assert!(d <= prev, "damping increased at {n}");
            prev = d;
        }
        assert_eq!(damping_factor(2.0), MIN_SAFETY);
    }

    #[test]
    fn test_adaptive_matches_target_contrast() {
        let input = gradient(256, 40.0, 120.0);
        let target = ChannelStats::new(110.0, 15.0);
        let out = normalize_luminance(&input, target, true);
        let stats = ChannelStats::compute(&out);
        assert!((stats.std - 15.0).abs() < 0.05, "std should match target: {}", stats.std);
        // Damping means the mean lands short of the target but moves toward it.
        assert!(stats.mean > 80.0 && stats.mean < 110.0, "mean {}", stats.mean);
    }

    #[test]
    fn test_adaptive_clips_fewer_highlights_than_classic() {
        let input = gradient(151, 100.0, 250.0);
        let current = ChannelStats::compute(&input);
        let target = ChannelStats::new(current.mean + 25.0, current.std);
        let clipped = |out: &[f32]| out.iter().filter(|&&v| v >= 255.0).count();
        let adaptive = normalize_luminance(&input, target, true);
        let classic = normalize_luminance(&input, target, false);
        assert!(
            clipped(&adaptive) < clipped(&classic),
            "adaptive clipped {} vs classic {}",
            clipped(&adaptive),
            clipped(&classic)
        );
    }

    #[test]
    fn test_adaptive_flat_channel_skips_rescale() {
        let input = vec![128.0; 64];
        let target = ChannelStats::new(150.0, 40.0);
        let out = normalize_luminance(&input, target, true);
        let expected = 128.0 + 22.0 * damping_factor(128.0 / 255.0);
        for v in &out {
            assert!((v - expected).abs() < 1e-4, "{v} vs {expected}");
        }
        assert_eq!(ChannelStats::compute(&out).std, 0.0);
    }

    #[test]
    fn test_classic_flat_channel_lands_on_target_mean() {
        let out = normalize_luminance(&vec![60.0; 16], ChannelStats::new(150.0, 40.0), false);
        assert!(out.iter().all(|&v| v == 150.0), "{out:?}");
    }

    #[test]
    fn test_classic_matches_mean_and_std() {
        let input = gradient(101, 50.0, 150.0);
        let out = normalize_luminance(&input, ChannelStats::new(120.0, 20.0), false);
        let stats = ChannelStats::compute(&out);
        assert!((stats.mean - 120.0).abs() < 1e-3);
        assert!((stats.std - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_output_is_always_in_range() {
        let input = gradient(512, 0.0, 255.0);
        for adaptive in [true, false] {
            for target in [
                ChannelStats::new(250.0, 120.0),
                ChannelStats::new(5.0, 200.0),
                ChannelStats::new(128.0, 0.0),
            ] {
                let out = normalize_luminance(&input, target, adaptive);
                assert!(
                    out.iter().all(|v| (0.0..=255.0).contains(v)),
                    "out of range for {target:?} adaptive={adaptive}"
                );
            }
        }
    }

    #[test]
    fn test_in_place_only_touches_lightness() {
        let mut image = PerceptualImage::from_pixels(2, 1, &[[50.0, 100.0, 110.0], [90.0, 120.0, 130.0]]);
        normalize_luminance_in_place(&mut image, ChannelStats::new(150.0, 30.0), true);
        assert_eq!(image.chroma_a, vec![100.0, 120.0]);
        assert_eq!(image.chroma_b, vec![110.0, 130.0]);
        assert!(image.lightness[0] > 50.0);
    }
}
