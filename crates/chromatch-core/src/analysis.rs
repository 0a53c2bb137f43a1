//! Reference analysis: per-channel distribution statistics.
//!
//! A reference is reduced to the mean and population standard deviation of
//! each Lab channel. The result is immutable and shared read-only by every
//! target transform in a batch.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::rgb8_to_perceptual;
use crate::error::TransferError;
use crate::image::{Channel, PerceptualImage};
use crate::io::load_rgb;

/// Mean and population standard deviation of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f32,
    pub std: f32,
}

impl ChannelStats {
    pub const fn new(mean: f32, std: f32) -> Self {
        Self { mean, std }
    }

    /// Exact statistics over every value.
    ///
    /// Sums are accumulated in f64 in slice order, so repeated calls on the
    /// same data are bit-identical. A channel whose values are all equal
    /// reports `std == 0.0` exactly; the flat-channel guards downstream rely
    /// on that. An empty slice yields zeros.
    pub fn compute(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mut sum = 0.0_f64;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in values {
            sum += v as f64;
            min = min.min(v);
            max = max.max(v);
        }

        if min == max {
            return Self::new(min, 0.0);
        }

        let mean = sum / n;
        let mut sum_sq = 0.0_f64;
        for &v in values {
            let d = v as f64 - mean;
            sum_sq += d * d;
        }

        Self::new(mean as f32, (sum_sq / n).sqrt() as f32)
    }

    /// True when the channel carries no spread at all.
    pub fn is_flat(&self) -> bool {
        self.std == 0.0
    }
}

/// Statistics of a reference image in the 8-bit Lab convention.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceStatistics {
    pub lightness: ChannelStats,
    pub chroma_a: ChannelStats,
    pub chroma_b: ChannelStats,
}

impl ReferenceStatistics {
    /// Compute statistics over all pixels of a working image.
    pub fn from_image(image: &PerceptualImage) -> Self {
        Self {
            lightness: ChannelStats::compute(image.channel(Channel::Lightness)),
            chroma_a: ChannelStats::compute(image.channel(Channel::ChromaA)),
            chroma_b: ChannelStats::compute(image.channel(Channel::ChromaB)),
        }
    }

    pub fn channel(&self, channel: Channel) -> ChannelStats {
        match channel {
            Channel::Lightness => self.lightness,
            Channel::ChromaA => self.chroma_a,
            Channel::ChromaB => self.chroma_b,
        }
    }

    pub fn lightness_mean(&self) -> f32 {
        self.lightness.mean
    }

    pub fn lightness_std(&self) -> f32 {
        self.lightness.std
    }

    pub fn chroma_a_mean(&self) -> f32 {
        self.chroma_a.mean
    }

    pub fn chroma_a_std(&self) -> f32 {
        self.chroma_a.std
    }

    pub fn chroma_b_mean(&self) -> f32 {
        self.chroma_b.mean
    }

    pub fn chroma_b_std(&self) -> f32 {
        self.chroma_b.std
    }

    /// All six values are finite and both deviations non-negative.
    pub fn is_valid(&self) -> bool {
        Channel::ALL.iter().all(|&c| {
            let s = self.channel(c);
            s.mean.is_finite() && s.std.is_finite() && s.std >= 0.0
        })
    }

    /// Load previously saved statistics from JSON.
    pub fn load_json(path: &Path) -> Result<Self, TransferError> {
        let text = std::fs::read_to_string(path).map_err(|source| TransferError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stats: Self = serde_json::from_str(&text).map_err(|source| TransferError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if !stats.is_valid() {
            return Err(TransferError::InvalidConfig(format!(
                "statistics in {} must be finite with non-negative deviations",
                path.display()
            )));
        }
        Ok(stats)
    }

    /// Save statistics as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<(), TransferError> {
        let text = serde_json::to_string_pretty(self).map_err(|source| TransferError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text).map_err(|source| TransferError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Decode a reference image and compute its Lab statistics.
pub fn analyze_reference(path: &Path) -> Result<ReferenceStatistics, TransferError> {
    let raster = load_rgb(path)?;
    let stats = ReferenceStatistics::from_image(&rgb8_to_perceptual(&raster));

    tracing::info!("reference: {}", path.display());
    for channel in Channel::ALL {
        let s = stats.channel(channel);
        tracing::info!("  reference {channel}: mean={:.2}, std={:.2}", s.mean, s.std);
    }

    Ok(stats)
}
