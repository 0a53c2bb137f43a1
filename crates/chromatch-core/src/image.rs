//! Image representation for the transfer pipeline.

use std::fmt;

/// Upper bound of every channel in the 8-bit Lab convention.
pub const CHANNEL_MAX: f32 = 255.0;

/// One plane of a [`PerceptualImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Lightness, L* rescaled to 0–255.
    Lightness,
    /// Green–red opponent axis, a* offset by 128.
    ChromaA,
    /// Blue–yellow opponent axis, b* offset by 128.
    ChromaB,
}

impl Channel {
    /// All channels in storage order.
    pub const ALL: [Channel; 3] = [Channel::Lightness, Channel::ChromaA, Channel::ChromaB];

    /// Storage index (0 = lightness, 1–2 = chroma).
    pub const fn index(&self) -> usize {
        match self {
            Self::Lightness => 0,
            Self::ChromaA => 1,
            Self::ChromaB => 2,
        }
    }

    /// Short label for log output.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Lightness => "L",
            Self::ChromaA => "A",
            Self::ChromaB => "B",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Working buffer for one target: three planar f32 channels, row-major,
/// each value nominally in `[0, 255]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerceptualImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Lightness plane.
    pub lightness: Vec<f32>,
    /// First chroma plane (green–red).
    pub chroma_a: Vec<f32>,
    /// Second chroma plane (blue–yellow).
    pub chroma_b: Vec<f32>,
}

impl PerceptualImage {
    /// Build an image from interleaved `[L, a, b]` pixels.
    ///
    /// # Panics
    /// Panics if `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: &[[f32; 3]]) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "pixel count does not match {width}x{height}"
        );
        let mut lightness = Vec::with_capacity(pixels.len());
        let mut chroma_a = Vec::with_capacity(pixels.len());
        let mut chroma_b = Vec::with_capacity(pixels.len());
        for px in pixels {
            lightness.push(px[0]);
            chroma_a.push(px[1]);
            chroma_b.push(px[2]);
        }
        Self {
            width,
            height,
            lightness,
            chroma_a,
            chroma_b,
        }
    }

    /// Image filled with a single Lab value.
    pub fn uniform(width: u32, height: u32, value: [f32; 3]) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            lightness: vec![value[0]; n],
            chroma_a: vec![value[1]; n],
            chroma_b: vec![value[2]; n],
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.lightness.len()
    }

    pub fn channel(&self, channel: Channel) -> &[f32] {
        match channel {
            Channel::Lightness => &self.lightness,
            Channel::ChromaA => &self.chroma_a,
            Channel::ChromaB => &self.chroma_b,
        }
    }

    /// Interleaved `[L, a, b]` value at pixel index `i`.
    pub fn pixel(&self, i: usize) -> [f32; 3] {
        [self.lightness[i], self.chroma_a[i], self.chroma_b[i]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixels_splits_planes() {
        let img = PerceptualImage::from_pixels(2, 1, &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(img.channel(Channel::Lightness), &[1.0, 4.0]);
        assert_eq!(img.channel(Channel::ChromaA), &[2.0, 5.0]);
        assert_eq!(img.channel(Channel::ChromaB), &[3.0, 6.0]);
        assert_eq!(img.pixel(1), [4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_channel_indices_follow_storage_order() {
        let idx: Vec<usize> = Channel::ALL.iter().map(Channel::index).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    #[should_panic]
    fn test_from_pixels_rejects_wrong_count() {
        let _ = PerceptualImage::from_pixels(2, 2, &[[0.0; 3]]);
    }
}
