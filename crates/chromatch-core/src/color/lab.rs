//! sRGB ⇄ CIE L*a*b* (D65) in the 8-bit channel convention.
//!
//! ```text
//! L8 = L* × 255/100        L* ∈ [0, 100]
//! a8 = a* + 128            a* ∈ [−128, 127]
//! b8 = b* + 128            b* ∈ [−128, 127]
//! ```
//!
//! The exposure and chroma formulas assume this scaling; do not feed them
//! raw L*a*b* values.
//!
//! Decoded rasters are quantized to whole steps on the way in, as an 8-bit
//! Lab buffer would be. Neutral pixels then carry exactly 128 on both chroma
//! axes, which keeps grayscale targets on the flat-channel path instead of
//! amplifying sub-step conversion noise.

use image::{Rgb, RgbImage};
use palette::{FromColor, Lab, LinSrgb, Srgb};

use crate::image::{CHANNEL_MAX, PerceptualImage};

const L_SCALE: f32 = 255.0 / 100.0;
const AB_OFFSET: f32 = 128.0;

/// Convert one 8-bit sRGB pixel to 8-bit-convention Lab.
pub fn srgb_to_lab8(rgb: [u8; 3]) -> [f32; 3] {
    let srgb: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
    let linear: LinSrgb = srgb.into_linear();
    let lab: Lab = Lab::from_color(linear);
    [lab.l * L_SCALE, lab.a + AB_OFFSET, lab.b + AB_OFFSET]
}

/// Convert one 8-bit-convention Lab value back to 8-bit sRGB.
///
/// Out-of-gamut colors are clamped into the sRGB cube before quantizing.
pub fn lab8_to_srgb(lab8: [f32; 3]) -> [u8; 3] {
    let lab: Lab = Lab::new(lab8[0] / L_SCALE, lab8[1] - AB_OFFSET, lab8[2] - AB_OFFSET);
    let srgb: Srgb<u8> = Srgb::<f32>::from_color(lab).into_format();
    [srgb.red, srgb.green, srgb.blue]
}

/// Convert a decoded raster into a planar working image, quantized to 8 bits.
pub fn rgb8_to_perceptual(raster: &RgbImage) -> PerceptualImage {
    let (width, height) = raster.dimensions();
    let pixels: Vec<[f32; 3]> = raster
        .pixels()
        .map(|p| srgb_to_lab8(p.0).map(|v| v.round().clamp(0.0, CHANNEL_MAX)))
        .collect();
    PerceptualImage::from_pixels(width, height, &pixels)
}

/// Convert a working image back to an encodable raster.
///
/// Lab values are rounded to whole 8-bit steps before conversion.
pub fn perceptual_to_rgb8(image: &PerceptualImage) -> RgbImage {
    let mut raster = RgbImage::new(image.width, image.height);
    for (i, px) in raster.pixels_mut().enumerate() {
        *px = Rgb(lab8_to_srgb(image.pixel(i).map(f32::round)));
    }
    raster
}
