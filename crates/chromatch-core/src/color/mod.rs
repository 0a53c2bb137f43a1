//! Color conversion between 8-bit sRGB rasters and the working Lab space.

pub mod lab;

pub use lab::{lab8_to_srgb, perceptual_to_rgb8, rgb8_to_perceptual, srgb_to_lab8};
