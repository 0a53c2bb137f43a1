//! Raster decode/encode via the `image` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageError, ImageFormat, RgbImage};

use crate::error::TransferError;

/// Decode an image from disk as 8-bit sRGB.
///
/// Supports every format enabled in the `image` crate (JPEG, PNG, TIFF,
/// WebP, ...). Alpha is discarded; 16-bit and float sources are rescaled
/// to 8 bits.
pub fn load_rgb(path: &Path) -> Result<RgbImage, TransferError> {
    let img = image::open(path).map_err(|source| TransferError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Encode an 8-bit sRGB image to `path` in the given format.
///
/// `jpeg_quality` is only consulted for JPEG output.
pub fn save_rgb(
    raster: &RgbImage,
    path: &Path,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<(), TransferError> {
    let write_err = |source: ImageError| TransferError::ImageWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| write_err(ImageError::IoError(e)))?;
    let mut writer = BufWriter::new(file);
    match format {
        ImageFormat::Jpeg => JpegEncoder::new_with_quality(&mut writer, jpeg_quality)
            .encode_image(raster)
            .map_err(write_err)?,
        other => raster.write_to(&mut writer, other).map_err(write_err)?,
    }
    // Small outputs sit entirely in the buffer; errors surface only here.
    writer
        .flush()
        .map_err(|e| write_err(ImageError::IoError(e)))
}
