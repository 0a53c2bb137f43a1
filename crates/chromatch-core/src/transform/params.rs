//! Central configuration for a transfer run.
//!
//! `TransferParams` is passed explicitly to every target transform; nothing
//! in the pipeline reads ambient state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::error::TransferError;
use crate::grading::chroma::DEFAULT_PRESERVATION;

/// Encoding used for output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Always re-encode as JPEG, whatever the input was.
    #[default]
    Jpeg,
    /// Always encode as PNG (lossless).
    Png,
    /// Keep the target's format when it can be written, else fall back to JPEG.
    MatchInput,
}

impl OutputFormat {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::MatchInput => "match-input",
        }
    }

    /// Concrete encoder format for a given target path.
    pub fn resolve(&self, target: &Path) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::MatchInput => ImageFormat::from_path(target)
                .ok()
                .filter(|f| f.writing_enabled())
                .unwrap_or(ImageFormat::Jpeg),
        }
    }

    /// `<dir>/<prefix><stem>.<ext>` for a target, e.g. `output/processed_beach.jpg`.
    pub fn output_path(&self, dir: &Path, target: &Path, prefix: &str) -> PathBuf {
        let stem = target
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let ext = self
            .resolve(target)
            .extensions_str()
            .first()
            .copied()
            .unwrap_or("jpg");
        dir.join(format!("{prefix}{stem}.{ext}"))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "match" | "match-input" | "same" => Ok(Self::MatchInput),
            other => Err(format!("unknown output format '{other}' (expected jpeg, png or match)")),
        }
    }
}

/// Tunables for one batch. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferParams {
    /// Damp the exposure shift on bright pixels. `false` is classic
    /// mean/std matching, which accepts highlight clipping.
    pub adaptive_exposure: bool,
    /// Share of each chroma channel's own spread that is kept, in `[0, 1]`.
    pub saturation_preservation: f32,
    /// Output encoding.
    pub output_format: OutputFormat,
    /// JPEG quality, 1–100.
    pub jpeg_quality: u8,
    /// Prefix prepended to each output file stem.
    pub output_prefix: String,
}

impl Default for TransferParams {
    fn default() -> Self {
        Self {
            adaptive_exposure: true,
            saturation_preservation: DEFAULT_PRESERVATION,
            output_format: OutputFormat::Jpeg,
            jpeg_quality: 95,
            output_prefix: "processed_".to_string(),
        }
    }
}

impl TransferParams {
    /// Check value ranges.
    pub fn validate(&self) -> Result<(), TransferError> {
        if !(0.0..=1.0).contains(&self.saturation_preservation) {
            return Err(TransferError::InvalidConfig(format!(
                "saturation_preservation must be within [0, 1], got {}",
                self.saturation_preservation
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(TransferError::InvalidConfig(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.output_prefix.contains(['/', '\\']) {
            return Err(TransferError::InvalidConfig(format!(
                "output_prefix must not contain path separators: {:?}",
                self.output_prefix
            )));
        }
        Ok(())
    }

    /// Load and validate parameters from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, TransferError> {
        let text = std::fs::read_to_string(path).map_err(|source| TransferError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self = serde_json::from_str(&text).map_err(|source| TransferError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Output path for a target inside `dir`.
    pub fn output_path(&self, dir: &Path, target: &Path) -> PathBuf {
        self.output_format.output_path(dir, target, &self.output_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behavior() {
        let params = TransferParams::default();
        assert!(params.adaptive_exposure);
        assert_eq!(params.saturation_preservation, 0.8);
        assert_eq!(params.output_format, OutputFormat::Jpeg);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_output_name_is_always_jpeg_by_default() {
        let params = TransferParams::default();
        let out = params.output_path(Path::new("output"), Path::new("shots/beach.png"));
        assert_eq!(out, PathBuf::from("output/processed_beach.jpg"));
    }

    #[test]
    fn test_match_input_keeps_writable_format() {
        let fmt = OutputFormat::MatchInput;
        assert_eq!(fmt.resolve(Path::new("a.png")), ImageFormat::Png);
        assert_eq!(fmt.resolve(Path::new("a.JPEG")), ImageFormat::Jpeg);
        assert_eq!(fmt.resolve(Path::new("no_extension")), ImageFormat::Jpeg);
        assert_eq!(
            fmt.output_path(Path::new("out"), Path::new("x/y.png"), "p_"),
            PathBuf::from("out/p_y.png")
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JPG".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("png".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!("match".parse::<OutputFormat>(), Ok(OutputFormat::MatchInput));
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_preservation() {
        let params = TransferParams {
            saturation_preservation: 1.5,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(TransferError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_zero_quality() {
        let params = TransferParams {
            jpeg_quality: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{ "adaptive_exposure": false, "output_format": "png" }"#).unwrap();
        let params = TransferParams::load_json(&path).unwrap();
        assert!(!params.adaptive_exposure);
        assert_eq!(params.output_format, OutputFormat::Png);
        assert_eq!(params.saturation_preservation, 0.8);
        assert_eq!(params.output_prefix, "processed_");
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            TransferParams::load_json(&path),
            Err(TransferError::Json { .. })
        ));
    }
}
