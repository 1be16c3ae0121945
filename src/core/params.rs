use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default color-distance threshold (0-255 luma scale)
pub const DEFAULT_COLOR_THRESHOLD: i32 = 30;

/// Default bucket tolerance handed to the border probe
pub const DEFAULT_BUCKET_TOLERANCE: f32 = 0.5;

/// Bucket tolerance forced on the retry probe
pub const MAX_BUCKET_TOLERANCE: f32 = 1.0;

/// Analyzer parameters suitable for config files and CLI presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerParams {
    /// Luma-weighted color distance at or below which a pixel is background
    pub color_threshold: i32,
    /// How permissive the border probe is (0.0 strict, 1.0 most permissive)
    pub bucket_tolerance: f32,
    /// Split the pixel scan across the rayon thread pool
    pub parallel: bool,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            color_threshold: DEFAULT_COLOR_THRESHOLD,
            bucket_tolerance: DEFAULT_BUCKET_TOLERANCE,
            parallel: false,
        }
    }
}

impl AnalyzerParams {
    pub fn validate(&self) -> Result<()> {
        if !(0..=255).contains(&self.color_threshold) {
            return Err(Error::InvalidArgument {
                arg: "color_threshold",
                value: self.color_threshold.to_string(),
            });
        }
        if !(0.0..=MAX_BUCKET_TOLERANCE).contains(&self.bucket_tolerance) {
            return Err(Error::InvalidArgument {
                arg: "bucket_tolerance",
                value: self.bucket_tolerance.to_string(),
            });
        }
        Ok(())
    }
}

/// Whether the planned region must stay inside the image
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Cut the image down; the region is clipped to the image
    #[default]
    Crop,
    /// Grow a canvas around the content; the region may extend past the image
    Pad,
}

/// How a detected bounding box becomes the final crop rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropParams {
    /// Padding added around the box, as a percentage of its width and height
    pub padding_percent: f64,
    /// Target width/height ratio; None keeps the box's own aspect
    pub aspect: Option<f32>,
    /// Factor mapping analysis coordinates to output coordinates
    /// (e.g. 4.0 when the analysis ran on a quarter-size preview)
    pub scale: f64,
    pub mode: FitMode,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            padding_percent: 0.0,
            aspect: None,
            scale: 1.0,
            mode: FitMode::Crop,
        }
    }
}

/// Combined config file layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocropConfig {
    pub analyzer: AnalyzerParams,
    pub crop: CropParams,
}

impl AutocropConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.analyzer.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
