//! High-level, ergonomic library API: analyze a pixel buffer, plan a crop from
//! the analysis, or do both in one call. Prefer these entrypoints over the
//! low-level `core::processing` modules when integrating autocrop.
use serde::{Deserialize, Serialize};

use crate::core::buffer::PixelBuffer;
use crate::core::params::{AnalyzerParams, AutocropConfig};
use crate::core::processing::analyzer::{Analysis, BoundsAnalyzer};
use crate::core::processing::plan::{CropPlan, plan_crop};
use crate::core::processing::probe::BorderProbe;
use crate::error::Result;
use crate::types::PixelFormat;

/// Analysis plus the crop planned from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropReport {
    pub width: usize,
    pub height: usize,
    pub analysis: Analysis,
    pub crop: CropPlan,
}

/// Analyze with the built-in [`EdgeProbe`](crate::EdgeProbe).
pub fn analyze(buffer: &PixelBuffer<'_>, params: &AnalyzerParams) -> Result<Analysis> {
    params.validate()?;
    Ok(BoundsAnalyzer::new(params.clone()).analyze(buffer))
}

/// Analyze with a caller-supplied border probe.
pub fn analyze_with<P: BorderProbe>(
    buffer: &PixelBuffer<'_>,
    params: &AnalyzerParams,
    probe: P,
) -> Result<Analysis> {
    params.validate()?;
    Ok(BoundsAnalyzer::with_probe(probe, params.clone()).analyze(buffer))
}

/// Analyze raw interleaved bytes; geometry is validated before any pixel is read.
pub fn analyze_bytes(
    data: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
    params: &AnalyzerParams,
) -> Result<Analysis> {
    let buffer = PixelBuffer::new(data, width, height, stride, format)?;
    analyze(&buffer, params)
}

/// Analyze and plan the crop in one step.
pub fn find_crop(buffer: &PixelBuffer<'_>, config: &AutocropConfig) -> Result<CropReport> {
    let analysis = analyze(buffer, &config.analyzer)?;
    let (width, height) = output_size(buffer, config.crop.scale);
    let crop = plan_crop(&analysis, width, height, &config.crop);

    Ok(CropReport {
        width,
        height,
        analysis,
        crop,
    })
}

/// Decode-side entrypoint: analyze an already decoded image.
#[cfg(feature = "cli")]
pub fn find_crop_in_image(image: &image::DynamicImage, config: &AutocropConfig) -> Result<CropReport> {
    let pixels = crate::core::buffer::BgraImage::from_dynamic(image);
    let buffer = pixels.view()?;
    find_crop(&buffer, config)
}

/// Size of the image the crop applies to: the analyzed buffer mapped by `scale`.
fn output_size(buffer: &PixelBuffer<'_>, scale: f64) -> (usize, usize) {
    let full = buffer.bounds().scale(scale);
    (full.width.max(0) as usize, full.height.max(0) as usize)
}
