//! Bounds analysis: probe the border for a background color, then scan the
//! candidate region for the tightest box around everything that is not
//! background.
//!
//! The probe gets two chances. When the first attempt over the whole image
//! fails, the second runs with half the color threshold, the most permissive
//! bucket tolerance and a search region contracted by 10%, which keeps edge
//! vignetting and scanner noise out of the estimate.
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::buffer::PixelBuffer;
use crate::core::params::{AnalyzerParams, MAX_BUCKET_TOLERANCE};
use crate::core::processing::probe::{BorderProbe, EdgeProbe, ProbeResult};
use crate::core::processing::scan::{Kernel, scan_content};
use crate::types::{Color, Rect};

/// Percentage the search region is contracted by before the retry probe
const RETRY_CONTRACT_PERCENT: f64 = 10.0;

/// Smallest accepted bounding-box width and height
const MIN_BOX_SIZE: i32 = 3;

/// Result of one analyzer run.
///
/// When `success` is false the box must not be used for cropping: it is either
/// the full image (no background or no content found) or a rejected, too-small
/// box kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub background: Color,
    pub bounding_box: Rect,
    pub success: bool,
}

/// Runs the probe/scan sequence with a fixed probe and parameters.
#[derive(Debug, Clone, Default)]
pub struct BoundsAnalyzer<P = EdgeProbe> {
    probe: P,
    params: AnalyzerParams,
}

impl BoundsAnalyzer<EdgeProbe> {
    pub fn new(params: AnalyzerParams) -> Self {
        Self::with_probe(EdgeProbe, params)
    }
}

impl<P: BorderProbe> BoundsAnalyzer<P> {
    pub fn with_probe(probe: P, params: AnalyzerParams) -> Self {
        Self { probe, params }
    }

    pub fn params(&self) -> &AnalyzerParams {
        &self.params
    }

    pub fn analyze(&self, buffer: &PixelBuffer<'_>) -> Analysis {
        let image_box = buffer.bounds();
        let mut threshold = self.params.color_threshold;

        let mut inspection =
            self.probe
                .probe(buffer, image_box, threshold, self.params.bucket_tolerance);
        debug!(
            "Probe over {}: failed={}, background={}",
            image_box, inspection.failed, inspection.background
        );

        if inspection.failed {
            threshold = halve_threshold(threshold);
            let search = image_box.contract_uniform(RETRY_CONTRACT_PERCENT);
            warn!(
                "Border probe failed on {}; retrying inside {} with threshold={}",
                image_box, search, threshold
            );

            inspection = self
                .probe
                .probe(buffer, search, threshold, MAX_BUCKET_TOLERANCE);
            debug!(
                "Retry probe over {}: failed={}, background={}",
                search, inspection.failed, inspection.background
            );
        }

        if inspection.failed {
            warn!("No usable background found; keeping the full image");
            return Analysis {
                background: inspection.background,
                bounding_box: image_box,
                success: false,
            };
        }

        let analysis = self.scan(buffer, &inspection, threshold);
        info!(
            "Analysis: box={}, background={}, success={}",
            analysis.bounding_box, analysis.background, analysis.success
        );
        analysis
    }

    fn scan(&self, buffer: &PixelBuffer<'_>, inspection: &ProbeResult, threshold: i32) -> Analysis {
        let image_box = buffer.bounds();

        let mut region = inspection.region;
        if buffer.check_region(region).is_err() {
            region = region.intersect(image_box);
            warn!(
                "Probe region {} exceeds the image; scanning {} instead",
                inspection.region, region
            );
        }

        let kernel = Kernel::select(inspection.bytes_per_pixel, buffer.format());
        let found = scan_content(
            buffer,
            region,
            kernel,
            inspection.background,
            threshold,
            self.params.parallel,
        );

        match found {
            Some(bounding_box) => Analysis {
                background: inspection.background,
                bounding_box,
                success: is_valid_box(&bounding_box),
            },
            None => {
                debug!("No content pixels inside {}", region);
                Analysis {
                    background: inspection.background,
                    bounding_box: image_box,
                    success: false,
                }
            }
        }
    }
}

/// Half the threshold, rounded to nearest with ties to even.
fn halve_threshold(threshold: i32) -> i32 {
    (f64::from(threshold) * 0.5).round_ties_even() as i32
}

fn is_valid_box(rect: &Rect) -> bool {
    rect.width >= MIN_BOX_SIZE && rect.height >= MIN_BOX_SIZE
}
