//! Crop planning: turn an [`Analysis`] into the rectangle a cropping pipeline
//! should cut (or, in pad mode, the canvas it should pad to).
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::params::{CropParams, FitMode};
use crate::core::processing::analyzer::Analysis;
use crate::types::Rect;

/// Final region handed to the cropping pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropPlan {
    pub region: Rect,
    /// False when the region is the untouched image
    pub changed: bool,
}

/// Build the final region for an image of `width` x `height` (output coordinates).
///
/// An unsuccessful analysis always yields the full image. Otherwise the box is
/// scaled by `params.scale`, padded by `params.padding_percent` of its own size
/// and fitted to `params.aspect`. In [`FitMode::Crop`] every step stays inside
/// the image and the result is constrained to it; in [`FitMode::Pad`] padding
/// and aspect fitting are unbounded, so the region may extend past the image.
pub fn plan_crop(analysis: &Analysis, width: usize, height: usize, params: &CropParams) -> CropPlan {
    let image = Rect::of_image(width, height);
    if !analysis.success {
        return CropPlan {
            region: image,
            changed: false,
        };
    }

    let mut region = analysis.bounding_box.scale(params.scale);
    let pad_x = padding(region.width, params.padding_percent);
    let pad_y = padding(region.height, params.padding_percent);

    region = match params.mode {
        FitMode::Crop => {
            let mut r = region.expand_bounded(pad_x, pad_y, image.width, image.height);
            if let Some(aspect) = params.aspect {
                r = r.aspect_fit_within(aspect, image.width, image.height);
            }
            r.constrain(image)
        }
        FitMode::Pad => {
            let mut r = region.expand(pad_x, pad_y);
            if let Some(aspect) = params.aspect {
                r = r.aspect_fit(aspect);
            }
            r
        }
    };

    debug!(
        "Crop plan: box={} -> region={} ({:?})",
        analysis.bounding_box, region, params.mode
    );

    CropPlan {
        region,
        changed: region != image,
    }
}

fn padding(length: i32, percent: f64) -> i32 {
    if percent <= 0.0 || !percent.is_finite() {
        return 0;
    }
    (f64::from(length) * percent * 0.01).round() as i32
}
