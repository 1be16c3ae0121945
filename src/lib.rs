#![doc = r#"
autocrop: content bounding-box detection for images with a uniform border.

This crate finds the tightest rectangle around the non-background content of a
raster image (scanned documents, product photos on a plain backdrop) and provides
the rectangle algebra needed to turn that box into a final crop or pad region
that honors padding and aspect constraints. It powers the `autocrop` CLI and can
be embedded in your own imaging pipeline.

How it works
------------
1. A border probe estimates the background color from the image border. If it
   fails, it is retried once with half the color threshold, the most permissive
   bucket tolerance and a search region contracted by 10%.
2. Every pixel of the probe's region is compared to the background with a
   luma-weighted distance (alpha-aware for 32-bit pixels), and the content
   pixels are accumulated into a bounding box.
3. Boxes narrower or shorter than 3 pixels are rejected.

Add dependency
--------------
```toml
[dependencies]
autocrop = { version = "0.1", default-features = false }
```

Quick start: analyze a buffer
-----------------------------
```rust
use autocrop::{analyze, AnalyzerParams, PixelBuffer, PixelFormat, Rect};

fn main() -> autocrop::Result<()> {
    // 100x100 white BGR image with a black 20x20 square at (40, 40)
    let (w, h) = (100, 100);
    let mut data = vec![255u8; w * h * 3];
    for y in 40..60 {
        for x in 40..60 {
            let i = (y * w + x) * 3;
            data[i..i + 3].copy_from_slice(&[0, 0, 0]);
        }
    }

    let buffer = PixelBuffer::packed(&data, w, h, PixelFormat::Bgr24)?;
    let params = AnalyzerParams { color_threshold: 10, ..Default::default() };
    let analysis = analyze(&buffer, &params)?;

    assert!(analysis.success);
    assert_eq!(analysis.bounding_box, Rect::new(40, 40, 20, 20));
    Ok(())
}
```

Rectangle algebra
-----------------
```rust
use autocrop::Rect;

let bbox = Rect::new(40, 40, 20, 20);
let crop = bbox
    .expand_bounded(5, 5, 100, 100) // 5px of breathing room, kept inside the image
    .aspect_fit_within(16.0 / 9.0, 100, 100)
    .constrain(Rect::new(0, 0, 100, 100));
assert!(Rect::new(0, 0, 100, 100).contains_rect(&crop));
```

Plugging in your own border probe
---------------------------------
Implement [`BorderProbe`] (or pass a function with the same signature) and call
[`analyze_with`]. The built-in [`EdgeProbe`] samples the one-pixel frame of the
search region.

Error handling
--------------
Analysis outcomes are data: check [`Analysis::success`] before trusting the box.
Fallible entrypoints return `autocrop::Result<T>`; buffer geometry and parameter
problems surface as [`Error`] variants before any pixel is read.

Feature flags
-------------
- `cli` (default): the `autocrop` binary and `image`-crate decoding helpers.
- `full`: everything.

Useful modules
--------------
- [`api`]: high-level entry points.
- [`core`](crate::core): buffer view, geometry, parameters and the processing steps.
- [`types`]: `Rect`, `Color`, `PixelFormat`.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::buffer::PixelBuffer;
pub use crate::core::params::{AnalyzerParams, AutocropConfig, CropParams, FitMode};
pub use error::{Error, Result};
pub use types::{Color, PixelFormat, Rect};

// Processing steps
pub use crate::core::processing::analyzer::{Analysis, BoundsAnalyzer};
pub use crate::core::processing::plan::{CropPlan, plan_crop};
pub use crate::core::processing::probe::{BorderProbe, EdgeProbe, ProbeResult};
pub use crate::core::processing::scan::Kernel;

#[cfg(feature = "cli")]
pub use crate::core::buffer::BgraImage;

// High-level API re-exports
pub use api::{CropReport, analyze, analyze_bytes, analyze_with, find_crop};

#[cfg(feature = "cli")]
pub use api::find_crop_in_image;
