//! Content scan: classify every pixel of a region against the background color
//! and accumulate the bounding box of the pixels that are not background.
//!
//! Two classifiers exist, picked once per scan from the probe's pixel class:
//! - `RgbDistance`: luma-weighted distance `0.299·|ΔR| + 0.587·|ΔG| + 0.114·|ΔB|`.
//! - `ArgbDistance`: the same distance with each delta scaled by the pixel's
//!   alpha coverage, plus an override that marks a pixel as content when its
//!   alpha alone differs from the background by at least the threshold.
//!
//! Rows are independent, so the scan can run on the rayon pool; per-row bounds
//! are merged with min/max, which makes the result identical either way.
use rayon::prelude::*;
use tracing::debug;

use crate::core::buffer::PixelBuffer;
use crate::types::{Color, PixelFormat, Rect};

const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

const ALPHA_SCALE: f64 = 1.0 / 255.0;

#[inline]
fn luma_distance(dr: f64, dg: f64, db: f64) -> f64 {
    LUMA_R * dr + LUMA_G * dg + LUMA_B * db
}

#[inline]
fn channel_delta(value: u8, background: u8) -> i32 {
    (i32::from(value) - i32::from(background)).abs()
}

/// Per-pixel background/content decision over `[b, g, r(, a)]` bytes.
pub trait PixelClassifier: Sync {
    fn is_content(&self, px: &[u8]) -> bool;
}

/// Opaque pixels: plain luma-weighted distance.
#[derive(Debug, Clone, Copy)]
pub struct RgbDistance {
    background: Color,
    threshold: f64,
}

impl RgbDistance {
    pub fn new(background: Color, threshold: i32) -> Self {
        Self {
            background,
            threshold: f64::from(threshold),
        }
    }
}

impl PixelClassifier for RgbDistance {
    #[inline]
    fn is_content(&self, px: &[u8]) -> bool {
        let bd = channel_delta(px[0], self.background.b);
        let gd = channel_delta(px[1], self.background.g);
        let rd = channel_delta(px[2], self.background.r);

        luma_distance(f64::from(rd), f64::from(gd), f64::from(bd)) > self.threshold
    }
}

/// Pixels with alpha: deltas weighted by coverage, alpha change overrides.
#[derive(Debug, Clone, Copy)]
pub struct ArgbDistance {
    background: Color,
    threshold: i32,
}

impl ArgbDistance {
    pub fn new(background: Color, threshold: i32) -> Self {
        Self {
            background,
            threshold,
        }
    }
}

impl PixelClassifier for ArgbDistance {
    #[inline]
    fn is_content(&self, px: &[u8]) -> bool {
        let a = px[3];
        let coverage = f64::from(a) * ALPHA_SCALE;

        let bd = f64::from(channel_delta(px[0], self.background.b)) * coverage;
        let gd = f64::from(channel_delta(px[1], self.background.g)) * coverage;
        let rd = f64::from(channel_delta(px[2], self.background.r)) * coverage;

        if luma_distance(rd, gd, bd) <= f64::from(self.threshold) {
            // color matches; only a large transparency change still counts
            return channel_delta(a, self.background.a) >= self.threshold;
        }

        true
    }
}

/// Which classifier a scan uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Rgb,
    Argb,
}

impl Kernel {
    /// Kernel for the probe's pixel class: 3 bytes is RGB, anything else ARGB.
    ///
    /// A buffer without an alpha channel always gets the RGB kernel, since there
    /// is no alpha byte to read.
    pub fn select(bytes_per_pixel: usize, format: PixelFormat) -> Self {
        if bytes_per_pixel == 3 || !format.has_alpha() {
            Kernel::Rgb
        } else {
            Kernel::Argb
        }
    }

    /// Classify a single pixel.
    pub fn is_content(self, px: &[u8], background: Color, threshold: i32) -> bool {
        match self {
            Kernel::Rgb => RgbDistance::new(background, threshold).is_content(px),
            Kernel::Argb => ArgbDistance::new(background, threshold).is_content(px),
        }
    }
}

/// Running content bounds; `max_x`/`max_y` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl Bounds {
    fn merge(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    fn into_rect(self) -> Rect {
        Rect::from_edges(
            self.min_x as i32,
            self.min_y as i32,
            self.max_x as i32,
            self.max_y as i32,
        )
    }
}

fn row_bounds<C: PixelClassifier>(
    buffer: &PixelBuffer<'_>,
    y: usize,
    left: usize,
    right: usize,
    classifier: &C,
) -> Option<Bounds> {
    let bpp = buffer.bytes_per_pixel();
    let pixels = &buffer.row(y)[left * bpp..right * bpp];

    let first = pixels
        .chunks_exact(bpp)
        .position(|px| classifier.is_content(px))?;
    let last = pixels
        .chunks_exact(bpp)
        .rposition(|px| classifier.is_content(px))
        .unwrap_or(first);

    Some(Bounds {
        min_x: left + first,
        min_y: y,
        max_x: left + last + 1,
        max_y: y + 1,
    })
}

/// Bounding box of the content pixels inside `region`, or `None` when every
/// pixel is background.
///
/// `region` must lie inside `buffer` (see [`PixelBuffer::check_region`]).
pub fn scan<C: PixelClassifier>(
    buffer: &PixelBuffer<'_>,
    region: Rect,
    classifier: &C,
    parallel: bool,
) -> Option<Rect> {
    if region.is_empty() {
        return None;
    }

    let left = region.left() as usize;
    let right = region.right() as usize;
    let rows = region.top() as usize..region.bottom() as usize;

    let bounds = if parallel {
        rows.into_par_iter()
            .filter_map(|y| row_bounds(buffer, y, left, right, classifier))
            .reduce_with(Bounds::merge)
    } else {
        rows.filter_map(|y| row_bounds(buffer, y, left, right, classifier))
            .reduce(Bounds::merge)
    };

    bounds.map(Bounds::into_rect)
}

/// Run the scan with the classifier for `kernel`.
pub fn scan_content(
    buffer: &PixelBuffer<'_>,
    region: Rect,
    kernel: Kernel,
    background: Color,
    threshold: i32,
    parallel: bool,
) -> Option<Rect> {
    debug!(
        "Scanning {} with {:?} kernel: background={}, threshold={}, parallel={}",
        region, kernel, background, threshold, parallel
    );

    match kernel {
        Kernel::Rgb => scan(
            buffer,
            region,
            &RgbDistance::new(background, threshold),
            parallel,
        ),
        Kernel::Argb => scan(
            buffer,
            region,
            &ArgbDistance::new(background, threshold),
            parallel,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: usize, height: usize, format: PixelFormat, px: &[u8]) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height * px.len());
        for _ in 0..width * height {
            data.extend_from_slice(&px[..format.bytes_per_pixel()]);
        }
        data
    }

    fn paint(data: &mut [u8], width: usize, format: PixelFormat, x: usize, y: usize, px: &[u8]) {
        let bpp = format.bytes_per_pixel();
        let offset = (y * width + x) * bpp;
        data[offset..offset + bpp].copy_from_slice(&px[..bpp]);
    }

    #[test]
    fn test_rgb_threshold_is_inclusive() {
        let bg = Color::WHITE;
        // red delta 10 -> distance 2.99
        let px = [255, 255, 245];
        assert!(!RgbDistance::new(bg, 3).is_content(&px));
        assert!(RgbDistance::new(bg, 2).is_content(&px));
    }

    #[test]
    fn test_rgb_no_wraparound() {
        // 0 - 255 must be a delta of 255, not 1
        let classifier = RgbDistance::new(Color::WHITE, 100);
        assert!(classifier.is_content(&[0, 0, 0]));
        let classifier = RgbDistance::new(Color::BLACK, 100);
        assert!(classifier.is_content(&[255, 255, 255]));
    }

    #[test]
    fn test_argb_low_alpha_reads_as_background() {
        // opaque white background, black pixel at alpha 5 but alpha delta below threshold
        let bg = Color::rgba(255, 255, 255, 10);
        let classifier = ArgbDistance::new(bg, 20);
        assert!(!classifier.is_content(&[0, 0, 0, 5]));
    }

    #[test]
    fn test_argb_alpha_change_overrides_color_match() {
        // same color as the background, but transparent vs opaque
        let bg = Color::rgba(200, 200, 200, 255);
        let classifier = ArgbDistance::new(bg, 30);
        assert!(classifier.is_content(&[200, 200, 200, 0]));
        // alpha delta exactly at threshold counts as content
        assert!(classifier.is_content(&[200, 200, 200, 225]));
        assert!(!classifier.is_content(&[200, 200, 200, 226]));
    }

    #[test]
    fn test_argb_opaque_color_difference_is_content() {
        let classifier = ArgbDistance::new(Color::WHITE, 10);
        assert!(classifier.is_content(&[0, 0, 0, 255]));
    }

    #[test]
    fn test_kernel_select() {
        assert_eq!(Kernel::select(3, PixelFormat::Bgra32), Kernel::Rgb);
        assert_eq!(Kernel::select(4, PixelFormat::Bgra32), Kernel::Argb);
        assert_eq!(Kernel::select(2, PixelFormat::Bgra32), Kernel::Argb);
        assert_eq!(Kernel::select(4, PixelFormat::Bgr24), Kernel::Rgb);
    }

    #[test]
    fn test_scan_finds_block() {
        let format = PixelFormat::Bgr24;
        let mut data = filled(10, 8, format, &[255, 255, 255]);
        for (x, y) in [(2, 3), (6, 4), (4, 5)] {
            paint(&mut data, 10, format, x, y, &[0, 0, 0]);
        }
        let buf = PixelBuffer::packed(&data, 10, 8, format).unwrap();

        let found = scan_content(&buf, buf.bounds(), Kernel::Rgb, Color::WHITE, 10, false);
        assert_eq!(found, Some(Rect::new(2, 3, 5, 3)));
    }

    #[test]
    fn test_scan_respects_region() {
        let format = PixelFormat::Bgr24;
        let mut data = filled(10, 10, format, &[255, 255, 255]);
        paint(&mut data, 10, format, 0, 0, &[0, 0, 0]);
        paint(&mut data, 10, format, 5, 5, &[0, 0, 0]);
        let buf = PixelBuffer::packed(&data, 10, 10, format).unwrap();

        let found = scan_content(&buf, Rect::new(2, 2, 6, 6), Kernel::Rgb, Color::WHITE, 10, false);
        assert_eq!(found, Some(Rect::new(5, 5, 1, 1)));
    }

    #[test]
    fn test_scan_all_background() {
        let format = PixelFormat::Bgra32;
        let data = filled(6, 6, format, &[10, 20, 30, 255]);
        let buf = PixelBuffer::packed(&data, 6, 6, format).unwrap();
        let bg = Color::rgba(30, 20, 10, 255);
        assert_eq!(scan_content(&buf, buf.bounds(), Kernel::Argb, bg, 5, false), None);
        assert_eq!(scan_content(&buf, Rect::new(1, 1, 0, 3), Kernel::Argb, bg, 5, false), None);
    }

    #[test]
    fn test_scan_ignores_stride_padding() {
        // 2x2 BGR rows padded to 8 bytes; padding bytes are black
        let data = [
            255, 255, 255, 255, 255, 255, 0, 0, //
            255, 255, 255, 0, 0, 0, 0, 0,
        ];
        let buf = PixelBuffer::new(&data, 2, 2, 8, PixelFormat::Bgr24).unwrap();
        let found = scan_content(&buf, buf.bounds(), Kernel::Rgb, Color::WHITE, 10, false);
        assert_eq!(found, Some(Rect::new(1, 1, 1, 1)));
    }

    #[test]
    fn test_scan_parallel_matches_sequential() {
        let format = PixelFormat::Bgra32;
        let (w, h) = (64, 48);
        let mut data = filled(w, h, format, &[255, 255, 255, 255]);
        for (x, y) in [(3, 40), (60, 2), (31, 17), (12, 12)] {
            paint(&mut data, w, format, x, y, &[0, 0, 0, 255]);
        }
        let buf = PixelBuffer::packed(&data, w, h, format).unwrap();

        let seq = scan_content(&buf, buf.bounds(), Kernel::Argb, Color::WHITE, 10, false);
        let par = scan_content(&buf, buf.bounds(), Kernel::Argb, Color::WHITE, 10, true);
        assert_eq!(seq, par);
        assert_eq!(seq, Some(Rect::new(3, 2, 58, 39)));
        // no hidden state between runs
        assert_eq!(
            scan_content(&buf, buf.bounds(), Kernel::Argb, Color::WHITE, 10, false),
            seq
        );
    }
}
