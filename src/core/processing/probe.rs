//! Border probing: estimate the background color of an image from its border
//! and hand the analyzer a region to scan.
//!
//! `BorderProbe` is the seam host applications plug their own detector into.
//! `EdgeProbe` is the built-in detector used by the high-level API and the CLI.
use tracing::debug;

use crate::core::buffer::PixelBuffer;
use crate::core::processing::scan::Kernel;
use crate::types::{Color, Rect};

/// Outcome of one probe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// No usable background was found
    pub failed: bool,
    /// Candidate region the analyzer should scan
    pub region: Rect,
    /// Background color estimate (reported even when `failed`)
    pub background: Color,
    /// Pixel class: 3 selects the RGB kernel, anything else the ARGB kernel
    pub bytes_per_pixel: usize,
}

impl ProbeResult {
    pub fn found(region: Rect, background: Color, bytes_per_pixel: usize) -> Self {
        Self {
            failed: false,
            region,
            background,
            bytes_per_pixel,
        }
    }

    pub fn failure(region: Rect, background: Color, bytes_per_pixel: usize) -> Self {
        Self {
            failed: true,
            region,
            background,
            bytes_per_pixel,
        }
    }
}

/// Background detector consulted by the analyzer.
pub trait BorderProbe {
    fn probe(
        &self,
        buffer: &PixelBuffer<'_>,
        region: Rect,
        color_threshold: i32,
        bucket_tolerance: f32,
    ) -> ProbeResult;
}

impl<F> BorderProbe for F
where
    F: Fn(&PixelBuffer<'_>, Rect, i32, f32) -> ProbeResult,
{
    fn probe(
        &self,
        buffer: &PixelBuffer<'_>,
        region: Rect,
        color_threshold: i32,
        bucket_tolerance: f32,
    ) -> ProbeResult {
        self(buffer, region, color_threshold, bucket_tolerance)
    }
}

/// Bits kept per channel when bucketing border colors
const BUCKET_BITS: u32 = 3;
const BUCKET_SHIFT: u32 = 8 - BUCKET_BITS;
const BUCKET_COUNT: usize = 1 << (BUCKET_BITS * 4);

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    count: u64,
    r: u64,
    g: u64,
    b: u64,
    a: u64,
}

impl Bucket {
    fn add(&mut self, c: Color) {
        self.count += 1;
        self.r += u64::from(c.r);
        self.g += u64::from(c.g);
        self.b += u64::from(c.b);
        self.a += u64::from(c.a);
    }

    fn mean(&self) -> Color {
        let avg = |sum: u64| ((sum + self.count / 2) / self.count) as u8;
        Color::rgba(avg(self.r), avg(self.g), avg(self.b), avg(self.a))
    }
}

fn bucket_index(c: Color) -> usize {
    let q = |v: u8| usize::from(v >> BUCKET_SHIFT);
    (q(c.r) << (BUCKET_BITS * 3)) | (q(c.g) << (BUCKET_BITS * 2)) | (q(c.b) << BUCKET_BITS) | q(c.a)
}

/// Coordinates of the one-pixel frame of `region`, each pixel once.
fn frame(region: Rect) -> Vec<(usize, usize)> {
    let (left, top) = (region.left() as usize, region.top() as usize);
    let (right, bottom) = (region.right() as usize, region.bottom() as usize);

    let mut coords = Vec::with_capacity(2 * (right - left) + 2 * (bottom - top));
    for x in left..right {
        coords.push((x, top));
        if bottom - top > 1 {
            coords.push((x, bottom - 1));
        }
    }
    for y in top + 1..bottom.saturating_sub(1) {
        coords.push((left, y));
        if right - left > 1 {
            coords.push((right - 1, y));
        }
    }
    coords
}

/// Frame-sampling probe.
///
/// Samples the outermost ring of the search region, takes the most common
/// quantized color as the background, and requires that at least
/// `1 - bucket_tolerance` of the ring lies within `color_threshold` of it.
/// The search region is returned unchanged as the region to scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeProbe;

impl BorderProbe for EdgeProbe {
    fn probe(
        &self,
        buffer: &PixelBuffer<'_>,
        region: Rect,
        color_threshold: i32,
        bucket_tolerance: f32,
    ) -> ProbeResult {
        let bpp = buffer.bytes_per_pixel();

        if region.is_empty() || buffer.check_region(region).is_err() {
            debug!("Edge probe: search region {} is unusable", region);
            return ProbeResult::failure(region, Color::default(), bpp);
        }

        let samples = frame(region);
        let mut buckets = vec![Bucket::default(); BUCKET_COUNT];
        for &(x, y) in &samples {
            let c = buffer.color_at(x, y);
            buckets[bucket_index(c)].add(c);
        }

        let mut dominant = &buckets[0];
        for bucket in &buckets[1..] {
            if bucket.count > dominant.count {
                dominant = bucket;
            }
        }
        let background = dominant.mean();

        let kernel = Kernel::select(bpp, buffer.format());
        let matching = samples
            .iter()
            .filter(|&&(x, y)| !kernel.is_content(buffer.pixel(x, y), background, color_threshold))
            .count();

        let share = matching as f64 / samples.len() as f64;
        let required = 1.0 - f64::from(bucket_tolerance.clamp(0.0, 1.0));

        debug!(
            "Edge probe: region={}, background={}, border match {:.3} (need {:.3})",
            region, background, share, required
        );

        if share < required {
            ProbeResult::failure(region, background, bpp)
        } else {
            ProbeResult::found(region, background, bpp)
        }
    }
}
