//! Read-only, bounds-checked view over interleaved 8-bit pixel rows.
//!
//! Geometry is validated once, at construction, so the scan kernels can slice
//! rows with plain indexing: row `y` starts at `y * stride`, pixel `x` within
//! the row at `x * bytes_per_pixel`.
use crate::error::{Error, Result};
use crate::types::{Color, PixelFormat, Rect};

#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap `data` as a `width` x `height` image with rows `stride` bytes apart.
    ///
    /// Fails when a row cannot hold `width` pixels or when `data` is too short to
    /// reach the last pixel of the last row. The final row may omit its padding.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        let row_bytes = width
            .checked_mul(format.bytes_per_pixel())
            .ok_or_else(|| Error::invalid_buffer(format!("width {width} overflows")))?;

        if stride < row_bytes {
            return Err(Error::invalid_buffer(format!(
                "stride {stride} is shorter than a {width}px {format} row ({row_bytes} bytes)"
            )));
        }

        if width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(Error::invalid_buffer(format!(
                "{width}x{height} exceeds the addressable rectangle range"
            )));
        }

        let required = match height {
            0 => 0,
            h => (h - 1)
                .checked_mul(stride)
                .and_then(|v| v.checked_add(row_bytes))
                .ok_or_else(|| Error::invalid_buffer("buffer size overflows"))?,
        };

        if data.len() < required {
            return Err(Error::invalid_buffer(format!(
                "{} bytes supplied, {required} required for {width}x{height} with stride {stride}",
                data.len()
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// Tightly packed buffer (`stride == width * bytes_per_pixel`).
    pub fn packed(data: &'a [u8], width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        Self::new(data, width, height, width * format.bytes_per_pixel(), format)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Full image extent.
    pub fn bounds(&self) -> Rect {
        Rect::of_image(self.width, self.height)
    }

    /// Pixel bytes of row `y`, without trailing padding.
    ///
    /// # Panics
    /// If `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width * self.bytes_per_pixel()]
    }

    /// Bytes of pixel `(x, y)`: `[b, g, r]` or `[b, g, r, a]`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &'a [u8] {
        let bpp = self.bytes_per_pixel();
        &self.row(y)[x * bpp..(x + 1) * bpp]
    }

    /// Decoded color at `(x, y)`; alpha reads as 255 for `Bgr24`.
    pub fn color_at(&self, x: usize, y: usize) -> Color {
        let p = self.pixel(x, y);
        let a = if self.format.has_alpha() { p[3] } else { 255 };
        Color::rgba(p[2], p[1], p[0], a)
    }

    /// Check that `region` is non-negative and inside the buffer.
    pub fn check_region(&self, region: Rect) -> Result<()> {
        let inside = region.width >= 0
            && region.height >= 0
            && self.bounds().contains_rect(&region);
        if inside {
            Ok(())
        } else {
            Err(Error::RegionOutOfBounds {
                region,
                width: self.width,
                height: self.height,
            })
        }
    }
}

#[cfg(feature = "cli")]
mod decode {
    use super::*;

    /// Owned `Bgra32` pixels converted from a decoded image.
    #[derive(Debug, Clone)]
    pub struct BgraImage {
        pub data: Vec<u8>,
        pub width: usize,
        pub height: usize,
    }

    impl BgraImage {
        pub fn from_dynamic(image: &image::DynamicImage) -> Self {
            let rgba = image.to_rgba8();
            let (width, height) = rgba.dimensions();
            let mut data = rgba.into_raw();
            for px in data.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
            Self {
                data,
                width: width as usize,
                height: height as usize,
            }
        }

        pub fn view(&self) -> Result<PixelBuffer<'_>> {
            PixelBuffer::packed(&self.data, self.width, self.height, PixelFormat::Bgra32)
        }
    }
}

#[cfg(feature = "cli")]
pub use decode::BgraImage;
