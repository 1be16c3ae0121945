//! Rectangle algebra used to turn a detected bounding box into a final crop or
//! pad region: aspect fitting, clipping, scaling, translation, symmetric
//! expansion (free or bounded) and percentage contraction.
//!
//! Every function is pure and never fails. Degenerate parameters (an empty
//! rectangle, a zero or non-finite aspect, zero padding, a unit or zero scale)
//! hand the input back unchanged.
use crate::types::Rect;

/// Aspect differences below this are treated as a match.
const ASPECT_TOLERANCE: f32 = 0.01;

impl Rect {
    /// Pad the short axis symmetrically so that `width / height` matches `aspect`.
    ///
    /// The padding is applied with [`Rect::expand`], so the result may extend past
    /// the image (negative origin, for instance). Use [`Rect::aspect_fit_within`]
    /// when the result has to stay inside an image.
    #[must_use]
    pub fn aspect_fit(self, aspect: f32) -> Rect {
        match self.aspect_padding(aspect) {
            Some((pad_x, pad_y)) => self.expand(pad_x, pad_y),
            None => self,
        }
    }

    /// Like [`Rect::aspect_fit`], but the padding goes through
    /// [`Rect::expand_bounded`] so the result stays inside `max_width` x `max_height`.
    #[must_use]
    pub fn aspect_fit_within(self, aspect: f32, max_width: i32, max_height: i32) -> Rect {
        match self.aspect_padding(aspect) {
            Some((pad_x, pad_y)) => self.expand_bounded(pad_x, pad_y, max_width, max_height),
            None => self,
        }
    }

    /// Fit to the aspect of a `width` x `height` image while staying inside it.
    #[must_use]
    pub fn aspect_fit_to(self, width: i32, height: i32) -> Rect {
        self.aspect_fit_within(width as f32 / height as f32, width, height)
    }

    /// Padding `(x, y)` needed on each side to reach `aspect`, if any.
    fn aspect_padding(&self, aspect: f32) -> Option<(i32, i32)> {
        if self.is_empty() || !aspect.is_finite() || aspect <= 0.0 {
            return None;
        }

        let current = self.width as f32 / self.height as f32;
        if (aspect - current).abs() < ASPECT_TOLERANCE {
            return None;
        }

        if aspect > current {
            let target_width = (self.height as f32 * aspect).ceil() as i32;
            let pad = ((target_width - self.width) as f32 * 0.5).ceil() as i32;
            Some((pad, 0))
        } else {
            let target_height = (self.width as f32 / aspect).ceil() as i32;
            let pad = ((target_height - self.height) as f32 * 0.5).ceil() as i32;
            Some((0, pad))
        }
    }

    /// Clip to `bounds`.
    ///
    /// When the rectangle overflows `bounds` on the right or bottom, the overflow
    /// is taken off the already clipped edge a second time. The result never has
    /// negative dimensions and always lies inside a non-degenerate `bounds`.
    #[must_use]
    pub fn constrain(self, bounds: Rect) -> Rect {
        let left = self.left().max(bounds.left()).min(bounds.right());
        let top = self.top().max(bounds.top()).min(bounds.bottom());

        let mut right = self.right().min(bounds.right());
        if self.right() > bounds.right() {
            right -= self.right() - bounds.right();
        }

        let mut bottom = self.bottom().min(bounds.bottom());
        if self.bottom() > bounds.bottom() {
            bottom -= self.bottom() - bounds.bottom();
        }

        Rect::from_edges(left, top, right.max(left), bottom.max(top))
    }

    /// Plain intersection with `bounds`; an empty overlap has zero size.
    ///
    /// Unlike [`Rect::constrain`], overflow is only cut once, so every pixel of
    /// `self` that lies inside `bounds` is kept.
    #[must_use]
    pub fn intersect(self, bounds: Rect) -> Rect {
        let left = self.left().max(bounds.left());
        let top = self.top().max(bounds.top());
        let right = self.right().min(bounds.right());
        let bottom = self.bottom().min(bounds.bottom());

        Rect::from_edges(left, top, right.max(left), bottom.max(top))
    }

    /// Multiply origin and size by `factor`, rounding each component on its own.
    ///
    /// Maps a box found on a downsampled copy back to full resolution. Rounding
    /// is to nearest with ties to even.
    #[must_use]
    pub fn scale(self, factor: f64) -> Rect {
        if factor == 1.0 || factor == 0.0 || !factor.is_finite() {
            return self;
        }

        let scale = |v: i32| (v as f64 * factor).round_ties_even() as i32;
        Rect::new(
            scale(self.x),
            scale(self.y),
            scale(self.width),
            scale(self.height),
        )
    }

    /// Shift the origin; the size is unchanged.
    #[must_use]
    pub fn translate(self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Grow by `pad_x` on the left and right and `pad_y` on the top and bottom.
    #[must_use]
    pub fn expand(self, pad_x: i32, pad_y: i32) -> Rect {
        if pad_x == 0 && pad_y == 0 {
            return self;
        }

        let grow = |origin: i32, length: i32, pad: i32| {
            let pad = i64::from(pad);
            (
                saturate(i64::from(origin) - pad),
                saturate(i64::from(length) + pad * 2),
            )
        };
        let (x, width) = grow(self.x, self.width, pad_x);
        let (y, height) = grow(self.y, self.height, pad_y);

        Rect::new(x, y, width, height)
    }

    /// Grow symmetrically while staying inside `[0, max_width) x [0, max_height)`.
    ///
    /// For each axis the larger of the two overflows is taken back from both
    /// sides, so the growth stays symmetric instead of being clipped per edge.
    #[must_use]
    pub fn expand_bounded(self, pad_x: i32, pad_y: i32, max_width: i32, max_height: i32) -> Rect {
        if pad_x == 0 && pad_y == 0 {
            return self;
        }

        let (left, right) = expand_axis(self.left(), self.right(), pad_x, max_width);
        let (top, bottom) = expand_axis(self.top(), self.bottom(), pad_y, max_height);

        Rect::from_edges(left, top, right, bottom)
    }

    /// Shrink by a percentage of the rectangle's own size.
    ///
    /// Half of `percent_x` is removed from each of the left and right edges (and
    /// half of `percent_y` from top and bottom), truncated to whole pixels.
    /// Percentages are capped at 100, which collapses that axis to zero length.
    /// A negative percentage grows the rectangle by the same rule.
    #[must_use]
    pub fn contract(self, percent_x: f64, percent_y: f64) -> Rect {
        if percent_x == 0.0 && percent_y == 0.0 {
            return self;
        }

        let percent_x = clamp_percent(percent_x);
        let percent_y = clamp_percent(percent_y);

        let (left, right) = contract_axis(self.left(), self.right(), self.width, percent_x);
        let (top, bottom) = contract_axis(self.top(), self.bottom(), self.height, percent_y);

        Rect::from_edges(left, top, right, bottom)
    }

    /// [`Rect::contract`] with the same percentage on both axes.
    #[must_use]
    pub fn contract_uniform(self, percent: f64) -> Rect {
        self.contract(percent, percent)
    }
}

/// Clamp a widened coordinate back into `i32`.
fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn expand_axis(start: i32, end: i32, pad: i32, max: i32) -> (i32, i32) {
    let pad = i64::from(pad);
    let start = i64::from(start) - pad;
    let end = i64::from(end) + pad;
    let max = i64::from(max);

    let start_overflow = if start < 0 { -start } else { 0 };
    let end_overflow = if end > max { end - max } else { 0 };
    let correction = start_overflow.max(end_overflow);

    (saturate(start + correction), saturate(end - correction))
}

fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.min(100.0)
    }
}

fn contract_axis(start: i32, end: i32, length: i32, percent: f64) -> (i32, i32) {
    let ratio = percent * 0.01 * 0.5;
    let inset = (length as f64 * ratio) as i32;
    let start = start.saturating_add(inset);
    let end = if percent >= 100.0 {
        start
    } else {
        end.saturating_sub(inset)
    };
    (start, end)
}
