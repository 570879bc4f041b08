//! Aspect-fill ("cover") cropping.
//!
//! Given a source image and a destination rectangle, pick the window of the source that, when
//! scaled uniformly onto the destination, covers it completely. Whichever axis overflows is
//! cropped; the [`Focus`] decides which part of the overflow survives.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Region of the source image to sample, in source pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub source_x: f64,
    pub source_y: f64,
    pub source_w: f64,
    pub source_h: f64,
}

impl CropRect {
    /// The whole source image, uncropped.
    pub fn full(iw: f64, ih: f64) -> Self {
        Self {
            source_x: 0.0,
            source_y: 0.0,
            source_w: iw,
            source_h: ih,
        }
    }

    pub fn as_rect(self) -> Rect {
        Rect::new(
            self.source_x,
            self.source_y,
            self.source_x + self.source_w,
            self.source_y + self.source_h,
        )
    }

    /// Width over height of the sampled window.
    pub fn aspect(self) -> f64 {
        self.source_w / self.source_h
    }
}

/// Where the crop window sits inside the overflowing axis.
///
/// `0.0` aligns to the left/top edge, `1.0` to the right/bottom edge, `0.5` centers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Focus {
    pub x: f64,
    pub y: f64,
}

impl Default for Focus {
    fn default() -> Self {
        Self::CENTER
    }
}

impl Focus {
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp both offsets into `[0, 1]`. NaN falls back to centered.
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_offset(self.x),
            y: clamp_offset(self.y),
        }
    }
}

fn clamp_offset(v: f64) -> f64 {
    if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) }
}

/// Compute the source window that makes an `iw`×`ih` image cover a `w`×`h` destination.
///
/// The uniform cover scale is `max(w / iw, h / ih)`; the visible source extent on each axis is
/// the destination extent divided by that scale. The binding axis keeps the full source extent
/// exactly, so matching aspect ratios never crop. Offsets outside `[0, 1]` are clamped.
///
/// All sizes are expected to be strictly positive. Non-positive or non-finite sizes yield the
/// full source rect instead of panicking.
pub fn compute_cover_crop(
    iw: f64,
    ih: f64,
    w: f64,
    h: f64,
    offset_x: f64,
    offset_y: f64,
) -> CropRect {
    if !(is_positive(iw) && is_positive(ih) && is_positive(w) && is_positive(h)) {
        return CropRect::full(iw.max(0.0), ih.max(0.0));
    }

    let offset_x = clamp_offset(offset_x);
    let offset_y = clamp_offset(offset_y);

    // Cross-multiplied comparison of w/h against iw/ih.
    let (mut source_w, mut source_h) = if w * ih >= h * iw {
        // Destination is relatively wider: width binds, height overflows.
        (iw, iw * h / w)
    } else {
        (ih * w / h, ih)
    };
    source_w = source_w.min(iw);
    source_h = source_h.min(ih);

    let source_x = ((iw - source_w) * offset_x).max(0.0);
    let source_y = ((ih - source_h) * offset_y).max(0.0);

    CropRect {
        source_x,
        source_y,
        source_w,
        source_h,
    }
}

/// [`compute_cover_crop`] with the crop centered on both axes.
pub fn compute_cover_crop_centered(iw: f64, ih: f64, w: f64, h: f64) -> CropRect {
    compute_cover_crop(iw, ih, w, h, Focus::CENTER.x, Focus::CENTER.y)
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Source window plus the destination rectangle it gets blitted onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverPlacement {
    pub crop: CropRect,
    pub dest: Rect,
}

impl CoverPlacement {
    /// Uniform scale from source pixels to destination pixels.
    pub fn scale(&self) -> f64 {
        self.dest.width() / self.crop.source_w
    }
}

pub fn cover_placement(image_w: u32, image_h: u32, dest: Rect, focus: Focus) -> CoverPlacement {
    let dest = dest.abs();
    let crop = compute_cover_crop(
        f64::from(image_w),
        f64::from(image_h),
        dest.width(),
        dest.height(),
        focus.x,
        focus.y,
    );
    CoverPlacement { crop, dest }
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;
