use kurbo::{Point, Rect};
use serde::Serialize;

use crate::{
    assets::color::Color,
    compositor::Focus,
    foundation::core::Canvas,
    layout::spec::{FontSpec, FracPoint, FracRect, LayoutSpec, TextField},
};

/// Canvas width that font base sizes are authored against.
pub const REFERENCE_WIDTH: f64 = 1080.0;

pub fn resolve_rect(frac: FracRect, canvas_w: f64, canvas_h: f64) -> Rect {
    Rect::from_origin_size(
        (frac.x * canvas_w, frac.y * canvas_h),
        (frac.w * canvas_w, frac.h * canvas_h),
    )
}

pub fn resolve_point(frac: FracPoint, canvas_w: f64, canvas_h: f64) -> Point {
    Point::new(frac.x * canvas_w, frac.y * canvas_h)
}

/// Scale a font size authored at `reference_w` to a canvas `canvas_w` pixels wide.
pub fn resolve_font_size(base_size: f64, canvas_w: f64, reference_w: f64) -> f64 {
    base_size * (canvas_w / reference_w)
}

/// Font settings in pixel units for one concrete canvas.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedFont {
    pub family: String,
    pub size_px: f64,
    pub weight: u16,
    pub color: Color,
}

impl ResolvedFont {
    pub fn resolve(font: &FontSpec, canvas_w: f64, reference_w: f64) -> Self {
        Self {
            family: font.family.clone(),
            size_px: resolve_font_size(font.base_size, canvas_w, reference_w),
            weight: font.weight,
            color: font.color,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedText {
    pub field: TextField,
    /// Left end of the baseline.
    pub anchor: Point,
    pub font: ResolvedFont,
}

/// A [`LayoutSpec`] mapped onto a concrete canvas.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedLayout {
    pub canvas: Canvas,
    pub photo: Rect,
    pub focus: Focus,
    /// Name, unit and dob, in draw order.
    pub texts: [ResolvedText; 3],
}

impl ResolvedLayout {
    pub fn resolve(spec: &LayoutSpec, canvas: Canvas) -> Self {
        let (cw, ch) = (canvas.width_f64(), canvas.height_f64());
        let text = |field: TextField| {
            let slot = spec.text(field);
            ResolvedText {
                field,
                anchor: resolve_point(slot.anchor, cw, ch),
                font: ResolvedFont::resolve(&slot.font, cw, spec.reference_width),
            }
        };

        Self {
            canvas,
            photo: resolve_rect(spec.photo.rect, cw, ch),
            focus: spec.photo.focus.clamped(),
            texts: TextField::ALL.map(text),
        }
    }

    pub fn text(&self, field: TextField) -> &ResolvedText {
        match field {
            TextField::Name => &self.texts[0],
            TextField::Unit => &self.texts[1],
            TextField::Dob => &self.texts[2],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolve.rs"]
mod tests;
