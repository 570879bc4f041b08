//! Static poster layout expressed in fractions of the canvas.
//!
//! A [`LayoutSpec`] is loaded once (built in, or from JSON) and never mutated afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    assets::color::Color,
    compositor::Focus,
    foundation::error::{PosterError, PosterResult},
    layout::resolve::REFERENCE_WIDTH,
};

/// Rectangle in fractional canvas coordinates. `x`/`w` scale with width, `y`/`h` with height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FracRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FracPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    /// Size in reference-canvas units (see [`LayoutSpec::reference_width`]).
    pub base_size: f64,
    #[serde(default = "default_weight")]
    pub weight: u16,
    #[serde(default = "default_color")]
    pub color: Color,
}

fn default_weight() -> u16 {
    600
}

fn default_color() -> Color {
    Color::BLACK
}

fn default_reference_width() -> f64 {
    REFERENCE_WIDTH
}

/// The slot the user photo is cover-cropped into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhotoSlot {
    #[serde(flatten)]
    pub rect: FracRect,
    #[serde(default)]
    pub focus: Focus,
}

/// A left-aligned text line; the anchor is the start of its baseline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextSlot {
    #[serde(flatten)]
    pub anchor: FracPoint,
    pub font: FontSpec,
}

/// The three text fields a poster carries, in draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Name,
    Unit,
    Dob,
}

impl TextField {
    pub const ALL: [TextField; 3] = [TextField::Name, TextField::Unit, TextField::Dob];

    pub fn as_str(self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::Unit => "unit",
            TextField::Dob => "dob",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub photo: PhotoSlot,
    pub name: TextSlot,
    pub unit: TextSlot,
    pub dob: TextSlot,
    /// Canvas width the font base sizes were authored against.
    #[serde(default = "default_reference_width")]
    pub reference_width: f64,
}

impl Default for LayoutSpec {
    /// Layout of the bundled poster template.
    fn default() -> Self {
        let font = FontSpec {
            family: "Archivo Black".to_owned(),
            base_size: 31.0,
            weight: default_weight(),
            color: Color::BLACK,
        };
        Self {
            photo: PhotoSlot {
                rect: FracRect {
                    x: 0.2427,
                    y: 0.340,
                    w: 0.2349,
                    h: 0.331,
                },
                focus: Focus::CENTER,
            },
            name: TextSlot {
                anchor: FracPoint { x: 0.62, y: 0.428 },
                font: font.clone(),
            },
            unit: TextSlot {
                anchor: FracPoint { x: 0.6, y: 0.471 },
                font: font.clone(),
            },
            dob: TextSlot {
                anchor: FracPoint { x: 0.6, y: 0.5125 },
                font,
            },
            reference_width: REFERENCE_WIDTH,
        }
    }
}

impl LayoutSpec {
    pub fn text(&self, field: TextField) -> &TextSlot {
        match field {
            TextField::Name => &self.name,
            TextField::Unit => &self.unit,
            TextField::Dob => &self.dob,
        }
    }

    pub fn with_focus(mut self, focus: Focus) -> Self {
        self.photo.focus = focus;
        self
    }

    pub fn from_json_str(s: &str) -> PosterResult<Self> {
        let spec: Self = serde_json::from_str(s)
            .map_err(|e| PosterError::serde(format!("parse layout JSON: {e}")))?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn load(path: &Path) -> PosterResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            PosterError::validation(format!("read layout '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    pub fn to_json_pretty(&self) -> PosterResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PosterError::serde(e.to_string()))
    }

    /// Check that every fraction lies in `[0, 1]` and every size is positive.
    pub fn validate(&self) -> PosterResult<()> {
        let r = self.photo.rect;
        check_fraction("photo.x", r.x)?;
        check_fraction("photo.y", r.y)?;
        check_fraction("photo.w", r.w)?;
        check_fraction("photo.h", r.h)?;
        if r.w <= 0.0 || r.h <= 0.0 {
            return Err(PosterError::validation("photo slot must have non-zero size"));
        }
        check_fraction("photo.focus.x", self.photo.focus.x)?;
        check_fraction("photo.focus.y", self.photo.focus.y)?;

        for field in TextField::ALL {
            let slot = self.text(field);
            let name = field.as_str();
            check_fraction(&format!("{name}.x"), slot.anchor.x)?;
            check_fraction(&format!("{name}.y"), slot.anchor.y)?;
            if !(slot.font.base_size.is_finite() && slot.font.base_size > 0.0) {
                return Err(PosterError::validation(format!(
                    "{name}.font.base_size must be finite and > 0"
                )));
            }
            if slot.font.family.trim().is_empty() {
                return Err(PosterError::validation(format!(
                    "{name}.font.family must be non-empty"
                )));
            }
            if !(1..=1000).contains(&slot.font.weight) {
                return Err(PosterError::validation(format!(
                    "{name}.font.weight must be in 1..=1000"
                )));
            }
        }

        if !(self.reference_width.is_finite() && self.reference_width > 0.0) {
            return Err(PosterError::validation(
                "reference_width must be finite and > 0",
            ));
        }
        Ok(())
    }
}

fn check_fraction(what: &str, v: f64) -> PosterResult<()> {
    if !(0.0..=1.0).contains(&v) {
        return Err(PosterError::validation(format!(
            "{what} must be a fraction in [0, 1], got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/spec.rs"]
mod tests;
