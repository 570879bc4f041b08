//! Poster composition: template, then photo, then text.

use kurbo::Rect;

use crate::{
    assets::decode::Image,
    compositor::{CropRect, cover_placement},
    foundation::error::PosterResult,
    layout::{
        resolve::ResolvedLayout,
        spec::{LayoutSpec, TextField},
    },
    render::target::RenderTarget,
};

/// Current values of the three text fields. Empty strings are not drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PosterText {
    pub name: String,
    pub unit: String,
    pub dob: String,
}

impl PosterText {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, dob: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            dob: dob.into(),
        }
    }

    pub fn get(&self, field: TextField) -> &str {
        match field {
            TextField::Name => &self.name,
            TextField::Unit => &self.unit,
            TextField::Dob => &self.dob,
        }
    }

    pub fn set(&mut self, field: TextField, value: impl Into<String>) {
        let slot = match field {
            TextField::Name => &mut self.name,
            TextField::Unit => &mut self.unit,
            TextField::Dob => &mut self.dob,
        };
        *slot = value.into();
    }
}

/// Everything a single render reads. Borrowed, so the caller keeps ownership of its images.
#[derive(Clone, Copy, Debug)]
pub struct PosterInputs<'a> {
    pub template: Option<&'a Image>,
    pub photo: Option<&'a Image>,
    pub text: &'a PosterText,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No template yet; nothing was drawn.
    Skipped,
    Drawn { photo: bool, texts: u8 },
}

#[derive(Clone, Debug)]
pub struct PosterRenderer {
    layout: LayoutSpec,
}

impl Default for PosterRenderer {
    fn default() -> Self {
        Self {
            layout: LayoutSpec::default(),
        }
    }
}

impl PosterRenderer {
    pub fn new(layout: LayoutSpec) -> PosterResult<Self> {
        layout.validate()?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &LayoutSpec {
        &self.layout
    }

    /// Repaint `target` from scratch.
    ///
    /// Without a template this is a no-op. Otherwise the target is cleared, the template is
    /// drawn at its native size, the photo (if any) is cover-cropped into the photo slot, and
    /// each non-empty text field is drawn at its anchor.
    #[tracing::instrument(skip_all, fields(has_photo = inputs.photo.is_some()))]
    pub fn render<T>(
        &self,
        target: &mut T,
        inputs: &PosterInputs<'_>,
    ) -> PosterResult<RenderOutcome>
    where
        T: RenderTarget + ?Sized,
    {
        let Some(template) = inputs.template else {
            tracing::debug!("no template loaded, skipping render");
            return Ok(RenderOutcome::Skipped);
        };

        let canvas = target.size();
        let resolved = ResolvedLayout::resolve(&self.layout, canvas);

        target.clear()?;
        let (tw, th) = (f64::from(template.width), f64::from(template.height));
        target.draw_image(template, CropRect::full(tw, th), Rect::new(0.0, 0.0, tw, th))?;

        let mut drew_photo = false;
        if let Some(photo) = inputs.photo {
            let placement =
                cover_placement(photo.width, photo.height, resolved.photo, resolved.focus);
            tracing::debug!(crop = ?placement.crop, dest = ?placement.dest, "placing photo");
            target.draw_image(photo, placement.crop, placement.dest)?;
            drew_photo = true;
        }

        let mut texts = 0u8;
        for slot in &resolved.texts {
            let value = inputs.text.get(slot.field);
            if value.is_empty() {
                continue;
            }
            target.draw_text(value, slot.anchor, &slot.font)?;
            texts += 1;
        }

        Ok(RenderOutcome::Drawn {
            photo: drew_photo,
            texts,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/poster.rs"]
mod tests;
