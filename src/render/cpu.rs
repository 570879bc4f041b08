use std::{borrow::Cow, sync::Arc};

use kurbo::{Point, Rect};

use crate::{
    assets::{color::Color, decode::Image, font::FontBook},
    compositor::CropRect,
    foundation::{
        core::Canvas,
        error::{PosterError, PosterResult},
    },
    layout::resolve::ResolvedFont,
    render::{FrameRGBA, target::RenderTarget},
};

/// Raster target backed by a `vello_cpu` render context.
///
/// Draw calls accumulate in the context; [`CpuTarget::snapshot`] rasterizes them into a fresh
/// pixmap, so reading the result never disturbs what has been drawn.
pub struct CpuTarget {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    text: TextLayoutEngine,
}

impl std::fmt::Debug for CpuTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuTarget")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fonts", &self.text.families.len())
            .finish()
    }
}

impl CpuTarget {
    pub fn new(width: u32, height: u32, fonts: &FontBook) -> PosterResult<Self> {
        if width == 0 || height == 0 {
            return Err(PosterError::validation("render target must be non-empty"));
        }
        let width: u16 = width
            .try_into()
            .map_err(|_| PosterError::validation("render target width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| PosterError::validation("render target height exceeds u16"))?;

        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            text: TextLayoutEngine::new(fonts)?,
        })
    }

    /// Target sized to the template's native dimensions.
    pub fn for_template(template: &Image, fonts: &FontBook) -> PosterResult<Self> {
        Self::new(template.width, template.height, fonts)
    }

    /// Rasterize everything drawn since the last clear.
    pub fn snapshot(&mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

impl RenderTarget for CpuTarget {
    fn size(&self) -> Canvas {
        Canvas::new(u32::from(self.width), u32::from(self.height))
    }

    fn clear(&mut self) -> PosterResult<()> {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        Ok(())
    }

    fn draw_image(&mut self, image: &Image, src: CropRect, dest: Rect) -> PosterResult<()> {
        if !(src.source_w > 0.0 && src.source_h > 0.0) || dest.area() <= 0.0 {
            return Ok(());
        }

        let paint = image_paint(image)?;
        let window = src.as_rect();
        let sx = dest.width() / window.width();
        let sy = dest.height() / window.height();
        let paint_transform = vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy)
            * vello_cpu::kurbo::Affine::translate((-window.x0, -window.y0));

        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(paint_transform);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&rect_to_cpu(dest));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    fn draw_text(&mut self, text: &str, anchor: Point, font: &ResolvedFont) -> PosterResult<()> {
        let size_px = font.size_px as f32;
        let family = self.text.pick_family(&font.family)?.to_owned();

        let layout = self
            .text
            .layout_line(text, &family, size_px, font.weight, font.color)?;
        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(0.0);

        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            anchor.x,
            anchor.y - f64::from(baseline),
        )));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                // The face parley resolved for this run (weight and style within the family).
                self.ctx
                    .glyph_run(run.run().font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

/// Parley contexts plus the family names registered from a [`FontBook`].
struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Color>,
    families: Vec<String>,
}

impl TextLayoutEngine {
    fn new(book: &FontBook) -> PosterResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let mut families = Vec::with_capacity(book.faces().len());

        for face in book.faces() {
            let registered = font_ctx.collection.register_fonts(
                parley::fontique::Blob::from(face.bytes.as_ref().clone()),
                None,
            );
            let family_id = registered
                .first()
                .map(|(id, _)| *id)
                .ok_or_else(|| PosterError::font("no font families registered from font bytes"))?;
            let family = font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| PosterError::font("registered font family has no name"))?
                .to_string();

            tracing::debug!(%family, "registered font");
            families.push(family);
        }

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            families,
        })
    }

    /// Registered family matching `family` (ASCII case-insensitive), else the first one.
    ///
    /// Parley picks the concrete face (weight, style) within the family during shaping.
    fn pick_family(&self, family: &str) -> PosterResult<&str> {
        self.families
            .iter()
            .map(String::as_str)
            .find(|f| f.eq_ignore_ascii_case(family.trim()))
            .or_else(|| self.families.first().map(String::as_str))
            .ok_or_else(|| PosterError::font(format!("no font available for family '{family}'")))
    }

    fn layout_line(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        weight: u16,
        brush: Color,
    ) -> PosterResult<parley::Layout<Color>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PosterError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family.to_owned())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(weight)),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Color> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn image_paint(image: &Image) -> PosterResult<vello_cpu::Image> {
    let pixmap =
        image_premul_bytes_to_pixmap(image.rgba8_premul.as_slice(), image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PosterResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PosterError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PosterError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PosterError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
