use kurbo::{Point, Rect};

use crate::{
    assets::decode::Image,
    compositor::CropRect,
    foundation::{core::Canvas, error::PosterResult},
    layout::resolve::ResolvedFont,
};

/// A 2D surface the poster renderer draws onto.
///
/// Implementations must treat each call as a complete drawing step in call order: later calls
/// paint over earlier ones.
pub trait RenderTarget {
    fn size(&self) -> Canvas;

    /// Drop all previously drawn content.
    fn clear(&mut self) -> PosterResult<()>;

    /// Scale the `src` window of `image` onto `dest` in a single blit.
    fn draw_image(&mut self, image: &Image, src: CropRect, dest: Rect) -> PosterResult<()>;

    /// Draw one left-aligned line of text whose baseline starts at `anchor`.
    fn draw_text(&mut self, text: &str, anchor: Point, font: &ResolvedFont) -> PosterResult<()>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear,
    Image {
        width: u32,
        height: u32,
        src: CropRect,
        dest: Rect,
    },
    Text {
        text: String,
        anchor: Point,
        font: ResolvedFont,
    },
}

/// Records draw calls instead of rasterizing them.
#[derive(Clone, Debug)]
pub struct RecordingTarget {
    canvas: Canvas,
    calls: Vec<DrawCall>,
}

impl RecordingTarget {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Text strings drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn image_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Image { .. }))
            .count()
    }
}

impl RenderTarget for RecordingTarget {
    fn size(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self) -> PosterResult<()> {
        self.calls.push(DrawCall::Clear);
        Ok(())
    }

    fn draw_image(&mut self, image: &Image, src: CropRect, dest: Rect) -> PosterResult<()> {
        self.calls.push(DrawCall::Image {
            width: image.width,
            height: image.height,
            src,
            dest,
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, anchor: Point, font: &ResolvedFont) -> PosterResult<()> {
        self.calls.push(DrawCall::Text {
            text: text.to_owned(),
            anchor,
            font: font.clone(),
        });
        Ok(())
    }
}
