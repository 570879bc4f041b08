use std::{path::Path, sync::Arc};

use crate::foundation::{
    core::{Canvas, Rgba8Premul, premultiply_rgba8_in_place},
    error::{PosterError, PosterResult},
};

/// Decoded raster in premultiplied RGBA8 form.
///
/// Pixels sit behind an `Arc`, so clones are cheap and the buffer is never mutated after decode.
#[derive(Clone, Debug)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    /// Row-major, tightly packed premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Image {
    /// Wrap an already-premultiplied buffer.
    pub fn from_premul_rgba8(
        width: u32,
        height: u32,
        rgba8_premul: Vec<u8>,
    ) -> PosterResult<Self> {
        if width == 0 || height == 0 {
            return Err(PosterError::validation("image dimensions must be > 0"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(PosterError::validation("image byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Single-color image, handy for templates and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PosterResult<Self> {
        let [r, g, b, a] = rgba;
        let px = Rgba8Premul::from_straight_rgba(r, g, b, a);
        let data = [px.r, px.g, px.b, px.a].repeat(width as usize * height as usize);
        Self::from_premul_rgba8(width, height, data)
    }

    pub fn size(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

pub fn decode_image(bytes: &[u8]) -> PosterResult<Image> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PosterError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Image::from_premul_rgba8(width, height, rgba8_premul)
}

pub fn load_image(path: &Path) -> PosterResult<Image> {
    let bytes = std::fs::read(path)
        .map_err(|e| PosterError::decode(format!("read image '{}': {e}", path.display())))?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
