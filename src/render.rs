pub mod cpu;
pub mod poster;
pub mod target;

use crate::foundation::{
    core::Rgba8Premul,
    error::{PosterError, PosterResult},
};

/// A rendered poster as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha image buffer, ready for encoding.
    pub fn to_rgba_image(&self) -> PosterResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            for px in data.chunks_exact_mut(4) {
                let straight = Rgba8Premul {
                    r: px[0],
                    g: px[1],
                    b: px[2],
                    a: px[3],
                }
                .to_straight_rgba();
                px.copy_from_slice(&straight);
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| PosterError::render("frame byte length mismatch"))
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

pub use cpu::CpuTarget;
pub use poster::{PosterInputs, PosterRenderer, PosterText, RenderOutcome};
pub use target::{DrawCall, RecordingTarget, RenderTarget};
