//! PNG export of a rendered poster.

use std::{
    io::Cursor,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    foundation::error::{PosterError, PosterResult},
    render::FrameRGBA,
};

pub fn encode_png(frame: &FrameRGBA) -> PosterResult<Vec<u8>> {
    let img = frame.to_rgba_image()?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PosterError::export(format!("encode png: {e}")))?;
    Ok(buf)
}

/// `poster-<unix millis>.png`. Times before the epoch clamp to zero.
pub fn timestamped_filename(at: SystemTime) -> String {
    let millis = at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("poster-{millis}.png")
}

/// Where a download lands: `out` itself when it names a `.png` file, otherwise a timestamped
/// file inside the `out` directory.
pub fn output_path(out: &Path, at: SystemTime) -> PathBuf {
    let is_png_file = out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        && !out.is_dir();
    if is_png_file {
        out.to_path_buf()
    } else {
        out.join(timestamped_filename(at))
    }
}

#[tracing::instrument(skip(frame), fields(width = frame.width, height = frame.height))]
pub fn save_png(frame: &FrameRGBA, out: &Path) -> PosterResult<PathBuf> {
    let path = output_path(out, SystemTime::now());
    let bytes = encode_png(frame)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            PosterError::export(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    std::fs::write(&path, bytes)
        .map_err(|e| PosterError::export(format!("write png '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), "saved poster");
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
