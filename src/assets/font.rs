use std::{path::Path, sync::Arc};

use crate::foundation::error::{PosterError, PosterResult};

/// Raw font file bytes, as loaded from disk or embedded by the caller.
#[derive(Clone, Debug)]
pub struct FontFace {
    pub bytes: Arc<Vec<u8>>,
}

/// Fonts available to text drawing. Faces are tried by family name, first face wins otherwise.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: Vec<u8>) -> PosterResult<Self> {
        let mut book = Self::new();
        book.add_bytes(bytes)?;
        Ok(book)
    }

    pub fn add_bytes(&mut self, bytes: Vec<u8>) -> PosterResult<()> {
        if bytes.is_empty() {
            return Err(PosterError::font("font data is empty"));
        }
        self.faces.push(FontFace {
            bytes: Arc::new(bytes),
        });
        Ok(())
    }

    pub fn load(&mut self, path: &Path) -> PosterResult<()> {
        let bytes = std::fs::read(path)
            .map_err(|e| PosterError::font(format!("read font '{}': {e}", path.display())))?;
        self.add_bytes(bytes)
    }

    pub fn faces(&self) -> &[FontFace] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
