//! posterkit composes a poster from a fixed template image, a user photo and three text fields.
//!
//! - [`compute_cover_crop`] fits a photo of any aspect ratio into a slot without distortion
//! - [`LayoutSpec`] describes the slots in fractions of the canvas; [`ResolvedLayout`] maps them
//!   onto a concrete template size
//! - [`PosterRenderer`] draws template, photo and text onto any [`RenderTarget`]
//! - [`PosterSession`] keeps the interactive state and exports PNG downloads
#![forbid(unsafe_code)]

pub mod assets;
pub mod compositor;
pub mod export;
mod foundation;
pub mod layout;
pub mod render;
pub mod session;

pub use crate::assets::{Color, FontBook, Image, decode_image, load_image};
pub use crate::compositor::{
    CoverPlacement, CropRect, Focus, compute_cover_crop, compute_cover_crop_centered,
    cover_placement,
};
pub use crate::export::{encode_png, save_png, timestamped_filename};
pub use crate::foundation::core::{Canvas, Point, Rect, Rgba8Premul, Size};
pub use crate::foundation::error::{PosterError, PosterResult};
pub use crate::layout::{
    FontSpec, FracPoint, FracRect, LayoutSpec, PhotoSlot, REFERENCE_WIDTH, ResolvedFont,
    ResolvedLayout, ResolvedText, TextField, TextSlot, resolve_font_size, resolve_point,
    resolve_rect,
};
pub use crate::render::{
    CpuTarget, DrawCall, FrameRGBA, PosterInputs, PosterRenderer, PosterText, RecordingTarget,
    RenderOutcome, RenderTarget,
};
pub use crate::session::{ImageSlot, LoadApplied, LoadTicket, PosterSession};
