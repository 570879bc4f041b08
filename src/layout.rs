pub mod resolve;
pub mod spec;

pub use resolve::{
    REFERENCE_WIDTH, ResolvedFont, ResolvedLayout, ResolvedText, resolve_font_size,
    resolve_point, resolve_rect,
};
pub use spec::{FontSpec, FracPoint, FracRect, LayoutSpec, PhotoSlot, TextField, TextSlot};
