pub mod color;
pub mod decode;
pub mod font;

pub use color::Color;
pub use decode::{Image, decode_image, load_image};
pub use font::{FontBook, FontFace};
