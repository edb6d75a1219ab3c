//! Raster adapter over the `image` and `resvg` crates
//!
//! Decoding, resizing, transparent canvases and alpha-aware compositing.
//! Everything above this module works on `DynamicImage` / `RgbaImage`.

mod canvas;
mod decode;

pub use canvas::*;
pub use decode::*;
