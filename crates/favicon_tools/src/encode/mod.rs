//! PNG encoders
//!
//! Two encoders with different trade-offs:
//! - `lossless`: `png` crate, stored (uncompressed) deflate blocks, 300 DPI
//!   `pHYs` chunk, no text chunks. Used by the high-quality renderer.
//! - `baseline`: `image`'s `PngEncoder` with best compression and adaptive
//!   filtering. Used by the exact-fit path and as the fallback.

mod baseline;
mod lossless;

pub use baseline::*;
pub use lossless::*;
