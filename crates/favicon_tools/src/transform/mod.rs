//! Resampling and exact-fit resizing

mod filter;
mod fit;

pub use filter::*;
pub use fit::*;
