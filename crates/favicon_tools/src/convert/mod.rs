//! Output format conversion and the generation pipeline

mod favicon;
mod ico;
mod svg;

pub use favicon::*;
pub use ico::*;
pub use svg::*;
