//! Resampling filter selection

use image::imageops::FilterType;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Fastest, lowest quality
    Nearest,
    /// Balanced speed/quality
    Bilinear,
    /// Sharper than bilinear, cheaper than Lanczos
    CatmullRom,
    /// Best quality, slower
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    /// Equivalent filter of the baseline `image` resizer
    pub fn to_image_filter(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
