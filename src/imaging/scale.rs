//! Image loading and width-capped scaling.
//!
//! All shrinking goes through [`RESAMPLE_FILTER`] (Lanczos3).

use crate::error::{ConvertResult, ErrorExt};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, RgbaImage};
use std::path::Path;

/// High-quality filter used for every resize
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Open and decode an image, mapping every failure to `SourceUnreadable`.
pub fn open_image(path: &Path) -> ConvertResult<DynamicImage> {
    image::open(path).source_context(path)
}

/// Open an image normalized to RGBA8.
pub fn open_rgba(path: &Path) -> ConvertResult<RgbaImage> {
    Ok(open_image(path)?.to_rgba8())
}

/// Open an image in RGB8 (alpha and palette stripped) with its width capped.
pub fn open_rgb_capped(path: &Path, max_width: u32) -> ConvertResult<RgbImage> {
    let rgb = open_image(path)?.to_rgb8();
    Ok(cap_width(rgb, max_width))
}

/// Dimensions after capping `width` at `max_width`.
///
/// Height is scaled proportionally and floored, never below 1. Images at or
/// under the cap are returned unchanged; nothing is ever upscaled.
pub fn fit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if max_width == 0 || width <= max_width {
        return (width, height);
    }
    let scaled = (u64::from(height) * u64::from(max_width)) / u64::from(width);
    (max_width, scaled.max(1) as u32)
}

/// Shrink an RGB image so its width does not exceed `max_width`.
pub fn cap_width(img: RgbImage, max_width: u32) -> RgbImage {
    let (w, h) = fit_width(img.width(), img.height(), max_width);
    if (w, h) == img.dimensions() {
        return img;
    }
    image::imageops::resize(&img, w, h, RESAMPLE_FILTER)
}

/// Resize an RGBA image to an exact square edge.
pub fn square(img: &RgbaImage, size: u32) -> RgbaImage {
    if img.dimensions() == (size, size) {
        return img.clone();
    }
    image::imageops::resize(img, size, size, RESAMPLE_FILTER)
}
