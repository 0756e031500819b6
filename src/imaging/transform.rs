//! Single-file format conversion, exact resizing and metadata lookup.

use crate::error::{ConvertError, ConvertResult, ErrorExt};
use crate::imaging::formats::ImageFormats;
use crate::imaging::scale::{RESAMPLE_FILTER, open_image};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use serde::Serialize;
use std::path::Path;

/// Basic facts about an image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected container format, e.g. `Png`
    pub format: Option<String>,
    /// Decoded color model, e.g. `Rgba8`
    pub color: String,
}

/// Re-encode `input` as `output`.
///
/// When `format` is `None` it is inferred from the output extension. JPEG
/// cannot carry alpha, so the image is flattened to RGB first.
pub fn convert_image_format(
    input: &Path,
    output: &Path,
    format: Option<ImageFormat>,
) -> ConvertResult<()> {
    let format = match format {
        Some(f) => f,
        None => {
            let ext = output
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            ImageFormats::format_for_extension(&ext).ok_or_else(|| {
                ConvertError::OutputUnwritable {
                    path: output.to_path_buf(),
                    reason: format!(
                        "unknown output format '{ext}', expected one of: {}",
                        ImageFormats::output_formats().join(", ")
                    ),
                }
            })?
        }
    };

    log::debug!(
        "Converting {} -> {} as {:?}",
        input.display(),
        output.display(),
        format
    );

    let mut img = open_image(input)?;
    if format == ImageFormat::Jpeg && img.color().has_alpha() {
        img = DynamicImage::ImageRgb8(img.to_rgb8());
    }

    img.save_with_format(output, format).output_context(output)?;
    log::info!("Image converted: {}", output.display());
    Ok(())
}

/// Resize `input` to exactly `width`×`height` and save it as `output`.
pub fn resize_image(input: &Path, output: &Path, width: u32, height: u32) -> ConvertResult<()> {
    if width == 0 || height == 0 {
        return Err(ConvertError::OutputUnwritable {
            path: output.to_path_buf(),
            reason: format!("invalid target size {width}x{height}"),
        });
    }

    log::debug!("Resizing {} to {}x{}", input.display(), width, height);
    let img = open_image(input)?;
    let resized = img.resize_exact(width, height, RESAMPLE_FILTER);
    resized.save(output).output_context(output)?;
    log::info!("Image resized: {}", output.display());
    Ok(())
}

/// Dimensions, container format and color model of `path`.
pub fn image_info(path: &Path) -> ConvertResult<ImageInfo> {
    let reader = ImageReader::open(path)
        .source_context(path)?
        .with_guessed_format()
        .source_context(path)?;
    let format = reader.format().map(|f| format!("{f:?}"));
    let img = reader.decode().source_context(path)?;

    Ok(ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        color: color_name(img.color()),
    })
}

fn color_name(color: ColorType) -> String {
    format!("{color:?}")
}
