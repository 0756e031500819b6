//! Supported file extensions and their codec formats.

use image::ImageFormat;

/// Extension tables shared by the explorer, the CLI and the converters.
pub struct ImageFormats;

impl ImageFormats {
    /// Extensions accepted as conversion input
    pub const INPUT_EXTENSIONS: &'static [&'static str] = &[
        ".png", ".jpg", ".jpeg", ".tif", ".tiff", ".bmp", ".gif", ".webp",
    ];

    /// Formats accepted as conversion output
    pub const OUTPUT_FORMATS: &'static [&'static str] =
        &["ico", "png", "jpg", "jpeg", "bmp", "gif", "webp", "tiff"];

    /// Output format names
    pub fn output_formats() -> Vec<String> {
        Self::OUTPUT_FORMATS.iter().map(|e| e.to_string()).collect()
    }

    /// Codec format for an extension, with or without the leading dot.
    pub fn format_for_extension(extension: &str) -> Option<ImageFormat> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "tif" | "tiff" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "ico" => Some(ImageFormat::Ico),
            _ => None,
        }
    }
}
