//! Multi-resolution ICO encoding with a degrade-gracefully writer chain.
//!
//! The source image is decoded once and normalized to RGBA, then handed to
//! each [`IconWriter`] in turn until one succeeds:
//!
//! | Tier | Writer | Output |
//! |------|--------|--------|
//! | 1 | [`CodecMultiFrame`] | every size, PNG frames via the image codec |
//! | 2 | [`ResizedFrames`] | every size, pre-resized frames via the `ico` container |
//! | 3 | [`LargestOnly`] | only the largest size |
//!
//! Each tier runs at most once. Only when all of them fail is the last
//! error reported.

use crate::error::{ConvertError, ConvertResult, ErrorExt};
use crate::imaging::scale::{open_rgba, square};
use crate::imaging::sizes::IconSizes;
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::{DynamicImage, ExtendedColorType, ImageFormat, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// One attempt at writing an icon container.
pub trait IconWriter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Write `image` as an icon at `output` using `sizes`.
    fn write(&self, image: &RgbaImage, sizes: &IconSizes, output: &Path) -> ConvertResult<()>;
}

/// Tier 1: all sizes at once through the image crate's ICO encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodecMultiFrame;

impl IconWriter for CodecMultiFrame {
    fn name(&self) -> &'static str {
        "codec-multi-frame"
    }

    fn write(&self, image: &RgbaImage, sizes: &IconSizes, output: &Path) -> ConvertResult<()> {
        let mut frames = Vec::with_capacity(sizes.len());
        for &size in sizes.as_slice() {
            let resized = square(image, size);
            let frame = IcoFrame::as_png(resized.as_raw(), size, size, ExtendedColorType::Rgba8)
                .output_context(output)?;
            frames.push(frame);
        }

        let file = File::create(output).output_context(output)?;
        IcoEncoder::new(BufWriter::new(file))
            .encode_images(&frames)
            .output_context(output)
    }
}

/// Tier 2: resize to every size first, then assemble the container largest first.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResizedFrames;

impl IconWriter for ResizedFrames {
    fn name(&self) -> &'static str {
        "resized-frames"
    }

    fn write(&self, image: &RgbaImage, sizes: &IconSizes, output: &Path) -> ConvertResult<()> {
        let variants: Vec<RgbaImage> = sizes.as_slice().iter().map(|&s| square(image, s)).collect();

        let mut icon_dir = IconDir::new(ResourceType::Icon);
        for variant in variants.into_iter().rev() {
            let (w, h) = variant.dimensions();
            log::debug!("Adding {}x{} frame to {}", w, h, output.display());
            let icon_image = IconImage::from_rgba_data(w, h, variant.into_raw());
            let entry = IconDirEntry::encode(&icon_image).output_context(output)?;
            icon_dir.add_entry(entry);
        }

        let file = File::create(output).output_context(output)?;
        icon_dir.write(BufWriter::new(file)).output_context(output)
    }
}

/// Tier 3: a single frame at the largest requested size.
#[derive(Debug, Default, Clone, Copy)]
pub struct LargestOnly;

impl IconWriter for LargestOnly {
    fn name(&self) -> &'static str {
        "largest-only"
    }

    fn write(&self, image: &RgbaImage, sizes: &IconSizes, output: &Path) -> ConvertResult<()> {
        let largest = square(image, sizes.largest());
        DynamicImage::ImageRgba8(largest)
            .save_with_format(output, ImageFormat::Ico)
            .output_context(output)
    }
}

/// Icon encoder holding the ordered writer chain.
///
/// Stateless between calls; one instance can be shared by every worker as
/// long as the output paths are disjoint.
pub struct IconConverter {
    tiers: Vec<Box<dyn IconWriter>>,
}

impl Default for IconConverter {
    fn default() -> Self {
        Self {
            tiers: vec![
                Box::new(CodecMultiFrame),
                Box::new(ResizedFrames),
                Box::new(LargestOnly),
            ],
        }
    }
}

impl std::fmt::Debug for IconConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.tiers.iter().map(|t| t.name()).collect();
        f.debug_struct("IconConverter").field("tiers", &names).finish()
    }
}

impl IconConverter {
    /// Converter with a custom writer chain
    pub fn with_tiers(tiers: Vec<Box<dyn IconWriter>>) -> Self {
        Self { tiers }
    }

    /// Encode `source` into a multi-size icon at `output`.
    pub fn encode(&self, source: &Path, output: &Path, sizes: &IconSizes) -> ConvertResult<()> {
        log::debug!(
            "Converting {} -> {}, sizes: {}",
            source.display(),
            output.display(),
            sizes
        );

        let image = open_rgba(source)?;

        let mut last_error = None;
        for (idx, tier) in self.tiers.iter().enumerate() {
            match tier.write(&image, sizes, output) {
                Ok(()) => {
                    if idx == 0 {
                        log::info!("ICO saved: {}", output.display());
                    } else {
                        log::warn!(
                            "ICO saved with fallback '{}': {}",
                            tier.name(),
                            output.display()
                        );
                    }
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("Icon writer '{}' failed: {}", tier.name(), e);
                    last_error = Some(e);
                }
            }
        }

        let err = last_error.unwrap_or_else(|| ConvertError::OutputUnwritable {
            path: output.to_path_buf(),
            reason: "no icon writers configured".to_string(),
        });
        // A failed writer may have left a truncated container behind.
        if output.exists() && std::fs::remove_file(output).is_err() {
            log::warn!("Could not remove incomplete icon {}", output.display());
        }
        log::error!("ICO conversion failed for {}: {}", source.display(), err);
        Err(err)
    }

    /// Encode `source` to `<output_dir>/<stem>.ico` and return the written path.
    pub fn encode_into_dir(
        &self,
        source: &Path,
        output_dir: &Path,
        sizes: &IconSizes,
    ) -> ConvertResult<PathBuf> {
        let output = icon_output_path(source, output_dir)?;
        self.encode(source, &output, sizes)?;
        Ok(output)
    }
}

/// `<output_dir>/<source stem>.ico`
pub fn icon_output_path(source: &Path, output_dir: &Path) -> ConvertResult<PathBuf> {
    let stem = source.file_stem().ok_or_else(|| ConvertError::SourceUnreadable {
        path: source.to_path_buf(),
        reason: "path has no file name".to_string(),
    })?;
    let mut name = stem.to_os_string();
    name.push(".ico");
    Ok(output_dir.join(name))
}

/// Encode `source` as an icon holding every size in `sizes`.
///
/// The size list is validated before any file is touched.
pub fn encode_icon(source: &Path, output: &Path, sizes: &[u32]) -> ConvertResult<()> {
    let sizes = IconSizes::new(sizes.iter().copied())?;
    IconConverter::default().encode(source, output, &sizes)
}

/// Encode `source` into `<output_dir>/<stem>.ico`.
pub fn convert_to_icon_in_dir(
    source: &Path,
    output_dir: &Path,
    sizes: &[u32],
) -> ConvertResult<PathBuf> {
    let sizes = IconSizes::new(sizes.iter().copied())?;
    IconConverter::default().encode_into_dir(source, output_dir, &sizes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing(Arc<AtomicUsize>);

    impl IconWriter for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn write(&self, _: &RgbaImage, _: &IconSizes, output: &Path) -> ConvertResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(ConvertError::OutputUnwritable {
                path: output.to_path_buf(),
                reason: "simulated".to_string(),
            })
        }
    }

    struct Truncating;

    impl IconWriter for Truncating {
        fn name(&self) -> &'static str {
            "truncating"
        }

        fn write(&self, _: &RgbaImage, _: &IconSizes, output: &Path) -> ConvertResult<()> {
            std::fs::write(output, [0u8, 0, 1]).output_context(output)?;
            Err(ConvertError::OutputUnwritable {
                path: output.to_path_buf(),
                reason: "stream ended early".to_string(),
            })
        }
    }

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, image::Rgba([200, 10, 10, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_falls_back_to_second_tier() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_png(dir.path(), "a.png", 64, 64);
        let out = dir.path().join("a.ico");
        let calls = Arc::new(AtomicUsize::new(0));

        let converter =
            IconConverter::with_tiers(vec![Box::new(Failing(calls.clone())), Box::new(ResizedFrames)]);
        converter
            .encode(&src, &out, &IconSizes::new([16, 32]).unwrap())
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let icon = IconDir::read(File::open(&out).unwrap()).unwrap();
        assert_eq!(icon.entries().len(), 2);
    }

    #[test]
    fn test_all_tiers_fail_reports_last_error_once_each() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_png(dir.path(), "a.png", 8, 8);
        let out = dir.path().join("a.ico");
        let calls = Arc::new(AtomicUsize::new(0));

        let converter = IconConverter::with_tiers(vec![
            Box::new(Failing(calls.clone())),
            Box::new(Failing(calls.clone())),
            Box::new(Failing(calls.clone())),
        ]);
        let err = converter
            .encode(&src, &out, &IconSizes::default())
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(err.kind(), "OutputUnwritable");
    }

    #[test]
    fn test_unreadable_source_skips_writers() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let converter = IconConverter::with_tiers(vec![Box::new(Failing(calls.clone()))]);

        let err = converter
            .encode(
                &dir.path().join("missing.png"),
                &dir.path().join("x.ico"),
                &IconSizes::default(),
            )
            .unwrap_err();

        assert_eq!(err.kind(), "SourceUnreadable");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_third_tier_writes_single_largest_frame() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_png(dir.path(), "a.png", 100, 60);
        let out = dir.path().join("a.ico");
        let calls = Arc::new(AtomicUsize::new(0));

        let converter = IconConverter::with_tiers(vec![
            Box::new(Failing(calls.clone())),
            Box::new(Failing(calls.clone())),
            Box::new(LargestOnly),
        ]);
        converter
            .encode(&src, &out, &IconSizes::new([16, 48]).unwrap())
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let icon = IconDir::read(File::open(&out).unwrap()).unwrap();
        assert_eq!(icon.entries().len(), 1);
        assert_eq!((icon.entries()[0].width(), icon.entries()[0].height()), (48, 48));
    }

    #[test]
    fn test_failed_encode_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_png(dir.path(), "a.png", 16, 16);
        let out = dir.path().join("a.ico");

        let converter = IconConverter::with_tiers(vec![Box::new(Truncating)]);
        let err = converter
            .encode(&src, &out, &IconSizes::default())
            .unwrap_err();

        assert_eq!(err.kind(), "OutputUnwritable");
        assert!(!out.exists());
    }

    #[test]
    fn test_convert_to_icon_in_dir_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_png(dir.path(), "badge.png", 40, 40);
        let out_dir = dir.path().join("icons");
        std::fs::create_dir(&out_dir).unwrap();

        let out = convert_to_icon_in_dir(&src, &out_dir, &[16, 32]).unwrap();

        assert_eq!(out, out_dir.join("badge.ico"));
        let icon = IconDir::read(File::open(&out).unwrap()).unwrap();
        let widths: Vec<u32> = icon.entries().iter().map(|e| e.width()).collect();
        assert!(widths.contains(&16) && widths.contains(&32));
        icon.entries()[0].decode().unwrap();
    }

    #[test]
    fn test_icon_output_path_uses_stem() {
        let out = icon_output_path(Path::new("/in/photo.final.jpg"), Path::new("/out")).unwrap();
        assert_eq!(out, PathBuf::from("/out/photo.final.ico"));
    }

    #[test]
    fn test_empty_sizes_rejected_before_io() {
        let err = encode_icon(Path::new("missing.png"), Path::new("x.ico"), &[]).unwrap_err();
        assert_eq!(err.kind(), "UnsupportedSizeSet");
    }
}
