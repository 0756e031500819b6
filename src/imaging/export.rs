//! Size-capped PNG re-export.

use crate::error::{ConvertError, ConvertResult, ErrorExt};
use crate::imaging::document::display_name;
use crate::imaging::scale::open_rgb_capped;
use image::ImageFormat;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Output paths handed out within one batch, keyed to their source.
///
/// Two sources sharing a stem (`logo.png`, `logo.bmp`) would otherwise map
/// to the same file. The first keeps `<stem>.<ext>`, later ones fall back to
/// `<file name>.<ext>`. The same source given twice is refused.
#[derive(Debug, Default)]
pub struct OutputClaims {
    owners: HashMap<PathBuf, PathBuf>,
}

impl OutputClaims {
    /// Empty claim set
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an output for `source`, starting from `preferred`.
    ///
    /// Returns `Err` with the contested path when no distinct output is left.
    pub fn claim(
        &mut self,
        source: &Path,
        preferred: PathBuf,
        extension: &str,
    ) -> std::result::Result<PathBuf, PathBuf> {
        let owner = match self.owners.get(&preferred) {
            None => {
                self.owners.insert(preferred.clone(), source.to_path_buf());
                return Ok(preferred);
            }
            Some(owner) => owner.clone(),
        };
        if owner == source {
            return Err(preferred);
        }

        let mut name = source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(extension);
        let fallback = preferred.with_file_name(name);
        if self.owners.contains_key(&fallback) {
            return Err(preferred);
        }

        log::warn!(
            "{} already written from {}; using {}",
            preferred.display(),
            display_name(&owner),
            fallback.display()
        );
        self.owners.insert(fallback.clone(), source.to_path_buf());
        Ok(fallback)
    }
}

/// Create `dir` and its parents if missing. Succeeds when it already exists.
pub fn ensure_dir(dir: &Path) -> ConvertResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).output_context(dir)?;
    log::debug!("Directory created: {}", dir.display());
    Ok(())
}

/// `<output_dir>/<source stem>.png`
pub fn png_output_path(source: &Path, output_dir: &Path) -> ConvertResult<PathBuf> {
    let stem = source.file_stem().ok_or_else(|| ConvertError::SourceUnreadable {
        path: source.to_path_buf(),
        reason: "path has no file name".to_string(),
    })?;
    let mut name = stem.to_os_string();
    name.push(".png");
    Ok(output_dir.join(name))
}

/// Export every image as an RGB PNG no wider than `max_width`.
///
/// Stops at the first image that cannot be read or written; copies already
/// exported stay on disk. Inputs sharing a stem are kept apart by
/// [`OutputClaims`]; a repeated input is exported once.
pub fn export_resized_copies<P: AsRef<Path>>(
    ordered_paths: &[P],
    output_dir: &Path,
    max_width: u32,
) -> ConvertResult<String> {
    let exported = export_counted(ordered_paths, output_dir, max_width)?;
    Ok(format!("{exported} images exported as PNG"))
}

/// [`export_resized_copies`], returning the number of files written.
pub(crate) fn export_counted<P: AsRef<Path>>(
    ordered_paths: &[P],
    output_dir: &Path,
    max_width: u32,
) -> ConvertResult<usize> {
    if ordered_paths.is_empty() {
        return Err(ConvertError::EmptyInput);
    }
    ensure_dir(output_dir)?;

    log::debug!(
        "Exporting {} images as PNG to {}",
        ordered_paths.len(),
        output_dir.display()
    );

    let total = ordered_paths.len();
    let mut claims = OutputClaims::new();
    let mut exported = 0;
    for (idx, path) in ordered_paths.iter().enumerate() {
        let path = path.as_ref();
        let output = match claims.claim(path, png_output_path(path, output_dir)?, "png") {
            Ok(output) => output,
            Err(existing) => {
                log::warn!(
                    "Skipping repeated input {}: {} already exported",
                    display_name(path),
                    existing.display()
                );
                continue;
            }
        };
        let img = open_rgb_capped(path, max_width).inspect_err(|e| {
            log::warn!("Failed to export {}: {}", display_name(path), e);
        })?;
        img.save_with_format(&output, ImageFormat::Png)
            .output_context(&output)?;
        exported += 1;
        log::debug!("[{}/{}] PNG exported: {}", idx + 1, total, output.display());
    }

    log::info!("Export complete: {} images as PNG", exported);
    Ok(exported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_claims_fall_back_to_full_name() {
        let mut claims = OutputClaims::new();
        let out = Path::new("/out");
        let first = claims
            .claim(Path::new("/in/logo.png"), out.join("logo.ico"), "ico")
            .unwrap();
        let second = claims
            .claim(Path::new("/in/logo.bmp"), out.join("logo.ico"), "ico")
            .unwrap();

        assert_eq!(first, PathBuf::from("/out/logo.ico"));
        assert_eq!(second, PathBuf::from("/out/logo.bmp.ico"));
    }

    #[test]
    fn test_claims_refuse_repeated_source() {
        let mut claims = OutputClaims::new();
        let src = Path::new("/in/logo.png");
        claims.claim(src, PathBuf::from("/out/logo.ico"), "ico").unwrap();

        let err = claims
            .claim(src, PathBuf::from("/out/logo.ico"), "ico")
            .unwrap_err();
        assert_eq!(err, PathBuf::from("/out/logo.ico"));
    }

    #[test]
    fn test_same_stem_exports_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("scan.png");
        let jpg = dir.path().join("scan.jpg");
        RgbImage::from_pixel(10, 4, Rgb([1, 2, 3])).save(&png).unwrap();
        RgbImage::from_pixel(20, 4, Rgb([4, 5, 6])).save(&jpg).unwrap();
        let out = dir.path().join("out");

        export_resized_copies(&[&png, &jpg], &out, 3000).unwrap();

        assert_eq!(image::image_dimensions(out.join("scan.png")).unwrap(), (10, 4));
        assert_eq!(
            image::image_dimensions(out.join("scan.jpg.png")).unwrap(),
            (20, 4)
        );
    }
}
