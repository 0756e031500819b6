//! Batch orchestration: resized copies and/or one merged document.

use crate::error::{ConvertError, ConvertResult};
use crate::imaging::document::{display_name, merge_to_document};
use crate::imaging::export::{ensure_dir, export_counted};
use std::path::Path;

/// Default width cap in pixels
pub const DEFAULT_MAX_WIDTH: u32 = 3000;

/// Default merged document file name
pub const DEFAULT_DOCUMENT_NAME: &str = "document.pdf";

/// Run a batch with the default document name.
///
/// See [`process_batch_named`].
pub fn process_batch<P: AsRef<Path>>(
    ordered_paths: &[P],
    output_dir: &Path,
    max_width: u32,
    emit_document: bool,
    emit_resized_copies: bool,
) -> ConvertResult<String> {
    process_batch_named(
        ordered_paths,
        output_dir,
        max_width,
        emit_document,
        emit_resized_copies,
        DEFAULT_DOCUMENT_NAME,
    )
}

/// Export resized copies (if requested), then merge the document (if
/// requested). The first failing step ends the batch and its error is
/// returned unchanged.
///
/// Input and flag validation happen before any filesystem access.
pub fn process_batch_named<P: AsRef<Path>>(
    ordered_paths: &[P],
    output_dir: &Path,
    max_width: u32,
    emit_document: bool,
    emit_resized_copies: bool,
    document_name: &str,
) -> ConvertResult<String> {
    if ordered_paths.is_empty() {
        return Err(ConvertError::EmptyInput);
    }
    if !emit_document && !emit_resized_copies {
        return Err(ConvertError::NoOutputFormatSelected);
    }

    ensure_dir(output_dir)?;

    log::debug!(
        "Processing batch: {} images, PDF={}, PNG={}",
        ordered_paths.len(),
        emit_document,
        emit_resized_copies
    );

    let exported = if emit_resized_copies {
        export_counted(ordered_paths, output_dir, max_width)?
    } else {
        0
    };

    if emit_document {
        let document = output_dir.join(document_name);
        merge_to_document(ordered_paths, &document, max_width)?;
    }

    let mut summary = Vec::new();
    if emit_document {
        summary.push(format!("PDF: {document_name}"));
    }
    if emit_resized_copies {
        summary.push(format!("{exported} PNGs"));
    }

    log::info!("Batch processing complete");
    Ok(format!("Batch complete: {}", summary.join(", ")))
}

/// Every problem found in `paths`; empty when all inputs can be decoded.
pub fn validate_images<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    let mut errors = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            errors.push(format!("File not found: {}", path.display()));
            continue;
        }

        let probe = image::ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| e.to_string())
            .and_then(|r| r.decode().map_err(|e| e.to_string()));
        if let Err(e) = probe {
            errors.push(format!("Invalid image ({}): {}", display_name(path), e));
        }
    }

    log::debug!(
        "Validation: {} images, {} errors",
        paths.len(),
        errors.len()
    );
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_input_checked_first() {
        let paths: Vec<PathBuf> = Vec::new();
        let err = process_batch(&paths, Path::new("unused"), 100, false, false).unwrap_err();
        assert_eq!(err, ConvertError::EmptyInput);
    }

    #[test]
    fn test_no_format_rejected_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never-created");
        let err = process_batch(&[PathBuf::from("a.png")], &out, 100, false, false).unwrap_err();
        assert_eq!(err, ConvertError::NoOutputFormatSelected);
        assert!(!out.exists());
    }

    #[test]
    fn test_summary_counts_distinct_copies() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("scan.png");
        let jpg = dir.path().join("scan.jpg");
        image::RgbImage::new(4, 4).save(&png).unwrap();
        image::RgbImage::new(6, 4).save(&jpg).unwrap();
        let out = dir.path().join("out");

        let message =
            process_batch(&[png.clone(), jpg, png], &out, 3000, false, true).unwrap();

        assert_eq!(message, "Batch complete: 2 PNGs");
        assert!(out.join("scan.png").exists());
        assert!(out.join("scan.jpg.png").exists());
    }

    #[test]
    fn test_validate_reports_missing_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let corrupt = dir.path().join("bad.png");
        std::fs::write(&corrupt, b"not an image").unwrap();
        let good = dir.path().join("good.png");
        image::RgbImage::new(2, 2).save(&good).unwrap();

        let errors = validate_images(&[dir.path().join("missing.png"), corrupt, good]);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("File not found"));
        assert!(errors[1].contains("bad.png"));
    }
}
