//! Multi-page PDF assembly from an ordered image list.
//!
//! Every page is one RGB raster at 72 dpi, so the page size in points equals
//! the (possibly width-capped) pixel size. Page order is input order.

use crate::error::{ConvertError, ConvertResult, ErrorExt};
use crate::imaging::scale::open_rgb_capped;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::io::Write;
use std::path::{Path, PathBuf};

const PDF_VERSION: &str = "1.5";
const IMAGE_NAME: &[u8] = b"Im0";

/// Merge `ordered_paths` into a single PDF at `output`.
///
/// Any image that fails to open aborts the merge before anything is
/// written. The document is assembled in memory and moved into place only
/// after a successful save, so a failed merge never leaves a partial file.
pub fn merge_to_document<P: AsRef<Path>>(
    ordered_paths: &[P],
    output: &Path,
    max_width: u32,
) -> ConvertResult<String> {
    if ordered_paths.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    log::debug!(
        "Merging {} images into {}",
        ordered_paths.len(),
        output.display()
    );

    let total = ordered_paths.len();
    let mut pages = Vec::with_capacity(total);
    for (idx, path) in ordered_paths.iter().enumerate() {
        let path = path.as_ref();
        let page = open_rgb_capped(path, max_width).inspect_err(|e| {
            log::warn!("Failed to process {}: {}", display_name(path), e);
        })?;
        log::debug!("[{}/{}] Page ready: {}", idx + 1, total, display_name(path));
        pages.push(page);
    }

    write_pdf(&pages, output)?;

    log::info!("PDF created: {} ({} pages)", output.display(), pages.len());
    Ok(format!(
        "PDF created: {} ({} pages)",
        display_name(output),
        pages.len()
    ))
}

/// Write already-decoded pages as one PDF document.
pub fn write_pdf(pages: &[RgbImage], output: &Path) -> ConvertResult<()> {
    if pages.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let (w, h) = page.dimensions();
        let (w, h) = (i64::from(w), i64::from(h));

        let pixels = deflate(page.as_raw()).output_context(output)?;
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => w,
                "Height" => h,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "FlateDecode",
            },
            pixels,
        ));

        // Scale the unit image square up to the full page.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![w.into(), 0.into(), 0.into(), h.into(), 0.into(), 0.into()],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().output_context(output)?,
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), w.into(), h.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let staging = staging_path(output);
    if let Err(e) = doc.save(&staging).output_context(output) {
        let _ = std::fs::remove_file(&staging);
        return Err(e);
    }
    std::fs::rename(&staging, output).output_context(output).inspect_err(|_| {
        let _ = std::fs::remove_file(&staging);
    })
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Hidden sibling of `output` used while the document is being written.
fn staging_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    output.with_file_name(format!(".{name}.tmp"))
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        assert_eq!(
            staging_path(Path::new("/out/doc.pdf")),
            PathBuf::from("/out/.doc.pdf.tmp")
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        let paths: Vec<PathBuf> = Vec::new();
        let err = merge_to_document(&paths, Path::new("never.pdf"), 100).unwrap_err();
        assert_eq!(err, ConvertError::EmptyInput);
        assert!(!Path::new("never.pdf").exists());
    }

    #[test]
    fn test_write_pdf_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("two.pdf");
        write_pdf(&[RgbImage::new(4, 3), RgbImage::new(5, 2)], &out).unwrap();

        let doc = Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        assert!(!staging_path(&out).exists());
    }
}
