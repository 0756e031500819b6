//! Image conversion and merge utilities.
//!
//! Every operation here is synchronous, blocking and stateless: it only
//! touches the paths it is given, so it can run concurrently from a worker
//! pool as long as output paths are disjoint. Scheduling and progress
//! reporting live in [`crate::pool`].
//!
//! | Operation | Output |
//! |-----------|--------|
//! | [`encode_icon`] | one multi-size `.ico` |
//! | [`merge_to_document`] | one multi-page `.pdf`, input order preserved |
//! | [`export_resized_copies`] | one width-capped `.png` per input |
//! | [`process_batch`] | copies and/or document, short-circuiting on failure |

mod batch;
mod document;
mod export;
mod formats;
mod icon;
mod jobs;
mod scale;
mod sizes;
mod transform;

pub use batch::{
    DEFAULT_DOCUMENT_NAME, DEFAULT_MAX_WIDTH, process_batch, process_batch_named, validate_images,
};
pub use document::{merge_to_document, write_pdf};
pub use export::{OutputClaims, ensure_dir, export_resized_copies, png_output_path};
pub use formats::ImageFormats;
pub use icon::{
    CodecMultiFrame, IconConverter, IconWriter, LargestOnly, ResizedFrames,
    convert_to_icon_in_dir, encode_icon, icon_output_path,
};
pub use jobs::{ConversionJob, JobResult, MergeJob, OutputFlags};
pub use scale::{RESAMPLE_FILTER, fit_width};
pub use sizes::{DEFAULT_SIZES, IconSizes, MAX_ICON_SIZE, STANDARD_SIZES};
pub use transform::{ImageInfo, convert_image_format, image_info, resize_image};
