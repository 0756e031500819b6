//! # batch_imaging
//!
//! Batch image utilities for desktop workflows.
//!
//! ## Features
//!
//! - **Icon encoding**: multi-resolution `.ico` files with a three-step
//!   writer fallback, so a codec failure still yields a usable icon
//! - **Document merging**: ordered images into one multi-page PDF, width
//!   capped, never leaving a partial file behind
//! - **Resized copies**: width-capped PNG re-export
//! - **Worker pool**: bounded concurrency with pollable progress
//!
//! ## Usage
//!
//! ```bash
//! batch_imaging icon logo.png -o icons/ --sizes 16,32,48,256
//! batch_imaging merge scans/ -o out/ --max-width 2000 --png
//! batch_imaging prefs set workers 8
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod error;
pub mod explorer;
pub mod imaging;
pub mod pool;
pub mod preferences;

pub use cli::Args;
pub use error::{ConvertError, ConvertResult, ImagingError, Result};
pub use explorer::FileExplorer;
pub use imaging::{
    ConversionJob, IconConverter, IconSizes, JobResult, MergeJob, OutputFlags, encode_icon,
    export_resized_copies, merge_to_document, process_batch,
};
pub use pool::{BatchHandle, Progress, WorkerPool};
pub use preferences::{Preferences, PreferencesStore};
