//! Job descriptions handed to worker threads.

use crate::error::{ConvertError, ConvertResult};
use crate::imaging::batch::{DEFAULT_DOCUMENT_NAME, DEFAULT_MAX_WIDTH, process_batch_named};
use crate::imaging::export::OutputClaims;
use crate::imaging::icon::{IconConverter, icon_output_path};
use crate::imaging::sizes::IconSizes;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of one job: a flag and a human readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    /// Whether the job finished successfully
    pub success: bool,
    /// Summary or failure description
    pub message: String,
}

impl JobResult {
    /// Successful result
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Failed result
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<ConvertResult<String>> for JobResult {
    fn from(result: ConvertResult<String>) -> Self {
        match result {
            Ok(message) => Self::ok(message),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

/// Encode one source image as a multi-size icon.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Image to read
    pub source_path: PathBuf,
    /// Sizes to embed
    pub target_sizes: IconSizes,
    /// Icon file to write
    pub output_path: PathBuf,
}

impl ConversionJob {
    /// Job writing `<output_dir>/<stem>.ico`
    pub fn into_dir(source: &Path, output_dir: &Path, sizes: IconSizes) -> ConvertResult<Self> {
        Ok(Self {
            output_path: icon_output_path(source, output_dir)?,
            source_path: source.to_path_buf(),
            target_sizes: sizes,
        })
    }

    /// One job per source with pairwise distinct outputs under `output_dir`.
    ///
    /// Sources sharing a stem get `<file name>.ico`. A source repeated in the
    /// list yields a failed [`JobResult`] in its slot instead of a job.
    pub fn plan(
        sources: &[PathBuf],
        output_dir: &Path,
        sizes: &IconSizes,
    ) -> ConvertResult<Vec<Result<Self, JobResult>>> {
        let mut claims = OutputClaims::new();
        let mut planned = Vec::with_capacity(sources.len());

        for source in sources {
            let preferred = icon_output_path(source, output_dir)?;
            match claims.claim(source, preferred, "ico") {
                Ok(output_path) => planned.push(Ok(Self {
                    source_path: source.clone(),
                    target_sizes: sizes.clone(),
                    output_path,
                })),
                Err(existing) => planned.push(Err(JobResult::failed(format!(
                    "{} skipped: repeated input, {} is already written from it",
                    source.display(),
                    existing.display()
                )))),
            }
        }
        Ok(planned)
    }

    /// Run the conversion on the calling thread.
    pub fn run(&self, converter: &IconConverter) -> JobResult {
        converter
            .encode(&self.source_path, &self.output_path, &self.target_sizes)
            .map(|()| format!("{} -> {}", self.source_path.display(), self.output_path.display()))
            .into()
    }
}

/// Which outputs a merge job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFlags {
    /// Write one multi-page document
    pub emit_document: bool,
    /// Write one capped PNG per input
    pub emit_resized_copies: bool,
}

impl Default for OutputFlags {
    fn default() -> Self {
        Self {
            emit_document: true,
            emit_resized_copies: false,
        }
    }
}

/// Merge and/or re-export an ordered image list.
#[derive(Debug, Clone)]
pub struct MergeJob {
    /// Inputs in page order
    pub source_paths: Vec<PathBuf>,
    /// Width cap in pixels
    pub max_width: u32,
    /// Directory receiving every output
    pub output_directory: PathBuf,
    /// Requested outputs
    pub flags: OutputFlags,
    /// File name of the merged document
    pub document_name: String,
}

impl MergeJob {
    /// Validated job with the default width cap and document name.
    pub fn new(
        source_paths: Vec<PathBuf>,
        output_directory: PathBuf,
        flags: OutputFlags,
    ) -> ConvertResult<Self> {
        if source_paths.is_empty() {
            return Err(ConvertError::EmptyInput);
        }
        if !flags.emit_document && !flags.emit_resized_copies {
            return Err(ConvertError::NoOutputFormatSelected);
        }
        Ok(Self {
            source_paths,
            max_width: DEFAULT_MAX_WIDTH,
            output_directory,
            flags,
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
        })
    }

    /// Override the width cap
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    /// Override the document file name
    pub fn with_document_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = name.into();
        self
    }

    /// Run the batch on the calling thread.
    pub fn run(&self) -> JobResult {
        process_batch_named(
            &self.source_paths,
            &self.output_directory,
            self.max_width,
            self.flags.emit_document,
            self.flags.emit_resized_copies,
            &self.document_name,
        )
        .into()
    }
}
