//! Error types for batch imaging operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for top-level batch imaging operations
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Result type alias for a single conversion, merge or export
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Main error type for all batch imaging operations
#[derive(Error, Debug)]
pub enum ImagingError {
    /// Conversion, merge and export errors
    #[error("{0}")]
    Convert(#[from] ConvertError),

    /// Preferences loading and saving errors
    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferencesError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Failure of a single conversion job.
///
/// None of these are retried; the icon encoder's tier chain is the only
/// fallback and it reports the last tier's error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Source image missing, unreadable or not decodable
    #[error("Cannot read image {}: {reason}", path.display())]
    SourceUnreadable {
        /// Offending source file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Output file or directory cannot be written
    #[error("Cannot write {}: {reason}", path.display())]
    OutputUnwritable {
        /// Output path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// No input images given
    #[error("No images provided")]
    EmptyInput,

    /// Neither a document nor resized copies were requested
    #[error("Choose at least one output format (PDF and/or PNG)")]
    NoOutputFormatSelected,

    /// Icon size list rejected before any I/O
    #[error("Unsupported icon size set: {reason}")]
    UnsupportedSizeSet {
        /// Reason for the error
        reason: String,
    },
}

impl ConvertError {
    /// Short stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::SourceUnreadable { .. } => "SourceUnreadable",
            ConvertError::OutputUnwritable { .. } => "OutputUnwritable",
            ConvertError::EmptyInput => "EmptyInput",
            ConvertError::NoOutputFormatSelected => "NoOutputFormatSelected",
            ConvertError::UnsupportedSizeSet { .. } => "UnsupportedSizeSet",
        }
    }
}

/// Preferences errors
#[derive(Error, Debug)]
pub enum PreferencesError {
    /// Unknown preference key
    #[error("Unknown preference key '{key}'")]
    UnknownKey {
        /// Key given by the user
        key: String,
    },

    /// Value could not be parsed for the key
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        /// Preference key
        key: String,
        /// Raw value
        value: String,
        /// Reason for the error
        reason: String,
    },

    /// Failed to save preferences
    #[error("Failed to save preferences to {}: {reason}", path.display())]
    SaveFailed {
        /// Preferences file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// No configuration directory could be determined
    #[error("Could not determine a configuration directory")]
    NoConfigDir,
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ImagingError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ImagingError::Convert(ConvertError::SourceUnreadable { path, .. }) => vec![
                format!("Check that {} exists and is a supported image", path.display()),
                "Run the 'validate' command to list every unreadable input".to_string(),
            ],
            ImagingError::Convert(ConvertError::OutputUnwritable { path, .. }) => vec![
                format!("Check write permissions for {}", path.display()),
                "Choose another output directory with --output".to_string(),
            ],
            ImagingError::Convert(ConvertError::EmptyInput) => vec![
                "Pass image files, folders or glob patterns as inputs".to_string(),
            ],
            ImagingError::Convert(ConvertError::NoOutputFormatSelected) => vec![
                "Enable --pdf and/or --png".to_string(),
            ],
            ImagingError::Convert(ConvertError::UnsupportedSizeSet { .. }) => vec![
                "Use sizes between 1 and 256, e.g. --sizes 16,32,48,256".to_string(),
            ],
            ImagingError::Preferences(PreferencesError::UnknownKey { .. }) => vec![
                "Run 'prefs show' to list the available keys".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

/// Extension trait attaching a path to any displayable error.
///
/// Maps the error into the matching [`ConvertError`] variant so callers can
/// keep using `?` while the offending file travels with the failure.
pub trait ErrorExt<T> {
    /// Error happened while reading `path`
    fn source_context(self, path: impl AsRef<Path>) -> ConvertResult<T>;

    /// Error happened while writing `path`
    fn output_context(self, path: impl AsRef<Path>) -> ConvertResult<T>;
}

impl<T, E: Display> ErrorExt<T> for std::result::Result<T, E> {
    fn source_context(self, path: impl AsRef<Path>) -> ConvertResult<T> {
        self.map_err(|e| ConvertError::SourceUnreadable {
            path: path.as_ref().to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn output_context(self, path: impl AsRef<Path>) -> ConvertResult<T> {
        self.map_err(|e| ConvertError::OutputUnwritable {
            path: path.as_ref().to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_context_keeps_path() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = res.source_context("a/b.png").unwrap_err();
        assert_eq!(err.kind(), "SourceUnreadable");
        assert!(err.to_string().contains("b.png"));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_suggestions_for_size_set() {
        let err = ImagingError::from(ConvertError::UnsupportedSizeSet {
            reason: "empty".to_string(),
        });
        assert!(err.recovery_suggestions()[0].contains("256"));
    }
}
