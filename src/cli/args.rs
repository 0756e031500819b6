//! Command line argument parsing and validation.

use crate::imaging::IconSizes;
use crate::preferences::Preferences;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Batch image utilities: icons, merged PDFs and resized copies
#[derive(Parser, Debug)]
#[command(
    name = "batch_imaging",
    version,
    about = "Batch image utilities: multi-size icons, merged PDFs and resized copies",
    long_about = "Convert images to multi-resolution .ico files, merge them into one PDF
in the order given, or export width-capped PNG copies.

Inputs may be files, folders (searched for images) or glob patterns.

Usage:
  batch_imaging icon logo.png -o icons/ --sizes 16,32,256
  batch_imaging merge scans/ -o out/ --max-width 2000 --png
  batch_imaging scan ~/Pictures --ext png,jpg --name holiday"
)]
pub struct Args {
    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Preferences file to use instead of the per-user default
    #[arg(long, global = true, value_name = "FILE", env = "BATCH_IMAGING_PREFERENCES")]
    pub preferences: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert images to multi-size .ico files
    Icon {
        /// Image files, folders or glob patterns
        #[arg(required = true, value_name = "INPUT")]
        inputs: Vec<String>,

        /// Directory receiving the icons
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Comma separated sizes, 1..=256 (defaults to preferences)
        #[arg(long, value_name = "SIZES")]
        sizes: Option<IconSizes>,
    },

    /// Merge images into one PDF and/or export resized PNG copies
    Merge {
        /// Image files, folders or glob patterns, in page order
        #[arg(required = true, value_name = "INPUT")]
        inputs: Vec<String>,

        /// Directory receiving the outputs
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Width cap in pixels (defaults to preferences)
        #[arg(long, value_name = "PIXELS", value_parser = clap::value_parser!(u32).range(1..))]
        max_width: Option<u32>,

        /// Write the merged PDF
        #[arg(long, conflicts_with = "no_pdf")]
        pdf: bool,

        /// Skip the merged PDF
        #[arg(long)]
        no_pdf: bool,

        /// Write resized PNG copies
        #[arg(long, conflicts_with = "no_png")]
        png: bool,

        /// Skip resized PNG copies
        #[arg(long)]
        no_png: bool,

        /// File name of the merged PDF
        #[arg(long, value_name = "FILE")]
        name: Option<String>,
    },

    /// List images in a folder
    Scan {
        /// Folder to search (defaults to the preferred base path)
        #[arg(value_name = "FOLDER")]
        folder: Option<PathBuf>,

        /// Comma separated extensions to match
        #[arg(long, value_delimiter = ',', value_name = "EXT")]
        ext: Vec<String>,

        /// Only files whose name contains this text
        #[arg(long, value_name = "PATTERN")]
        name: Option<String>,

        /// Do not descend into subfolders
        #[arg(long)]
        no_recursive: bool,

        /// List the extensions present instead of files
        #[arg(long)]
        list_extensions: bool,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show dimensions, format and color type of images
    Info {
        /// Image files
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that every input exists and decodes
    Validate {
        /// Image files, folders or glob patterns
        #[arg(required = true, value_name = "INPUT")]
        inputs: Vec<String>,
    },

    /// Convert an image to the format implied by the output extension
    Convert {
        /// Source image
        input: PathBuf,
        /// Destination image
        output: PathBuf,
    },

    /// Resize an image to exact dimensions
    Resize {
        /// Source image
        input: PathBuf,
        /// Destination image
        output: PathBuf,

        /// Target width in pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,

        /// Target height in pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,
    },

    /// Show or edit preferences
    Prefs {
        /// Preferences action
        #[command(subcommand)]
        action: PrefsAction,
    },
}

/// Preferences actions
#[derive(Subcommand, Debug, Clone)]
pub enum PrefsAction {
    /// Print every preference
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Set one preference
    Set {
        /// Preference key
        key: String,
        /// New value
        value: String,
    },
    /// Restore the defaults
    Reset,
    /// Print the preferences file location
    Path,
}

impl Command {
    /// Command name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Icon { .. } => "icon",
            Command::Merge { .. } => "merge",
            Command::Scan { .. } => "scan",
            Command::Info { .. } => "info",
            Command::Validate { .. } => "validate",
            Command::Convert { .. } => "convert",
            Command::Resize { .. } => "resize",
            Command::Prefs { .. } => "prefs",
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Merge { name: Some(name), .. } = &self.command
            && (name.trim().is_empty() || name.contains(['/', '\\']))
        {
            return Err(format!("--name must be a plain file name, got '{name}'"));
        }
        Ok(())
    }

    /// Log filter implied by `--verbose` / `--quiet`
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

/// Verbosity level for output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Errors only
    Quiet,
    /// Normal output
    Normal,
    /// Extra detail
    Verbose,
}

impl From<&Args> for VerbosityLevel {
    fn from(args: &Args) -> Self {
        if args.quiet {
            VerbosityLevel::Quiet
        } else if args.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Configuration derived from command line arguments and preferences
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Effective preferences, environment overrides applied
    pub preferences: Preferences,
    /// Preferences file in use
    pub preferences_path: PathBuf,
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(args: &Args, preferences: Preferences, preferences_path: PathBuf) -> Self {
        let level = VerbosityLevel::from(args);
        Self {
            preferences,
            preferences_path,
            output: super::OutputManager::new(
                level == VerbosityLevel::Verbose,
                level == VerbosityLevel::Quiet,
            ),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print verbose message (only with `--verbose`)
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}
