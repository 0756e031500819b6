//! Extension-filtered file discovery.
//!
//! Used to turn folders given on the command line into ordered image lists.
//! Missing or non-directory folders are not errors: they yield no files and
//! a warning is logged.

use crate::imaging::ImageFormats;
use path_absolutize::Absolutize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds files by extension, optionally descending into subfolders.
#[derive(Debug, Clone)]
pub struct FileExplorer {
    extensions: Vec<String>,
    recursive: bool,
}

impl FileExplorer {
    /// Explorer matching `extensions` (`"png"` and `".png"` are equivalent).
    pub fn new<S: AsRef<str>>(extensions: &[S], recursive: bool) -> Self {
        let extensions = normalize_extensions(extensions);
        log::debug!(
            "FileExplorer created with extensions: {:?}, recursive: {}",
            extensions,
            recursive
        );
        Self {
            extensions,
            recursive,
        }
    }

    /// Explorer preset for every supported input image
    pub fn images(recursive: bool) -> Self {
        Self::new(ImageFormats::INPUT_EXTENSIONS, recursive)
    }

    /// Matching files under `folder`, sorted by path.
    pub fn find_files(&self, folder: &Path) -> Vec<PathBuf> {
        let folder = normalize(folder);

        if !folder.exists() {
            log::warn!("Folder not found: {}", folder.display());
            return Vec::new();
        }
        if !folder.is_dir() {
            log::warn!("Path is not a folder: {}", folder.display());
            return Vec::new();
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files: Vec<PathBuf> = WalkDir::new(&folder)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| self.matches(entry.path()))
            .map(|entry| entry.into_path())
            .collect();
        files.sort();

        log::info!("Found {} files in {}", files.len(), folder.display());
        files
    }

    /// Matching files whose name contains `pattern`, case-insensitively.
    pub fn find_files_by_name(&self, folder: &Path, pattern: &str) -> Vec<PathBuf> {
        let pattern = pattern.to_lowercase();
        let filtered: Vec<PathBuf> = self
            .find_files(folder)
            .into_iter()
            .filter(|path| file_name_lower(path).contains(&pattern))
            .collect();

        log::info!(
            "Found {} files matching pattern '{}'",
            filtered.len(),
            pattern
        );
        filtered
    }

    /// Matching files that also carry `extension`.
    pub fn files_with_extension(&self, folder: &Path, extension: &str) -> Vec<PathBuf> {
        let ext = normalize_extension(extension);
        self.find_files(folder)
            .into_iter()
            .filter(|path| file_name_lower(path).ends_with(&ext))
            .collect()
    }

    /// Replace the extension filter
    pub fn set_extensions<S: AsRef<str>>(&mut self, extensions: &[S]) {
        self.extensions = normalize_extensions(extensions);
        log::debug!("Extensions updated to: {:?}", self.extensions);
    }

    /// Current extension filter
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn matches(&self, path: &Path) -> bool {
        let name = file_name_lower(path);
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Sorted, lower-cased, unique extensions found under `folder`.
///
/// `max_depth` of `None` searches every level, `Some(1)` only the folder itself.
pub fn available_extensions(folder: &Path, max_depth: Option<usize>) -> Vec<String> {
    if max_depth == Some(0) {
        return Vec::new();
    }

    let extensions: BTreeSet<String> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(max_depth.unwrap_or(usize::MAX))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        })
        .collect();

    extensions.into_iter().collect()
}

fn normalize(folder: &Path) -> PathBuf {
    folder
        .absolutize()
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| folder.to_path_buf())
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| normalize_extension(e.as_ref()))
        .collect()
}

fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
