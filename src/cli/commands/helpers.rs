//! Shared helper functions for command execution.

use crate::error::{CliError, Result};
use crate::explorer::FileExplorer;
use std::path::{Path, PathBuf};

/// Expand command line inputs into an ordered file list.
///
/// Folders contribute their images (recursively, sorted), glob patterns
/// their sorted matches, and anything else is taken verbatim so a missing
/// file is reported by the operation that reads it.
pub(super) fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let explorer = FileExplorer::images(true);
    let mut files = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            files.extend(explorer.find_files(path));
        } else if is_glob(input) {
            let pattern = glob::glob(input).map_err(|e| CliError::InvalidArguments {
                reason: format!("Invalid glob pattern '{}': {}", input, e),
            })?;
            let mut matches: Vec<PathBuf> = pattern
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        log::warn!("Skipping unreadable match: {}", e);
                        None
                    }
                })
                .filter(|p| p.is_file())
                .collect();
            if matches.is_empty() {
                log::warn!("Pattern '{}' matched no files", input);
            }
            matches.sort();
            files.append(&mut matches);
        } else {
            files.push(path.to_path_buf());
        }
    }

    log::debug!("Expanded {} inputs to {} files", inputs.len(), files.len());
    Ok(files)
}

fn is_glob(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_expand_keeps_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.png"), b"").unwrap();
        fs::write(dir.path().join("a.png"), b"").unwrap();
        fs::write(dir.path().join("c.txt"), b"").unwrap();

        let inputs = vec![
            dir.path().join("b.png").display().to_string(),
            dir.path().join("*.png").display().to_string(),
        ];
        let files = expand_inputs(&inputs).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["b.png", "a.png", "b.png"]);
    }

    #[test]
    fn test_expand_folder_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.jpg"), b"").unwrap();

        let inputs = vec![
            dir.path().display().to_string(),
            "missing.png".to_string(),
        ];
        let files = expand_inputs(&inputs).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1], PathBuf::from("missing.png"));
    }
}
