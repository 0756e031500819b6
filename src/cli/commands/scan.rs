//! Scan command implementation.

use crate::cli::{Command, RuntimeConfig};
use crate::error::Result;
use crate::explorer::{FileExplorer, available_extensions};

/// Execute scan command
pub(super) fn execute_scan(command: &Command, config: &RuntimeConfig) -> Result<i32> {
    let Command::Scan {
        folder,
        ext,
        name,
        no_recursive,
        list_extensions,
        json,
    } = command
    else {
        unreachable!("execute_scan called with non-Scan command");
    };

    let folder = folder
        .clone()
        .unwrap_or_else(|| config.preferences.base_path.clone());
    let recursive = !*no_recursive;

    let entries: Vec<String> = if *list_extensions {
        let depth = if recursive { None } else { Some(1) };
        available_extensions(&folder, depth)
    } else {
        let mut explorer = FileExplorer::images(recursive);
        if !ext.is_empty() {
            explorer.set_extensions(ext.as_slice());
        }
        let files = match name {
            Some(pattern) => explorer.find_files_by_name(&folder, pattern),
            None => explorer.find_files(&folder),
        };
        files.iter().map(|p| p.display().to_string()).collect()
    };

    if *json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(0);
    }

    for entry in &entries {
        config.println(entry);
    }
    config.verbose_println(&format!(
        "{} entries under {}",
        entries.len(),
        folder.display()
    ));
    Ok(0)
}
