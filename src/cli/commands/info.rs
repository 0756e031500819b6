//! Info and validate command implementations.

use super::helpers::expand_inputs;
use crate::cli::RuntimeConfig;
use crate::error::{ConvertError, Result};
use crate::imaging::{image_info, validate_images};
use std::path::PathBuf;

/// Execute info command
pub(super) fn execute_info(files: &[PathBuf], json: bool, config: &RuntimeConfig) -> Result<i32> {
    let mut failed = 0;
    let mut report = Vec::with_capacity(files.len());

    for file in files {
        match image_info(file) {
            Ok(info) => {
                if !json {
                    config.println(&format!(
                        "{}: {}x{} {} {}",
                        file.display(),
                        info.width,
                        info.height,
                        info.format.as_deref().unwrap_or("unknown"),
                        info.color
                    ));
                }
                report.push(serde_json::json!({ "path": file, "info": info }));
            }
            Err(e) => {
                failed += 1;
                if !json {
                    config.error_println(&e.to_string());
                }
                report.push(serde_json::json!({ "path": file, "error": e.to_string() }));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(if failed > 0 { 1 } else { 0 })
}

/// Execute validate command
pub(super) fn execute_validate(inputs: &[String], config: &RuntimeConfig) -> Result<i32> {
    let files = expand_inputs(inputs)?;
    if files.is_empty() {
        return Err(ConvertError::EmptyInput.into());
    }

    let problems = validate_images(&files);
    if problems.is_empty() {
        config.success_println(&format!("All {} images are valid", files.len()));
        return Ok(0);
    }

    for problem in &problems {
        config.error_println(problem);
    }
    config.warning_println(&format!(
        "{} of {} images failed validation",
        problems.len(),
        files.len()
    ));
    Ok(1)
}
