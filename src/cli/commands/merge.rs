//! Merge command implementation.

use super::helpers::expand_inputs;
use crate::cli::{Command, RuntimeConfig};
use crate::error::{ConvertError, Result};
use crate::imaging::{MergeJob, OutputFlags};
use crate::pool::WorkerPool;

/// Execute merge command
pub(super) async fn execute_merge(command: &Command, config: &RuntimeConfig) -> Result<i32> {
    let Command::Merge {
        inputs,
        output,
        max_width,
        pdf,
        no_pdf,
        png,
        no_png,
        name,
    } = command
    else {
        unreachable!("execute_merge called with non-Merge command");
    };

    let prefs = &config.preferences;
    let flags = OutputFlags {
        emit_document: resolve_flag(*pdf, *no_pdf, prefs.emit_document),
        emit_resized_copies: resolve_flag(*png, *no_png, prefs.emit_resized_copies),
    };

    let sources = expand_inputs(inputs)?;
    let job = MergeJob::new(sources, output.clone(), flags)?
        .with_max_width(max_width.unwrap_or(prefs.max_width))
        .with_document_name(name.clone().unwrap_or_else(|| prefs.document_name.clone()));

    config.verbose_println(&format!(
        "Merging {} images into {} (max width {}px)",
        job.source_paths.len(),
        job.output_directory.display(),
        job.max_width
    ));

    let handle = WorkerPool::new(1).submit_all(vec![move || job.run()]);
    let result = handle
        .join()
        .await
        .into_iter()
        .next()
        .ok_or(ConvertError::EmptyInput)?;

    if result.success {
        config.success_println(&result.message);
        Ok(0)
    } else {
        config.error_println(&result.message);
        Ok(1)
    }
}

/// Explicit `--x` or `--no-x` wins over the preference.
fn resolve_flag(on: bool, off: bool, preferred: bool) -> bool {
    if off {
        false
    } else {
        on || preferred
    }
}
