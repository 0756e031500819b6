//! Icon command implementation.
//!
//! One [`ConversionJob`] per input, each with its own output file, run on
//! the worker pool while progress is polled and printed.

use super::helpers::expand_inputs;
use crate::cli::RuntimeConfig;
use crate::error::{ConvertError, Result};
use crate::imaging::{ConversionJob, IconConverter, IconSizes, JobResult, ensure_dir};
use crate::pool::WorkerPool;
use std::path::Path;
use std::sync::Arc;

type IconTask = Box<dyn FnOnce() -> JobResult + Send>;

/// Execute icon command
pub(super) async fn execute_icon(
    inputs: &[String],
    output: &Path,
    sizes: Option<&IconSizes>,
    config: &RuntimeConfig,
) -> Result<i32> {
    let sizes = match sizes {
        Some(sizes) => sizes.clone(),
        None => config.preferences.icon_sizes()?,
    };

    let sources = expand_inputs(inputs)?;
    if sources.is_empty() {
        return Err(ConvertError::EmptyInput.into());
    }
    ensure_dir(output)?;

    let planned = ConversionJob::plan(&sources, output, &sizes)?;

    config.verbose_println(&format!(
        "Converting {} images at sizes {} with {} workers",
        planned.len(),
        sizes,
        config.preferences.workers
    ));

    let converter = Arc::new(IconConverter::default());
    let pool = WorkerPool::new(config.preferences.workers);
    let handle = pool.submit_all(
        planned
            .into_iter()
            .map(|planned| -> IconTask {
                match planned {
                    Ok(job) => {
                        let converter = Arc::clone(&converter);
                        Box::new(move || job.run(&converter))
                    }
                    Err(skipped) => Box::new(move || skipped),
                }
            })
            .collect(),
    );

    let mut last_reported = None;
    let progress = handle
        .poll_until_done(config.preferences.poll_interval(), |progress| {
            if last_reported != Some(progress.finished()) {
                last_reported = Some(progress.finished());
                let _ = config.output().progress(progress);
            }
        })
        .await;

    for result in handle.join().await {
        if result.success {
            config.verbose_println(&result.message);
        } else {
            config.error_println(&result.message);
        }
    }

    let summary = format!(
        "{} converted, {} failed",
        progress.completed, progress.failed
    );
    if progress.failed > 0 {
        config.warning_println(&summary);
        Ok(1)
    } else {
        config.success_println(&summary);
        Ok(0)
    }
}
