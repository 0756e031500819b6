//! Single-image convert and resize commands.
//!
//! The work is blocking, so it runs on tokio's blocking pool.

use crate::cli::RuntimeConfig;
use crate::error::{ConvertResult, Result};
use crate::imaging::{convert_image_format, resize_image};
use std::path::{Path, PathBuf};

/// Execute convert command
pub(super) async fn execute_convert(
    input: &Path,
    output: &Path,
    config: &RuntimeConfig,
) -> Result<i32> {
    let (src, dst) = (input.to_path_buf(), output.to_path_buf());
    run_blocking(move || convert_image_format(&src, &dst, None)).await?;
    config.success_println(&format!("Converted {} -> {}", input.display(), output.display()));
    Ok(0)
}

/// Execute resize command
pub(super) async fn execute_resize(
    input: &Path,
    output: &Path,
    width: u32,
    height: u32,
    config: &RuntimeConfig,
) -> Result<i32> {
    let (src, dst): (PathBuf, PathBuf) = (input.to_path_buf(), output.to_path_buf());
    run_blocking(move || resize_image(&src, &dst, width, height)).await?;
    config.success_println(&format!(
        "Resized {} to {}x{}: {}",
        input.display(),
        width,
        height,
        output.display()
    ));
    Ok(0)
}

async fn run_blocking<F>(work: F) -> Result<()>
where
    F: FnOnce() -> ConvertResult<()> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| anyhow::anyhow!("worker task failed: {e}"))??;
    Ok(())
}
