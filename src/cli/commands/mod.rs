//! Command execution functions.
//!
//! Loads preferences once, then hands the parsed command to its executor.
//! Executors return the process exit code; errors are reported here with
//! recovery suggestions.

mod convert;
mod helpers;
mod icon;
mod info;
mod merge;
mod prefs;
mod scan;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;
use crate::preferences::PreferencesStore;

use convert::{execute_convert, execute_resize};
use icon::execute_icon;
use info::{execute_info, execute_validate};
use merge::execute_merge;
use prefs::execute_prefs;
use scan::execute_scan;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let preferences_path = match &args.preferences {
        Some(path) => path.clone(),
        None => PreferencesStore::default_path()?,
    };
    let store = PreferencesStore::load(&preferences_path)?;
    let mut preferences = store.get().clone();
    preferences.apply_env_overrides();

    let config = RuntimeConfig::new(&args, preferences, preferences_path);
    config.verbose_println(&format!(
        "Using preferences from {}",
        config.preferences_path.display()
    ));

    let result = match &args.command {
        Command::Icon {
            inputs,
            output,
            sizes,
        } => execute_icon(inputs, output, sizes.as_ref(), &config).await,
        Command::Merge { .. } => execute_merge(&args.command, &config).await,
        Command::Scan { .. } => execute_scan(&args.command, &config),
        Command::Info { files, json } => execute_info(files, *json, &config),
        Command::Validate { inputs } => execute_validate(inputs, &config),
        Command::Convert { input, output } => execute_convert(input, output, &config).await,
        Command::Resize {
            input,
            output,
            width,
            height,
        } => execute_resize(input, output, *width, *height, &config).await,
        Command::Prefs { action } => execute_prefs(action, &config),
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            config.error_println(&format!(
                "Command '{}' failed: {}",
                args.command.name(),
                e
            ));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() && !config.is_quiet() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.println(&format!("  • {}", suggestion));
                }
            }

            Ok(1)
        }
    }
}
