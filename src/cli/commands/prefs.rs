//! Prefs command implementation.

use crate::cli::{PrefsAction, RuntimeConfig};
use crate::error::Result;
use crate::preferences::{Preferences, PreferencesStore};

/// Execute prefs command
pub(super) fn execute_prefs(action: &PrefsAction, config: &RuntimeConfig) -> Result<i32> {
    let path = &config.preferences_path;

    match action {
        PrefsAction::Path => {
            println!("{}", path.display());
        }
        PrefsAction::Show { json } => {
            let store = PreferencesStore::load(path)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(store.get())?);
            } else {
                let values = serde_json::to_value(store.get())?;
                for key in Preferences::KEYS {
                    let value = values.get(*key).cloned().unwrap_or_default();
                    config.println(&format!("{key} = {value}"));
                }
            }
        }
        PrefsAction::Set { key, value } => {
            let mut store = PreferencesStore::load(path)?;
            store.set(key, value)?;
            config.success_println(&format!("{key} set to {value}"));
        }
        PrefsAction::Reset => {
            let mut store = PreferencesStore::load(path)?;
            store.reset()?;
            config.success_println("Preferences reset to defaults");
        }
    }

    Ok(0)
}
