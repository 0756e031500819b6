//! Loading and atomic saving of the preferences file.

use super::{PREFERENCES_ENV, Preferences};
use crate::error::{PreferencesError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Preferences bound to their file on disk
#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    prefs: Preferences,
}

impl PreferencesStore {
    /// `BATCH_IMAGING_PREFERENCES` if set, else the per-user config directory.
    pub fn default_path() -> std::result::Result<PathBuf, PreferencesError> {
        if let Ok(path) = std::env::var(PREFERENCES_ENV)
            && !path.trim().is_empty()
        {
            return Ok(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("batch_imaging").join("preferences.json"))
            .ok_or(PreferencesError::NoConfigDir)
    }

    /// Load from `path`.
    ///
    /// A missing file is created with defaults. A corrupt file is left
    /// untouched and defaults are used for this run.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            let mut store = Self {
                path,
                prefs: Preferences::default(),
            };
            if let Err(e) = store.save() {
                log::warn!("Could not create preferences file: {}", e);
            }
            return Ok(store);
        }

        let contents = fs::read_to_string(&path)?;
        let prefs = match serde_json::from_str::<Preferences>(&contents) {
            Ok(prefs) => prefs,
            Err(e) => {
                log::warn!(
                    "Preferences file {} is corrupted ({}); using defaults",
                    path.display(),
                    e
                );
                Preferences::default()
            }
        };

        Ok(Self { path, prefs })
    }

    /// Load from [`PreferencesStore::default_path`]
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path()?)
    }

    /// File backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current values
    pub fn get(&self) -> &Preferences {
        &self.prefs
    }

    /// Set one key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.prefs.set(key, value)?;
        self.save()
    }

    /// Restore defaults and save.
    pub fn reset(&mut self) -> Result<()> {
        self.prefs = Preferences::default();
        self.save()
    }

    /// Write the file through a temporary sibling and an atomic rename.
    pub fn save(&mut self) -> Result<()> {
        self.prefs.updated_at = Some(chrono::Utc::now());

        let save_failed = |reason: String| PreferencesError::SaveFailed {
            path: self.path.clone(),
            reason,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| save_failed(format!("Failed to create directory: {e}")))?;
        }

        let serialized = serde_json::to_string_pretty(&self.prefs)?;
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| save_failed(format!("Failed to create temp file: {e}")))?;
            file.write_all(serialized.as_bytes())
                .map_err(|e| save_failed(format!("Failed to write preferences: {e}")))?;
            file.sync_all()
                .map_err(|e| save_failed(format!("Failed to sync file: {e}")))?;
        }
        fs::rename(&temp_path, &self.path)
            .map_err(|e| save_failed(format!("Failed to rename temp file: {e}")))?;

        log::debug!("Preferences saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let store = PreferencesStore::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.get().max_width, 3000);
    }

    #[test]
    fn test_set_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let mut store = PreferencesStore::load(&path).unwrap();
        store.set("max_width", "640").unwrap();

        let reloaded = PreferencesStore::load(&path).unwrap();
        assert_eq!(reloaded.get().max_width, 640);
        assert!(reloaded.get().updated_at.is_some());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let store = PreferencesStore::load(&path).unwrap();
        assert_eq!(store.get().document_name, "document.pdf");
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferencesStore::load(dir.path().join("p.json")).unwrap();
        store.set("workers", "9").unwrap();
        store.reset().unwrap();
        assert_eq!(store.get().workers, Preferences::default().workers);
    }
}
