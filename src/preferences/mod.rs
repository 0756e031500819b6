//! User preferences persisted as JSON.
//!
//! Holds the defaults the CLI falls back to when a flag is not given. The
//! file lives at `<config_dir>/batch_imaging/preferences.json` unless
//! `BATCH_IMAGING_PREFERENCES` or `--preferences` points elsewhere.

mod store;

pub use store::PreferencesStore;

use crate::error::{ConvertResult, PreferencesError};
use crate::imaging::{DEFAULT_DOCUMENT_NAME, DEFAULT_MAX_WIDTH, DEFAULT_SIZES, IconSizes};
use crate::pool::{DEFAULT_POLL_INTERVAL, default_workers};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the preferences file location
pub const PREFERENCES_ENV: &str = "BATCH_IMAGING_PREFERENCES";

/// Upper bound for the worker count
pub const MAX_WORKERS: usize = 64;

/// Persisted defaults for conversions and merges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Folder scanned when no input is given
    pub base_path: PathBuf,
    /// Icon sizes used when `--sizes` is absent
    pub icon_sizes: Vec<u32>,
    /// Width cap for merges and exports
    pub max_width: u32,
    /// Produce the merged PDF by default
    pub emit_document: bool,
    /// Produce resized PNG copies by default
    pub emit_resized_copies: bool,
    /// Merged document file name
    pub document_name: String,
    /// Concurrent conversion jobs
    pub workers: usize,
    /// Progress polling period in milliseconds
    pub poll_interval_ms: u64,
    /// Last time the file was written
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            base_path: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            icon_sizes: DEFAULT_SIZES.to_vec(),
            max_width: DEFAULT_MAX_WIDTH,
            emit_document: true,
            emit_resized_copies: false,
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            workers: default_workers(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            updated_at: None,
        }
    }
}

impl Preferences {
    /// Keys accepted by [`Preferences::set`]
    pub const KEYS: &'static [&'static str] = &[
        "base_path",
        "icon_sizes",
        "max_width",
        "emit_document",
        "emit_resized_copies",
        "document_name",
        "workers",
        "poll_interval_ms",
    ];

    /// Validated icon sizes
    pub fn icon_sizes(&self) -> ConvertResult<IconSizes> {
        IconSizes::new(self.icon_sizes.iter().copied())
    }

    /// Polling period
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Parse `value` and assign it to `key`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PreferencesError> {
        let invalid = |reason: &str| PreferencesError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match key {
            "base_path" => self.base_path = PathBuf::from(value),
            "icon_sizes" => {
                let sizes: IconSizes = value.parse().map_err(|e| invalid(&format!("{e}")))?;
                self.icon_sizes = sizes.as_slice().to_vec();
            }
            "max_width" => {
                self.max_width = value
                    .parse::<u32>()
                    .ok()
                    .filter(|w| *w > 0)
                    .ok_or_else(|| invalid("expected a positive integer"))?;
            }
            "emit_document" => {
                self.emit_document = parse_bool(value).ok_or_else(|| invalid("expected true/false"))?
            }
            "emit_resized_copies" => {
                self.emit_resized_copies =
                    parse_bool(value).ok_or_else(|| invalid("expected true/false"))?
            }
            "document_name" => {
                if value.trim().is_empty() || value.contains(['/', '\\']) {
                    return Err(invalid("expected a plain file name"));
                }
                self.document_name = value.to_string();
            }
            "workers" => {
                self.workers = value
                    .parse::<usize>()
                    .ok()
                    .filter(|w| (1..=MAX_WORKERS).contains(w))
                    .ok_or_else(|| invalid("expected 1..=64"))?;
            }
            "poll_interval_ms" => {
                self.poll_interval_ms = value
                    .parse::<u64>()
                    .ok()
                    .filter(|ms| *ms > 0)
                    .ok_or_else(|| invalid("expected a positive integer"))?;
            }
            _ => {
                return Err(PreferencesError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Apply `BATCH_IMAGING_WORKERS` and `BATCH_IMAGING_MAX_WIDTH`, clamped.
    pub fn apply_env_overrides(&mut self) {
        if let Some(workers) = parse_env::<usize>("BATCH_IMAGING_WORKERS") {
            self.workers = workers.clamp(1, MAX_WORKERS);
        }
        if let Some(max_width) = parse_env::<u32>("BATCH_IMAGING_MAX_WIDTH") {
            self.max_width = max_width.max(1);
        }
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str) -> Option<T> {
    std::env::var(var_name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
