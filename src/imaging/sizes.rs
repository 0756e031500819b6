//! Validated icon size sets.

use crate::error::{ConvertError, ConvertResult};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Largest edge an ICO directory entry can describe
pub const MAX_ICON_SIZE: u32 = 256;

/// Sizes offered for selection
pub const STANDARD_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// Sizes selected when nothing else is configured
pub const DEFAULT_SIZES: [u32; 5] = [16, 32, 48, 64, 128];

/// Non-empty, deduplicated, ascending set of square icon edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSizes(Vec<u32>);

impl IconSizes {
    /// Validate and normalize a size list.
    pub fn new<I: IntoIterator<Item = u32>>(sizes: I) -> ConvertResult<Self> {
        let set: BTreeSet<u32> = sizes.into_iter().collect();

        if set.is_empty() {
            return Err(ConvertError::UnsupportedSizeSet {
                reason: "at least one size is required".to_string(),
            });
        }
        if set.contains(&0) {
            return Err(ConvertError::UnsupportedSizeSet {
                reason: "sizes must be positive".to_string(),
            });
        }
        if let Some(&too_big) = set.iter().find(|&&s| s > MAX_ICON_SIZE) {
            return Err(ConvertError::UnsupportedSizeSet {
                reason: format!("{too_big} exceeds the {MAX_ICON_SIZE}px icon limit"),
            });
        }

        Ok(Self(set.into_iter().collect()))
    }

    /// Ascending sizes
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Largest size in the set
    pub fn largest(&self) -> u32 {
        // Non-empty by construction.
        self.0.last().copied().unwrap_or(MAX_ICON_SIZE)
    }

    /// Number of sizes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for IconSizes {
    fn default() -> Self {
        Self(DEFAULT_SIZES.to_vec())
    }
}

impl fmt::Display for IconSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for IconSizes {
    type Err = ConvertError;

    /// Parse a comma or space separated list such as `16,32,48`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sizes = Vec::new();
        for part in s.split([',', ' ']).filter(|p| !p.trim().is_empty()) {
            let size = part.trim().parse::<u32>().map_err(|_| ConvertError::UnsupportedSizeSet {
                reason: format!("'{}' is not a positive integer", part.trim()),
            })?;
            sizes.push(size);
        }
        Self::new(sizes)
    }
}
