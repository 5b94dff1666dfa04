//! Migration configuration
//!
//! The prefix pair is fixed for the lifetime of a run. Defaults match the
//! `unicorn` → `esim` migration so the tool stays a drop-in replacement.

use crate::error::ConfigError;
use serde::Serialize;
use std::path::PathBuf;

/// Prefix being migrated away from by default
pub const DEFAULT_OLD_PREFIX: &str = "unicorn";

/// Prefix being migrated to by default
pub const DEFAULT_NEW_PREFIX: &str = "esim";

/// Validated old/new bech32 human-readable prefix pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixPair {
    old: String,
    new: String,
}

impl PrefixPair {
    /// Create a validated prefix pair
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either prefix is empty, contains anything
    /// other than ASCII letters and digits, or both prefixes are equal.
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Result<Self, ConfigError> {
        let old = old.into();
        let new = new.into();

        validate_prefix("old", &old)?;
        validate_prefix("new", &new)?;
        if old == new {
            return Err(ConfigError::IdenticalPrefixes(old));
        }

        Ok(Self { old, new })
    }

    /// Prefix being replaced
    #[inline]
    #[must_use]
    pub fn old(&self) -> &str {
        &self.old
    }

    /// Replacement prefix
    #[inline]
    #[must_use]
    pub fn new_prefix(&self) -> &str {
        &self.new
    }
}

impl Default for PrefixPair {
    fn default() -> Self {
        Self {
            old: DEFAULT_OLD_PREFIX.to_string(),
            new: DEFAULT_NEW_PREFIX.to_string(),
        }
    }
}

fn validate_prefix(which: &'static str, prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::EmptyPrefix { which });
    }
    if !prefix.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ConfigError::InvalidPrefix {
            which,
            prefix: prefix.to_string(),
        });
    }
    Ok(())
}

/// Run configuration
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    /// Prefix pair applied to every document
    pub prefixes: PrefixPair,
    /// Keep top-level genesis fields outside the six well-known ones
    pub preserve_unknown_fields: bool,
    /// Directory of CSV snapshots to convert after the genesis file
    pub csv_dir: Option<PathBuf>,
}

impl MigrateConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With prefix pair
    #[inline]
    #[must_use]
    pub fn with_prefixes(mut self, prefixes: PrefixPair) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// With unknown top-level genesis fields kept or dropped
    #[inline]
    #[must_use]
    pub fn with_preserve_unknown_fields(mut self, preserve: bool) -> Self {
        self.preserve_unknown_fields = preserve;
        self
    }

    /// With CSV snapshot directory
    #[inline]
    #[must_use]
    pub fn with_csv_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.csv_dir = Some(dir.into());
        self
    }
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            prefixes: PrefixPair::default(),
            preserve_unknown_fields: true,
            csv_dir: None,
        }
    }
}
