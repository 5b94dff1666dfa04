//! Error types for prefix migration
//!
//! Provides error handling for:
//! - Prefix configuration (validated before any file is touched)
//! - Genesis conversion (fatal, aborts the run)
//! - CSV conversion (per-file failures are warnings, enumeration failure is fatal)

use std::path::PathBuf;

/// Errors in prefix configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A prefix was empty
    #[error("{which} prefix must not be empty")]
    EmptyPrefix {
        /// Which side of the pair ("old" or "new")
        which: &'static str,
    },

    /// Old and new prefixes are the same
    #[error("old and new prefixes are identical: '{0}'")]
    IdenticalPrefixes(String),

    /// Prefix contains characters outside the bech32 human-readable alphabet we accept
    #[error("invalid {which} prefix '{prefix}': only ASCII letters and digits are allowed")]
    InvalidPrefix {
        /// Which side of the pair ("old" or "new")
        which: &'static str,
        /// Offending prefix
        prefix: String,
    },

    /// Rewrite pattern failed to compile
    #[error("invalid rewrite pattern: {0}")]
    Pattern(String),
}

/// Errors during genesis document conversion
#[derive(Debug, thiserror::Error)]
pub enum GenesisError {
    /// Input file could not be read
    #[error("error reading genesis file {path}: {source}")]
    Read {
        /// Input path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Input is not a well-formed genesis document
    #[error("error parsing genesis JSON {path}: {reason}")]
    Decode {
        /// Input path
        path: PathBuf,
        /// What was wrong with the document
        reason: String,
    },

    /// In-memory document could not be serialized
    #[error("error marshalling updated genesis: {0}")]
    Encode(#[source] serde_json::Error),

    /// Output file could not be written
    #[error("error writing output genesis file {path}: {source}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl GenesisError {
    /// Create read error for path
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create decode error for path
    pub fn decode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create write error for path
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Errors converting a single CSV file
///
/// These never abort the CSV phase; they are reported and the next file is processed.
#[derive(Debug, thiserror::Error)]
pub enum CsvFileError {
    /// File could not be opened
    #[error("error opening CSV file {path}: {source}")]
    Open {
        /// CSV path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid CSV
    #[error("error reading CSV file {path}: {source}")]
    Parse {
        /// CSV path
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// Converted output could not be written
    #[error("error writing CSV file {path}: {source}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },
}

impl CsvFileError {
    /// Path the failure relates to
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Open { path, .. } | Self::Parse { path, .. } | Self::Write { path, .. } => path,
        }
    }
}

/// Errors enumerating the CSV directory
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Directory could not be listed
    #[error("error finding CSV files in {path}: {source}")]
    Read {
        /// Directory path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl DirectoryError {
    /// Create read error for path
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// Combined migration error
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Invalid prefix configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Genesis phase failed
    #[error(transparent)]
    Genesis(#[from] GenesisError),

    /// CSV directory could not be listed
    #[error("error processing CSV files: {0}")]
    Directory(#[from] DirectoryError),
}

/// Result type alias for migration operations
pub type MigrateResult<T> = Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::EmptyPrefix { which: "old" };
        assert_eq!(err.to_string(), "old prefix must not be empty");

        let err = ConfigError::IdenticalPrefixes("esim".to_string());
        assert!(err.to_string().contains("identical"));
    }

    #[test]
    fn genesis_error_display() {
        let err = GenesisError::decode_error("genesis.json", "missing app_state");
        assert_eq!(
            err.to_string(),
            "error parsing genesis JSON genesis.json: missing app_state"
        );

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = GenesisError::read_error("in.json", io);
        assert!(err.to_string().starts_with("error reading genesis file in.json"));
    }

    #[test]
    fn csv_error_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CsvFileError::Open {
            path: PathBuf::from("a.csv"),
            source: io,
        };
        assert_eq!(err.path(), std::path::Path::new("a.csv"));
    }

    #[test]
    fn error_conversions() {
        let err: MigrateError = ConfigError::EmptyPrefix { which: "new" }.into();
        assert!(matches!(err, MigrateError::Config(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MigrateError = DirectoryError::read_error("snap", io).into();
        assert!(err.to_string().starts_with("error processing CSV files"));
    }

    #[test]
    fn genesis_failure_renders_once() {
        let err: MigrateError = GenesisError::decode_error("g.json", "expected value").into();
        assert_eq!(err.to_string(), "error parsing genesis JSON g.json: expected value");
    }
}
