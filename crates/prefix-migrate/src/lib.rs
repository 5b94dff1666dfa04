//! Prefix Migrate
//!
//! Rewrites bech32 address prefixes (`unicorn1...` → `esim1...` by default)
//! throughout a blockchain genesis document and a directory of CSV snapshots.
//!
//! # Pipeline
//!
//! ```text
//! genesis.json → GenesisConverter ─┬→ StructureWalker(app_state) → AddressRewriter
//!                                  └→ chain_id substring replace
//! *.csv        → CsvConverter ─────→ AddressRewriter per cell → <stem>_<new>.csv
//! ```
//!
//! No bech32 checksum is validated or recomputed.
//!
//! # Example
//!
//! ```rust,ignore
//! use prefix_migrate::{run, MigrateConfig};
//! use std::path::Path;
//!
//! let config = MigrateConfig::new().with_csv_dir("snapshot");
//! let report = run(&config, Path::new("genesis.json"), Path::new("new_genesis.json"))?;
//! println!("{} strings rewritten", report.genesis.walk.strings_rewritten);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod config;
pub mod error;
pub mod genesis;
pub mod migrate;
pub mod rewriter;
pub mod snapshot;
pub mod walker;

// Re-exports for convenience
pub use config::{MigrateConfig, PrefixPair, DEFAULT_NEW_PREFIX, DEFAULT_OLD_PREFIX};
pub use error::{ConfigError, CsvFileError, DirectoryError, GenesisError, MigrateError, MigrateResult};
pub use genesis::{GenesisConverter, GenesisReport, RawDocument};
pub use migrate::{run, RunReport};
pub use rewriter::AddressRewriter;
pub use snapshot::{CsvConverter, DirectoryReport, FileOutcome};
pub use walker::{StructureWalker, WalkStats};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
