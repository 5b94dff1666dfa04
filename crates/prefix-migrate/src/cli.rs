//! Command-line surface
//!
//! Long flags are accepted with one dash (`-input genesis.json`) as well as
//! two (`--input genesis.json`), so existing invocations keep working.

use crate::config::{MigrateConfig, PrefixPair, DEFAULT_NEW_PREFIX, DEFAULT_OLD_PREFIX};
use crate::error::ConfigError;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Rewrite bech32 address prefixes in a genesis file and CSV snapshots
#[derive(Debug, Clone, Parser)]
#[command(name = "prefix-migrate", version, about)]
pub struct Cli {
    /// Input genesis.json file path
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output genesis.json file path
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,

    /// Directory containing CSV files to process
    #[arg(long = "csv-dir", value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Prefix to replace
    #[arg(long = "old-prefix", value_name = "HRP", default_value = DEFAULT_OLD_PREFIX)]
    pub old_prefix: String,

    /// Replacement prefix
    #[arg(long = "new-prefix", value_name = "HRP", default_value = DEFAULT_NEW_PREFIX)]
    pub new_prefix: String,

    /// Only keep app_state, chain_id, genesis_time, consensus_params,
    /// initial_height and validators at the top level
    #[arg(long = "drop-unknown-fields")]
    pub drop_unknown_fields: bool,

    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse process arguments, accepting single-dash long flags
    ///
    /// # Errors
    ///
    /// Returns the clap error for missing or malformed arguments, including
    /// `--help` and `--version` requests.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Build the run configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the prefix pair is invalid.
    pub fn config(&self) -> Result<MigrateConfig, ConfigError> {
        let prefixes = PrefixPair::new(self.old_prefix.as_str(), self.new_prefix.as_str())?;
        let mut config = MigrateConfig::new()
            .with_prefixes(prefixes)
            .with_preserve_unknown_fields(!self.drop_unknown_fields);
        if let Some(dir) = &self.csv_dir {
            config = config.with_csv_dir(dir);
        }
        Ok(config)
    }
}

/// Rewrite `-name` and `-name=value` to their `--` forms for every long flag
/// the command knows. Everything after a bare `--` is left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Cli::command();
    let longs: Vec<&str> = command
        .get_arguments()
        .filter_map(clap::Arg::get_long)
        .chain(["help", "version"])
        .collect();

    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg: OsString| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if longs.contains(&name) {
                        OsString::from(format!("-{text}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_dash_long_flags() {
        let cli = Cli::try_parse_args([
            "prefix-migrate",
            "-input",
            "in.json",
            "-output=out.json",
            "-csv-dir",
            "snap",
        ])
        .unwrap();

        assert_eq!(cli.input, PathBuf::from("in.json"));
        assert_eq!(cli.output, PathBuf::from("out.json"));
        assert_eq!(cli.csv_dir, Some(PathBuf::from("snap")));
        assert_eq!(cli.old_prefix, "unicorn");
        assert_eq!(cli.new_prefix, "esim");
    }

    #[test]
    fn double_dash_long_flags() {
        let cli = Cli::try_parse_args([
            "prefix-migrate",
            "--input",
            "in.json",
            "--output",
            "out.json",
            "--old-prefix",
            "osmo",
            "--new-prefix",
            "sim",
            "--drop-unknown-fields",
        ])
        .unwrap();

        let config = cli.config().unwrap();
        assert_eq!(config.prefixes.old(), "osmo");
        assert_eq!(config.prefixes.new_prefix(), "sim");
        assert!(!config.preserve_unknown_fields);
        assert!(config.csv_dir.is_none());
    }

    #[test]
    fn missing_required_flags() {
        let err = Cli::try_parse_args(["prefix-migrate", "-input", "in.json"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn invalid_prefix_rejected() {
        let cli = Cli::try_parse_args([
            "prefix-migrate",
            "-input",
            "a",
            "-output",
            "b",
            "-new-prefix",
            "unicorn",
        ])
        .unwrap();
        assert!(matches!(cli.config(), Err(ConfigError::IdenticalPrefixes(_))));
    }

    #[test]
    fn unknown_single_dash_left_alone() {
        let args = normalize_args(["prog", "-x", "-input", "--", "-output"]);
        assert_eq!(args, vec!["prog", "-x", "--input", "--", "-output"]);
    }
}
