//! End-to-end migration run
//!
//! The genesis phase always runs first and must succeed before the CSV phase
//! starts. The CSV phase only runs when a snapshot directory is configured.

use crate::config::MigrateConfig;
use crate::error::MigrateResult;
use crate::genesis::{GenesisConverter, GenesisReport};
use crate::rewriter::AddressRewriter;
use crate::snapshot::{CsvConverter, DirectoryReport};
use serde_json::{json, Value};
use std::path::Path;

/// Outcome of a full run
#[derive(Debug)]
pub struct RunReport {
    /// Genesis phase result
    pub genesis: GenesisReport,
    /// CSV phase result, if a directory was configured
    pub csv: Option<DirectoryReport>,
}

impl RunReport {
    /// Machine-readable summary
    #[must_use]
    pub fn summary(&self) -> Value {
        let csv = self.csv.as_ref().map(|report| {
            let converted: Vec<Value> = report
                .converted
                .iter()
                .map(|(input, output)| {
                    json!({
                        "input": input.display().to_string(),
                        "output": output.display().to_string(),
                    })
                })
                .collect();
            let unchanged: Vec<String> = report
                .unchanged
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            let failed: Vec<Value> = report
                .failed
                .iter()
                .map(|e| {
                    json!({
                        "file": e.path().display().to_string(),
                        "error": e.to_string(),
                    })
                })
                .collect();

            json!({
                "converted": converted,
                "unchanged": unchanged,
                "failed": failed,
            })
        });

        json!({
            "genesis": self.genesis,
            "csv": csv,
        })
    }
}

/// Convert the genesis document, then the CSV snapshot directory if configured
///
/// # Errors
///
/// Fails on an invalid prefix pair, any genesis conversion failure, or a CSV
/// directory that cannot be listed. Individual CSV file failures are reported
/// in [`RunReport::csv`] instead.
pub fn run(config: &MigrateConfig, input: &Path, output: &Path) -> MigrateResult<RunReport> {
    let rewriter = AddressRewriter::new(config.prefixes.clone())?;

    let genesis = GenesisConverter::new(&rewriter)
        .with_preserve_unknown_fields(config.preserve_unknown_fields)
        .convert(input, output)?;

    let csv = match &config.csv_dir {
        Some(dir) => {
            let report = CsvConverter::new(&rewriter).convert_directory(dir)?;
            tracing::info!(
                files = report.total(),
                converted = report.converted.len(),
                unchanged = report.unchanged.len(),
                failed = report.failed.len(),
                "finished CSV files"
            );
            Some(report)
        }
        None => None,
    };

    Ok(RunReport { genesis, csv })
}
