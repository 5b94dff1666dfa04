//! CSV snapshot conversion
//!
//! Every `*.csv` file directly inside a directory is rewritten cell by cell.
//! A file with at least one changed cell gets a sibling `<stem>_<new>.csv`;
//! the original is never modified. Failures are isolated per file.

use crate::error::{CsvFileError, DirectoryError};
use crate::rewriter::AddressRewriter;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Extension (without dot) of files picked up from the snapshot directory
pub const CSV_EXTENSION: &str = "csv";

/// Result of converting one CSV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// At least one cell changed; the converted table was written to `output`
    Converted {
        /// Sibling file holding the converted table
        output: PathBuf,
        /// Number of cells whose text changed
        cells_rewritten: usize,
    },
    /// No cell mentioned the old prefix; nothing was written
    Unchanged,
    /// File held no records; nothing was written
    Empty,
}

/// Per-file results of a directory conversion, in processing order
#[derive(Debug, Default)]
pub struct DirectoryReport {
    /// Input files that produced a converted sibling, with the sibling's path
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// Input files left without output (unchanged or empty)
    pub unchanged: Vec<PathBuf>,
    /// Input files that failed
    pub failed: Vec<CsvFileError>,
}

impl DirectoryReport {
    /// Total number of files visited
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.converted.len() + self.unchanged.len() + self.failed.len()
    }
}

/// Converts CSV snapshot files
#[derive(Debug, Clone, Copy)]
pub struct CsvConverter<'r> {
    rewriter: &'r AddressRewriter,
}

impl<'r> CsvConverter<'r> {
    /// Create a converter backed by `rewriter`
    #[inline]
    #[must_use]
    pub fn new(rewriter: &'r AddressRewriter) -> Self {
        Self { rewriter }
    }

    /// Convert every CSV file directly inside `dir`
    ///
    /// Per-file failures are logged and collected in the report; they never
    /// stop the remaining files from being processed.
    ///
    /// # Errors
    ///
    /// Fails with [`DirectoryError`] only if `dir` cannot be listed.
    pub fn convert_directory(&self, dir: &Path) -> Result<DirectoryReport, DirectoryError> {
        tracing::info!(directory = %dir.display(), "processing CSV files");

        let mut report = DirectoryReport::default();
        for path in list_csv_files(dir)? {
            match self.convert_file(&path) {
                Ok(FileOutcome::Converted { output, .. }) => report.converted.push((path, output)),
                Ok(FileOutcome::Unchanged | FileOutcome::Empty) => report.unchanged.push(path),
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "error processing CSV file");
                    report.failed.push(e);
                }
            }
        }

        Ok(report)
    }

    /// Convert a single CSV file
    ///
    /// # Errors
    ///
    /// Fails with [`CsvFileError`] if the file cannot be opened or parsed, or
    /// the converted sibling cannot be written.
    pub fn convert_file(&self, path: &Path) -> Result<FileOutcome, CsvFileError> {
        let mut records = read_records(path)?;
        if records.is_empty() {
            tracing::info!(file = %path.display(), "no records found");
            return Ok(FileOutcome::Empty);
        }

        let mut cells_rewritten = 0;
        for record in &mut records {
            for cell in record.iter_mut() {
                if !self.rewriter.mentions_old(cell) {
                    continue;
                }
                let rewritten = self.rewriter.rewrite(cell);
                if rewritten != cell.as_str() {
                    *cell = rewritten.into_owned();
                    cells_rewritten += 1;
                }
            }
        }

        if cells_rewritten == 0 {
            tracing::info!(file = %path.display(), "no addresses found to convert");
            return Ok(FileOutcome::Unchanged);
        }

        let output = output_path(path, self.rewriter.prefixes().new_prefix());
        write_records(&output, &records)?;

        tracing::info!(
            file = %path.display(),
            output = %output.display(),
            cells = cells_rewritten,
            "converted CSV addresses"
        );
        Ok(FileOutcome::Converted {
            output,
            cells_rewritten,
        })
    }
}

/// Sibling path for converted output: `accounts.csv` → `accounts_<new>.csv`
#[must_use]
pub fn output_path(input: &Path, new_prefix: &str) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name
        .strip_suffix(&format!(".{CSV_EXTENSION}"))
        .unwrap_or(&name);
    input.with_file_name(format!("{stem}_{new_prefix}.{CSV_EXTENSION}"))
}

/// Regular files in `dir` (non-recursive) with a `.csv` extension, sorted by name
///
/// # Errors
///
/// Fails with [`DirectoryError`] if `dir` cannot be listed.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, DirectoryError> {
    let entries = std::fs::read_dir(dir).map_err(|e| DirectoryError::read_error(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DirectoryError::read_error(dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(CSV_EXTENSION) {
            continue;
        }
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "skipping non-file entry");
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

fn read_records(path: &Path) -> Result<Vec<Vec<String>>, CsvFileError> {
    let file = File::open(path).map_err(|source| CsvFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|source| CsvFileError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
        })
        .collect()
}

fn write_records(path: &Path, records: &[Vec<String>]) -> Result<(), CsvFileError> {
    let to_error = |source: ::csv::Error| CsvFileError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = ::csv::WriterBuilder::new()
        .flexible(true)
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(to_error)?;

    for record in records {
        writer.write_record(record).map_err(to_error)?;
    }
    writer.flush().map_err(|e| to_error(e.into()))
}
