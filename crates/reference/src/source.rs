//! Reference row sources.

use ledger_core::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies the raw rows of a reference file, header included.
pub trait SsiSource: Send + Sync {
    /// Load every row of `file`.
    fn load_rows(&self, file: &str) -> Result<Vec<Vec<String>>>;
}

/// Reads reference tables as CSV files under a directory.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    reference_dir: PathBuf,
}

impl CsvFileSource {
    pub fn new(reference_dir: impl Into<PathBuf>) -> Self {
        Self {
            reference_dir: reference_dir.into(),
        }
    }

    pub fn reference_dir(&self) -> &Path {
        &self.reference_dir
    }
}

impl SsiSource for CsvFileSource {
    fn load_rows(&self, file: &str) -> Result<Vec<Vec<String>>> {
        let path = self.reference_dir.join(file);
        let csv_error = |e: csv::Error| Error::reference(format!("{}: {}", path.display(), e));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(csv_error)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(path = %path.display(), rows = rows.len(), "read reference file");
        Ok(rows)
    }
}

/// Reference tables held in memory, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    files: HashMap<String, Vec<Vec<String>>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file built from string rows.
    pub fn with_file<R, C>(mut self, file: &str, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.insert(file, rows);
        self
    }

    pub fn insert<R, C>(&mut self, file: &str, rows: R)
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.files.insert(file.to_string(), rows);
    }
}

impl SsiSource for InMemorySource {
    fn load_rows(&self, file: &str) -> Result<Vec<Vec<String>>> {
        self.files
            .get(file)
            .cloned()
            .ok_or_else(|| Error::reference(format!("no reference file named {}", file)))
    }
}
