use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::error::LedgerError;
use crate::schema::{Column, ColumnSchema};

mod table;

pub use table::RawTable;

/// Anything that can produce the unified raw transaction table.
pub trait LedgerSource {
    fn load(&self) -> Result<RawTable>;
}

/// A directory with one CSV export per wallet.
pub struct CsvDirectory {
    path: PathBuf,
    schema: ColumnSchema,
}

impl CsvDirectory {
    pub fn new(path: impl Into<PathBuf>, schema: ColumnSchema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }

    fn csv_files(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.path)
            .with_context(|| format!("Failed to read directory {}", self.path.display()))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .map(|extension| extension.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_csv && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn load_file(&self, path: &Path) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let headers = reader.headers()?.clone();
        let headers: Vec<&str> = headers.iter().map(strip_byte_order_mark).collect();

        let missing = self.schema.missing_raw_headers(headers.iter().copied());
        if !missing.is_empty() {
            return Err(LedgerError::MissingColumns {
                source: path.display().to_string(),
                columns: missing,
            }
            .into());
        }

        let columns = headers
            .iter()
            .map(|header| self.schema.canonical_name(header).to_string())
            .collect();
        let rows = reader
            .records()
            .map(|record| -> Result<Vec<String>> {
                Ok(record?.iter().map(str::to_string).collect())
            })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(RawTable::new(columns, rows))
    }
}

impl LedgerSource for CsvDirectory {
    fn load(&self) -> Result<RawTable> {
        let files = self.csv_files()?;
        log::info!("Found {} csv files", files.len());
        if files.is_empty() {
            return Err(LedgerError::NoInputFiles {
                path: self.path.clone(),
            }
            .into());
        }

        let mut table = RawTable::default();
        for file in &files {
            log::debug!("Reading {}", file.display());
            table.append(self.load_file(file)?);
        }

        let num_wallets = table.distinct_values(Column::Wallet.name()).len();
        if num_wallets != files.len() {
            log::warn!(
                "Found {} wallets in {} files, expected one wallet per file",
                num_wallets,
                files.len(),
            );
        }
        Ok(table)
    }
}

fn strip_byte_order_mark(header: &str) -> &str {
    header.strip_prefix('\u{FEFF}').unwrap_or(header)
}
