//! In-memory application table backed by CSV.
//!
//! The table keeps every uploaded cell as a string so the original columns
//! survive for display; typed access happens through `numeric_column` and
//! the encoders. Column operations return new tables, the upload itself is
//! never mutated.

use crate::error::ScreenError;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// An uploaded table: ordered headers plus string cells, one `Vec` per row.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ApplicationTable {
    /// Build a table from headers and rows. Intended for tests and the
    /// data generator; uploads go through `from_path`.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a CSV file into a table.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open input file {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("failed to parse CSV from {}", path.display()))
    }

    /// Read CSV data from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .context("failed to read CSV header row")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.context("failed to read CSV record")?;
            rows.push(record.iter().map(|c| c.trim().to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a required column, as a typed schema error when absent.
    pub fn require_column(&self, name: &str) -> Result<usize, ScreenError> {
        self.column_index(name)
            .ok_or_else(|| ScreenError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// String values of one column.
    pub fn string_column(&self, name: &str) -> Result<Vec<&str>, ScreenError> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Numeric values of one column. A cell that does not parse is a hard
    /// type error carrying the 1-based row number.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, ScreenError> {
        let idx = self.require_column(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells[idx]
                    .parse::<f64>()
                    .map_err(|_| ScreenError::NonNumeric {
                        column: name.to_string(),
                        row: row + 1,
                        value: cells[idx].clone(),
                    })
            })
            .collect()
    }

    /// Return a copy of the table without the named column. A no-op when
    /// the column is absent, so dropping is idempotent.
    pub fn drop_column(&self, name: &str) -> Self {
        let Some(drop_idx) = self.column_index(name) else {
            return self.clone();
        };

        let headers = self
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != drop_idx)
            .map(|(_, h)| h.clone())
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(i, _)| *i != drop_idx)
                    .map(|(_, c)| c.clone())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// Return a copy with one extra column appended on the right.
    ///
    /// Panics in debug builds if the value count does not match the row
    /// count; callers validate label counts before annotating.
    pub fn with_column(&self, name: &str, values: &[String]) -> Self {
        debug_assert_eq!(values.len(), self.rows.len());

        let mut headers = self.headers.clone();
        headers.push(name.to_string());

        let rows = self
            .rows
            .iter()
            .zip(values.iter())
            .map(|(row, value)| {
                let mut row = row.clone();
                row.push(value.clone());
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Write the table as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(&self.headers)
            .context("failed to write CSV header")?;
        for row in &self.rows {
            csv_writer.write_record(row).context("failed to write CSV row")?;
        }
        csv_writer.flush().context("failed to flush CSV output")?;
        Ok(())
    }

    /// Write the table to a CSV file.
    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create output file {}", path.display()))?;
        self.write_csv(file)
    }
}
