//! Tabular dataset ingestion.
//!
//! Parses a delimited file into an in-memory [`Table`] and infers a coarse
//! per-column type (numeric vs categorical). The table only exposes what the
//! rest of the tool needs: column names, inferred types, row access, and a
//! fixed-size CSV sample for prompt embedding.

use std::fmt;
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use uuid::Uuid;

/// Share of non-empty cells that must parse as a number for a column to be
/// treated as numeric.
const NUMERIC_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Errors raised while ingesting a dataset.
///
/// Any of these aborts the command; no partial table is retained.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset has no columns")]
    NoColumns,
    #[error("dataset has no rows")]
    NoRows,
}

/// Coarse column type used for stats and chart selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Categorical => write!(f, "categorical"),
        }
    }
}

/// An in-memory tabular dataset.
///
/// Rows are stored as raw strings; numeric access re-parses on demand. Cells
/// that are empty or whitespace-only are treated as nulls.
#[derive(Debug, Clone)]
pub struct Table {
    pub id: Uuid,
    pub name: String,
    headers: Vec<String>,
    types: Vec<ColumnType>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Loads a table from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self, IngestionError> {
        let name = path
            .file_stem()
            .map_or_else(|| "dataset".to_string(), |s| s.to_string_lossy().to_string());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, name)
    }

    /// Loads a table from any reader producing CSV with a header row.
    pub fn from_reader<R: Read>(reader: R, name: String) -> Result<Self, IngestionError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() {
            return Err(IngestionError::NoColumns);
        }

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.trim().to_string()).collect());
        }
        if rows.is_empty() {
            return Err(IngestionError::NoRows);
        }

        let types = infer_types(&headers, &rows);

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            headers,
            types,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_type(&self, index: usize) -> ColumnType {
        self.types[index]
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Indexes of numeric columns, in header order.
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.columns_of_type(ColumnType::Numeric)
    }

    /// Indexes of categorical columns, in header order.
    pub fn categorical_columns(&self) -> Vec<usize> {
        self.columns_of_type(ColumnType::Categorical)
    }

    fn columns_of_type(&self, ty: ColumnType) -> Vec<usize> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == ty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Non-null cell values of one column.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(index).map(String::as_str))
            .filter(|cell| !cell.is_empty())
    }

    /// Parsed numeric values of one column, nulls and unparseable cells skipped.
    pub fn numeric_values(&self, index: usize) -> Vec<f64> {
        self.column_values(index)
            .filter_map(|cell| cell.parse::<f64>().ok())
            .collect()
    }

    /// Numeric value of one column per row, `None` where the cell is null or
    /// unparseable. Used for pairwise statistics over aligned rows.
    pub fn numeric_cells(&self, index: usize) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|row| {
                row.get(index)
                    .filter(|cell| !cell.is_empty())
                    .and_then(|cell| cell.parse::<f64>().ok())
            })
            .collect()
    }

    /// Serializes the header plus the first `n` rows back to CSV text for
    /// prompt embedding.
    pub fn sample_csv(&self, n: usize) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        // Writing in-memory strings cannot fail.
        let _ = writer.write_record(&self.headers);
        for row in self.rows.iter().take(n) {
            let _ = writer.write_record(row);
        }
        let bytes = writer.into_inner().unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Infers a type per column: numeric when at least 80% of non-empty cells
/// parse as `f64` and at least one cell does, categorical otherwise.
fn infer_types(headers: &[String], rows: &[Vec<String>]) -> Vec<ColumnType> {
    (0..headers.len())
        .map(|col| {
            let mut non_empty = 0usize;
            let mut parsed = 0usize;
            for row in rows {
                let Some(cell) = row.get(col) else { continue };
                if cell.is_empty() {
                    continue;
                }
                non_empty += 1;
                if cell.parse::<f64>().is_ok() {
                    parsed += 1;
                }
            }
            if non_empty > 0
                && parsed > 0
                && (parsed as f64 / non_empty as f64) >= NUMERIC_CONFIDENCE_THRESHOLD
            {
                ColumnType::Numeric
            } else {
                ColumnType::Categorical
            }
        })
        .collect()
}
