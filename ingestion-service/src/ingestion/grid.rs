//! Row table loader: decodes a spreadsheet workbook into an untyped cell grid.

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use service_core::error::AppError;
use std::collections::HashSet;
use std::io::Cursor;
use tracing::instrument;

/// A rectangular grid of raw cell strings, as decoded from the first
/// worksheet of a bank file. Ephemeral: produced by the loader, consumed by
/// detection and normalization, never persisted.
#[derive(Debug, Clone)]
pub struct RawGrid {
    rows: Vec<Vec<Option<String>>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Build a grid from plain string cells; empty strings become empty
    /// cells. Intended for callers that already hold tabular data and for
    /// test fixtures.
    pub fn from_cells(rows: Vec<Vec<&str>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        let cell = cell.trim();
                        if cell.is_empty() {
                            None
                        } else {
                            Some(cell.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    pub fn row(&self, row: usize) -> Option<&[Option<String>]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct non-empty column-0 values across all rows. O(rows); used by
    /// marker-based format detection.
    pub fn column_zero_tags(&self) -> HashSet<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.first().and_then(|cell| cell.as_deref()))
            .collect()
    }
}

fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        // Excel-native dates are rendered day-first to match the text dates
        // the banks emit, so one set of date patterns covers both.
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%d/%m/%Y").to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Decode the first worksheet of an xlsx/xls workbook into a [`RawGrid`].
///
/// Decode failures are [`AppError::ParseError`], deliberately distinct from
/// the fetcher's `DownloadError`.
#[instrument(skip(bytes), fields(byte_len = bytes.len()))]
pub fn load_grid(bytes: &[u8]) -> Result<RawGrid, AppError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| AppError::ParseError(anyhow::anyhow!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError(anyhow::anyhow!("Workbook has no worksheets")))?
        .map_err(|e| AppError::ParseError(anyhow::anyhow!("Failed to read worksheet: {}", e)))?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(RawGrid::new(rows))
}
