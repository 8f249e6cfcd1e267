//! Structural format detection over an open registry of known bank layouts.

use crate::ingestion::formats::{CnbFormat, DemoBankFormat, YesBankFormat};
use crate::ingestion::grid::RawGrid;
use crate::models::TransactionRecord;

/// Tag reported when no registered format claims a grid.
pub const UNKNOWN_FORMAT: &str = "unknown";

/// One known bank file layout: a structural fingerprint plus the normalizer
/// that turns matching grids into transaction records.
pub trait BankFormat: Send + Sync {
    fn tag(&self) -> &'static str;

    /// Structural fingerprint check: marker tags in column 0, or an expected
    /// header row at a declared offset. Must not inspect arbitrary content.
    fn matches(&self, grid: &RawGrid) -> bool;

    /// Normalize every structurally-eligible data row of the grid. Malformed
    /// data rows are retained with diagnostic fields populated, never
    /// silently dropped.
    fn normalize(&self, grid: &RawGrid, file_name: &str) -> Vec<TransactionRecord>;
}

/// Ordered list of known formats. Registration order is detection priority:
/// marker-based layouts are registered ahead of header-offset layouts because
/// sentinel tags are unambiguous, and the first match wins.
pub struct FormatRegistry {
    formats: Vec<Box<dyn BankFormat>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// The registry of layouts currently produced by partner banks.
    pub fn with_known_formats() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(YesBankFormat));
        registry.register(Box::new(CnbFormat));
        registry.register(Box::new(DemoBankFormat));
        registry
    }

    /// Append a format. New layouts extend the registry; detection control
    /// flow never changes.
    pub fn register(&mut self, format: Box<dyn BankFormat>) {
        self.formats.push(format);
    }

    /// Classify a grid. `None` means no registered format matched; that is a
    /// valid, non-erroring result surfaced to callers as [`UNKNOWN_FORMAT`].
    pub fn detect(&self, grid: &RawGrid) -> Option<&dyn BankFormat> {
        self.formats
            .iter()
            .find(|format| format.matches(grid))
            .map(Box::as_ref)
    }

    pub fn tags(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.tag()).collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_known_formats()
    }
}

/// Check whether the row at `offset` carries exactly the expected header
/// columns. Matching is by count and unordered membership: banks have been
/// observed to reorder columns between exports, so order is intentionally
/// not required.
pub(crate) fn header_matches(grid: &RawGrid, offset: usize, expected: &[&str]) -> bool {
    let Some(row) = grid.row(offset) else {
        return false;
    };

    let present: Vec<&str> = row.iter().filter_map(|cell| cell.as_deref()).collect();

    present.len() == expected.len() && present.iter().all(|name| expected.contains(name))
}

/// Position of a named column within a header row. Lets normalizers zip
/// header names to data cells regardless of column order.
pub(crate) fn column_index(header: &[Option<String>], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|cell| cell.as_deref() == Some(name))
}
