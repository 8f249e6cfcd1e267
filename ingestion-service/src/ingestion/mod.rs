//! Bank file ingestion and reconciliation engine.

pub mod dedup;
pub mod fetch;
pub mod format;
pub mod formats;
pub mod grid;
pub mod manifest;
pub mod parse;
pub mod pipeline;
pub mod report;
pub mod validate;

pub use fetch::{FileFetcher, HttpFileFetcher};
pub use format::{BankFormat, FormatRegistry, UNKNOWN_FORMAT};
pub use grid::{load_grid, RawGrid};
pub use manifest::{parse_manifest, FileManifest};
pub use pipeline::IngestionPipeline;
pub use report::IngestionReport;
