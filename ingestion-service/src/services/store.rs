//! Read/write contract the ingestion core requires from persistence.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::{FileSummary, TransactionRecord};
use service_core::error::AppError;

/// Persistence seam for the ingestion pipeline. The engine is handed a
/// store rather than owning one, so callers control lifecycle and tests can
/// substitute an in-memory double. The store is append-only from this
/// core's perspective: nothing written here is ever updated by it.
#[async_trait]
pub trait IngestionStore: Send + Sync {
    /// Whether a batch with this file name was already ingested.
    async fn exists_file_summary(&self, file_name: &str) -> Result<bool, AppError>;

    /// Whether a transaction with this UTR (and, when `Some`, this amount)
    /// was already recorded in any earlier batch.
    async fn exists_transaction(
        &self,
        utr: &str,
        amount: Option<Decimal>,
    ) -> Result<bool, AppError>;

    async fn insert_file_summary(&self, summary: &FileSummary) -> Result<(), AppError>;

    /// Persist the full normalized batch, invalid rows included, preserving
    /// the given source order in the call.
    async fn insert_transactions(&self, records: &[TransactionRecord]) -> Result<(), AppError>;
}
