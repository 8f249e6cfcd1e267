//! Reconciliation orchestrator: sequences load, detect, normalize, validate,
//! dedup-check, and the conditional persists.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::ingestion::dedup::check_duplicates;
use crate::ingestion::fetch::FileFetcher;
use crate::ingestion::format::{FormatRegistry, UNKNOWN_FORMAT};
use crate::ingestion::grid::{load_grid, RawGrid};
use crate::ingestion::manifest::FileManifest;
use crate::ingestion::report::IngestionReport;
use crate::ingestion::validate::{validate_aggregates, validate_record, ValidationPolicy};
use crate::models::{FileSummary, TransactionRecord, TransactionStatus};
use crate::services::metrics;
use crate::services::store::IngestionStore;
use service_core::error::AppError;

pub struct IngestionPipeline {
    store: Arc<dyn IngestionStore>,
    registry: FormatRegistry,
    policy: ValidationPolicy,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<dyn IngestionStore>,
        registry: FormatRegistry,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            store,
            registry,
            policy,
        }
    }

    /// Fetch the file via the retrieval collaborator, then ingest it.
    pub async fn ingest_from(
        &self,
        fetcher: &dyn FileFetcher,
        file_url: &str,
        manifest: &FileManifest,
    ) -> Result<IngestionReport, AppError> {
        let bytes = fetcher.fetch(file_url).await?;
        self.ingest(&bytes, manifest).await
    }

    /// Decode workbook bytes and ingest the resulting grid.
    pub async fn ingest(
        &self,
        bytes: &[u8],
        manifest: &FileManifest,
    ) -> Result<IngestionReport, AppError> {
        let grid = load_grid(bytes)?;
        self.ingest_grid(&grid, manifest).await
    }

    /// Run one batch through the full pipeline.
    ///
    /// An undetectable format is terminal: no records are emitted and the
    /// caller gets a `BadRequest`. Everything after detection accumulates
    /// errors instead of short-circuiting, so one attempt reports the full
    /// picture of what is wrong with the batch.
    #[instrument(skip(self, grid, manifest), fields(file_name = %manifest.file_name, rows = grid.len()))]
    pub async fn ingest_grid(
        &self,
        grid: &RawGrid,
        manifest: &FileManifest,
    ) -> Result<IngestionReport, AppError> {
        let Some(format) = self.registry.detect(grid) else {
            warn!(file_name = %manifest.file_name, "No registered format matched");
            metrics::record_file_ingestion(UNKNOWN_FORMAT, "rejected");
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unrecognized file format for '{}'",
                manifest.file_name
            )));
        };

        info!(format = format.tag(), "Bank file format detected");

        // Row indexes are fixed here, before any async boundary, so
        // diagnostics stay stable regardless of query completion order.
        let records: Vec<TransactionRecord> = format
            .normalize(grid, &manifest.file_name)
            .into_iter()
            .map(validate_record)
            .collect();

        let mut errors = Vec::new();
        for record in &records {
            if record.status == TransactionStatus::Invalid {
                errors.push(format!(
                    "Row {}: invalid fields [{}] | UTR {}",
                    record.source_row_index, record.remark, record.utr
                ));
            }
        }
        let invalid_rows = errors.len() as u64;

        // Aggregates cover the rows whose amounts parsed; a row without a
        // numeric amount cannot contribute to a money total.
        let transaction_count = records.iter().filter(|r| r.amount.is_some()).count() as u32;
        let total_amount: Decimal = records.iter().filter_map(|r| r.amount).sum();

        let mut validation = validate_aggregates(
            transaction_count,
            total_amount,
            manifest.transaction_count,
            manifest.total_amount,
            errors,
            &self.policy,
        );

        let dedup = check_duplicates(
            self.store.as_ref(),
            &manifest.file_name,
            &records,
            &self.policy,
        )
        .await?;
        validation.errors.extend(dedup.errors.iter().cloned());

        if !dedup.is_file_valid {
            metrics::record_duplicate_conflicts("file", 1);
        }
        metrics::record_duplicate_conflicts(
            "transaction",
            dedup.duplicate_transactions.len() as u64,
        );
        metrics::record_invalid_rows(format.tag(), invalid_rows);

        // The two writes are independently gated; computed values, never
        // the manifest's claims, are what gets persisted.
        let summary_persisted = dedup.is_file_valid;
        if summary_persisted {
            self.store
                .insert_file_summary(&FileSummary {
                    file_name: manifest.file_name.clone(),
                    transaction_count: validation.transaction_count as i32,
                    total_amount: validation.total_amount,
                    duplicate_count: dedup.duplicate_transactions.len() as i32,
                })
                .await?;
        }

        let transactions_persisted = dedup.is_transaction_valid && !records.is_empty();
        if transactions_persisted {
            self.store.insert_transactions(&records).await?;
        }

        let status = if dedup.is_file_valid && dedup.is_transaction_valid {
            "accepted"
        } else {
            "rejected"
        };
        metrics::record_file_ingestion(format.tag(), status);

        info!(
            format = format.tag(),
            transaction_count = validation.transaction_count,
            duplicates = dedup.duplicate_transactions.len(),
            summary_persisted,
            transactions_persisted,
            "Ingestion completed"
        );

        Ok(IngestionReport {
            file_name: manifest.file_name.clone(),
            format: format.tag().to_string(),
            caption: manifest.caption.clone(),
            validation,
            dedup,
            summary_persisted,
            transactions_persisted,
        })
    }
}
