//! Duplicate detection against previously ingested files and transactions.

use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use tracing::instrument;

use crate::ingestion::validate::{is_utr_plausible, DuplicateKey, ValidationPolicy};
use crate::models::TransactionRecord;
use crate::services::store::IngestionStore;
use service_core::error::AppError;

/// A batch row that collides with an already-recorded transaction.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateTransaction {
    pub utr: String,
    pub amount: Option<Decimal>,
    pub source_row_index: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupOutcome {
    /// False when this file name was already ingested (batch resubmission).
    pub is_file_valid: bool,
    /// False when any row collides with a historical record or repeats a
    /// key within the batch.
    pub is_transaction_valid: bool,
    pub duplicate_transactions: Vec<DuplicateTransaction>,
    pub errors: Vec<String>,
}

/// Check the batch against persisted state.
///
/// The file-name check and the per-row checks are independent and both must
/// pass before the corresponding write happens. Per-row existence queries
/// are all issued before any is awaited; a file may hold hundreds of rows
/// and serial round trips would dominate the request. `join_all` keeps the
/// results aligned with source order, so diagnostics are stable no matter
/// which query completes first.
#[instrument(skip(store, records), fields(file_name = %file_name, rows = records.len()))]
pub async fn check_duplicates(
    store: &dyn IngestionStore,
    file_name: &str,
    records: &[TransactionRecord],
    policy: &ValidationPolicy,
) -> Result<DedupOutcome, AppError> {
    let mut errors = Vec::new();

    let file_exists = store.exists_file_summary(file_name).await?;
    if file_exists {
        errors.push(format!(
            "File name '{}' already exists in the system",
            file_name
        ));
    }

    let keyed_amount = |record: &TransactionRecord| match policy.duplicate_key {
        DuplicateKey::UtrAndAmount => record.amount,
        DuplicateKey::UtrOnly => None,
    };

    // A row participates in duplicate matching only when it carries the full
    // policy key: a plausible UTR, and a parsed amount when the key includes
    // one. Keyless rows already fail row validation and are retained for
    // audit; matching them would flag distinct malformed rows as duplicates
    // of each other, and an absent amount would silently widen a key+amount
    // lookup to UTR-only.
    let has_duplicate_key = |record: &TransactionRecord| {
        is_utr_plausible(&record.utr)
            && (policy.duplicate_key == DuplicateKey::UtrOnly || record.amount.is_some())
    };

    let checks = records.iter().map(|record| {
        let eligible = has_duplicate_key(record);
        let amount = keyed_amount(record);
        async move {
            if eligible {
                store.exists_transaction(&record.utr, amount).await
            } else {
                Ok(false)
            }
        }
    });
    let results = join_all(checks).await;

    // Report every duplicate in the batch in one pass, not just the first.
    // Repeats of a key within the batch itself count from their second
    // occurrence onward.
    let mut duplicate_transactions = Vec::new();
    let mut seen_keys: HashSet<(String, Option<Decimal>)> = HashSet::new();

    for (record, exists) in records.iter().zip(results) {
        let exists = exists?;
        let repeated_in_batch = has_duplicate_key(record)
            && !seen_keys.insert((record.utr.clone(), keyed_amount(record)));

        if exists || repeated_in_batch {
            let amount_text = record
                .amount
                .map(|a| a.to_string())
                .or_else(|| record.raw_amount.clone())
                .unwrap_or_else(|| "n/a".to_string());
            errors.push(format!(
                "Duplicate transaction found: UTR {} with amount {}",
                record.utr, amount_text
            ));
            duplicate_transactions.push(DuplicateTransaction {
                utr: record.utr.clone(),
                amount: record.amount,
                source_row_index: record.source_row_index,
            });
        }
    }

    Ok(DedupOutcome {
        is_file_valid: !file_exists,
        is_transaction_valid: duplicate_transactions.is_empty(),
        duplicate_transactions,
        errors,
    })
}
