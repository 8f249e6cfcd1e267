//! The structured outcome handed to the external notifier.

use serde::Serialize;

use crate::ingestion::dedup::DedupOutcome;
use crate::ingestion::validate::ValidationOutcome;

/// Combined result of one ingestion attempt: aggregate validation, dedup
/// outcome, persistence flags, and the original caption for echo-back. The
/// engine produces this object; rendering and delivery belong to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionReport {
    pub file_name: String,
    pub format: String,
    pub caption: String,
    pub validation: ValidationOutcome,
    pub dedup: DedupOutcome,
    pub summary_persisted: bool,
    pub transactions_persisted: bool,
}

impl IngestionReport {
    /// Operator-facing summary lines, one verdict per line.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4);

        lines.push(if self.dedup.is_file_valid {
            "✅ File Name: Unique".to_string()
        } else {
            "❌ File Name: Duplicate".to_string()
        });

        lines.push(if self.dedup.is_transaction_valid {
            "✅ Duplicate Transactions: 0".to_string()
        } else {
            format!(
                "❌ Duplicate Transactions: {}",
                self.dedup.duplicate_transactions.len()
            )
        });

        lines.push(format!(
            "{} Transactions: {}",
            if self.validation.is_transaction_count_valid {
                "✅"
            } else {
                "❌"
            },
            self.validation.transaction_count
        ));

        lines.push(format!(
            "{} Total Amount: {}",
            if self.validation.is_total_amount_valid {
                "✅"
            } else {
                "❌"
            },
            self.validation.total_amount
        ));

        lines
    }
}
