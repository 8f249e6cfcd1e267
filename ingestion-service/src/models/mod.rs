//! Domain models for ingestion-service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

// ============================================================================
// Transaction Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Created,
    Invalid,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Invalid => "invalid",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "created" => Self::Created,
            "invalid" => Self::Invalid,
            _ => Self::Invalid,
        }
    }
}

/// One normalized payout row from a bank reconciliation file.
///
/// `utr` is the bank-issued reference used as the natural deduplication key.
/// `amount` is `None` when the source cell was not numeric; the original cell
/// text is kept in `raw_amount` so the row validator can flag it instead of
/// defaulting to zero.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub utr: String,
    /// 1-based position among the data rows of the originating file.
    pub source_row_index: i32,
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub amount: Option<Decimal>,
    pub raw_amount: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub file_name: String,
    pub status: TransactionStatus,
    pub remark: String,
    /// Remark text carried over from the bank file itself, where the format
    /// provides one (e.g. CNB status/error columns).
    pub bank_remark: Option<String>,
}

// ============================================================================
// File Summary Models
// ============================================================================

/// Batch-level summary, written once per accepted file. The unique
/// `file_name` is the anti-replay guard for resubmissions.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub file_name: String,
    pub transaction_count: i32,
    pub total_amount: Decimal,
    pub duplicate_count: i32,
}
