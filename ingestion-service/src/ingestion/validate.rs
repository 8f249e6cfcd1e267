//! Row-level and aggregate validation.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{TransactionRecord, TransactionStatus};

/// Machine-readable check names carried in a failed record's remark.
pub const CHECK_AMOUNT_NOT_NUMERIC: &str = "amount_not_numeric";
pub const CHECK_NAME_TOO_SHORT: &str = "name_too_short";
pub const CHECK_ACCOUNT_TOO_SHORT: &str = "account_too_short";
pub const CHECK_IFSC_TOO_SHORT: &str = "ifsc_too_short";
pub const CHECK_UTR_INVALID: &str = "utr_invalid";

/// Which historical key identifies a duplicate transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKey {
    UtrAndAmount,
    UtrOnly,
}

impl DuplicateKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UtrAndAmount => "utr_amount",
            Self::UtrOnly => "utr",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "utr" => Self::UtrOnly,
            // utr+amount is the stricter and therefore safer default
            _ => Self::UtrAndAmount,
        }
    }
}

/// Tunable validation rules. Deployments disagree on tolerance and duplicate
/// keys, so these are configuration, not constants.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    /// Absolute tolerance for the declared-vs-computed total, in minor
    /// currency units. A difference of exactly the tolerance passes.
    pub amount_tolerance: Decimal,
    pub duplicate_key: DuplicateKey,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            amount_tolerance: Decimal::new(1, 2),
            duplicate_key: DuplicateKey::UtrAndAmount,
        }
    }
}

/// Whether a UTR looks like a real bank reference. Shared by the row
/// validator and the duplicate checker: a record whose UTR fails this test
/// carries no usable duplicate key.
pub fn is_utr_plausible(utr: &str) -> bool {
    let utr = utr.trim();
    !utr.is_empty() && utr != "undefined" && utr.len() >= 5
}

/// Structural field checks for one normalized record. Pure and total: every
/// input comes back with a definite status, nothing ever throws. Failed
/// checks land in `remark` as a comma-joined token list so callers can act
/// on them programmatically.
pub fn validate_record(mut record: TransactionRecord) -> TransactionRecord {
    let mut failed: Vec<&str> = Vec::new();

    if record.amount.is_none() {
        failed.push(CHECK_AMOUNT_NOT_NUMERIC);
    }
    if record.account_holder_name.trim().len() < 2 {
        failed.push(CHECK_NAME_TOO_SHORT);
    }
    if record.account_number.trim().len() < 2 {
        failed.push(CHECK_ACCOUNT_TOO_SHORT);
    }
    if record.ifsc_code.trim().len() < 2 {
        failed.push(CHECK_IFSC_TOO_SHORT);
    }

    if !is_utr_plausible(&record.utr) {
        failed.push(CHECK_UTR_INVALID);
    }

    if failed.is_empty() {
        record.status = TransactionStatus::Created;
        record.remark.clear();
    } else {
        record.status = TransactionStatus::Invalid;
        record.remark = failed.join(",");
    }

    record
}

/// Batch-level cross-check of computed statistics against the manifest's
/// declared expectations.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub is_transaction_count_valid: bool,
    pub is_total_amount_valid: bool,
    pub transaction_count: u32,
    pub total_amount: Decimal,
    /// Accumulated across stages: row defects first, then aggregate
    /// mismatches, then duplicate conflicts. Later stages append, never
    /// replace.
    pub errors: Vec<String>,
}

/// Compare computed count/total against declared expectations. A `None`
/// expectation is vacuously valid: absence of a claim is not a failure.
/// Count comparison is exact; amount comparison tolerates absolute drift up
/// to the policy tolerance. The computed values are authoritative for
/// persistence; the declared ones are only ever compared against.
pub fn validate_aggregates(
    transaction_count: u32,
    total_amount: Decimal,
    expected_count: Option<u32>,
    expected_total: Option<Decimal>,
    mut errors: Vec<String>,
    policy: &ValidationPolicy,
) -> ValidationOutcome {
    let is_transaction_count_valid = expected_count.is_none_or(|e| e == transaction_count);
    let is_total_amount_valid =
        expected_total.is_none_or(|e| (total_amount - e).abs() <= policy.amount_tolerance);

    if !is_transaction_count_valid {
        errors.push(format!(
            "Transaction count mismatch: expected {}, found {}",
            expected_count.unwrap_or_default(),
            transaction_count
        ));
    }

    if !is_total_amount_valid {
        errors.push(format!(
            "Total amount mismatch: expected {}, found {}",
            expected_total.unwrap_or_default(),
            total_amount
        ));
    }

    ValidationOutcome {
        is_transaction_count_valid,
        is_total_amount_valid,
        transaction_count,
        total_amount,
        errors,
    }
}
