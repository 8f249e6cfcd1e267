//! Common test utilities for ingestion-service integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Mutex, Once};

use ingestion_service::ingestion::manifest::FileManifest;
use ingestion_service::ingestion::RawGrid;
use ingestion_service::models::{FileSummary, TransactionRecord, TransactionStatus};
use ingestion_service::services::store::IngestionStore;
use service_core::error::AppError;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,ingestion_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// In-memory store double implementing the same contract as the Postgres
/// store, so pipeline behavior can be exercised without a database.
#[derive(Default)]
pub struct MemoryStore {
    pub file_summaries: Mutex<Vec<FileSummary>>,
    pub transactions: Mutex<Vec<TransactionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a historical transaction, as if recorded by an earlier batch.
    pub fn seed_transaction(&self, utr: &str, amount: &str) {
        let record = TransactionRecord {
            utr: utr.to_string(),
            source_row_index: 1,
            account_holder_name: "Seeded Holder".to_string(),
            account_number: "999888777666".to_string(),
            ifsc_code: "SEED0000001".to_string(),
            amount: Decimal::from_str(amount).ok(),
            raw_amount: Some(amount.to_string()),
            transaction_date: None,
            file_name: "earlier_batch.xlsx".to_string(),
            status: TransactionStatus::Created,
            remark: String::new(),
            bank_remark: None,
        };
        self.transactions.lock().unwrap().push(record);
    }

    pub fn seed_file_summary(&self, file_name: &str) {
        self.file_summaries.lock().unwrap().push(FileSummary {
            file_name: file_name.to_string(),
            transaction_count: 0,
            total_amount: Decimal::ZERO,
            duplicate_count: 0,
        });
    }

    pub fn summary_count(&self) -> usize {
        self.file_summaries.lock().unwrap().len()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.lock().unwrap().len()
    }
}

#[async_trait]
impl IngestionStore for MemoryStore {
    async fn exists_file_summary(&self, file_name: &str) -> Result<bool, AppError> {
        Ok(self
            .file_summaries
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.file_name == file_name))
    }

    async fn exists_transaction(
        &self,
        utr: &str,
        amount: Option<Decimal>,
    ) -> Result<bool, AppError> {
        Ok(self.transactions.lock().unwrap().iter().any(|t| {
            t.utr == utr && amount.map_or(true, |a| t.amount == Some(a))
        }))
    }

    async fn insert_file_summary(&self, summary: &FileSummary) -> Result<(), AppError> {
        let mut summaries = self.file_summaries.lock().unwrap();
        if summaries.iter().any(|s| s.file_name == summary.file_name) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "File summary '{}' already exists",
                summary.file_name
            )));
        }
        summaries.push(summary.clone());
        Ok(())
    }

    async fn insert_transactions(&self, records: &[TransactionRecord]) -> Result<(), AppError> {
        self.transactions
            .lock()
            .unwrap()
            .extend(records.iter().cloned());
        Ok(())
    }
}

fn to_cells(row: Vec<String>) -> Vec<Option<String>> {
    row.into_iter()
        .map(|s| if s.is_empty() { None } else { Some(s) })
        .collect()
}

/// One Yes Bank `D` row with the given UTR and amount, other columns filled
/// with plausible beneficiary data.
pub fn yes_bank_row(utr: &str, amount: &str) -> Vec<String> {
    let mut row = vec![String::new(); 17];
    row[0] = "D".to_string();
    row[1] = "NEFT".to_string();
    row[7] = "YESB0000001".to_string();
    row[8] = "001122334455".to_string();
    row[9] = "Asha Rao".to_string();
    row[14] = utr.to_string();
    row[15] = "25/03/2024".to_string();
    row[16] = amount.to_string();
    row
}

/// A full Yes Bank grid: header marker row, the given data rows, footer
/// marker row.
pub fn yes_bank_grid(data_rows: Vec<Vec<String>>) -> RawGrid {
    let mut rows = Vec::with_capacity(data_rows.len() + 2);

    let mut header = vec![String::new(); 17];
    header[0] = "H".to_string();
    header[1] = "YES BANK BULK PAYOUT".to_string();
    rows.push(header);

    let count = data_rows.len();
    rows.extend(data_rows);

    let mut footer = vec![String::new(); 17];
    footer[0] = "F".to_string();
    footer[1] = count.to_string();
    rows.push(footer);

    RawGrid::new(rows.into_iter().map(to_cells).collect())
}

/// The CNB header row, in the bank's own column order and spelling.
pub fn cnb_header() -> Vec<String> {
    [
        "Record No",
        "Payment Type",
        "Value Date",
        "Beneficiary Name",
        "Amount",
        "Currency",
        "Benficiary Bank IFSC",
        "Beneficiary Account Number",
        "RBI/UTR Reference Number",
        "Debit Account Number",
        "Customer Reference Number",
        "Transaction Reference",
        "Instrument Number",
        "Remarks",
        "Status",
        "Error Description",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// One CNB data row in the bank's own column order.
pub fn cnb_row(serial: &str, utr: &str, amount: &str) -> Vec<String> {
    vec![
        serial.to_string(),
        "NEFT".to_string(),
        "25/03/2024".to_string(),
        "Ravi Kumar".to_string(),
        amount.to_string(),
        "INR".to_string(),
        "CNRB0001234".to_string(),
        "112233445566".to_string(),
        utr.to_string(),
        "998877665544".to_string(),
        "CRN-001".to_string(),
        "TXN-REF-001".to_string(),
        String::new(),
        "Processed".to_string(),
        "Success".to_string(),
        String::new(),
    ]
}

/// A CNB grid: five bank metadata rows, then the header, then the given
/// rows (data and banner rows alike).
pub fn cnb_grid(header: Vec<String>, body_rows: Vec<Vec<String>>) -> RawGrid {
    let mut rows: Vec<Vec<String>> = vec![
        vec!["Canara Bank".to_string()],
        vec!["Corporate Net Banking".to_string()],
        vec!["Bulk Payment Status Report".to_string()],
        vec!["Generated: 25/03/2024".to_string()],
        vec![String::new()],
    ];
    rows.push(header);
    rows.extend(body_rows);
    RawGrid::new(rows.into_iter().map(to_cells).collect())
}

pub fn demo_header() -> Vec<String> {
    ["S No", "UTR", "Amount", "Beneficiary Name", "Account Number", "IFSC Code", "Date"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn demo_row(serial: &str, utr: &str, amount: &str) -> Vec<String> {
    vec![
        serial.to_string(),
        utr.to_string(),
        amount.to_string(),
        "Meena Iyer".to_string(),
        "556677889900".to_string(),
        "DEMO0000123".to_string(),
        "2024-03-25".to_string(),
    ]
}

pub fn demo_grid(body_rows: Vec<Vec<String>>) -> RawGrid {
    let mut rows = vec![demo_header()];
    rows.extend(body_rows);
    RawGrid::new(rows.into_iter().map(to_cells).collect())
}

/// A manifest as the caption parser would produce it.
pub fn manifest(file_name: &str, count: Option<u32>, total: Option<&str>) -> FileManifest {
    FileManifest {
        file_name: file_name.to_string(),
        file_format: None,
        transaction_count: count,
        total_amount: total.and_then(|t| Decimal::from_str(t).ok()),
        caption: format!("File Name: {file_name}"),
    }
}
