//! Demo Bank payout layout: a plain header row at the top of the sheet.

use crate::ingestion::format::{column_index, header_matches, BankFormat};
use crate::ingestion::grid::RawGrid;
use crate::ingestion::parse::{parse_amount, parse_date};
use crate::models::{TransactionRecord, TransactionStatus};

const HEADER_OFFSET: usize = 0;

const HEADER: [&str; 7] = [
    "S No",
    "UTR",
    "Amount",
    "Beneficiary Name",
    "Account Number",
    "IFSC Code",
    "Date",
];

pub struct DemoBankFormat;

impl BankFormat for DemoBankFormat {
    fn tag(&self) -> &'static str {
        "demo_bank"
    }

    fn matches(&self, grid: &RawGrid) -> bool {
        header_matches(grid, HEADER_OFFSET, &HEADER)
    }

    fn normalize(&self, grid: &RawGrid, file_name: &str) -> Vec<TransactionRecord> {
        let Some(header) = grid.row(HEADER_OFFSET) else {
            return Vec::new();
        };

        let col_utr = column_index(header, "UTR");
        let col_amount = column_index(header, "Amount");
        let col_name = column_index(header, "Beneficiary Name");
        let col_account = column_index(header, "Account Number");
        let col_ifsc = column_index(header, "IFSC Code");
        let col_date = column_index(header, "Date");

        let mut records = Vec::new();
        let mut data_index = 0;

        for (row_idx, row) in grid.rows().enumerate() {
            if row_idx <= HEADER_OFFSET {
                continue;
            }
            // Skip fully blank trailing rows; everything else is a data row.
            if row.iter().all(Option::is_none) {
                continue;
            }
            data_index += 1;

            let cell = |col: Option<usize>| col.and_then(|c| row.get(c)).and_then(|c| c.as_deref());
            let raw_amount = cell(col_amount);

            records.push(TransactionRecord {
                utr: cell(col_utr).unwrap_or_default().to_string(),
                source_row_index: data_index,
                account_holder_name: cell(col_name).unwrap_or_default().to_string(),
                account_number: cell(col_account).unwrap_or_default().to_string(),
                ifsc_code: cell(col_ifsc).unwrap_or_default().to_string(),
                amount: raw_amount.and_then(parse_amount),
                raw_amount: raw_amount.map(str::to_string),
                transaction_date: cell(col_date).and_then(parse_date),
                file_name: file_name.to_string(),
                status: TransactionStatus::Created,
                remark: String::new(),
                bank_remark: None,
            });
        }

        records
    }
}
