//! CNB corporate net-banking payout status layout.
//!
//! Header-based: the bank prepends five metadata rows, so the header row
//! sits at a fixed offset. Cells are zipped to header names rather than
//! positions because this bank reorders columns between exports.

use crate::ingestion::format::{column_index, header_matches, BankFormat};
use crate::ingestion::grid::RawGrid;
use crate::ingestion::parse::{is_numeric, parse_amount, parse_date};
use crate::models::{TransactionRecord, TransactionStatus};

const HEADER_OFFSET: usize = 5;

// Header names as the bank spells them, typo included.
const HEADER: [&str; 16] = [
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
];

pub struct CnbFormat;

impl BankFormat for CnbFormat {
    fn tag(&self) -> &'static str {
        "cnb"
    }

    fn matches(&self, grid: &RawGrid) -> bool {
        header_matches(grid, HEADER_OFFSET, &HEADER)
    }

    fn normalize(&self, grid: &RawGrid, file_name: &str) -> Vec<TransactionRecord> {
        let Some(header) = grid.row(HEADER_OFFSET) else {
            return Vec::new();
        };

        let col_record_no = column_index(header, "Record No");
        let col_date = column_index(header, "Value Date");
        let col_name = column_index(header, "Beneficiary Name");
        let col_amount = column_index(header, "Amount");
        let col_ifsc = column_index(header, "Benficiary Bank IFSC");
        let col_account = column_index(header, "Beneficiary Account Number");
        let col_utr = column_index(header, "RBI/UTR Reference Number");
        let col_remarks = column_index(header, "Remarks");
        let col_status = column_index(header, "Status");

        let mut records = Vec::new();
        let mut data_index = 0;

        for (row_idx, row) in grid.rows().enumerate() {
            if row_idx <= HEADER_OFFSET {
                continue;
            }

            let cell = |col: Option<usize>| col.and_then(|c| row.get(c)).and_then(|c| c.as_deref());

            // Banner and footer rows have no record serial.
            let serial = cell(col_record_no);
            if !serial.map(is_numeric).unwrap_or(false) {
                continue;
            }
            data_index += 1;

            let raw_amount = cell(col_amount);
            let bank_remark = match (cell(col_remarks), cell(col_status)) {
                (None, None) => None,
                (remarks, status) => Some(format!(
                    "{} {}",
                    remarks.unwrap_or_default(),
                    status.unwrap_or_default()
                )
                .trim()
                .to_string()),
            };

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
                bank_remark,
            });
        }

        records
    }
}
