//! Yes Bank bulk payout confirmation layout.
//!
//! Marker-based: every row carries a sentinel in column 0 (`H` header,
//! `D` data, `F` footer), so row role is independent of row position.
//! Fields are positional within `D` rows.

use crate::ingestion::format::BankFormat;
use crate::ingestion::grid::RawGrid;
use crate::ingestion::parse::{parse_amount, parse_date};
use crate::models::{TransactionRecord, TransactionStatus};

const DATA_MARKER: &str = "D";
const HEADER_MARKER: &str = "H";
const FOOTER_MARKER: &str = "F";

const COL_IFSC: usize = 7;
const COL_ACCOUNT_NUMBER: usize = 8;
const COL_HOLDER_NAME: usize = 9;
const COL_UTR: usize = 14;
const COL_DATE: usize = 15;
const COL_AMOUNT: usize = 16;

pub struct YesBankFormat;

impl BankFormat for YesBankFormat {
    fn tag(&self) -> &'static str {
        "yes_bank"
    }

    fn matches(&self, grid: &RawGrid) -> bool {
        let tags = grid.column_zero_tags();
        tags.contains(HEADER_MARKER) && tags.contains(FOOTER_MARKER)
    }

    fn normalize(&self, grid: &RawGrid, file_name: &str) -> Vec<TransactionRecord> {
        let mut records = Vec::new();
        let mut data_index = 0;

        for row in grid.rows() {
            if row.first().and_then(|c| c.as_deref()) != Some(DATA_MARKER) {
                continue;
            }
            data_index += 1;

            let cell = |col: usize| row.get(col).and_then(|c| c.as_deref());
            let raw_amount = cell(COL_AMOUNT);

            records.push(TransactionRecord {
                utr: cell(COL_UTR).unwrap_or_default().to_string(),
                source_row_index: data_index,
                account_holder_name: cell(COL_HOLDER_NAME).unwrap_or_default().to_string(),
                account_number: cell(COL_ACCOUNT_NUMBER).unwrap_or_default().to_string(),
                ifsc_code: cell(COL_IFSC).unwrap_or_default().to_string(),
                amount: raw_amount.and_then(parse_amount),
                raw_amount: raw_amount.map(str::to_string),
                transaction_date: cell(COL_DATE).and_then(parse_date),
                file_name: file_name.to_string(),
                status: TransactionStatus::Created,
                remark: String::new(),
                bank_remark: None,
            });
        }

        records
    }
}
