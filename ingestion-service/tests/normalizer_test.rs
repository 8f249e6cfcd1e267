//! Normalization behavior: row accounting, field mapping, and retention of
//! malformed rows.

mod common;

use common::*;
use ingestion_service::ingestion::FormatRegistry;
use ingestion_service::models::TransactionStatus;
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn yes_bank_emits_one_record_per_data_row() {
    init_tracing();
    let registry = FormatRegistry::with_known_formats();
    let grid = yes_bank_grid(vec![
        yes_bank_row("UTR1000001", "100.00"),
        yes_bank_row("UTR1000002", "200.00"),
        yes_bank_row("UTR1000003", "300.00"),
    ]);

    let format = registry.detect(&grid).unwrap();
    let records = format.normalize(&grid, "payouts.xlsx");

    // Marker rows are not data; every D row is.
    assert_eq!(records.len(), 3);
    let indexes: Vec<i32> = records.iter().map(|r| r.source_row_index).collect();
    assert_eq!(indexes, vec![1, 2, 3]);
}

#[test]
fn yes_bank_maps_positional_fields() {
    init_tracing();
    let registry = FormatRegistry::with_known_formats();
    let grid = yes_bank_grid(vec![yes_bank_row("UTR1000001", "1,234.56")]);

    let format = registry.detect(&grid).unwrap();
    let records = format.normalize(&grid, "payouts.xlsx");
    let record = &records[0];

    assert_eq!(record.utr, "UTR1000001");
    assert_eq!(record.ifsc_code, "YESB0000001");
    assert_eq!(record.account_number, "001122334455");
    assert_eq!(record.account_holder_name, "Asha Rao");
    assert_eq!(record.amount, Some(Decimal::from_str("1234.56").unwrap()));
    assert_eq!(record.raw_amount.as_deref(), Some("1,234.56"));
    assert!(record.transaction_date.is_some());
    assert_eq!(record.file_name, "payouts.xlsx");
}

#[test]
fn yes_bank_retains_rows_with_unparseable_amounts() {
    init_tracing();
    let registry = FormatRegistry::with_known_formats();
    let grid = yes_bank_grid(vec![
        yes_bank_row("UTR1000001", "100.00"),
        yes_bank_row("UTR1000002", "not-a-number"),
        yes_bank_row("UTR1000003", "300.00"),
    ]);

    let format = registry.detect(&grid).unwrap();
    let records = format.normalize(&grid, "payouts.xlsx");

    // The malformed row is kept with its raw cell preserved for diagnosis.
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].amount, None);
    assert_eq!(records[1].raw_amount.as_deref(), Some("not-a-number"));
    assert_eq!(records[1].source_row_index, 2);
}

#[test]
fn cnb_zips_cells_by_header_name_after_reorder() {
    init_tracing();
    let registry = FormatRegistry::with_known_formats();

    let mut header = cnb_header();
    let mut row = cnb_row("1", "UTR2000001", "250.00");
    header.reverse();
    row.reverse();
    let grid = cnb_grid(header, vec![row]);

    let format = registry.detect(&grid).unwrap();
    let records = format.normalize(&grid, "cnb.xlsx");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].utr, "UTR2000001");
    assert_eq!(records[0].account_number, "112233445566");
    assert_eq!(records[0].ifsc_code, "CNRB0001234");
    assert_eq!(records[0].amount, Some(Decimal::from_str("250.00").unwrap()));
}

#[test]
fn cnb_skips_rows_without_numeric_record_serial() {
    init_tracing();
    let registry = FormatRegistry::with_known_formats();

    let mut total_row = vec![String::new(); 16];
    total_row[0] = "Total".to_string();
    total_row[4] = "750.00".to_string();

    let grid = cnb_grid(
        cnb_header(),
        vec![
            cnb_row("1", "UTR2000001", "250.00"),
            cnb_row("2", "UTR2000002", "500.00"),
            total_row,
        ],
    );

    let format = registry.detect(&grid).unwrap();
    let records = format.normalize(&grid, "cnb.xlsx");

    // Banner and totals rows carry no record serial and are not data.
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].source_row_index, 1);
    assert_eq!(records[1].source_row_index, 2);
}

#[test]
fn cnb_concatenates_remarks_and_status_into_bank_remark() {
    init_tracing();
    let registry = FormatRegistry::with_known_formats();

    let mut row = cnb_row("1", "UTR2000001", "250.00");
    row[13] = "Credited to beneficiary".to_string();
    row[14] = "Success".to_string();
    let grid = cnb_grid(cnb_header(), vec![row]);

    let format = registry.detect(&grid).unwrap();
    let records = format.normalize(&grid, "cnb.xlsx");

    assert_eq!(
        records[0].bank_remark.as_deref(),
        Some("Credited to beneficiary Success")
    );
}

#[test]
fn demo_bank_skips_blank_rows_only() {
    init_tracing();
    let registry = FormatRegistry::with_known_formats();
    let blank = vec![String::new(); 7];
    let grid = demo_grid(vec![
        demo_row("1", "UTR3000001", "100.00"),
        blank,
        demo_row("2", "UTR3000002", "200.00"),
    ]);

    let format = registry.detect(&grid).unwrap();
    let records = format.normalize(&grid, "demo.xlsx");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].utr, "UTR3000001");
    assert_eq!(records[1].utr, "UTR3000002");
    assert_eq!(records[1].source_row_index, 2);
}

#[test]
fn demo_bank_parses_iso_dates() {
    init_tracing();
    let registry = FormatRegistry::with_known_formats();
    let grid = demo_grid(vec![demo_row("1", "UTR3000001", "100.00")]);

    let format = registry.detect(&grid).unwrap();
    let records = format.normalize(&grid, "demo.xlsx");

    let date = records[0].transaction_date.expect("2024-03-25 must parse");
    assert_eq!(date.to_string(), "2024-03-25");
}

#[test]
fn normalizers_never_mark_rows_invalid_themselves() {
    init_tracing();
    let registry = FormatRegistry::with_known_formats();
    let grid = yes_bank_grid(vec![yes_bank_row("", "garbage")]);

    let format = registry.detect(&grid).unwrap();
    let records = format.normalize(&grid, "payouts.xlsx");

    // Status judgments belong to the validator, not the normalizer.
    assert_eq!(records[0].status, TransactionStatus::Created);
    assert!(records[0].remark.is_empty());
}
