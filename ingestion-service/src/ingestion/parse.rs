//! Field-level parsing shared by all schema normalizers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Date patterns observed across partner bank exports, tried in order.
/// Two-digit-year patterns come first: `%y` leaves trailing input on a
/// four-digit year and falls through, while `%Y` would happily read `24`
/// as the year 24. Day-first formats come before ISO because that is what
/// the banks emit.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%d-%b-%Y",
];

/// Parse a transaction date, accepting the first candidate pattern that
/// yields a valid calendar date. Unparseable input is `None`, never an error;
/// the row validator decides what to do with a dateless record.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parse a monetary amount into a `Decimal`, tolerating thousands separators
/// and currency prefixes. Non-numeric input is `None`; callers keep the raw
/// text so the failure stays visible downstream.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = raw
        .trim()
        .trim_start_matches('₹')
        .trim_start_matches("Rs.")
        .trim_start_matches("INR")
        .replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

/// Whether a cell holds a plain number. Used to tell data rows from banner
/// and footer rows in header-based formats.
pub fn is_numeric(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && raw.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}
