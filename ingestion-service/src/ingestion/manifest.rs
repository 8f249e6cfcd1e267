//! Parsing of the operator-supplied caption accompanying a bank file.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use service_core::error::AppError;

static FILE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)File Name:\s*(.+)").expect("file name pattern"));
static FILE_FORMAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)File Format:\s*(.+)").expect("file format pattern"));
static COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Transaction Count:\s*(\d+)").expect("count pattern"));
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Total Amount:\s*₹?\s*([\d,.]+)").expect("amount pattern"));

/// The externally declared claim against which a batch is cross-validated.
/// The count and total are nullable: operators do not always declare them,
/// and an absent claim is not a validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FileManifest {
    pub file_name: String,
    /// Advisory only; structural detection is authoritative.
    pub file_format: Option<String>,
    pub transaction_count: Option<u32>,
    pub total_amount: Option<Decimal>,
    /// The original caption text, echoed back in the report.
    pub caption: String,
}

/// Extract the manifest fields from free caption text.
///
/// The file name is required and is normalized to lowercase with an `.xlsx`
/// suffix, matching how summaries were historically keyed. A field label
/// that is present but unparseable rejects the manifest outright, before the
/// pipeline runs; a label that is absent leaves the field `None`.
pub fn parse_manifest(caption: &str) -> Result<FileManifest, AppError> {
    let file_name = FILE_NAME_RE
        .captures(caption)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid file metadata in caption")))?;

    let file_name = if file_name.ends_with(".xlsx") || file_name.ends_with(".xls") {
        file_name
    } else {
        format!("{}.xlsx", file_name)
    };

    let file_format = FILE_FORMAT_RE
        .captures(caption)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_lowercase());

    let transaction_count = match COUNT_RE.captures(caption) {
        Some(c) => {
            let raw = c.get(1).map(|m| m.as_str()).unwrap_or_default();
            Some(raw.parse::<u32>().map_err(|_| {
                AppError::BadRequest(anyhow::anyhow!("Invalid transaction count in caption"))
            })?)
        }
        None if caption.to_lowercase().contains("transaction count") => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid transaction count in caption"
            )));
        }
        None => None,
    };

    let total_amount = match AMOUNT_RE.captures(caption) {
        Some(c) => {
            let raw = c.get(1).map(|m| m.as_str()).unwrap_or_default();
            let cleaned = raw.replace(',', "");
            Some(Decimal::from_str(&cleaned).map_err(|_| {
                AppError::BadRequest(anyhow::anyhow!("Invalid total amount in caption"))
            })?)
        }
        None if caption.to_lowercase().contains("total amount") => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid total amount in caption"
            )));
        }
        None => None,
    };

    Ok(FileManifest {
        file_name,
        file_format,
        transaction_count,
        total_amount,
        caption: caption.to_string(),
    })
}
