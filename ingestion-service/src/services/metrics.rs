//! Prometheus metrics for ingestion-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

/// Histogram for database query duration by operation.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ingestion_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Counter for ingested files by detected format and outcome.
pub static FILE_INGESTIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ingestion_files_total",
        "Total number of bank file ingestion attempts",
        &["format", "status"]
    )
    .expect("Failed to register FILE_INGESTIONS")
});

/// Counter for duplicate conflicts by scope (file or transaction).
pub static DUPLICATE_CONFLICTS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ingestion_duplicate_conflicts_total",
        "Total number of duplicate conflicts detected",
        &["scope"]
    )
    .expect("Failed to register DUPLICATE_CONFLICTS")
});

/// Counter for rows that failed structural validation.
pub static INVALID_ROWS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ingestion_invalid_rows_total",
        "Total number of rows retained with invalid status",
        &["format"]
    )
    .expect("Failed to register INVALID_ROWS")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&FILE_INGESTIONS);
    Lazy::force(&DUPLICATE_CONFLICTS);
    Lazy::force(&INVALID_ROWS);
}

/// Get all metrics as Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Record one ingestion attempt.
pub fn record_file_ingestion(format: &str, status: &str) {
    FILE_INGESTIONS.with_label_values(&[format, status]).inc();
}

/// Record duplicate conflicts detected in one pass.
pub fn record_duplicate_conflicts(scope: &str, count: u64) {
    DUPLICATE_CONFLICTS
        .with_label_values(&[scope])
        .inc_by(count as f64);
}

/// Record rows retained with invalid status.
pub fn record_invalid_rows(format: &str, count: u64) {
    INVALID_ROWS.with_label_values(&[format]).inc_by(count as f64);
}
